//! Constraint filtering
//!
//! Strict evaluation of a constraint tree against one indexed document.
//! The type predicate has already narrowed the candidates; this filter
//! decides final membership.

use std::collections::HashMap;

use serde_json::Value;

use crate::qom::{ComparisonOperator, Constraint, DynamicOperand, StaticOperand};
use crate::segment::IndexDocument;

use super::errors::{ExecutorError, ExecutorResult};
use super::sorter::compare_values;

/// Evaluates constraints against documents, resolving bind variables
pub struct ConstraintFilter<'a> {
    bindings: &'a HashMap<String, Value>,
}

impl<'a> ConstraintFilter<'a> {
    /// Creates a filter over the given bindings
    pub fn new(bindings: &'a HashMap<String, Value>) -> Self {
        Self { bindings }
    }

    /// Returns true if the document satisfies the constraint.
    ///
    /// A comparison against a property the document does not carry is
    /// false, never an error; a bind variable without a bound value is
    /// an error.
    pub fn matches(
        &self,
        document: &IndexDocument,
        score: u64,
        constraint: &Constraint,
    ) -> ExecutorResult<bool> {
        match constraint {
            Constraint::And { left, right } => {
                Ok(self.matches(document, score, left)? && self.matches(document, score, right)?)
            }
            Constraint::Or { left, right } => {
                Ok(self.matches(document, score, left)? || self.matches(document, score, right)?)
            }
            Constraint::Not { constraint } => Ok(!self.matches(document, score, constraint)?),
            Constraint::Comparison {
                operand1,
                operator,
                operand2,
            } => {
                let right = self.static_value(operand2)?;
                let Some(left) = Self::dynamic_value(document, score, operand1) else {
                    return Ok(false);
                };
                Ok(Self::compare(&left, *operator, &right))
            }
            Constraint::PropertyExistence { property_name, .. } => {
                Ok(document.properties.contains_key(property_name))
            }
            Constraint::DescendantNode { ancestor_path, .. } => {
                let ancestor = ancestor_path.trim_end_matches('/');
                Ok(document.path.starts_with(&format!("{}/", ancestor))
                    && document.path.len() > ancestor.len() + 1)
            }
            Constraint::FullTextSearch {
                property_name,
                expression,
                ..
            } => Ok(document.fulltext_matches(property_name.as_deref(), expression)),
        }
    }

    fn static_value(&self, operand: &StaticOperand) -> ExecutorResult<Value> {
        match operand {
            StaticOperand::Literal { value } => Ok(value.clone()),
            StaticOperand::BindVariable { name } => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| ExecutorError::missing_binding(name)),
        }
    }

    fn dynamic_value(
        document: &IndexDocument,
        score: u64,
        operand: &DynamicOperand,
    ) -> Option<Value> {
        match operand {
            DynamicOperand::NodeName { .. } => Some(Value::String(document.name.clone())),
            DynamicOperand::NodeLocalName { .. } => {
                Some(Value::String(document.local_name().to_string()))
            }
            DynamicOperand::PropertyValue { property_name, .. } => {
                document.properties.get(property_name).cloned()
            }
            DynamicOperand::Length { property_name, .. } => document
                .property_lengths
                .get(property_name)
                .map(|len| Value::from(*len)),
            DynamicOperand::FullTextSearchScore { .. } => Some(Value::from(score)),
            DynamicOperand::UpperCase { operand } => {
                match Self::dynamic_value(document, score, operand)? {
                    Value::String(s) => Some(Value::String(s.to_uppercase())),
                    other => Some(other),
                }
            }
            DynamicOperand::LowerCase { operand } => {
                match Self::dynamic_value(document, score, operand)? {
                    Value::String(s) => Some(Value::String(s.to_lowercase())),
                    other => Some(other),
                }
            }
        }
    }

    fn compare(left: &Value, operator: ComparisonOperator, right: &Value) -> bool {
        use std::cmp::Ordering;

        if operator == ComparisonOperator::Like {
            return match (left, right) {
                (Value::String(value), Value::String(pattern)) => Self::like_match(value, pattern),
                _ => false,
            };
        }

        let ordering = compare_values(Some(left), Some(right));
        match operator {
            ComparisonOperator::EqualTo => ordering == Ordering::Equal,
            ComparisonOperator::NotEqualTo => ordering != Ordering::Equal,
            ComparisonOperator::LessThan => ordering == Ordering::Less,
            ComparisonOperator::LessThanOrEqualTo => ordering != Ordering::Greater,
            ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
            ComparisonOperator::GreaterThanOrEqualTo => ordering != Ordering::Less,
            ComparisonOperator::Like => unreachable!("handled above"),
        }
    }

    /// Matches a value against a pattern where `%` spans any sequence
    /// and `_` any single character.
    fn like_match(value: &str, pattern: &str) -> bool {
        let value: Vec<char> = value.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();

        // Two-pointer scan with backtracking to the last `%`
        let (mut v, mut p) = (0usize, 0usize);
        let mut star: Option<(usize, usize)> = None;

        while v < value.len() {
            if p < pattern.len() && (pattern[p] == '_' || pattern[p] == value[v]) {
                v += 1;
                p += 1;
            } else if p < pattern.len() && pattern[p] == '%' {
                star = Some((p, v));
                p += 1;
            } else if let Some((star_p, star_v)) = star {
                p = star_p + 1;
                v = star_v + 1;
                star = Some((star_p, star_v + 1));
            } else {
                return false;
            }
        }

        while p < pattern.len() && pattern[p] == '%' {
            p += 1;
        }
        p == pattern.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentEntry, PropertyValue};
    use serde_json::json;

    fn document() -> IndexDocument {
        let entry = ContentEntry::new("e1", "/site/docs/q3:report", "Document")
            .with_property(
                "title",
                PropertyValue::String {
                    value: "Quarterly Report".into(),
                },
            )
            .with_property("pages", PropertyValue::Long { value: 12 });
        IndexDocument::from_entry(&entry)
    }

    fn no_bindings() -> HashMap<String, Value> {
        HashMap::new()
    }

    #[test]
    fn test_comparison_operators() {
        let bindings = no_bindings();
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let check = |op, value: Value| {
            filter
                .matches(
                    &doc,
                    0,
                    &Constraint::comparison(
                        DynamicOperand::property("docs", "pages"),
                        op,
                        StaticOperand::literal(value),
                    ),
                )
                .unwrap()
        };

        assert!(check(ComparisonOperator::EqualTo, json!(12)));
        assert!(check(ComparisonOperator::NotEqualTo, json!(13)));
        assert!(check(ComparisonOperator::LessThan, json!(20)));
        assert!(check(ComparisonOperator::GreaterThanOrEqualTo, json!(12)));
        assert!(!check(ComparisonOperator::GreaterThan, json!(12)));
    }

    #[test]
    fn test_missing_property_never_matches() {
        let bindings = no_bindings();
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let constraint = Constraint::comparison(
            DynamicOperand::property("docs", "missing"),
            ComparisonOperator::NotEqualTo,
            StaticOperand::literal(json!("x")),
        );

        assert!(!filter.matches(&doc, 0, &constraint).unwrap());
    }

    #[test]
    fn test_logical_combinators() {
        let bindings = no_bindings();
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let yes = Constraint::property_eq("docs", "pages", json!(12));
        let no = Constraint::property_eq("docs", "pages", json!(99));

        assert!(filter.matches(&doc, 0, &yes.clone().or(no.clone())).unwrap());
        assert!(!filter.matches(&doc, 0, &yes.clone().and(no.clone())).unwrap());
        assert!(filter.matches(&doc, 0, &no.not()).unwrap());
    }

    #[test]
    fn test_property_existence() {
        let bindings = no_bindings();
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let exists = Constraint::PropertyExistence {
            selector_name: "docs".into(),
            property_name: "title".into(),
        };
        let absent = Constraint::PropertyExistence {
            selector_name: "docs".into(),
            property_name: "reviewer".into(),
        };

        assert!(filter.matches(&doc, 0, &exists).unwrap());
        assert!(!filter.matches(&doc, 0, &absent).unwrap());
    }

    #[test]
    fn test_descendant_node() {
        let bindings = no_bindings();
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let under = |path: &str| Constraint::DescendantNode {
            selector_name: "docs".into(),
            ancestor_path: path.into(),
        };

        assert!(filter.matches(&doc, 0, &under("/site")).unwrap());
        assert!(filter.matches(&doc, 0, &under("/site/docs/")).unwrap());
        // A node is not its own descendant
        assert!(!filter
            .matches(&doc, 0, &under("/site/docs/q3:report"))
            .unwrap());
        assert!(!filter.matches(&doc, 0, &under("/other")).unwrap());
    }

    #[test]
    fn test_fulltext_and_score_operand() {
        let bindings = no_bindings();
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let contains = Constraint::FullTextSearch {
            selector_name: "docs".into(),
            property_name: None,
            expression: "quarterly".into(),
        };
        assert!(filter.matches(&doc, 2, &contains).unwrap());

        let scored = Constraint::comparison(
            DynamicOperand::FullTextSearchScore {
                selector_name: "docs".into(),
            },
            ComparisonOperator::GreaterThan,
            StaticOperand::literal(json!(1)),
        );
        assert!(filter.matches(&doc, 2, &scored).unwrap());
        assert!(!filter.matches(&doc, 1, &scored).unwrap());
    }

    #[test]
    fn test_bind_variable_resolution() {
        let mut bindings = HashMap::new();
        bindings.insert("wanted".to_string(), json!("Quarterly Report"));
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let constraint = Constraint::comparison(
            DynamicOperand::property("docs", "title"),
            ComparisonOperator::EqualTo,
            StaticOperand::bind("wanted"),
        );
        assert!(filter.matches(&doc, 0, &constraint).unwrap());

        let unbound = Constraint::comparison(
            DynamicOperand::property("docs", "title"),
            ComparisonOperator::EqualTo,
            StaticOperand::bind("other"),
        );
        let result = filter.matches(&doc, 0, &unbound);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code().code(), "QRY_BINDING_MISSING");
    }

    #[test]
    fn test_case_normalized_comparison() {
        let bindings = no_bindings();
        let filter = ConstraintFilter::new(&bindings);
        let doc = document();

        let constraint = Constraint::comparison(
            DynamicOperand::property("docs", "title").upper(),
            ComparisonOperator::EqualTo,
            StaticOperand::literal(json!("QUARTERLY REPORT")),
        );
        assert!(filter.matches(&doc, 0, &constraint).unwrap());
    }

    #[test]
    fn test_like_patterns() {
        assert!(ConstraintFilter::like_match("report", "report"));
        assert!(ConstraintFilter::like_match("report", "rep%"));
        assert!(ConstraintFilter::like_match("report", "%port"));
        assert!(ConstraintFilter::like_match("report", "r_p_rt"));
        assert!(ConstraintFilter::like_match("report", "%"));
        assert!(ConstraintFilter::like_match("", "%"));
        assert!(!ConstraintFilter::like_match("report", "rep"));
        assert!(!ConstraintFilter::like_match("report", "_port"));
        assert!(ConstraintFilter::like_match("a.b.c", "a%c"));
    }
}
