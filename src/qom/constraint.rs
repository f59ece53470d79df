//! Query constraints
//!
//! The constraint tree narrows which rows a source yields. Inner nodes
//! combine child constraints; leaves reference operands and columns.
//! Children are owned and always present, so a constructed tree has no
//! missing branches.

use serde::{Deserialize, Serialize};

use super::operand::{DynamicOperand, StaticOperand};

/// Comparison operators between a dynamic and a static operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
}

impl ComparisonOperator {
    /// Returns the rendering symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::EqualTo => "=",
            ComparisonOperator::NotEqualTo => "<>",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqualTo => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqualTo => ">=",
            ComparisonOperator::Like => "LIKE",
        }
    }
}

/// A node in the constraint tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Both children must hold
    And {
        left: Box<Constraint>,
        right: Box<Constraint>,
    },
    /// At least one child must hold
    Or {
        left: Box<Constraint>,
        right: Box<Constraint>,
    },
    /// The child must not hold
    Not { constraint: Box<Constraint> },
    /// Compare a dynamic operand against a static operand
    Comparison {
        operand1: DynamicOperand,
        operator: ComparisonOperator,
        operand2: StaticOperand,
    },
    /// The named property must exist on the row
    PropertyExistence {
        selector_name: String,
        property_name: String,
    },
    /// The row's node must be a descendant of the given path
    DescendantNode {
        selector_name: String,
        ancestor_path: String,
    },
    /// The row must match a full-text search expression.
    ///
    /// A missing property name searches all indexed text of the node.
    FullTextSearch {
        selector_name: String,
        property_name: Option<String>,
        expression: String,
    },
}

impl Constraint {
    /// Conjunction of two constraints
    pub fn and(self, other: Constraint) -> Self {
        Constraint::And {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Disjunction of two constraints
    pub fn or(self, other: Constraint) -> Self {
        Constraint::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Negation of this constraint
    pub fn not(self) -> Self {
        Constraint::Not {
            constraint: Box::new(self),
        }
    }

    /// Convenience constructor for a comparison
    pub fn comparison(
        operand1: DynamicOperand,
        operator: ComparisonOperator,
        operand2: StaticOperand,
    ) -> Self {
        Constraint::Comparison {
            operand1,
            operator,
            operand2,
        }
    }

    /// Convenience constructor for a property-equals-literal comparison
    pub fn property_eq(
        selector_name: impl Into<String>,
        property_name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Constraint::Comparison {
            operand1: DynamicOperand::property(selector_name, property_name),
            operator: ComparisonOperator::EqualTo,
            operand2: StaticOperand::literal(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_combinators_build_expected_tree() {
        let a = Constraint::property_eq("docs", "status", json!("published"));
        let b = Constraint::PropertyExistence {
            selector_name: "docs".into(),
            property_name: "title".into(),
        };

        let combined = a.clone().and(b.clone()).not();

        match combined {
            Constraint::Not { constraint } => match *constraint {
                Constraint::And { left, right } => {
                    assert_eq!(*left, a);
                    assert_eq!(*right, b);
                }
                other => panic!("Expected And, got {:?}", other),
            },
            other => panic!("Expected Not, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(ComparisonOperator::EqualTo.as_str(), "=");
        assert_eq!(ComparisonOperator::NotEqualTo.as_str(), "<>");
        assert_eq!(ComparisonOperator::Like.as_str(), "LIKE");
    }

    #[test]
    fn test_serde_round_trip() {
        let constraint = Constraint::property_eq("docs", "status", json!("published"))
            .or(Constraint::FullTextSearch {
                selector_name: "docs".into(),
                property_name: None,
                expression: "quarterly report".into(),
            });

        let json = serde_json::to_string(&constraint).unwrap();
        let back: Constraint = serde_json::from_str(&json).unwrap();
        assert_eq!(constraint, back);
    }
}
