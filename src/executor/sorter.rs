//! Result sorter factory
//!
//! Compiles the query's orderings into a single composite comparator
//! over result rows: one sub-comparator per ordering, chained so the
//! first is primary and each later one only breaks ties.
//!
//! Case-normalizing operands are structural sugar; compilation unwraps
//! them onto the inner operand. Case normalization over a numeric
//! operand (length, score) has no defined order — such a key compiles to
//! a ties-equal comparator and emits a `sort_fallback` event instead of
//! failing the query.

use std::cmp::Ordering as CmpOrdering;

use serde_json::Value;

use crate::observability::{Event, Logger, Severity};
use crate::qom::{DynamicOperand, Order, Ordering};

use super::result::ResultRow;

/// Compares two optional values for sorting.
///
/// Ordering rules: absent < null < bool < number < string; within a
/// type, natural ordering. Arrays and objects tie.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => {
                    let a_f = a_n.as_f64().unwrap_or(0.0);
                    let b_f = b_n.as_f64().unwrap_or(0.0);
                    a_f.partial_cmp(&b_f).unwrap_or(CmpOrdering::Equal)
                }
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                _ => CmpOrdering::Equal,
            }
        }
    }
}

/// Case normalization applied to a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
}

/// What one compiled sort key reads from a row
#[derive(Debug, Clone, PartialEq)]
enum KeyKind {
    Property(String),
    NodeName,
    NodeLocalName,
    Length(String),
    Score,
    /// Could not be compiled; every pair of rows ties
    Unsupported,
}

#[derive(Debug, Clone)]
struct SortKey {
    kind: KeyKind,
    case: Option<Case>,
    descending: bool,
}

/// A compiled composite comparator over result rows
#[derive(Debug)]
pub struct RowSorter {
    keys: Vec<SortKey>,
    fallback_triggered: bool,
}

impl RowSorter {
    /// Compiles the orderings into a composite comparator.
    pub fn compile(orderings: &[Ordering]) -> Self {
        let mut keys = Vec::with_capacity(orderings.len());
        let mut fallback_triggered = false;

        for ordering in orderings {
            // Unwrap case normalizations onto the inner operand; the
            // outermost wrapper wins
            let mut case = None;
            let mut operand = &ordering.operand;
            loop {
                match operand {
                    DynamicOperand::UpperCase { operand: inner } => {
                        case.get_or_insert(Case::Upper);
                        operand = inner.as_ref();
                    }
                    DynamicOperand::LowerCase { operand: inner } => {
                        case.get_or_insert(Case::Lower);
                        operand = inner.as_ref();
                    }
                    _ => break,
                }
            }

            let kind = match operand {
                DynamicOperand::PropertyValue { property_name, .. } => {
                    KeyKind::Property(property_name.clone())
                }
                DynamicOperand::NodeName { .. } => KeyKind::NodeName,
                DynamicOperand::NodeLocalName { .. } => KeyKind::NodeLocalName,
                DynamicOperand::Length { property_name, .. } if case.is_none() => {
                    KeyKind::Length(property_name.clone())
                }
                DynamicOperand::FullTextSearchScore { .. } if case.is_none() => KeyKind::Score,
                unsupported => {
                    fallback_triggered = true;
                    Logger::log(
                        Severity::Warn,
                        Event::SortFallback,
                        &[("operand", &format!("{:?}", unsupported))],
                    );
                    KeyKind::Unsupported
                }
            };

            keys.push(SortKey {
                kind,
                case,
                descending: ordering.order == Order::Descending,
            });
        }

        Self {
            keys,
            fallback_triggered,
        }
    }

    /// Returns true if any ordering degraded to the ties-equal fallback.
    ///
    /// Call sites that must not serve silently-unsorted results check
    /// this after compilation.
    pub fn fallback_triggered(&self) -> bool {
        self.fallback_triggered
    }

    /// Sorts rows in place.
    ///
    /// The sort is stable; with no orderings, rows fall back to document
    /// order per selector name.
    pub fn sort(&self, rows: &mut [ResultRow]) {
        if self.keys.is_empty() {
            rows.sort_by(|a, b| {
                (&a.selector_name, &a.document.id).cmp(&(&b.selector_name, &b.document.id))
            });
            return;
        }

        rows.sort_by(|a, b| {
            for key in &self.keys {
                let ordering = compare_values(
                    self.key_value(a, key).as_ref(),
                    self.key_value(b, key).as_ref(),
                );
                let ordering = if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                };
                if ordering != CmpOrdering::Equal {
                    return ordering;
                }
            }
            CmpOrdering::Equal
        });
    }

    fn key_value(&self, row: &ResultRow, key: &SortKey) -> Option<Value> {
        let value = match &key.kind {
            KeyKind::Property(name) => row.document.properties.get(name).cloned()?,
            KeyKind::NodeName => Value::String(row.document.name.clone()),
            KeyKind::NodeLocalName => Value::String(row.document.local_name().to_string()),
            KeyKind::Length(name) => {
                Value::from(*row.document.property_lengths.get(name)?)
            }
            KeyKind::Score => Value::from(row.score),
            KeyKind::Unsupported => return None,
        };

        let value = match (key.case, value) {
            (Some(Case::Upper), Value::String(s)) => Value::String(s.to_uppercase()),
            (Some(Case::Lower), Value::String(s)) => Value::String(s.to_lowercase()),
            (_, other) => other,
        };

        Some(value)
    }
}
