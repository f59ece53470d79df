//! Query operands
//!
//! Dynamic operands are evaluated per result row; static operands are
//! fixed at query time (literals) or bound at execution time (bind
//! variables).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An operand whose value depends on the row being evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DynamicOperand {
    /// The full name of the node a selector matched
    NodeName {
        /// Selector the node belongs to
        selector_name: String,
    },
    /// The local (namespace-stripped) name of the node
    NodeLocalName {
        /// Selector the node belongs to
        selector_name: String,
    },
    /// The value of one property of the node
    PropertyValue {
        /// Selector the node belongs to
        selector_name: String,
        /// Property to read
        property_name: String,
    },
    /// The length of one property value (string length or binary size)
    Length {
        /// Selector the node belongs to
        selector_name: String,
        /// Property to measure
        property_name: String,
    },
    /// The full-text relevance score of the row
    FullTextSearchScore {
        /// Selector the score belongs to
        selector_name: String,
    },
    /// The inner operand's value, upper-cased
    UpperCase {
        /// Operand whose value is normalized
        operand: Box<DynamicOperand>,
    },
    /// The inner operand's value, lower-cased
    LowerCase {
        /// Operand whose value is normalized
        operand: Box<DynamicOperand>,
    },
}

impl DynamicOperand {
    /// Convenience constructor for a property value operand
    pub fn property(selector_name: impl Into<String>, property_name: impl Into<String>) -> Self {
        DynamicOperand::PropertyValue {
            selector_name: selector_name.into(),
            property_name: property_name.into(),
        }
    }

    /// Convenience constructor for a node name operand
    pub fn node_name(selector_name: impl Into<String>) -> Self {
        DynamicOperand::NodeName {
            selector_name: selector_name.into(),
        }
    }

    /// Wraps this operand in an upper-case normalization
    pub fn upper(self) -> Self {
        DynamicOperand::UpperCase {
            operand: Box::new(self),
        }
    }

    /// Wraps this operand in a lower-case normalization
    pub fn lower(self) -> Self {
        DynamicOperand::LowerCase {
            operand: Box::new(self),
        }
    }

    /// Returns the selector name this operand reads from.
    ///
    /// Case-normalizing operands delegate to their inner operand.
    pub fn selector_name(&self) -> &str {
        match self {
            DynamicOperand::NodeName { selector_name }
            | DynamicOperand::NodeLocalName { selector_name }
            | DynamicOperand::PropertyValue { selector_name, .. }
            | DynamicOperand::Length { selector_name, .. }
            | DynamicOperand::FullTextSearchScore { selector_name } => selector_name,
            DynamicOperand::UpperCase { operand } | DynamicOperand::LowerCase { operand } => {
                operand.selector_name()
            }
        }
    }
}

/// An operand fixed before execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaticOperand {
    /// A literal value
    Literal {
        /// The literal value
        value: Value,
    },
    /// A named bind variable, supplied at execution time
    BindVariable {
        /// Variable name, without the leading marker
        name: String,
    },
}

impl StaticOperand {
    /// Convenience constructor for a literal
    pub fn literal(value: impl Into<Value>) -> Self {
        StaticOperand::Literal {
            value: value.into(),
        }
    }

    /// Convenience constructor for a bind variable
    pub fn bind(name: impl Into<String>) -> Self {
        StaticOperand::BindVariable { name: name.into() }
    }
}
