//! Query sources
//!
//! A source names the typed content a query ranges over: a single
//! selector, or a join of two sources. Sources are self-describing —
//! they can enumerate the selector names they expose, which validation
//! uses to check column and ordering references.

use serde::{Deserialize, Serialize};

use super::errors::{QomError, QomResult};

/// A named reference to one queried type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    /// The declared type name this selector targets
    pub node_type: String,
    /// The alias the query refers to this selector by
    pub selector_name: String,
}

impl Selector {
    /// Creates a selector, failing fast on empty names.
    pub fn new(node_type: impl Into<String>, selector_name: impl Into<String>) -> QomResult<Self> {
        let node_type = node_type.into();
        let selector_name = selector_name.into();

        if node_type.is_empty() {
            return Err(QomError::empty_name("Selector node type"));
        }
        if selector_name.is_empty() {
            return Err(QomError::empty_name("Selector name"));
        }

        Ok(Self {
            node_type,
            selector_name,
        })
    }

    /// Creates a selector whose alias equals its type name.
    pub fn named(node_type: impl Into<String>) -> QomResult<Self> {
        let node_type = node_type.into();
        let selector_name = node_type.clone();
        Self::new(node_type, selector_name)
    }
}

/// Join kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
}

impl JoinType {
    /// Returns the rendering keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
        }
    }
}

/// Condition joining two selectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JoinCondition {
    /// Property equality between the two sides
    EquiJoin {
        selector1: String,
        property1: String,
        selector2: String,
        property2: String,
    },
    /// Both selectors match the same node
    SameNode {
        selector1: String,
        selector2: String,
    },
    /// One selector's node is a direct child of the other's
    ChildNode {
        child_selector: String,
        parent_selector: String,
    },
    /// One selector's node is a descendant of the other's
    DescendantNode {
        descendant_selector: String,
        ancestor_selector: String,
    },
}

/// Two sources combined by a join condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    /// Left side
    pub left: Box<Source>,
    /// Right side
    pub right: Box<Source>,
    /// Join kind
    pub join_type: JoinType,
    /// Join condition
    pub condition: JoinCondition,
}

/// The content a query ranges over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Source {
    /// A single typed selector
    Selector(Selector),
    /// A join of two sources
    Join(Join),
}

impl Source {
    /// Creates a join source, validating that the two sides do not
    /// declare the same selector name twice.
    pub fn join(
        left: Source,
        right: Source,
        join_type: JoinType,
        condition: JoinCondition,
    ) -> QomResult<Self> {
        for name in left.selector_names() {
            if right.selector_names().contains(&name) {
                return Err(QomError::duplicate_selector(name));
            }
        }

        Ok(Source::Join(Join {
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            condition,
        }))
    }

    /// Enumerates the selector names this source exposes.
    ///
    /// A selector contributes exactly one name; a join contributes the
    /// union of both sides, left side first.
    pub fn selector_names(&self) -> Vec<&str> {
        match self {
            Source::Selector(s) => vec![s.selector_name.as_str()],
            Source::Join(j) => {
                let mut names = j.left.selector_names();
                names.extend(j.right.selector_names());
                names
            }
        }
    }

    /// Returns true if this source exposes the given selector name
    pub fn exposes(&self, selector_name: &str) -> bool {
        self.selector_names().contains(&selector_name)
    }
}

impl From<Selector> for Source {
    fn from(selector: Selector) -> Self {
        Source::Selector(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(node_type: &str, name: &str) -> Source {
        Source::Selector(Selector::new(node_type, name).unwrap())
    }

    #[test]
    fn test_empty_names_rejected() {
        assert!(Selector::new("", "docs").is_err());
        assert!(Selector::new("Document", "").is_err());
        assert!(Selector::new("Document", "docs").is_ok());
    }

    #[test]
    fn test_selector_names_single() {
        let source = selector("Document", "docs");
        assert_eq!(source.selector_names(), vec!["docs"]);
        assert!(source.exposes("docs"));
        assert!(!source.exposes("other"));
    }

    #[test]
    fn test_join_selector_names_union() {
        let join = Source::join(
            selector("Document", "docs"),
            selector("Author", "authors"),
            JoinType::Inner,
            JoinCondition::EquiJoin {
                selector1: "docs".into(),
                property1: "author_id".into(),
                selector2: "authors".into(),
                property2: "id".into(),
            },
        )
        .unwrap();

        assert_eq!(join.selector_names(), vec!["docs", "authors"]);
    }

    #[test]
    fn test_duplicate_selector_rejected() {
        let result = Source::join(
            selector("Document", "docs"),
            selector("Image", "docs"),
            JoinType::Inner,
            JoinCondition::SameNode {
                selector1: "docs".into(),
                selector2: "docs".into(),
            },
        );

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().code().code(),
            "QRY_QOM_DUPLICATE_SELECTOR"
        );
    }

    #[test]
    fn test_nested_join_names() {
        let inner = Source::join(
            selector("Document", "d"),
            selector("Author", "a"),
            JoinType::Inner,
            JoinCondition::ChildNode {
                child_selector: "d".into(),
                parent_selector: "a".into(),
            },
        )
        .unwrap();

        let outer = Source::join(
            inner,
            selector("Tag", "t"),
            JoinType::LeftOuter,
            JoinCondition::DescendantNode {
                descendant_selector: "t".into(),
                ancestor_selector: "d".into(),
            },
        )
        .unwrap();

        assert_eq!(outer.selector_names(), vec!["d", "a", "t"]);
    }
}
