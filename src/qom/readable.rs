//! Canonical query rendering
//!
//! Renders any query to one deterministic, readable string form:
//!
//! `SELECT <cols> FROM <source> [WHERE <constraint>]
//! [ORDER BY <orderings>] [LIMIT <n> [OFFSET <m>]]`
//!
//! Two structurally equal queries always render identically, so the
//! rendering doubles as a canonical form for diagnostics, hashing, and
//! round-trip tests against the parser collaborator.

use serde_json::Value;

use super::constraint::Constraint;
use super::operand::{DynamicOperand, StaticOperand};
use super::query::{Ordering, Query};
use super::source::{JoinCondition, Source};

/// Renders the canonical readable form of a query.
pub fn readable(query: &Query) -> String {
    let mut out = String::with_capacity(128);

    out.push_str("SELECT ");
    if query.columns.is_empty() {
        out.push('*');
    } else {
        for (i, column) in query.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if column.is_wildcard() {
                out.push_str(&column.selector_name);
                out.push_str(".*");
            } else {
                out.push_str(&column.selector_name);
                out.push('.');
                out.push_str(&column.property_name);
                if column.column_name != column.property_name {
                    out.push_str(" AS ");
                    out.push_str(&column.column_name);
                }
            }
        }
    }

    out.push_str(" FROM ");
    render_source(&mut out, &query.source);

    if let Some(constraint) = &query.constraint {
        out.push_str(" WHERE ");
        render_constraint(&mut out, constraint);
    }

    if !query.orderings.is_empty() {
        out.push_str(" ORDER BY ");
        for (i, ordering) in query.orderings.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_ordering(&mut out, ordering);
        }
    }

    if let Some(limit) = &query.limit {
        out.push_str(&format!(" LIMIT {}", limit.row_count));
        if limit.offset > 0 {
            out.push_str(&format!(" OFFSET {}", limit.offset));
        }
    }

    out
}

fn render_ordering(out: &mut String, ordering: &Ordering) {
    render_dynamic(out, &ordering.operand);
    out.push(' ');
    out.push_str(ordering.order.as_str());
}

fn render_source(out: &mut String, source: &Source) {
    match source {
        Source::Selector(s) => {
            out.push_str(&s.node_type);
            out.push_str(" AS ");
            out.push_str(&s.selector_name);
        }
        Source::Join(j) => {
            render_source(out, &j.left);
            out.push(' ');
            out.push_str(j.join_type.as_str());
            out.push(' ');
            render_source(out, &j.right);
            out.push_str(" ON ");
            render_join_condition(out, &j.condition);
        }
    }
}

fn render_join_condition(out: &mut String, condition: &JoinCondition) {
    match condition {
        JoinCondition::EquiJoin {
            selector1,
            property1,
            selector2,
            property2,
        } => {
            out.push_str(&format!(
                "{}.{} = {}.{}",
                selector1, property1, selector2, property2
            ));
        }
        JoinCondition::SameNode {
            selector1,
            selector2,
        } => {
            out.push_str(&format!("ISSAMENODE({}, {})", selector1, selector2));
        }
        JoinCondition::ChildNode {
            child_selector,
            parent_selector,
        } => {
            out.push_str(&format!(
                "ISCHILDNODE({}, {})",
                child_selector, parent_selector
            ));
        }
        JoinCondition::DescendantNode {
            descendant_selector,
            ancestor_selector,
        } => {
            out.push_str(&format!(
                "ISDESCENDANTNODE({}, {})",
                descendant_selector, ancestor_selector
            ));
        }
    }
}

fn render_constraint(out: &mut String, constraint: &Constraint) {
    match constraint {
        Constraint::And { left, right } => {
            out.push('(');
            render_constraint(out, left);
            out.push_str(" AND ");
            render_constraint(out, right);
            out.push(')');
        }
        Constraint::Or { left, right } => {
            out.push('(');
            render_constraint(out, left);
            out.push_str(" OR ");
            render_constraint(out, right);
            out.push(')');
        }
        Constraint::Not { constraint } => {
            out.push_str("NOT (");
            render_constraint(out, constraint);
            out.push(')');
        }
        Constraint::Comparison {
            operand1,
            operator,
            operand2,
        } => {
            render_dynamic(out, operand1);
            out.push(' ');
            out.push_str(operator.as_str());
            out.push(' ');
            render_static(out, operand2);
        }
        Constraint::PropertyExistence {
            selector_name,
            property_name,
        } => {
            out.push_str(&format!("{}.{} IS NOT NULL", selector_name, property_name));
        }
        Constraint::DescendantNode {
            selector_name,
            ancestor_path,
        } => {
            out.push_str(&format!(
                "ISDESCENDANTNODE({}, '{}')",
                selector_name, ancestor_path
            ));
        }
        Constraint::FullTextSearch {
            selector_name,
            property_name,
            expression,
        } => {
            let target = match property_name {
                Some(p) => format!("{}.{}", selector_name, p),
                None => format!("{}.*", selector_name),
            };
            out.push_str(&format!("CONTAINS({}, '{}')", target, expression));
        }
    }
}

fn render_dynamic(out: &mut String, operand: &DynamicOperand) {
    match operand {
        DynamicOperand::NodeName { selector_name } => {
            out.push_str(&format!("NAME({})", selector_name));
        }
        DynamicOperand::NodeLocalName { selector_name } => {
            out.push_str(&format!("LOCALNAME({})", selector_name));
        }
        DynamicOperand::PropertyValue {
            selector_name,
            property_name,
        } => {
            out.push_str(&format!("{}.{}", selector_name, property_name));
        }
        DynamicOperand::Length {
            selector_name,
            property_name,
        } => {
            out.push_str(&format!("LENGTH({}.{})", selector_name, property_name));
        }
        DynamicOperand::FullTextSearchScore { selector_name } => {
            out.push_str(&format!("SCORE({})", selector_name));
        }
        DynamicOperand::UpperCase { operand } => {
            out.push_str("UPPER(");
            render_dynamic(out, operand);
            out.push(')');
        }
        DynamicOperand::LowerCase { operand } => {
            out.push_str("LOWER(");
            render_dynamic(out, operand);
            out.push(')');
        }
    }
}

fn render_static(out: &mut String, operand: &StaticOperand) {
    match operand {
        StaticOperand::Literal { value } => render_literal(out, value),
        StaticOperand::BindVariable { name } => {
            out.push('$');
            out.push_str(name);
        }
    }
}

fn render_literal(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => {
            out.push('\'');
            // Single quotes double inside string literals
            out.push_str(&s.replace('\'', "''"));
            out.push('\'');
        }
        // Numbers, booleans, null, and structured values keep their
        // JSON text form, which is already deterministic
        other => out.push_str(&other.to_string()),
    }
}
