//! Condition matching for the automation engine.
//!
//! `matches_condition` evaluates one stored condition against one ticket
//! snapshot; `all_conditions_match` ANDs a workflow's condition set. Both
//! are pure: they read the snapshot and write nothing.
//!
//! String comparisons lowercase both sides so that casing drift in stored
//! data never produces a false negative. A condition with an operator
//! outside the recognized set evaluates to a non-match and logs a warning
//! rather than firing actions off a misconfigured rule.

use serde_json::Value;
use tracing::warn;

use crate::domain::models::ticket::TicketSnapshot;
use crate::domain::models::workflow::{Condition, ConditionOperator};

/// Evaluate one condition against a ticket snapshot.
pub fn matches_condition(condition: &Condition, ticket: &TicketSnapshot) -> bool {
    let Some(operator) = ConditionOperator::from_str(&condition.operator) else {
        warn!(
            operator = %condition.operator,
            field = %condition.field,
            "unrecognized condition operator, treating as non-match"
        );
        return false;
    };

    let actual = ticket.resolve(&condition.field);
    let expected = condition.value.as_deref().unwrap_or("");

    match operator {
        ConditionOperator::Equals => values_equal(actual, expected),
        ConditionOperator::NotEquals => !values_equal(actual, expected),
        ConditionOperator::In => {
            let Some(needle) = actual.and_then(coerce_string) else {
                return false;
            };
            let needle = needle.to_lowercase();
            expected
                .split(',')
                .map(|entry| entry.trim().to_lowercase())
                .any(|entry| entry == needle)
        }
        ConditionOperator::Changed => ticket.field_changed(&condition.field),
        ConditionOperator::Contains => value_contains(actual, expected),
        ConditionOperator::NotContains => !value_contains(actual, expected),
        ConditionOperator::GreaterThan => numeric_cmp(actual, expected, |a, b| a > b),
        ConditionOperator::LessThan => numeric_cmp(actual, expected, |a, b| a < b),
        ConditionOperator::GreaterThanOrEqual => numeric_cmp(actual, expected, |a, b| a >= b),
        ConditionOperator::LessThanOrEqual => numeric_cmp(actual, expected, |a, b| a <= b),
        ConditionOperator::IsEmpty => is_empty(actual),
        ConditionOperator::IsNotEmpty => !is_empty(actual),
    }
}

/// AND every condition of a workflow.
///
/// An empty or absent condition list matches any ticket: a workflow with
/// no conditions always fires on its trigger.
pub fn all_conditions_match(ticket: &TicketSnapshot, conditions: &[Condition]) -> bool {
    conditions
        .iter()
        .all(|condition| matches_condition(condition, ticket))
}

fn values_equal(actual: Option<&Value>, expected: &str) -> bool {
    match actual {
        None => false,
        Some(Value::String(s)) => s.to_lowercase() == expected.to_lowercase(),
        Some(Value::Bool(b)) => b.to_string() == expected.to_lowercase(),
        Some(Value::Number(n)) => match (n.as_f64(), expected.trim().parse::<f64>()) {
            (Some(a), Ok(b)) => a == b,
            _ => n.to_string() == expected,
        },
        Some(_) => false,
    }
}

fn value_contains(actual: Option<&Value>, expected: &str) -> bool {
    let Some(haystack) = actual.and_then(coerce_string) else {
        return false;
    };
    haystack.to_lowercase().contains(&expected.to_lowercase())
}

fn numeric_cmp(actual: Option<&Value>, expected: &str, cmp: fn(f64, f64) -> bool) -> bool {
    let lhs = actual.and_then(coerce_number);
    let rhs = expected.trim().parse::<f64>().ok();
    match (lhs, rhs) {
        (Some(a), Some(b)) => cmp(a, b),
        // Non-numeric on either side: every comparison is false.
        _ => false,
    }
}

fn is_empty(actual: Option<&Value>) -> bool {
    match actual {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
