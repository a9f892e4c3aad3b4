use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A single field value as seen by the table engine.
///
/// Mock arrays and REST payloads both end up here: scalars are compared and
/// searched, `List` and `Map` are carried along but never text-matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Rank used when two values of different kinds meet in a sort.
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Text(_) => 3,
            Value::Date(_) | Value::DateTime(_) => 4,
            Value::List(_) => 5,
            Value::Map(_) => 6,
        }
    }

    fn instant(&self) -> Option<(NaiveDate, Option<NaiveTime>)> {
        match self {
            Value::Date(date) => Some((*date, None)),
            Value::DateTime(at) => Some((at.date(), Some(at.time()))),
            _ => None,
        }
    }

    /// Total order over values: numeric for numbers, chronological for
    /// dates, case-sensitive lexicographic for text. Mixed kinds fall back
    /// to `Null < Bool < number < Text < date < List < Map`.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => int_float_cmp(*a, *b),
            (Value::Float(a), Value::Int(b)) => int_float_cmp(*b, *a).reverse(),
            (Value::Float(a), Value::Float(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Date(_) | Value::DateTime(_), Value::Date(_) | Value::DateTime(_)) => {
                self.instant().cmp(&other.instant())
            }
            (Value::List(a), Value::List(b)) => a
                .iter()
                .zip(b)
                .map(|(left, right)| left.natural_cmp(right))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Value::Map(a), Value::Map(b)) => a
                .iter()
                .zip(b)
                .map(|((left_key, left), (right_key, right))| {
                    left_key.cmp(right_key).then_with(|| left.natural_cmp(right))
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    /// Case-insensitive substring test against the textual form.
    ///
    /// `needle` must already be lowercased.
    pub fn contains_text(&self, needle: &str) -> bool {
        match self {
            Value::Text(text) => text.to_lowercase().contains(needle),
            other => other.to_string().to_lowercase().contains(needle),
        }
    }
}

/// Exact comparison of an integer against a float, with no rounding through
/// `f64`. NaN sorts past every number on the side of its sign bit, matching
/// `f64::total_cmp`.
fn int_float_cmp(int: i64, float: f64) -> Ordering {
    // i64::MIN and 2^63 are exactly representable.
    const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
    const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= I64_UPPER {
        return Ordering::Less;
    }
    if float < I64_LOWER {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    // In range, so the cast is exact.
    int.cmp(&(whole as i64)).then_with(|| {
        if float > whole {
            Ordering::Less
        } else if float < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
            Value::Date(value) => write!(f, "{value}"),
            Value::DateTime(value) => write!(f, "{value}"),
            Value::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(flag) => Value::Bool(flag),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Value::Int)
                .or_else(|| number.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            serde_json::Value::String(text) => Value::Text(text),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert_eq!(Value::Int(2).natural_cmp(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(Value::Float(3.0).natural_cmp(&Value::Int(3)), Ordering::Equal);
        assert_eq!(Value::Int(10).natural_cmp(&Value::Int(9)), Ordering::Greater);
    }

    #[test]
    fn int_float_comparison_is_exact_beyond_f64_precision() {
        let big = 1i64 << 53;
        let float = Value::Float(big as f64);

        assert_eq!(Value::Int(big).natural_cmp(&float), Ordering::Equal);
        assert_eq!(float.natural_cmp(&Value::Int(big + 1)), Ordering::Less);
        assert_eq!(Value::Int(big + 1).natural_cmp(&float), Ordering::Greater);
        assert_eq!(
            Value::Int(i64::MAX).natural_cmp(&Value::Float(9.3e18)),
            Ordering::Less
        );
        assert_eq!(Value::Int(-3).natural_cmp(&Value::Float(-2.5)), Ordering::Less);
        assert_eq!(Value::Int(-2).natural_cmp(&Value::Float(-2.5)), Ordering::Greater);
        assert_eq!(Value::Int(0).natural_cmp(&Value::Float(-0.0)), Ordering::Equal);
        assert_eq!(
            Value::Float(-0.0).natural_cmp(&Value::Float(0.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn nan_sorts_after_every_number() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(Value::Int(i64::MAX).natural_cmp(&nan), Ordering::Less);
        assert_eq!(nan.natural_cmp(&Value::Int(0)), Ordering::Greater);
        assert_eq!(Value::Float(f64::INFINITY).natural_cmp(&nan), Ordering::Less);
    }

    #[test]
    fn text_comparison_is_case_sensitive() {
        assert_eq!(
            Value::from("Zed").natural_cmp(&Value::from("amy")),
            Ordering::Less
        );
    }

    #[test]
    fn bare_date_sorts_before_time_on_same_day() {
        let day = date(2024, 3, 1);
        let morning = day.and_hms_opt(8, 0, 0).expect("valid time");
        assert_eq!(
            Value::Date(day).natural_cmp(&Value::DateTime(morning)),
            Ordering::Less
        );
        assert_eq!(
            Value::Date(date(2024, 3, 2)).natural_cmp(&Value::DateTime(morning)),
            Ordering::Greater
        );
    }

    #[test]
    fn mixed_kinds_use_rank() {
        assert_eq!(Value::Null.natural_cmp(&Value::Bool(false)), Ordering::Less);
        assert_eq!(Value::Int(99).natural_cmp(&Value::from("1")), Ordering::Less);
        assert_eq!(
            Value::from("z").natural_cmp(&Value::Date(date(1990, 1, 1))),
            Ordering::Less
        );
    }

    #[test]
    fn display_uses_default_textual_form() {
        assert_eq!(Value::Float(30.0).to_string(), "30");
        assert_eq!(Value::Float(1234.5).to_string(), "1234.5");
        assert_eq!(Value::Date(date(2023, 1, 15)).to_string(), "2023-01-15");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::from("a")]).to_string(),
            "1,a"
        );
    }

    #[test]
    fn contains_text_ignores_case() {
        assert!(Value::from("Amy").contains_text("am"));
        assert!(Value::Int(4500).contains_text("45"));
        assert!(Value::Bool(true).contains_text("tru"));
        assert!(!Value::Null.contains_text("a"));
    }

    #[test]
    fn json_payload_converts_recursively() {
        let json = serde_json::json!({
            "name": "Amy",
            "age": 25,
            "salary": 4200.5,
            "active": true,
            "manager": null,
            "skills": ["rust", "sql"],
        });

        let Value::Map(fields) = Value::from(json) else {
            panic!("object should convert to a map");
        };
        assert_eq!(fields["name"], Value::from("Amy"));
        assert_eq!(fields["age"], Value::Int(25));
        assert_eq!(fields["salary"], Value::Float(4200.5));
        assert_eq!(fields["active"], Value::Bool(true));
        assert_eq!(fields["manager"], Value::Null);
        assert_eq!(
            fields["skills"],
            Value::List(vec![Value::from("rust"), Value::from("sql")])
        );
    }
}
