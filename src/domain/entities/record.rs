use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::value::Value;

/// A dynamically shaped record, as produced by mock arrays or REST payloads.
pub type Row = BTreeMap<String, Value>;

/// Resolves field values on a record.
///
/// The engine never inspects records itself; every sort key and every
/// searchable string goes through the accessor supplied at construction.
pub trait FieldAccessor<R> {
    /// Value of `field` on `record`, `Value::Null` when the field is absent.
    fn value(&self, record: &R, field: &str) -> Value;

    /// All scalar values of `record`, in a stable order.
    fn scalar_values(&self, record: &R) -> Vec<Value>;

    /// Whether any scalar value contains `needle` (already lowercased).
    fn matches(&self, record: &R, needle: &str) -> bool {
        self.scalar_values(record)
            .iter()
            .any(|value| value.contains_text(needle))
    }
}

impl<R, A: FieldAccessor<R> + ?Sized> FieldAccessor<R> for Arc<A> {
    fn value(&self, record: &R, field: &str) -> Value {
        (**self).value(record, field)
    }

    fn scalar_values(&self, record: &R) -> Vec<Value> {
        (**self).scalar_values(record)
    }

    fn matches(&self, record: &R, needle: &str) -> bool {
        (**self).matches(record, needle)
    }
}

/// Accessor for [`Row`]: plain key lookup, every scalar entry searchable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowAccessor;

impl FieldAccessor<Row> for RowAccessor {
    fn value(&self, record: &Row, field: &str) -> Value {
        record.get(field).cloned().unwrap_or_default()
    }

    fn scalar_values(&self, record: &Row) -> Vec<Value> {
        record
            .values()
            .filter(|value| value.is_scalar())
            .cloned()
            .collect()
    }

    fn matches(&self, record: &Row, needle: &str) -> bool {
        record
            .values()
            .filter(|value| value.is_scalar())
            .any(|value| value.contains_text(needle))
    }
}

type Getter<R> = Box<dyn Fn(&R) -> Value + Send + Sync>;

/// Named getters for a typed record.
///
/// ```
/// use hr_tables::{Fields, FieldAccessor, Value};
///
/// struct Employee {
///     name: String,
///     age: u32,
/// }
///
/// let fields = Fields::new()
///     .field("name", |e: &Employee| e.name.as_str().into())
///     .field("age", |e: &Employee| e.age.into());
///
/// let amy = Employee { name: "Amy".into(), age: 25 };
/// assert_eq!(fields.value(&amy, "age"), Value::Int(25));
/// assert_eq!(fields.value(&amy, "salary"), Value::Null);
/// ```
pub struct Fields<R> {
    fields: Vec<(String, Getter<R>)>,
}

impl<R> Fields<R> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares a field. A later declaration with the same name wins.
    pub fn field<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        self.fields.retain(|(existing, _)| *existing != name);
        self.fields.push((name, Box::new(getter)));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl<R> Default for Fields<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Fields<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<R> FieldAccessor<R> for Fields<R> {
    fn value(&self, record: &R, field: &str) -> Value {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, getter)| getter(record))
            .unwrap_or_default()
    }

    fn scalar_values(&self, record: &R) -> Vec<Value> {
        self.fields
            .iter()
            .map(|(_, getter)| getter(record))
            .filter(|value| value.is_scalar())
            .collect()
    }
}

/// Converts a JSON payload into rows.
///
/// Accepts an array of objects or a single object; anything that is not an
/// object is skipped.
pub fn rows_from_json(payload: serde_json::Value) -> Vec<Row> {
    match payload {
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| match item {
                serde_json::Value::Object(entries) => Some(row_from_object(entries)),
                other => {
                    warn!(index = idx, kind = json_kind(&other), "skipping non-object row");
                    None
                }
            })
            .collect(),
        serde_json::Value::Object(entries) => vec![row_from_object(entries)],
        other => {
            warn!(kind = json_kind(&other), "payload is not a row collection");
            Vec::new()
        }
    }
}

fn row_from_object(entries: serde_json::Map<String, serde_json::Value>) -> Row {
    entries
        .into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
