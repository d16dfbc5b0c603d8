use super::Value;

use indexmap::IndexMap;

/// Property values of one mapped object, keyed by property name in mapping
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    class: String,
    values: IndexMap<String, Value>,
}

impl Record {
    pub fn new(class: impl Into<String>) -> Record {
        Record {
            class: class.into(),
            values: IndexMap::new(),
        }
    }

    /// Name of the mapped class this record belongs to.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.values.get(property)
    }

    /// Returns the value of `property`, `Null` when unset.
    pub fn value(&self, property: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.values.get(property).unwrap_or(NULL)
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) -> &mut Record {
        self.values.insert(property.into(), value.into());
        self
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<Value>) -> Record {
        self.set(property, value);
        self
    }

    pub fn contains(&self, property: &str) -> bool {
        self.values.contains_key(property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
