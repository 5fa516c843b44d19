//! Explicit registration of a record's fields

use crate::field::Field;
use crate::fields::DecodedFields;
use backed_path::{Limits, Path, Result};
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// Type-erased field binding
trait ErasedField {
    fn decode_any(&self, name: &str, document: &Value, limits: Limits) -> Result<Box<dyn Any + Send>>;

    fn path(&self) -> Option<&Path>;
}

impl<T: Clone + Send + 'static> ErasedField for Field<T> {
    fn decode_any(&self, name: &str, document: &Value, limits: Limits) -> Result<Box<dyn Any + Send>> {
        let value = self.decode(name, document, limits)?;
        Ok(Box::new(value))
    }

    fn path(&self) -> Option<&Path> {
        Field::path(self)
    }
}

/// The ordered list of `(name, binding)` pairs that make up a record
///
/// ```
/// use backed_record::{Field, Path, RecordSchema};
///
/// let schema = RecordSchema::new()
///     .field("name", Field::<String>::new().at(Path::from("full_name").or_else("name")))
///     .field("values", Field::<Vec<String>>::array().lossy().default_value(vec![]));
/// assert_eq!(schema.names().collect::<Vec<_>>(), vec!["name", "values"]);
/// ```
#[derive(Default)]
pub struct RecordSchema {
    fields: Vec<(String, Box<dyn ErasedField>)>,
}

impl RecordSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field
    ///
    /// Registering a name twice replaces the earlier binding in place.
    pub fn field<T: Clone + Send + 'static>(mut self, name: impl Into<String>, binding: Field<T>) -> Self {
        let name = name.into();
        let binding: Box<dyn ErasedField> = Box::new(binding);
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = binding,
            None => self.fields.push((name, binding)),
        }
        self
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is registered
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// The path a registered field is read from
    pub fn path_of(&self, name: &str) -> Option<Path> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(name, field)| field.path().cloned().unwrap_or_else(|| Path::root().key(name.as_str())))
    }

    /// Decode every field, in order, stopping at the first failure
    pub fn decode(&self, document: &Value, limits: Limits) -> Result<DecodedFields> {
        let mut decoded = DecodedFields::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let value = field.decode_any(name, document, limits)?;
            decoded.insert(name.clone(), value);
        }
        Ok(decoded)
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
