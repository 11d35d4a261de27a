use crate::registry::SchemaRegistry;
use crate::schema::{FieldType, MessageSchema};
use serde::{Deserialize, Serialize};

/// A message instance. Nested messages keep their fields in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    FloatArray(Vec<f64>),
    Message(Vec<(String, MessageValue)>),
}

impl MessageValue {
    /// A zeroed instance of `schema`: 0 / 0.0 / false / empty strings and
    /// arrays, with nested messages expanded recursively.
    pub fn new_default(registry: &SchemaRegistry, schema: &MessageSchema) -> MessageValue {
        let fields = schema
            .fields
            .iter()
            .map(|field| (field.name.clone(), default_for(registry, &field.ty)))
            .collect();
        MessageValue::Message(fields)
    }

    pub fn field(&self, name: &str) -> Option<&MessageValue> {
        match self {
            MessageValue::Message(fields) => {
                fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut MessageValue> {
        match self {
            MessageValue::Message(fields) => {
                fields.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Overwrites an existing field. Returns false when the field is absent
    /// or `self` is not a message.
    pub fn set_field(&mut self, name: &str, value: MessageValue) -> bool {
        match self.field_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Follows a dotted path such as `linear.x` through nested messages.
    pub fn path(&self, dotted: &str) -> Option<&MessageValue> {
        let mut current = self;
        for part in dotted.split('.') {
            current = current.field(part)?;
        }
        Some(current)
    }

    pub fn path_mut(&mut self, dotted: &str) -> Option<&mut MessageValue> {
        let mut current = self;
        for part in dotted.split('.') {
            current = current.field_mut(part)?;
        }
        Some(current)
    }

    /// Numeric view used by plotting. Booleans read as 0 or 1; text, bytes,
    /// arrays and nested messages are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MessageValue::Float(v) => Some(*v),
            MessageValue::Int(v) => Some(*v as f64),
            MessageValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

fn default_for(registry: &SchemaRegistry, ty: &FieldType) -> MessageValue {
    match ty {
        FieldType::Float32 | FieldType::Float64 => MessageValue::Float(0.0),
        FieldType::Int8
        | FieldType::UInt8
        | FieldType::Int16
        | FieldType::UInt16
        | FieldType::Int32
        | FieldType::UInt32
        | FieldType::Int64
        | FieldType::UInt64 => MessageValue::Int(0),
        FieldType::Bool => MessageValue::Bool(false),
        FieldType::Text => MessageValue::Text(String::new()),
        FieldType::Bytes => MessageValue::Bytes(Vec::new()),
        FieldType::FloatArray => MessageValue::FloatArray(Vec::new()),
        FieldType::Message(name) => match registry.get(name) {
            Some(nested) => MessageValue::new_default(registry, nested),
            // Registered schemas never dangle; an ad-hoc schema gets an
            // empty group rather than a panic.
            None => MessageValue::Message(Vec::new()),
        },
    }
}
