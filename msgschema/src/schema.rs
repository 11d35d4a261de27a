use serde::{Deserialize, Serialize};

/// Field kinds a message schema can declare. Nested messages are referenced
/// by their registered name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Bool,
    Text,
    Bytes,
    FloatArray,
    Message(String),
}

impl FieldType {
    /// Maps a declaration tag to a field type. Anything that is not a known
    /// primitive tag is read as a nested message reference; typos therefore
    /// surface as unresolved references at registration.
    pub fn from_tag(tag: &str) -> FieldType {
        match tag {
            "float32" => FieldType::Float32,
            "float64" => FieldType::Float64,
            "int8" => FieldType::Int8,
            "uint8" => FieldType::UInt8,
            "int16" => FieldType::Int16,
            "uint16" => FieldType::UInt16,
            "int32" => FieldType::Int32,
            "uint32" => FieldType::UInt32,
            "int64" => FieldType::Int64,
            "uint64" => FieldType::UInt64,
            "bool" => FieldType::Bool,
            "string" => FieldType::Text,
            "bytes" | "uint8[]" => FieldType::Bytes,
            "float32[]" | "float64[]" => FieldType::FloatArray,
            other => FieldType::Message(other.to_string()),
        }
    }

    pub fn tag(&self) -> String {
        match self {
            FieldType::Float32 => "float32".to_string(),
            FieldType::Float64 => "float64".to_string(),
            FieldType::Int8 => "int8".to_string(),
            FieldType::UInt8 => "uint8".to_string(),
            FieldType::Int16 => "int16".to_string(),
            FieldType::UInt16 => "uint16".to_string(),
            FieldType::Int32 => "int32".to_string(),
            FieldType::UInt32 => "uint32".to_string(),
            FieldType::Int64 => "int64".to_string(),
            FieldType::UInt64 => "uint64".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::Text => "string".to_string(),
            FieldType::Bytes => "bytes".to_string(),
            FieldType::FloatArray => "float64[]".to_string(),
            FieldType::Message(name) => name.clone(),
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, FieldType::Float32 | FieldType::Float64)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldType::Int8
                | FieldType::UInt8
                | FieldType::Int16
                | FieldType::UInt16
                | FieldType::Int32
                | FieldType::UInt32
                | FieldType::Int64
                | FieldType::UInt64
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
}

impl FieldDef {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// An ordered field list under a package-qualified name such as
/// `geometry_msgs/Twist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSchema {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl MessageSchema {
    pub fn new(name: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    /// The part after the last `/`, e.g. `Twist` for `geometry_msgs/Twist`.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
