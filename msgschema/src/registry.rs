use crate::schema::{FieldDef, FieldType, MessageSchema};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("'{owner}' references unknown message type '{referenced}'")]
    UnresolvedReference { owner: String, referenced: String },
    #[error("field '{field}' of '{owner}' must map to a type-tag string")]
    FieldShape { owner: String, field: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Deserialize)]
struct TypeFile {
    #[serde(default)]
    types: Vec<TypeEntry>,
}

#[derive(Deserialize)]
struct TypeEntry {
    name: String,
    #[serde(default)]
    fields: toml::Table,
}

/// Name-keyed store of message schemas. Nested references are checked when a
/// schema is registered, so walking a registered schema never dangles.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: HashMap<String, MessageSchema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// A registry pre-loaded with the common std_msgs, geometry_msgs and
    /// sensor_msgs types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for schema in builtin_catalog() {
            // Builtins are listed in dependency order.
            if let Err(err) = registry.register(schema) {
                log::error!("builtin catalog is inconsistent: {err}");
            }
        }
        registry
    }

    /// Adds a schema, replacing any previous one under the same name. Every
    /// nested reference must already be registered.
    pub fn register(&mut self, schema: MessageSchema) -> Result<(), SchemaError> {
        let known: HashSet<&str> = self.schemas.keys().map(String::as_str).collect();
        if let Some(referenced) = first_unresolved(&schema, &known) {
            return Err(SchemaError::UnresolvedReference {
                owner: schema.name.clone(),
                referenced,
            });
        }
        self.insert(schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MessageSchema> {
        self.schemas.get(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&MessageSchema, SchemaError> {
        self.schemas
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Loads `[[types]]` declarations. Definitions may reference each other
    /// in any order within the same text; nothing is committed if any
    /// reference stays unresolved.
    pub fn load_toml_str(&mut self, text: &str) -> Result<usize, SchemaError> {
        let file: TypeFile = toml::from_str(text)?;
        let mut pending = Vec::with_capacity(file.types.len());
        for entry in file.types {
            pending.push(schema_from_entry(entry)?);
        }

        let mut known: HashSet<String> = self.schemas.keys().cloned().collect();
        let mut ordered = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            let before = pending.len();
            let mut remaining = Vec::new();
            for schema in pending {
                let view: HashSet<&str> = known.iter().map(String::as_str).collect();
                if first_unresolved(&schema, &view).is_none() {
                    known.insert(schema.name.clone());
                    ordered.push(schema);
                } else {
                    remaining.push(schema);
                }
            }
            if remaining.len() == before {
                let schema = &remaining[0];
                let view: HashSet<&str> = known.iter().map(String::as_str).collect();
                let referenced = first_unresolved(schema, &view).unwrap_or_default();
                return Err(SchemaError::UnresolvedReference {
                    owner: schema.name.clone(),
                    referenced,
                });
            }
            pending = remaining;
        }

        let count = ordered.len();
        for schema in ordered {
            self.insert(schema);
        }
        Ok(count)
    }

    pub fn load_toml_file(&mut self, path: &Path) -> Result<usize, SchemaError> {
        let text = fs::read_to_string(path)?;
        let count = self.load_toml_str(&text)?;
        log::info!("loaded {count} message type(s) from {}", path.display());
        Ok(count)
    }

    fn insert(&mut self, schema: MessageSchema) {
        let name = schema.name.clone();
        if self.schemas.insert(name.clone(), schema).is_some() {
            log::debug!("replaced message type '{name}'");
        }
    }
}

fn schema_from_entry(entry: TypeEntry) -> Result<MessageSchema, SchemaError> {
    let mut fields = Vec::with_capacity(entry.fields.len());
    for (field_name, value) in entry.fields {
        let Some(tag) = value.as_str() else {
            return Err(SchemaError::FieldShape {
                owner: entry.name,
                field: field_name,
            });
        };
        fields.push(FieldDef {
            name: field_name,
            ty: FieldType::from_tag(tag),
        });
    }
    Ok(MessageSchema {
        name: entry.name,
        fields,
    })
}

fn first_unresolved(schema: &MessageSchema, known: &HashSet<&str>) -> Option<String> {
    schema.fields.iter().find_map(|field| match &field.ty {
        FieldType::Message(name) if !known.contains(name.as_str()) => Some(name.clone()),
        _ => None,
    })
}

fn builtin(name: &str, fields: &[(&str, FieldType)]) -> MessageSchema {
    MessageSchema::new(
        name,
        fields
            .iter()
            .map(|(field, ty)| FieldDef::new(field, ty.clone()))
            .collect(),
    )
}

fn builtin_catalog() -> Vec<MessageSchema> {
    use FieldType::*;
    vec![
        builtin("std_msgs/String", &[("data", Text)]),
        builtin("std_msgs/Float64", &[("data", Float64)]),
        builtin("std_msgs/Int32", &[("data", Int32)]),
        builtin(
            "builtin_interfaces/Time",
            &[("sec", Int32), ("nanosec", UInt32)],
        ),
        builtin(
            "std_msgs/Header",
            &[
                ("stamp", Message("builtin_interfaces/Time".to_string())),
                ("frame_id", Text),
            ],
        ),
        builtin(
            "geometry_msgs/Vector3",
            &[("x", Float64), ("y", Float64), ("z", Float64)],
        ),
        builtin(
            "geometry_msgs/Point",
            &[("x", Float64), ("y", Float64), ("z", Float64)],
        ),
        builtin(
            "geometry_msgs/Quaternion",
            &[("x", Float64), ("y", Float64), ("z", Float64), ("w", Float64)],
        ),
        builtin(
            "geometry_msgs/Twist",
            &[
                ("linear", Message("geometry_msgs/Vector3".to_string())),
                ("angular", Message("geometry_msgs/Vector3".to_string())),
            ],
        ),
        builtin(
            "geometry_msgs/Pose",
            &[
                ("position", Message("geometry_msgs/Point".to_string())),
                ("orientation", Message("geometry_msgs/Quaternion".to_string())),
            ],
        ),
        builtin(
            "sensor_msgs/Imu",
            &[
                ("header", Message("std_msgs/Header".to_string())),
                ("orientation", Message("geometry_msgs/Quaternion".to_string())),
                ("orientation_covariance", FloatArray),
                ("angular_velocity", Message("geometry_msgs/Vector3".to_string())),
                ("angular_velocity_covariance", FloatArray),
                (
                    "linear_acceleration",
                    Message("geometry_msgs/Vector3".to_string()),
                ),
                ("linear_acceleration_covariance", FloatArray),
            ],
        ),
        builtin(
            "sensor_msgs/LaserScan",
            &[
                ("header", Message("std_msgs/Header".to_string())),
                ("angle_min", Float32),
                ("angle_max", Float32),
                ("angle_increment", Float32),
                ("time_increment", Float32),
                ("scan_time", Float32),
                ("range_min", Float32),
                ("range_max", Float32),
                ("ranges", FloatArray),
                ("intensities", FloatArray),
            ],
        ),
        builtin(
            "sensor_msgs/Image",
            &[
                ("header", Message("std_msgs/Header".to_string())),
                ("height", UInt32),
                ("width", UInt32),
                ("encoding", Text),
                ("is_bigendian", UInt8),
                ("step", UInt32),
                ("data", Bytes),
            ],
        ),
    ]
}
