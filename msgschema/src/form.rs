//! Derives an editable control tree from a schema, and writes edited
//! controls back into a message instance.

use crate::registry::SchemaRegistry;
use crate::schema::{FieldType, MessageSchema};
use crate::value::MessageValue;

/// Entry name of the file-picker control that stands in for an image
/// message's raw fields.
pub const IMAGE_PATH_FIELD: &str = "img";

const IMAGE_SHORT_NAME: &str = "Image";

// Slider ranges are presentational defaults, not schema limits.
const FLOAT_RANGE: (f64, f64) = (-10.0, 10.0);
const INT_RANGE: (i64, i64) = (-100, 100);

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("image file not found or unreadable: '{path}'")]
    ImageUnreadable { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormControl {
    FloatSlider { value: f64, min: f64, max: f64 },
    IntSlider { value: i64, min: i64, max: i64 },
    TextBox { value: String },
    ImagePath { value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEntry {
    Control(FormControl),
    Group(FormModel),
}

/// Ordered control tree mirroring a schema's shape. Fields with no editable
/// representation are simply absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormModel {
    pub entries: Vec<(String, FormEntry)>,
}

impl FormModel {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, name: &str) -> Option<&FormEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<&mut FormEntry> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    pub fn control_mut(&mut self, name: &str) -> Option<&mut FormControl> {
        match self.entry_mut(name) {
            Some(FormEntry::Control(control)) => Some(control),
            _ => None,
        }
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut FormModel> {
        match self.entry_mut(name) {
            Some(FormEntry::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Resolves a control through nested groups, e.g. `["linear", "x"]`.
    pub fn control_mut_at(&mut self, path: &[String]) -> Option<&mut FormControl> {
        let (last, groups) = path.split_last()?;
        let mut model = self;
        for name in groups {
            model = model.group_mut(name)?;
        }
        model.control_mut(last)
    }
}

/// Builds the control tree for `schema`. Image messages collapse to a single
/// file-path control; bool, bytes and array fields have no control and are
/// skipped without error.
pub fn build_form(registry: &SchemaRegistry, schema: &MessageSchema) -> FormModel {
    let mut form = FormModel::default();
    if schema.short_name() == IMAGE_SHORT_NAME {
        form.entries.push((
            IMAGE_PATH_FIELD.to_string(),
            FormEntry::Control(FormControl::ImagePath {
                value: String::new(),
            }),
        ));
        return form;
    }
    for field in &schema.fields {
        let entry = match &field.ty {
            FieldType::Float32 | FieldType::Float64 => {
                Some(FormEntry::Control(FormControl::FloatSlider {
                    value: 0.0,
                    min: FLOAT_RANGE.0,
                    max: FLOAT_RANGE.1,
                }))
            }
            FieldType::Int8
            | FieldType::UInt8
            | FieldType::Int16
            | FieldType::UInt16
            | FieldType::Int32
            | FieldType::UInt32
            | FieldType::Int64
            | FieldType::UInt64 => Some(FormEntry::Control(FormControl::IntSlider {
                value: 0,
                min: INT_RANGE.0,
                max: INT_RANGE.1,
            })),
            FieldType::Text => Some(FormEntry::Control(FormControl::TextBox {
                value: String::new(),
            })),
            FieldType::Message(name) => registry
                .get(name)
                .map(|nested| FormEntry::Group(build_form(registry, nested))),
            FieldType::Bool | FieldType::Bytes | FieldType::FloatArray => None,
        };
        if let Some(entry) = entry {
            form.entries.push((field.name.clone(), entry));
        }
    }
    form
}

/// Builds a fresh message from `schema` and copies the form's current values
/// into it. Integer controls are clamped to their declared width. A filled
/// image-path control replaces the whole message body with the decoded file.
pub fn apply_form(
    registry: &SchemaRegistry,
    schema: &MessageSchema,
    form: &FormModel,
) -> Result<MessageValue, FormError> {
    let mut message = MessageValue::new_default(registry, schema);
    write_into(registry, &mut message, schema, form)?;
    Ok(message)
}

fn write_into(
    registry: &SchemaRegistry,
    target: &mut MessageValue,
    schema: &MessageSchema,
    form: &FormModel,
) -> Result<(), FormError> {
    for (name, entry) in &form.entries {
        match entry {
            FormEntry::Control(FormControl::ImagePath { value }) => {
                // Fills height/width/encoding/step/data in one step and ends
                // this branch of the walk.
                load_image_into(target, value)?;
                return Ok(());
            }
            FormEntry::Control(control) => {
                let Some(field) = schema.field(name) else {
                    continue;
                };
                let Some(slot) = target.field_mut(name) else {
                    continue;
                };
                *slot = control_value(control, &field.ty);
            }
            FormEntry::Group(nested_form) => {
                let Some(field) = schema.field(name) else {
                    continue;
                };
                let FieldType::Message(nested_name) = &field.ty else {
                    continue;
                };
                let Some(nested_schema) = registry.get(nested_name) else {
                    continue;
                };
                // Clone keeps the borrow on `target` exclusive below.
                let nested_schema = nested_schema.clone();
                let Some(slot) = target.field_mut(name) else {
                    continue;
                };
                write_into(registry, slot, &nested_schema, nested_form)?;
            }
        }
    }
    Ok(())
}

fn control_value(control: &FormControl, ty: &FieldType) -> MessageValue {
    match control {
        FormControl::FloatSlider { value, .. } => MessageValue::Float(*value),
        FormControl::IntSlider { value, .. } => MessageValue::Int(clamp_integer(*value, ty)),
        FormControl::TextBox { value } | FormControl::ImagePath { value } => {
            MessageValue::Text(value.clone())
        }
    }
}

fn clamp_integer(value: i64, ty: &FieldType) -> i64 {
    match ty {
        FieldType::Int8 => value.clamp(i8::MIN as i64, i8::MAX as i64),
        FieldType::UInt8 => value.clamp(0, u8::MAX as i64),
        FieldType::Int16 => value.clamp(i16::MIN as i64, i16::MAX as i64),
        FieldType::UInt16 => value.clamp(0, u16::MAX as i64),
        FieldType::Int32 => value.clamp(i32::MIN as i64, i32::MAX as i64),
        FieldType::UInt32 => value.clamp(0, u32::MAX as i64),
        FieldType::UInt64 => value.max(0),
        _ => value,
    }
}

fn load_image_into(target: &mut MessageValue, path: &str) -> Result<(), FormError> {
    let decoded = image::open(path)
        .map_err(|_| FormError::ImageUnreadable {
            path: path.to_string(),
        })?
        .to_rgb8();
    let width = decoded.width();
    let height = decoded.height();
    let data = decoded.into_raw();
    target.set_field("height", MessageValue::Int(height as i64));
    target.set_field("width", MessageValue::Int(width as i64));
    target.set_field("encoding", MessageValue::Text("rgb8".to_string()));
    target.set_field("is_bigendian", MessageValue::Int(0));
    target.set_field("step", MessageValue::Int(3 * width as i64));
    target.set_field("data", MessageValue::Bytes(data));
    Ok(())
}
