//! Message type descriptions, instances of them, and the editable control
//! trees derived from them.

pub mod form;
pub mod registry;
pub mod schema;
pub mod value;

pub use form::{
    apply_form, build_form, FormControl, FormEntry, FormError, FormModel, IMAGE_PATH_FIELD,
};
pub use registry::{SchemaError, SchemaRegistry};
pub use schema::{FieldDef, FieldType, MessageSchema};
pub use value::MessageValue;
