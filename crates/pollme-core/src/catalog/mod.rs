//! Model catalog for pollme.
//!
//! The catalog holds metadata about installed apps, their models and fields.
//! The schema reader consumes it through the descriptor traits.

mod app;
mod descriptor;
mod field;
mod model;
mod registry;
mod types;

pub use app::AppConfig;
pub use descriptor::{AppDescriptor, FieldDescriptor, ModelDescriptor, ModelRegistry, RelationTarget};
pub use field::FieldDef;
pub use model::ModelDef;
pub use registry::AppRegistry;
pub use types::FieldKind;
