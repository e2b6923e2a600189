//! Schema reader.
//!
//! Reflects the apps of a [`ModelRegistry`](crate::catalog::ModelRegistry)
//! into a nested, JSON-serializable description: app full name → model name
//! → columns, primary keys and inferred joins.

mod config;
mod model_reader;
mod result;

pub use config::{ReaderConfig, ALWAYS_VISIBLE_MARKER, FRAMEWORK_APP_PREFIX, VENDOR_APP_PREFIX};
pub use model_reader::ModelReader;
pub use result::{
    AppSchema, ColumnDetail, JoinEdge, ModelDetail, RelatedColumn, SchemaResult, APP_MODELS_KEY,
    FOREIGN_KEY, UNKNOWN_DATATYPE,
};
