//! Data reading and representation.
//!
//! Files are exposed through the [`DataSource`] trait: a lazily browsed
//! hierarchy of [`Node`]s whose datasets can be read through a dimension
//! spec.

mod memory;
mod node;
mod reader;
mod source;
mod value;

pub use memory::MemorySource;
pub use node::{
    format_shape, join_path, name_from_path, parent_path, Attribute, DatasetInfo, ElementKind,
    Node, NodeKind,
};
pub use reader::NetcdfSource;
pub use source::DataSource;
pub use value::Value;
