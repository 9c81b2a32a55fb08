//! The file-library boundary every view reads through.

use super::{Node, Value};
use crate::error::Result;
use crate::slicing::DimEntry;
use ndarray::ArrayD;
use std::fmt::Debug;

/// Read-only access to a hierarchical data file.
pub trait DataSource: Debug {
    /// Human-readable name, usually the file name.
    fn name(&self) -> &str;

    /// The root group.
    fn root(&self) -> Result<Node> {
        self.node("/")
    }

    /// Look up a node by its full path.
    fn node(&self, path: &str) -> Result<Node>;

    /// Immediate children of a group, in file order.
    fn children(&self, path: &str) -> Result<Vec<Node>>;

    /// Read the dataset at `path` sliced with `entries`.
    ///
    /// Entries cover the data axes only; compound field selection happens
    /// in the caller.
    fn read_slice(&self, path: &str, entries: &[DimEntry]) -> Result<ArrayD<Value>>;
}
