//! h5lens - a terminal viewer for hierarchical scientific data files.
//!
//! h5lens shows the group/dataset tree of a netCDF-4 or HDF5 file, the
//! attributes and storage layout of each node, and the values of a dataset
//! as a table, an image or a line plot. Which part of an n-dimensional
//! dataset is shown is controlled by an editable dimension spec such as
//! `0, :, 3:8:2`.
//!
//! # Features
//!
//! - Lazy tree browsing of groups and datasets
//! - Table, image and plot views with per-tab dimension specs
//! - Several files open at once, with a recent-files list
//! - Gruvbox color themes and image palettes
//! - Clipboard integration
//!
//! # Example
//!
//! ```
//! use h5lens::data::{DataSource, MemorySource};
//! use h5lens::view::{TableAdapter, ViewAdapter};
//!
//! let source = MemorySource::new("example").with_floats("/cube", &[5, 10, 20], |i| i[0] as f64);
//! let node = source.node("/cube").unwrap();
//!
//! let mut table = TableAdapter::new();
//! table.bind(&source, &node);
//! assert_eq!(table.dims(), &["0", ":", ":"]);
//! assert_eq!((table.row_count(), table.column_count()), (10, 20));
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod data;
pub mod error;
pub mod explorer;
pub mod file_browser;
pub mod slicing;
pub mod ui;
pub mod view;
pub mod workspace;

pub use error::{LensError, Result};
