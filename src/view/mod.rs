//! View adapters: table, image and plot projections of a dataset.
//!
//! Each adapter binds to a node, owns the node's current dimension tokens
//! and derives a read-only view from them. Incompatible specs or element
//! types never fail; the adapter reports "no view" instead.

mod image;
mod plot;
mod table;

pub use image::{FramePosition, ImageAdapter, Pixel};
pub use plot::PlotAdapter;
pub use table::TableAdapter;

use crate::data::{DataSource, DatasetInfo, Node, Value};
use crate::error::{LensError, Result};
use crate::slicing::{
    self, default_layout, range_indices, resolve_index, AxisPick, DimEntry, DimensionSpec,
    SliceError, Surface,
};
use ndarray::ArrayD;

/// Common interface of the three display surfaces.
pub trait ViewAdapter {
    /// What a single cell holds.
    type Cell;

    /// Bind to `node`, resetting the dimension tokens to the default for
    /// this surface.
    fn bind(&mut self, source: &dyn DataSource, node: &Node);

    /// Replace the dimension tokens and re-derive the view.
    fn set_dims(&mut self, source: &dyn DataSource, tokens: &[String]);

    /// Rows of the current view.
    fn row_count(&self) -> usize;

    /// Columns of the current view (points per row for plots).
    fn column_count(&self) -> usize;

    /// Cell at (`row`, `col`), if the view has one there.
    fn value_at(&self, row: usize, col: usize) -> Option<Self::Cell>;

    /// Current dimension tokens.
    fn dims(&self) -> &[String];

    /// Whether a view could be derived for the bound node.
    fn is_available(&self) -> bool;
}

/// Node and tokens an adapter is bound to.
#[derive(Debug, Clone, Default)]
pub(crate) struct Binding {
    pub(crate) node: Option<Node>,
    pub(crate) tokens: Vec<String>,
}

impl Binding {
    /// Bind to `node` with the default tokens for `surface`. Returns the
    /// dataset descriptor when the node is a dataset.
    pub(crate) fn bind(&mut self, node: &Node, surface: Surface) -> Option<DatasetInfo> {
        self.node = Some(node.clone());
        let info = node.dataset_info()?.clone();
        let fields = info.element.fields().map(<[String]>::len);
        self.tokens = default_layout(&info.shape, fields, surface).tokens;
        Some(info)
    }

    pub(crate) fn info(&self) -> Option<&DatasetInfo> {
        self.node.as_ref().and_then(Node::dataset_info)
    }

    pub(crate) fn path(&self) -> Option<&str> {
        self.node.as_ref().map(|n| n.path.as_str())
    }
}

/// A dataset read through a dimension spec.
#[derive(Debug, Clone)]
pub(crate) struct Selection {
    /// How each data axis was picked.
    pub(crate) picks: Vec<AxisPick>,
    /// Sliced elements; rank is the number of kept axes.
    pub(crate) data: ArrayD<Value>,
    /// Selected field indices for compound data.
    pub(crate) fields: Option<Vec<usize>>,
}

impl Selection {
    /// Source indices visited along the `n`th kept axis.
    pub(crate) fn kept_axis(&self, n: usize) -> Option<&[usize]> {
        self.picks.iter().filter_map(AxisPick::kept).nth(n)
    }
}

fn resolve_fields(entry: Option<&DimEntry>, count: usize) -> std::result::Result<Vec<usize>, SliceError> {
    match entry {
        None => Ok((0..count).collect()),
        Some(DimEntry::Index(i)) => resolve_index(*i, count, 0).map(|i| vec![i]),
        Some(DimEntry::Range(r)) => range_indices(r, count).ok_or(SliceError::ZeroStep { axis: 0 }),
    }
}

/// Read `path` through `spec`, splitting off the compound field entry.
pub(crate) fn read_selection(
    source: &dyn DataSource,
    path: &str,
    info: &DatasetInfo,
    spec: &DimensionSpec,
) -> Result<Selection> {
    let ndim = info.ndim();
    let (entries, fields) = match info.element.fields() {
        Some(names) => {
            let (entries, field) = spec.split_fields(ndim);
            (entries, Some(resolve_fields(field, names.len())?))
        },
        None => {
            if spec.len() > ndim {
                return Err(LensError::Slice(SliceError::TooManyIndices {
                    given: spec.len(),
                    ndim,
                }));
            }
            (spec.entries(), None)
        },
    };
    let picks = slicing::resolve(entries, &info.shape)?;
    let data = source.read_slice(path, entries)?;
    Ok(Selection { picks, data, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;
    use crate::slicing::parse_dims;

    #[test]
    fn compound_field_entry_is_split_off() {
        let src = MemorySource::new("t").with_records(
            "/r",
            &[3],
            &["a", "b", "c"],
            (0..3).map(|i| vec![Value::Int(i), Value::Int(i * 2), Value::Int(i * 3)]).collect(),
        );
        let node = src.node("/r").unwrap();
        let info = node.dataset_info().unwrap();
        let sel = read_selection(&src, "/r", info, &parse_dims(&[":", "1:"])).unwrap();
        assert_eq!(sel.fields, Some(vec![1, 2]));
        assert_eq!(sel.data.shape(), &[3]);
        assert_eq!(sel.kept_axis(0), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn extra_entries_on_plain_data_fail() {
        let src = MemorySource::new("t").with_floats("/v", &[3], |_| 0.0);
        let node = src.node("/v").unwrap();
        let info = node.dataset_info().unwrap();
        assert!(read_selection(&src, "/v", info, &parse_dims(&[":", "0"])).is_err());
    }
}
