//! Table surface: a grid of text cells.

use super::{read_selection, Binding, Selection, ViewAdapter};
use crate::data::{DataSource, DatasetInfo, Node, Value};
use crate::error::Result;
use crate::slicing::{parse_dims, resolve_index, DimEntry, DimRange, DimensionSpec, Surface};
use ndarray::{ArrayViewD, Axis, IxDyn};

#[derive(Debug, Clone)]
struct Grid {
    selection: Selection,
    rows: usize,
    cols: usize,
    field_names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
enum TableState {
    #[default]
    Empty,
    Unavailable,
    Ready(Grid),
}

/// Tabular view of the bound dataset.
#[derive(Debug, Clone, Default)]
pub struct TableAdapter {
    binding: Binding,
    state: TableState,
}

/// A fixed first index keeps a one-row slice so the row label survives.
fn keep_row_axis(spec: DimensionSpec, info: &DatasetInfo) -> Result<DimensionSpec> {
    let applies = match info.element.fields() {
        Some(_) => info.ndim() == 1,
        None => info.ndim() == 2,
    };
    match spec.get(0) {
        Some(DimEntry::Index(i)) if applies => {
            let start = resolve_index(*i, info.shape[0], 0)? as i64;
            let range = DimRange::new(Some(start), Some(start + 1), None);
            Ok(spec.with_entry(0, DimEntry::Range(range)))
        },
        _ => Ok(spec),
    }
}

fn bracketed(view: ArrayViewD<'_, Value>) -> String {
    if view.ndim() == 0 {
        return view.iter().next().map(Value::to_string).unwrap_or_default();
    }
    let parts: Vec<String> = view.outer_iter().map(bracketed).collect();
    format!("[{}]", parts.join(" "))
}

impl TableAdapter {
    /// Create an unbound table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound node.
    pub fn node(&self) -> Option<&Node> {
        self.binding.node.as_ref()
    }

    fn build(source: &dyn DataSource, path: &str, info: &DatasetInfo, tokens: &[String]) -> Result<Grid> {
        let spec = keep_row_axis(parse_dims(tokens), info)?;
        let selection = read_selection(source, path, info, &spec)?;
        let shape = selection.data.shape().to_vec();

        let (rows, cols, field_names) = match (&selection.fields, info.element.fields()) {
            (Some(picked), Some(names)) => {
                let rows = shape.first().copied().unwrap_or(1);
                let names = picked.iter().filter_map(|&i| names.get(i).cloned()).collect();
                (rows, picked.len(), names)
            },
            _ => match shape.len() {
                0 => (1, 1, Vec::new()),
                1 => (shape[0], 1, Vec::new()),
                _ => (shape[0], shape[1], Vec::new()),
            },
        };

        Ok(Grid {
            selection,
            rows,
            cols,
            field_names,
        })
    }

    fn derive(&mut self, source: &dyn DataSource) {
        let (Some(info), Some(path)) = (self.binding.info(), self.binding.path()) else {
            self.state = TableState::Empty;
            return;
        };
        self.state = match Self::build(source, path, info, &self.binding.tokens) {
            Ok(grid) => TableState::Ready(grid),
            Err(e) => {
                tracing::debug!("No table view for {}: {}", path, e);
                TableState::Unavailable
            },
        };
    }

    fn grid(&self) -> Option<&Grid> {
        match &self.state {
            TableState::Ready(grid) => Some(grid),
            TableState::Empty | TableState::Unavailable => None,
        }
    }

    /// Element backing the cell, before field selection.
    fn element(grid: &Grid, row: usize, col: usize) -> Option<String> {
        let data = &grid.selection.data;
        if let Some(fields) = &grid.selection.fields {
            let mut idx = vec![0; data.ndim()];
            if let Some(first) = idx.first_mut() {
                *first = row;
            }
            let record = data.get(IxDyn(&idx))?;
            return record.field(*fields.get(col)?).map(Value::to_string);
        }
        match data.ndim() {
            0 => data.get(IxDyn(&[])).map(Value::to_string),
            1 => data.get(IxDyn(&[row])).map(Value::to_string),
            2 => data.get(IxDyn(&[row, col])).map(Value::to_string),
            _ => {
                let sub = data.index_axis(Axis(0), row);
                Some(bracketed(sub.index_axis(Axis(0), col)))
            },
        }
    }

    /// Source index shown beside `row`.
    pub fn row_label(&self, row: usize) -> Option<String> {
        let grid = self.grid()?;
        grid.selection.kept_axis(0)?.get(row).map(usize::to_string)
    }

    /// Header shown above `col`: a field name for compound data, otherwise
    /// the source index along the second kept axis.
    pub fn column_label(&self, col: usize) -> Option<String> {
        let grid = self.grid()?;
        if grid.selection.fields.is_some() {
            return grid.field_names.get(col).cloned();
        }
        grid.selection.kept_axis(1)?.get(col).map(usize::to_string)
    }

    /// The whole view as tab-separated text with headers.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for col in 0..self.column_count() {
            out.push('\t');
            out.push_str(&self.column_label(col).unwrap_or_default());
        }
        out.push('\n');
        for row in 0..self.row_count() {
            out.push_str(&self.row_label(row).unwrap_or_default());
            for col in 0..self.column_count() {
                out.push('\t');
                out.push_str(&self.value_at(row, col).unwrap_or_default());
            }
            out.push('\n');
        }
        out
    }
}

impl ViewAdapter for TableAdapter {
    type Cell = String;

    fn bind(&mut self, source: &dyn DataSource, node: &Node) {
        if self.binding.bind(node, Surface::Grid).is_none() {
            self.binding.tokens.clear();
        }
        tracing::debug!("Table bound to {}", node.path);
        self.derive(source);
    }

    fn set_dims(&mut self, source: &dyn DataSource, tokens: &[String]) {
        self.binding.tokens = tokens.to_vec();
        self.derive(source);
    }

    fn row_count(&self) -> usize {
        match &self.state {
            TableState::Empty => 0,
            TableState::Unavailable => 1,
            TableState::Ready(grid) => grid.rows,
        }
    }

    fn column_count(&self) -> usize {
        match &self.state {
            TableState::Empty => 0,
            TableState::Unavailable => 1,
            TableState::Ready(grid) => grid.cols,
        }
    }

    fn value_at(&self, row: usize, col: usize) -> Option<String> {
        let grid = self.grid()?;
        if row >= grid.rows || col >= grid.cols {
            return None;
        }
        Self::element(grid, row, col)
    }

    fn dims(&self) -> &[String] {
        &self.binding.tokens
    }

    fn is_available(&self) -> bool {
        self.grid().is_some()
    }
}
