//! Plot surface: one or two numeric columns drawn as a line.

use super::{read_selection, Binding, Selection, ViewAdapter};
use crate::data::{DataSource, DatasetInfo, ElementKind, Node, Value};
use crate::error::Result;
use crate::slicing::{parse_dims, AxisPick, Surface};
use ndarray::IxDyn;

#[derive(Debug, Clone)]
struct Curve {
    columns: Vec<Vec<f64>>,
    rows: usize,
    x_label: String,
    y_label: String,
    title: String,
}

#[derive(Debug, Clone, Default)]
enum PlotState {
    #[default]
    Empty,
    Unavailable,
    Ready(Curve),
}

/// Line-plot view of the bound dataset.
#[derive(Debug, Clone, Default)]
pub struct PlotAdapter {
    binding: Binding,
    state: PlotState,
}

fn plottable(element: &ElementKind) -> bool {
    match element {
        ElementKind::Integer
        | ElementKind::Unsigned
        | ElementKind::Float
        | ElementKind::Boolean
        | ElementKind::Compound(_) => true,
        ElementKind::Text | ElementKind::Bytes | ElementKind::Opaque => false,
    }
}

fn as_number(v: &Value) -> f64 {
    v.as_f64().unwrap_or(f64::NAN)
}

fn title(node_name: &str, info: &DatasetInfo, selection: &Selection) -> String {
    let fixed: Vec<String> = selection
        .picks
        .iter()
        .enumerate()
        .filter_map(|(axis, pick)| match pick {
            AxisPick::Fixed(i) => {
                let name = info.dim_names.get(axis).cloned().unwrap_or_else(|| format!("dim_{}", axis));
                Some(format!("{}={}", name, i))
            },
            AxisPick::Kept(_) => None,
        })
        .collect();
    if fixed.is_empty() {
        node_name.to_string()
    } else {
        format!("{} [{}]", node_name, fixed.join(", "))
    }
}

impl PlotAdapter {
    /// Create an unbound plot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound node.
    pub fn node(&self) -> Option<&Node> {
        self.binding.node.as_ref()
    }

    /// `Ok(None)` when the element type or the slice cannot be plotted.
    fn build(source: &dyn DataSource, node: &Node, info: &DatasetInfo, tokens: &[String]) -> Result<Option<Curve>> {
        let spec = parse_dims(tokens);
        if spec.is_empty() || !plottable(&info.element) || !spec.has_range() {
            return Ok(None);
        }

        let selection = read_selection(source, &node.path, info, &spec)?;
        let data = &selection.data;
        let kept_axis = selection
            .picks
            .iter()
            .position(|p| p.kept().is_some())
            .and_then(|axis| info.dim_names.get(axis).cloned())
            .unwrap_or_else(|| "index".to_string());

        let (columns, x_label, y_label) = match (&selection.fields, info.element.fields()) {
            (Some(picked), Some(names)) => {
                if data.ndim() != 1 || !(1..=2).contains(&picked.len()) {
                    return Ok(None);
                }
                let columns: Vec<Vec<f64>> = picked
                    .iter()
                    .map(|&f| data.iter().map(|rec| rec.field(f).map(as_number).unwrap_or(f64::NAN)).collect())
                    .collect();
                let name = |i: usize| names.get(picked[i]).cloned().unwrap_or_default();
                match picked.len() {
                    1 => (columns, kept_axis, name(0)),
                    _ => (columns, name(0), name(1)),
                }
            },
            _ => match data.shape() {
                [_] => (vec![data.iter().map(as_number).collect()], kept_axis, node.name.clone()),
                [n, 2] => {
                    let col = |c: usize| {
                        (0..*n)
                            .map(|r| data.get(IxDyn(&[r, c])).map(as_number).unwrap_or(f64::NAN))
                            .collect::<Vec<f64>>()
                    };
                    (vec![col(0), col(1)], format!("{}[:, 0]", node.name), format!("{}[:, 1]", node.name))
                },
                _ => return Ok(None),
            },
        };

        let rows = columns.first().map(Vec::len).unwrap_or(0);
        Ok(Some(Curve {
            title: title(&node.name, info, &selection),
            columns,
            rows,
            x_label,
            y_label,
        }))
    }

    fn derive(&mut self, source: &dyn DataSource) {
        let (Some(node), Some(info)) = (self.binding.node.as_ref(), self.binding.info()) else {
            self.state = PlotState::Empty;
            return;
        };
        self.state = match Self::build(source, node, info, &self.binding.tokens) {
            Ok(Some(curve)) => PlotState::Ready(curve),
            Ok(None) => {
                tracing::debug!("No plot view for {} with {:?}", node.path, self.binding.tokens);
                PlotState::Unavailable
            },
            Err(e) => {
                tracing::debug!("No plot view for {}: {}", node.path, e);
                PlotState::Unavailable
            },
        };
    }

    fn curve(&self) -> Option<&Curve> {
        match &self.state {
            PlotState::Ready(c) => Some(c),
            PlotState::Empty | PlotState::Unavailable => None,
        }
    }

    /// Finite (x, y) points. One column is drawn against its position,
    /// two columns as y(x).
    pub fn series(&self) -> Vec<(f64, f64)> {
        let Some(curve) = self.curve() else {
            return Vec::new();
        };
        let points: Vec<(f64, f64)> = match curve.columns.as_slice() {
            [y] => y.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect(),
            [x, y, ..] => x.iter().copied().zip(y.iter().copied()).collect(),
            [] => Vec::new(),
        };
        points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }

    /// Horizontal axis label.
    pub fn x_label(&self) -> &str {
        self.curve().map(|c| c.x_label.as_str()).unwrap_or("")
    }

    /// Vertical axis label.
    pub fn y_label(&self) -> &str {
        self.curve().map(|c| c.y_label.as_str()).unwrap_or("")
    }

    /// Node name plus the pinned axes.
    pub fn title(&self) -> &str {
        self.curve().map(|c| c.title.as_str()).unwrap_or("")
    }
}

impl ViewAdapter for PlotAdapter {
    type Cell = f64;

    fn bind(&mut self, source: &dyn DataSource, node: &Node) {
        if self.binding.bind(node, Surface::Plot).is_none() {
            self.binding.tokens.clear();
        }
        tracing::debug!("Plot bound to {}", node.path);
        self.derive(source);
    }

    fn set_dims(&mut self, source: &dyn DataSource, tokens: &[String]) {
        self.binding.tokens = tokens.to_vec();
        self.derive(source);
    }

    fn row_count(&self) -> usize {
        match &self.state {
            PlotState::Empty => 0,
            PlotState::Unavailable => 1,
            PlotState::Ready(c) => c.rows,
        }
    }

    fn column_count(&self) -> usize {
        match &self.state {
            PlotState::Empty => 0,
            PlotState::Unavailable => 1,
            PlotState::Ready(c) => c.columns.len(),
        }
    }

    fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.curve()?.columns.get(col)?.get(row).copied()
    }

    fn dims(&self) -> &[String] {
        &self.binding.tokens
    }

    fn is_available(&self) -> bool {
        self.curve().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;

    fn tokens(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matrix_defaults_to_first_column() {
        let src = MemorySource::new("t").with_floats("/m", &[6, 4], |i| (i[0] * 10 + i[1]) as f64);
        let mut plot = PlotAdapter::new();
        plot.bind(&src, &src.node("/m").unwrap());
        assert_eq!(plot.dims(), &tokens(&[":", "0"])[..]);
        assert_eq!((plot.row_count(), plot.column_count()), (6, 1));
        assert_eq!(plot.series()[2], (2.0, 20.0));
        assert_eq!(plot.title(), "m [dim_1=0]");
        assert_eq!(plot.x_label(), "dim_0");
    }

    #[test]
    fn pairs_plot_as_y_of_x() {
        let src = MemorySource::new("t").with_floats("/xy", &[5, 2], |i| {
            if i[1] == 0 { i[0] as f64 } else { (i[0] * i[0]) as f64 }
        });
        let mut plot = PlotAdapter::new();
        plot.bind(&src, &src.node("/xy").unwrap());
        plot.set_dims(&src, &tokens(&[":", ":"]));
        assert_eq!(plot.column_count(), 2);
        assert_eq!(plot.series()[3], (3.0, 9.0));
    }

    #[test]
    fn all_fixed_spec_has_no_view() {
        let src = MemorySource::new("t").with_floats("/m", &[3, 3], |_| 0.0);
        let mut plot = PlotAdapter::new();
        plot.bind(&src, &src.node("/m").unwrap());
        plot.set_dims(&src, &tokens(&["1", "1"]));
        assert!(!plot.is_available());
        assert_eq!((plot.row_count(), plot.column_count()), (1, 1));
        assert!(plot.series().is_empty());
    }

    #[test]
    fn wide_matrix_has_no_view() {
        let src = MemorySource::new("t").with_floats("/m", &[3, 5], |_| 0.0);
        let mut plot = PlotAdapter::new();
        plot.bind(&src, &src.node("/m").unwrap());
        plot.set_dims(&src, &tokens(&[":", ":"]));
        assert!(!plot.is_available());
    }

    #[test]
    fn compound_fields_select_columns() {
        let rows = (0..4)
            .map(|i| vec![Value::Float(i as f64), Value::Float(2.0 * i as f64), Value::Text("x".into())])
            .collect();
        let src = MemorySource::new("t").with_records("/r", &[4], &["t", "v", "tag"], rows);
        let mut plot = PlotAdapter::new();
        plot.bind(&src, &src.node("/r").unwrap());
        assert_eq!(plot.dims(), &tokens(&[":", "0"])[..]);
        assert_eq!(plot.column_count(), 1);
        assert_eq!(plot.y_label(), "t");

        plot.set_dims(&src, &tokens(&[":", "0:2"]));
        assert_eq!(plot.column_count(), 2);
        assert_eq!((plot.x_label(), plot.y_label()), ("t", "v"));
        assert_eq!(plot.series()[3], (3.0, 6.0));

        plot.set_dims(&src, &tokens(&[":", ":"]));
        assert!(!plot.is_available());
    }
}
