//! In-memory hierarchy, used by tests and by the built-in sample file.

use super::node::parent_path;
use super::{Attribute, DataSource, DatasetInfo, ElementKind, Node, Value};
use crate::error::{LensError, Result};
use crate::slicing::{self, DimEntry};
use ndarray::{ArrayD, Dimension, IxDyn};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    data: Option<ArrayD<Value>>,
    children: Vec<String>,
}

/// A data source backed by owned arrays.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    entries: HashMap<String, Entry>,
}

impl MemorySource {
    /// Create an empty source with just a root group.
    pub fn new(name: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "/".to_string(),
            Entry {
                node: Node::group("/"),
                data: None,
                children: Vec::new(),
            },
        );
        Self {
            name: name.into(),
            entries,
        }
    }

    fn insert(&mut self, node: Node, data: Option<ArrayD<Value>>) {
        let path = node.path.clone();
        let parent = parent_path(&path);
        if !self.entries.contains_key(&parent) {
            self.insert(Node::group(parent.clone()), None);
        }
        if let Some(p) = self.entries.get_mut(&parent) {
            if !p.children.contains(&path) {
                p.children.push(path.clone());
            }
        }
        let children = self
            .entries
            .remove(&path)
            .map(|e| e.children)
            .unwrap_or_default();
        self.entries.insert(
            path,
            Entry {
                node,
                data,
                children,
            },
        );
    }

    /// Add a group. Missing ancestors are created.
    pub fn with_group(mut self, path: &str) -> Self {
        self.insert(Node::group(path), None);
        self
    }

    /// Add a dataset with explicit values. The array shape becomes the
    /// dataset shape.
    pub fn with_dataset(
        mut self,
        path: &str,
        element: ElementKind,
        type_name: &str,
        data: ArrayD<Value>,
    ) -> Self {
        let info = DatasetInfo::new(data.shape().to_vec(), element, type_name);
        self.insert(Node::dataset(path, info), Some(data));
        self
    }

    /// Add a float dataset whose values come from `f(index)`.
    pub fn with_floats(
        self,
        path: &str,
        shape: &[usize],
        f: impl Fn(&[usize]) -> f64,
    ) -> Self {
        let data = ArrayD::from_shape_fn(IxDyn(shape), |idx| Value::Float(f(idx.slice())));
        self.with_dataset(path, ElementKind::Float, "float64", data)
    }

    /// Add a compound dataset. `rows` must match `shape` in length.
    pub fn with_records(
        self,
        path: &str,
        shape: &[usize],
        fields: &[&str],
        rows: Vec<Vec<Value>>,
    ) -> Self {
        let mut rows = rows.into_iter();
        let data = ArrayD::from_shape_fn(IxDyn(shape), |_| {
            Value::Record(rows.next().unwrap_or_default())
        });
        let names = fields.iter().map(|s| s.to_string()).collect();
        self.with_dataset(path, ElementKind::Compound(names), "compound", data)
    }

    /// Attach an attribute to an existing node.
    pub fn with_attribute(mut self, path: &str, attribute: Attribute) -> Self {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.node.attributes.push(attribute);
        }
        self
    }

    /// Replace the descriptor of an existing dataset, e.g. to set chunking.
    pub fn with_info(mut self, path: &str, edit: impl FnOnce(&mut DatasetInfo)) -> Self {
        if let Some(entry) = self.entries.get_mut(path) {
            if let super::NodeKind::Dataset(info) = &mut entry.node.kind {
                edit(info);
            }
        }
        self
    }

    /// A small sample file covering every surface: a frame stack, a colour
    /// image, an (x, y) curve, a record table and a text list.
    pub fn demo() -> Self {
        let records = (0..12)
            .map(|i| {
                let t = i as f64 * 0.5;
                vec![
                    Value::Float(t),
                    Value::Float((t * 0.8).sin() * 20.0 + 15.0),
                    Value::Text(format!("st{:02}", i % 4)),
                ]
            })
            .collect();
        let names = ArrayD::from_shape_fn(IxDyn(&[4]), |idx| {
            Value::Text(["north", "east", "south", "west"][idx[0]].to_string())
        });

        MemorySource::new("demo")
            .with_attribute("/", Attribute::new("title", "h5lens sample data", "str"))
            .with_floats("/fields/temperature", &[6, 24, 48], |i| {
                let (t, y, x) = (i[0] as f64, i[1] as f64, i[2] as f64);
                ((x + t * 4.0) / 8.0).sin() * (y / 6.0).cos() * 10.0 + 280.0
            })
            .with_info("/fields/temperature", |info| {
                info.dim_names = vec!["time".into(), "lat".into(), "lon".into()];
                info.max_shape[0] = None;
                info.chunks = Some(vec![1, 24, 48]);
            })
            .with_attribute("/fields/temperature", Attribute::new("units", "K", "str"))
            .with_floats("/images/gradient", &[32, 64, 3], |i| match i[2] {
                0 => i[1] as f64 / 63.0,
                1 => i[0] as f64 / 31.0,
                _ => 0.5,
            })
            .with_floats("/series/parabola", &[40, 2], |i| {
                let x = i[0] as f64 / 4.0 - 5.0;
                if i[1] == 0 {
                    x
                } else {
                    x * x
                }
            })
            .with_records("/tables/stations", &[12], &["time", "value", "station"], records)
            .with_dataset("/tables/directions", ElementKind::Text, "string", names)
    }

    fn entry(&self, path: &str) -> Result<&Entry> {
        let key = if path.is_empty() { "/" } else { path };
        self.entries
            .get(key)
            .ok_or_else(|| LensError::node_not_found(path))
    }
}

impl DataSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn node(&self, path: &str) -> Result<Node> {
        Ok(self.entry(path)?.node.clone())
    }

    fn children(&self, path: &str) -> Result<Vec<Node>> {
        let entry = self.entry(path)?;
        entry
            .children
            .iter()
            .map(|child| self.node(child))
            .collect()
    }

    fn read_slice(&self, path: &str, entries: &[DimEntry]) -> Result<ArrayD<Value>> {
        let entry = self.entry(path)?;
        let data = entry
            .data
            .as_ref()
            .ok_or_else(|| LensError::not_a_dataset(path))?;
        Ok(slicing::select(data, entries)?)
    }
}
