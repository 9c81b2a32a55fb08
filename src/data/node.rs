//! Node types for the file hierarchy.

use std::fmt;

/// Element type of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Signed integers.
    Integer,
    /// Unsigned integers.
    Unsigned,
    /// Floating point numbers.
    Float,
    /// Booleans.
    Boolean,
    /// Text strings.
    Text,
    /// Raw bytes or characters.
    Bytes,
    /// Record type with named fields.
    Compound(Vec<String>),
    /// Anything the viewer cannot interpret (opaque, vlen, enum, references).
    Opaque,
}

impl ElementKind {
    /// Whether values can be drawn as pixels or plot points.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ElementKind::Integer | ElementKind::Unsigned | ElementKind::Float | ElementKind::Boolean
        )
    }

    /// Field names for compound types.
    pub fn fields(&self) -> Option<&[String]> {
        match self {
            ElementKind::Compound(names) => Some(names),
            _ => None,
        }
    }
}

/// Dataset descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    /// Extent of each axis.
    pub shape: Vec<usize>,
    /// Element type.
    pub element: ElementKind,
    /// Type name as reported by the file library.
    pub type_name: String,
    /// Axis names, when the format has them.
    pub dim_names: Vec<String>,
    /// Maximum extent of each axis; `None` for unlimited axes.
    pub max_shape: Vec<Option<usize>>,
    /// Chunk shape, for chunked storage.
    pub chunks: Option<Vec<usize>>,
    /// Compression filter description.
    pub compression: Option<String>,
}

impl DatasetInfo {
    /// Create a contiguous, fixed-size descriptor.
    pub fn new(shape: Vec<usize>, element: ElementKind, type_name: impl Into<String>) -> Self {
        let max_shape = shape.iter().map(|&n| Some(n)).collect();
        let dim_names = (0..shape.len()).map(|i| format!("dim_{}", i)).collect();
        Self {
            shape,
            element,
            type_name: type_name.into(),
            dim_names,
            max_shape,
            chunks: None,
            compression: None,
        }
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether the dataset holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape formatted like `(5, 10, 20)`.
    pub fn shape_string(&self) -> String {
        format_shape(&self.shape)
    }
}

/// Format a shape tuple, with the trailing comma for one axis.
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        _ => {
            let parts: Vec<String> = shape.iter().map(usize::to_string).collect();
            format!("({})", parts.join(", "))
        },
    }
}

/// Node kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Container with named children.
    Group,
    /// Typed n-dimensional array.
    Dataset(DatasetInfo),
}

/// A named attribute attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Value rendered as text.
    pub value: String,
    /// Value type name.
    pub type_name: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            type_name: type_name.into(),
        }
    }
}

/// A location in the file hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Last path component (`/` for the root).
    pub name: String,
    /// Full slash-separated path.
    pub path: String,
    /// Group or dataset.
    pub kind: NodeKind,
    /// Attributes in file order.
    pub attributes: Vec<Attribute>,
}

impl Node {
    /// Create a group node.
    pub fn group(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: name_from_path(&path),
            path,
            kind: NodeKind::Group,
            attributes: Vec::new(),
        }
    }

    /// Create a dataset node.
    pub fn dataset(path: impl Into<String>, info: DatasetInfo) -> Self {
        let path = path.into();
        Self {
            name: name_from_path(&path),
            path,
            kind: NodeKind::Dataset(info),
            attributes: Vec::new(),
        }
    }

    /// Attach attributes.
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Check if this node is a group.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    /// Dataset descriptor, if this node is a dataset.
    pub fn dataset_info(&self) -> Option<&DatasetInfo> {
        match &self.kind {
            NodeKind::Dataset(info) => Some(info),
            NodeKind::Group => None,
        }
    }

    /// Get display name with metadata.
    pub fn display_name(&self) -> String {
        let mut label = self.name.clone();
        if let Some(info) = self.dataset_info() {
            label.push_str(&format!(" {}", info.shape_string()));
        }
        if !self.attributes.is_empty() {
            label.push_str(&format!(" @{}", self.attributes.len()));
        }
        label
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Last component of a slash path; the root keeps `/`.
pub fn name_from_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}

/// Join a parent path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == "/" || parent.is_empty() {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), name)
    }
}

/// Parent path of `path`; the root is its own parent.
pub fn parent_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(pos) => trimmed[..pos].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_split_and_join() {
        assert_eq!(name_from_path("/"), "/");
        assert_eq!(name_from_path("/a/b"), "b");
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
        assert_eq!(parent_path("/a/b"), "/a");
        assert_eq!(parent_path("/a"), "/");
        assert_eq!(parent_path("/"), "/");
    }

    #[test]
    fn shapes_format_like_tuples() {
        assert_eq!(format_shape(&[]), "()");
        assert_eq!(format_shape(&[4]), "(4,)");
        assert_eq!(format_shape(&[5, 10, 20]), "(5, 10, 20)");
    }

    #[test]
    fn display_name_shows_shape_and_attr_count() {
        let node = Node::dataset("/g/x", DatasetInfo::new(vec![3, 4], ElementKind::Float, "f64"))
            .with_attributes(vec![Attribute::new("units", "m", "str")]);
        assert_eq!(node.display_name(), "x (3, 4) @1");
        assert_eq!(Node::group("/g").display_name(), "g");
    }
}
