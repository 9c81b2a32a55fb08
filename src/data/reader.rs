//! netCDF-4 / HDF5 file reader.

use super::{Attribute, DataSource, DatasetInfo, ElementKind, Node, Value};
use crate::error::{LensError, Result};
use crate::slicing::{self, AxisPick, DimEntry};
use ndarray::{ArrayD, IxDyn};
use netcdf::{Extent, Extents};
use netcdf::types::{CompoundType, FloatType, IntType, NcVariableType};
use std::fmt;
use std::path::{Path, PathBuf};

/// A file opened read-only through libnetcdf.
pub struct NetcdfSource {
    path: PathBuf,
    name: String,
    file: netcdf::File,
}

impl fmt::Debug for NetcdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetcdfSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl NetcdfSource {
    /// Open a file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file = netcdf::open(path).map_err(|e| LensError::file_open(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!("Opened {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            name,
            file,
        })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, path: &str) -> Option<netcdf::Variable<'_>> {
        self.file.variable(path.trim_start_matches('/'))
    }

    fn group(&self, path: &str) -> Result<Option<netcdf::Group<'_>>> {
        Ok(self.file.group(path.trim_start_matches('/'))?)
    }

    fn dataset_node(var: &netcdf::Variable<'_>, path: String) -> Node {
        let dims = var.dimensions();
        let shape: Vec<usize> = dims.iter().map(|d| d.len()).collect();
        let (element, type_name) = element_kind(&var.vartype());

        let mut info = DatasetInfo::new(shape, element, type_name);
        info.dim_names = dims.iter().map(|d| d.name().to_string()).collect();
        info.max_shape = dims
            .iter()
            .map(|d| if d.is_unlimited() { None } else { Some(d.len()) })
            .collect();
        info.chunks = var.chunking().ok().flatten();

        Node::dataset(path, info).with_attributes(var.attributes().map(|a| attribute(&a)).collect())
    }

    /// Read the elements of `slab` in row-major order.
    fn read_block(var: &netcdf::Variable<'_>, slab: &Hyperslab) -> Result<Vec<Value>> {
        macro_rules! numeric {
            ($t:ty, $wrap:expr) => {{
                let values: Vec<$t> = var.get_values(slab.extents())?;
                values.into_iter().map($wrap).collect()
            }};
        }

        let values = match var.vartype() {
            NcVariableType::Int(IntType::I8) => numeric!(i8, |v| Value::Int(v as i64)),
            NcVariableType::Int(IntType::I16) => numeric!(i16, |v| Value::Int(v as i64)),
            NcVariableType::Int(IntType::I32) => numeric!(i32, |v| Value::Int(v as i64)),
            NcVariableType::Int(IntType::I64) => numeric!(i64, Value::Int),
            NcVariableType::Int(IntType::U8) => numeric!(u8, |v| Value::UInt(v as u64)),
            NcVariableType::Int(IntType::U16) => numeric!(u16, |v| Value::UInt(v as u64)),
            NcVariableType::Int(IntType::U32) => numeric!(u32, |v| Value::UInt(v as u64)),
            NcVariableType::Int(IntType::U64) => numeric!(u64, Value::UInt),
            NcVariableType::Float(FloatType::F32) => numeric!(f32, |v| Value::Float(v as f64)),
            NcVariableType::Float(FloatType::F64) => numeric!(f64, Value::Float),
            NcVariableType::Char => var
                .get_raw_values(slab.extents())?
                .into_iter()
                .map(|b| Value::Bytes(vec![b]))
                .collect(),
            NcVariableType::String => {
                let mut out = Vec::with_capacity(slab.len());
                for flat in 0..slab.len() {
                    let idx = slab.source_index(&unravel(flat, &slab.count));
                    out.push(Value::Text(var.get_string(idx.as_slice())?));
                }
                out
            },
            NcVariableType::Compound(ct) => {
                let raw = var.get_raw_values(slab.extents())?;
                raw.chunks(ct.size.max(1))
                    .map(|record| decode_record(record, &ct))
                    .collect()
            },
            _ => vec![Value::Opaque; slab.len()],
        };
        Ok(values)
    }
}

impl DataSource for NetcdfSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn node(&self, path: &str) -> Result<Node> {
        if path.trim_matches('/').is_empty() {
            return Ok(Node::group("/")
                .with_attributes(self.file.attributes().map(|a| attribute(&a)).collect()));
        }
        if let Some(var) = self.variable(path) {
            return Ok(Self::dataset_node(&var, path.to_string()));
        }
        match self.group(path)? {
            Some(group) => Ok(Node::group(path)
                .with_attributes(group.attributes().map(|a| attribute(&a)).collect())),
            None => Err(LensError::node_not_found(path)),
        }
    }

    fn children(&self, path: &str) -> Result<Vec<Node>> {
        let base = path.trim_end_matches('/');
        let child = |name: &str| format!("{}/{}", base, name);
        let mut nodes = Vec::new();

        if base.is_empty() {
            for var in self.file.variables() {
                nodes.push(Self::dataset_node(&var, child(&var.name())));
            }
            for group in self.file.groups()? {
                nodes.push(Node::group(child(&group.name()))
                    .with_attributes(group.attributes().map(|a| attribute(&a)).collect()));
            }
            return Ok(nodes);
        }

        if self.variable(path).is_some() {
            return Ok(nodes);
        }
        let group = self
            .group(path)?
            .ok_or_else(|| LensError::node_not_found(path))?;
        for var in group.variables() {
            nodes.push(Self::dataset_node(&var, child(&var.name())));
        }
        for sub in group.groups() {
            nodes.push(Node::group(child(&sub.name()))
                .with_attributes(sub.attributes().map(|a| attribute(&a)).collect()));
        }
        Ok(nodes)
    }

    fn read_slice(&self, path: &str, entries: &[DimEntry]) -> Result<ArrayD<Value>> {
        let var = match self.variable(path) {
            Some(var) => var,
            None if self.group(path)?.is_some() => return Err(LensError::not_a_dataset(path)),
            None => return Err(LensError::node_not_found(path)),
        };
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let picks = slicing::resolve(entries, &shape)?;

        let Some(slab) = Hyperslab::covering(&picks) else {
            let out_shape: Vec<usize> = picks.iter().filter_map(|p| p.kept().map(<[usize]>::len)).collect();
            return ArrayD::from_shape_vec(IxDyn(&out_shape), Vec::new())
                .map_err(|e| LensError::NetCDF(format!("Invalid shape/data size: {}", e)));
        };
        tracing::debug!("Reading {} start={:?} count={:?} stride={:?}", path, slab.start, slab.count, slab.stride);

        let values = Self::read_block(&var, &slab)?;
        let block = ArrayD::from_shape_vec(IxDyn(&slab.count), values)
            .map_err(|e| LensError::NetCDF(format!("Invalid shape/data size: {}", e)))?;
        Ok(slicing::take(&block, &slab.local_picks(&picks)))
    }
}

/// Smallest strided box holding every index a set of picks visits.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hyperslab {
    start: Vec<usize>,
    count: Vec<usize>,
    stride: Vec<usize>,
}

impl Hyperslab {
    /// `None` when a kept axis selects nothing, so there is nothing to read.
    fn covering(picks: &[AxisPick]) -> Option<Self> {
        let mut slab = Hyperslab {
            start: Vec::with_capacity(picks.len()),
            count: Vec::with_capacity(picks.len()),
            stride: Vec::with_capacity(picks.len()),
        };
        for pick in picks {
            let (start, count, stride) = match pick {
                AxisPick::Fixed(i) => (*i, 1, 1),
                AxisPick::Kept(v) => {
                    let (first, last) = (*v.first()?, *v.last()?);
                    let stride = match v.get(1) {
                        Some(second) => first.abs_diff(*second),
                        None => 1,
                    };
                    (first.min(last), v.len(), stride.max(1))
                },
            };
            slab.start.push(start);
            slab.count.push(count);
            slab.stride.push(stride);
        }
        Some(slab)
    }

    fn len(&self) -> usize {
        self.count.iter().product()
    }

    fn extents(&self) -> Extents {
        if self.start.is_empty() {
            return Extents::All;
        }
        Extents::Extent(
            self.start
                .iter()
                .zip(&self.count)
                .zip(&self.stride)
                .map(|((&start, &count), &stride)| Extent::SliceCount {
                    start,
                    count,
                    stride: stride as isize,
                })
                .collect(),
        )
    }

    /// File index of a position inside the box.
    fn source_index(&self, local: &[usize]) -> Vec<usize> {
        local
            .iter()
            .zip(self.start.iter().zip(&self.stride))
            .map(|(&l, (&start, &stride))| start + l * stride)
            .collect()
    }

    /// Re-express `picks` relative to the box, keeping their order so
    /// backward ranges come out reversed.
    fn local_picks(&self, picks: &[AxisPick]) -> Vec<AxisPick> {
        picks
            .iter()
            .zip(self.start.iter().zip(&self.stride))
            .map(|(pick, (&start, &stride))| match pick {
                AxisPick::Fixed(_) => AxisPick::Fixed(0),
                AxisPick::Kept(v) => AxisPick::Kept(v.iter().map(|&i| (i - start) / stride).collect()),
            })
            .collect()
    }
}

/// Row-major multi-index of a flat offset.
fn unravel(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut idx = vec![0; shape.len()];
    for (slot, &extent) in idx.iter_mut().zip(shape).rev() {
        if extent > 0 {
            *slot = flat % extent;
            flat /= extent;
        }
    }
    idx
}

fn element_kind(ty: &NcVariableType) -> (ElementKind, String) {
    let (kind, name) = match ty {
        NcVariableType::Int(IntType::I8) => (ElementKind::Integer, "int8"),
        NcVariableType::Int(IntType::I16) => (ElementKind::Integer, "int16"),
        NcVariableType::Int(IntType::I32) => (ElementKind::Integer, "int32"),
        NcVariableType::Int(IntType::I64) => (ElementKind::Integer, "int64"),
        NcVariableType::Int(IntType::U8) => (ElementKind::Unsigned, "uint8"),
        NcVariableType::Int(IntType::U16) => (ElementKind::Unsigned, "uint16"),
        NcVariableType::Int(IntType::U32) => (ElementKind::Unsigned, "uint32"),
        NcVariableType::Int(IntType::U64) => (ElementKind::Unsigned, "uint64"),
        NcVariableType::Float(FloatType::F32) => (ElementKind::Float, "float32"),
        NcVariableType::Float(FloatType::F64) => (ElementKind::Float, "float64"),
        NcVariableType::Char => (ElementKind::Bytes, "char"),
        NcVariableType::String => (ElementKind::Text, "string"),
        NcVariableType::Compound(ct) => {
            let fields = ct.fields.iter().map(|f| f.name.clone()).collect();
            return (ElementKind::Compound(fields), format!("compound {}", ct.name));
        },
        other => return (ElementKind::Opaque, format!("{:?}", other).to_lowercase()),
    };
    (kind, name.to_string())
}

fn decode_record(record: &[u8], ct: &CompoundType) -> Value {
    Value::Record(
        ct.fields
            .iter()
            .map(|field| {
                let bytes = record.get(field.offset..).unwrap_or_default();
                match (&field.arraydims, &field.basetype) {
                    (None, ty) => decode_scalar(bytes, ty),
                    (Some(dims), NcVariableType::Char) => {
                        let n: usize = dims.iter().product();
                        Value::Bytes(bytes.iter().take(n).copied().collect())
                    },
                    (Some(_), _) => Value::Opaque,
                }
            })
            .collect(),
    )
}

fn decode_scalar(bytes: &[u8], ty: &NcVariableType) -> Value {
    macro_rules! ne {
        ($t:ty, $wrap:expr) => {
            bytes
                .get(..std::mem::size_of::<$t>())
                .and_then(|b| <[u8; std::mem::size_of::<$t>()]>::try_from(b).ok())
                .map(<$t>::from_ne_bytes)
                .map($wrap)
                .unwrap_or(Value::Opaque)
        };
    }

    match ty {
        NcVariableType::Int(IntType::I8) => ne!(i8, |v| Value::Int(v as i64)),
        NcVariableType::Int(IntType::I16) => ne!(i16, |v| Value::Int(v as i64)),
        NcVariableType::Int(IntType::I32) => ne!(i32, |v| Value::Int(v as i64)),
        NcVariableType::Int(IntType::I64) => ne!(i64, Value::Int),
        NcVariableType::Int(IntType::U8) => ne!(u8, |v| Value::UInt(v as u64)),
        NcVariableType::Int(IntType::U16) => ne!(u16, |v| Value::UInt(v as u64)),
        NcVariableType::Int(IntType::U32) => ne!(u32, |v| Value::UInt(v as u64)),
        NcVariableType::Int(IntType::U64) => ne!(u64, Value::UInt),
        NcVariableType::Float(FloatType::F32) => ne!(f32, |v| Value::Float(v as f64)),
        NcVariableType::Float(FloatType::F64) => ne!(f64, Value::Float),
        NcVariableType::Char => bytes
            .first()
            .map(|b| Value::Bytes(vec![*b]))
            .unwrap_or(Value::Opaque),
        _ => Value::Opaque,
    }
}

fn attribute(attr: &netcdf::Attribute<'_>) -> Attribute {
    use netcdf::AttributeValue;

    let (value, type_name) = match attr.value() {
        Ok(AttributeValue::Uchar(v)) => (v.to_string(), "uint8"),
        Ok(AttributeValue::Schar(v)) => (v.to_string(), "int8"),
        Ok(AttributeValue::Ushort(v)) => (v.to_string(), "uint16"),
        Ok(AttributeValue::Short(v)) => (v.to_string(), "int16"),
        Ok(AttributeValue::Uint(v)) => (v.to_string(), "uint32"),
        Ok(AttributeValue::Int(v)) => (v.to_string(), "int32"),
        Ok(AttributeValue::Ulonglong(v)) => (v.to_string(), "uint64"),
        Ok(AttributeValue::Longlong(v)) => (v.to_string(), "int64"),
        Ok(AttributeValue::Float(v)) => (v.to_string(), "float32"),
        Ok(AttributeValue::Double(v)) => (v.to_string(), "float64"),
        Ok(AttributeValue::Str(v)) => (v, "str"),
        Ok(AttributeValue::Uchars(v)) => (format!("{:?}", v), "uint8[]"),
        Ok(AttributeValue::Schars(v)) => (format!("{:?}", v), "int8[]"),
        Ok(AttributeValue::Ushorts(v)) => (format!("{:?}", v), "uint16[]"),
        Ok(AttributeValue::Shorts(v)) => (format!("{:?}", v), "int16[]"),
        Ok(AttributeValue::Uints(v)) => (format!("{:?}", v), "uint32[]"),
        Ok(AttributeValue::Ints(v)) => (format!("{:?}", v), "int32[]"),
        Ok(AttributeValue::Ulonglongs(v)) => (format!("{:?}", v), "uint64[]"),
        Ok(AttributeValue::Longlongs(v)) => (format!("{:?}", v), "int64[]"),
        Ok(AttributeValue::Floats(v)) => (format!("{:?}", v), "float32[]"),
        Ok(AttributeValue::Doubles(v)) => (format!("{:?}", v), "float64[]"),
        Ok(AttributeValue::Strs(v)) => (v.join(", "), "str[]"),
        Err(e) => (format!("<unreadable: {}>", e), "unknown"),
    };
    Attribute::new(attr.name(), value, type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperslab_covers_strided_and_fixed_axes() {
        let picks = vec![AxisPick::Fixed(2), AxisPick::Kept(vec![1, 4, 7])];
        let slab = Hyperslab::covering(&picks).unwrap();
        assert_eq!(slab.start, vec![2, 1]);
        assert_eq!(slab.count, vec![1, 3]);
        assert_eq!(slab.stride, vec![1, 3]);
        assert_eq!(slab.source_index(&[0, 2]), vec![2, 7]);
        assert_eq!(
            slab.local_picks(&picks),
            vec![AxisPick::Fixed(0), AxisPick::Kept(vec![0, 1, 2])]
        );
    }

    #[test]
    fn backward_ranges_read_forwards_and_reverse_locally() {
        let picks = vec![AxisPick::Kept(vec![6, 4, 2])];
        let slab = Hyperslab::covering(&picks).unwrap();
        assert_eq!((slab.start[0], slab.count[0], slab.stride[0]), (2, 3, 2));
        assert_eq!(slab.local_picks(&picks), vec![AxisPick::Kept(vec![2, 1, 0])]);
    }

    #[test]
    fn empty_selection_needs_no_read() {
        assert!(Hyperslab::covering(&[AxisPick::Kept(Vec::new())]).is_none());
        let scalar = Hyperslab::covering(&[]).unwrap();
        assert_eq!(scalar.len(), 1);
    }

    #[test]
    fn unravel_is_row_major() {
        assert_eq!(unravel(0, &[2, 3]), vec![0, 0]);
        assert_eq!(unravel(4, &[2, 3]), vec![1, 1]);
        assert_eq!(unravel(0, &[]), Vec::<usize>::new());
    }

    #[test]
    fn scalar_fields_decode_native_endian() {
        let bytes = 7i32.to_ne_bytes();
        assert_eq!(
            decode_scalar(&bytes, &NcVariableType::Int(IntType::I32)),
            Value::Int(7)
        );
        assert_eq!(
            decode_scalar(&bytes[..2], &NcVariableType::Int(IntType::I32)),
            Value::Opaque
        );
    }

    #[test]
    fn numeric_types_map_to_kinds() {
        let (kind, name) = element_kind(&NcVariableType::Float(FloatType::F32));
        assert_eq!(kind, ElementKind::Float);
        assert_eq!(name, "float32");
        assert_eq!(element_kind(&NcVariableType::Char).0, ElementKind::Bytes);
    }
}
