//! Single dataset elements.

use std::fmt;

/// One element read from a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Text string.
    Text(String),
    /// Raw bytes (fixed-length strings, chars).
    Bytes(Vec<u8>),
    /// Compound record, one value per field.
    Record(Vec<Value>),
    /// Element the viewer cannot interpret.
    Opaque,
}

impl Value {
    /// Numeric value, for the kinds that have one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(_) | Value::Bytes(_) | Value::Record(_) | Value::Opaque => None,
        }
    }

    /// Field `index` of a record.
    pub fn field(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(index),
            _ => None,
        }
    }
}

fn write_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    match std::str::from_utf8(bytes) {
        Ok(s) => write!(f, "{}", s.trim_end_matches('\0')),
        Err(_) => {
            write!(f, "b'")?;
            for b in bytes {
                write!(f, "{}", std::ascii::escape_default(*b))?;
            }
            write!(f, "'")
        },
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            },
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bytes(b) => write_bytes(f, b),
            Value::Record(fields) => {
                write!(f, "(")?;
                for (i, v) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            },
            Value::Opaque => write!(f, "<opaque>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn bytes_decode_when_valid_utf8() {
        assert_eq!(Value::Bytes(b"abc\0\0".to_vec()).to_string(), "abc");
        assert_eq!(Value::Bytes(vec![0xff, b'a']).to_string(), "b'\\xffa'");
    }

    #[test]
    fn records_render_as_tuples() {
        let v = Value::Record(vec![Value::Int(1), Value::Text("x".into())]);
        assert_eq!(v.to_string(), "(1, x)");
        assert_eq!(v.field(1), Some(&Value::Text("x".into())));
        assert_eq!(v.as_f64(), None);
    }

    #[test]
    fn numeric_kinds_convert_to_f64() {
        assert_eq!(Value::UInt(7).as_f64(), Some(7.0));
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Value::Text("1".into()).as_f64(), None);
    }
}
