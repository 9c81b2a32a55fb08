//! Image surface: greyscale or colour pixels from a 2-D or 3-D slice.

use super::{read_selection, Binding, ViewAdapter};
use crate::data::{DataSource, DatasetInfo, ElementKind, Node};
use crate::error::Result;
use crate::slicing::{parse_dims, AxisPick, Surface};
use ndarray::{ArrayD, IxDyn};

/// One image pixel in source units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pixel {
    /// Single intensity.
    Gray(f64),
    /// Red, green, blue.
    Rgb([f64; 3]),
    /// Red, green, blue, alpha.
    Rgba([f64; 4]),
}

impl Pixel {
    /// Channel values in order.
    pub fn channels(&self) -> &[f64] {
        match self {
            Pixel::Gray(v) => std::slice::from_ref(v),
            Pixel::Rgb(c) => c,
            Pixel::Rgba(c) => c,
        }
    }
}

/// Position of the current frame along the leading axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePosition {
    /// Current frame index.
    pub index: usize,
    /// Number of frames.
    pub count: usize,
}

#[derive(Debug, Clone)]
struct Picture {
    values: ArrayD<f64>,
    rows: usize,
    cols: usize,
    channels: Option<usize>,
    levels: Option<(f64, f64)>,
    frame: Option<FramePosition>,
}

#[derive(Debug, Clone, Default)]
enum ImageState {
    #[default]
    Empty,
    Unavailable,
    Ready(Picture),
}

/// Image view of the bound dataset.
#[derive(Debug, Clone, Default)]
pub struct ImageAdapter {
    binding: Binding,
    state: ImageState,
}

impl ImageAdapter {
    /// Create an unbound image.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound node.
    pub fn node(&self) -> Option<&Node> {
        self.binding.node.as_ref()
    }

    /// `Ok(None)` when the element type or the slice cannot be shown.
    fn build(
        source: &dyn DataSource,
        path: &str,
        info: &DatasetInfo,
        tokens: &[String],
    ) -> Result<Option<Picture>> {
        let spec = parse_dims(tokens);
        if !info.element.is_numeric() || spec.len() < 2 {
            return Ok(None);
        }

        let selection = read_selection(source, path, info, &spec)?;
        let (rows, cols, channels) = match selection.data.shape() {
            [r, c] => (*r, *c, None),
            [r, c, 3] => (*r, *c, Some(3)),
            [r, c, 4] => (*r, *c, Some(4)),
            _ => return Ok(None),
        };

        let values = selection.data.mapv(|v| v.as_f64().unwrap_or(f64::NAN));
        let levels = values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });

        let frame = match (selection.picks.first(), info.shape.first()) {
            (Some(AxisPick::Fixed(index)), Some(&count)) => Some(FramePosition {
                index: *index,
                count,
            }),
            _ => None,
        };

        Ok(Some(Picture {
            values,
            rows,
            cols,
            channels,
            levels,
            frame,
        }))
    }

    fn derive(&mut self, source: &dyn DataSource) {
        let (Some(info), Some(path)) = (self.binding.info(), self.binding.path()) else {
            self.state = ImageState::Empty;
            return;
        };
        self.state = match Self::build(source, path, info, &self.binding.tokens) {
            Ok(Some(picture)) => ImageState::Ready(picture),
            Ok(None) => {
                tracing::debug!("No image view for {} with {:?}", path, self.binding.tokens);
                ImageState::Unavailable
            },
            Err(e) => {
                tracing::debug!("No image view for {}: {}", path, e);
                ImageState::Unavailable
            },
        };
    }

    fn picture(&self) -> Option<&Picture> {
        match &self.state {
            ImageState::Ready(p) => Some(p),
            ImageState::Empty | ImageState::Unavailable => None,
        }
    }

    /// Whether pixels carry colour channels.
    pub fn is_color(&self) -> bool {
        self.picture().is_some_and(|p| p.channels.is_some())
    }

    /// Frame position when the leading axis is pinned to an index.
    pub fn frame(&self) -> Option<FramePosition> {
        self.picture().and_then(|p| p.frame)
    }

    /// Finite minimum and maximum over the view, used for normalisation.
    pub fn levels(&self) -> Option<(f64, f64)> {
        self.picture().and_then(|p| p.levels)
    }

    /// Whether colour channels are floats in `0..=1` that need scaling to
    /// the byte range. Integer channels are drawn as-is.
    pub fn stretches_channels(&self) -> bool {
        let float = self.binding.info().is_some_and(|i| i.element == ElementKind::Float);
        float && self.is_color() && self.levels().is_some_and(|(_, hi)| hi <= 1.0)
    }

    /// Cursor readout for the pixel at (`row`, `col`).
    pub fn describe(&self, row: usize, col: usize) -> Option<String> {
        let pixel = self.value_at(row, col)?;
        let value = match pixel {
            Pixel::Gray(v) => scientific(v),
            other => {
                let parts: Vec<String> = other.channels().iter().map(|&c| scientific(c)).collect();
                format!("[{}]", parts.join(", "))
            },
        };
        Some(format!("X={} Y={}, value={}", col, row, value))
    }
}

/// Three-decimal scientific notation with a signed two-digit exponent,
/// e.g. `1.235e+05`.
fn scientific(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = format!("{:.3e}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        },
        None => s,
    }
}

impl ViewAdapter for ImageAdapter {
    type Cell = Pixel;

    fn bind(&mut self, source: &dyn DataSource, node: &Node) {
        if self.binding.bind(node, Surface::Grid).is_none() {
            self.binding.tokens.clear();
        }
        tracing::debug!("Image bound to {}", node.path);
        self.derive(source);
    }

    fn set_dims(&mut self, source: &dyn DataSource, tokens: &[String]) {
        self.binding.tokens = tokens.to_vec();
        self.derive(source);
    }

    fn row_count(&self) -> usize {
        match &self.state {
            ImageState::Empty => 0,
            ImageState::Unavailable => 1,
            ImageState::Ready(p) => p.rows,
        }
    }

    fn column_count(&self) -> usize {
        match &self.state {
            ImageState::Empty => 0,
            ImageState::Unavailable => 1,
            ImageState::Ready(p) => p.cols,
        }
    }

    fn value_at(&self, row: usize, col: usize) -> Option<Pixel> {
        let p = self.picture()?;
        if row >= p.rows || col >= p.cols {
            return None;
        }
        let at = |c: usize| p.values.get(IxDyn(&[row, col, c])).copied().unwrap_or(f64::NAN);
        match p.channels {
            None => p.values.get(IxDyn(&[row, col])).copied().map(Pixel::Gray),
            Some(3) => Some(Pixel::Rgb([at(0), at(1), at(2)])),
            Some(_) => Some(Pixel::Rgba([at(0), at(1), at(2), at(3)])),
        }
    }

    fn dims(&self) -> &[String] {
        &self.binding.tokens
    }

    fn is_available(&self) -> bool {
        self.picture().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ElementKind, MemorySource, Value};

    fn tokens(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn stack_defaults_to_first_frame() {
        let src = MemorySource::new("t").with_floats("/s", &[5, 10, 20], |i| i[0] as f64);
        let mut img = ImageAdapter::new();
        img.bind(&src, &src.node("/s").unwrap());
        assert_eq!(img.dims(), &tokens(&["0", ":", ":"])[..]);
        assert_eq!((img.row_count(), img.column_count()), (10, 20));
        assert!(!img.is_color());
        assert_eq!(img.frame(), Some(FramePosition { index: 0, count: 5 }));

        img.set_dims(&src, &tokens(&["3", ":", ":"]));
        assert_eq!(img.value_at(0, 0), Some(Pixel::Gray(3.0)));
        assert_eq!(img.frame().map(|f| f.index), Some(3));
    }

    #[test]
    fn rgba_trailing_axis_is_colour() {
        let src = MemorySource::new("t").with_floats("/c", &[6, 7, 4], |i| i[2] as f64);
        let mut img = ImageAdapter::new();
        img.bind(&src, &src.node("/c").unwrap());
        assert_eq!((img.row_count(), img.column_count()), (6, 7));
        assert!(img.is_color());
        assert_eq!(img.value_at(2, 3), Some(Pixel::Rgba([0.0, 1.0, 2.0, 3.0])));
        assert_eq!(img.frame(), None);
    }

    #[test]
    fn one_dimensional_result_has_no_view() {
        let src = MemorySource::new("t").with_floats("/m", &[4, 5], |_| 1.0);
        let mut img = ImageAdapter::new();
        img.bind(&src, &src.node("/m").unwrap());
        assert!(img.is_available());
        img.set_dims(&src, &tokens(&["0", ":"]));
        assert!(!img.is_available());
        assert_eq!((img.row_count(), img.column_count()), (1, 1));
    }

    #[test]
    fn vectors_and_text_have_no_view() {
        let text = ndarray::ArrayD::from_elem(IxDyn(&[2, 2]), Value::Text("a".into()));
        let src = MemorySource::new("t")
            .with_floats("/v", &[9], |_| 0.0)
            .with_dataset("/t", ElementKind::Text, "string", text);
        let mut img = ImageAdapter::new();
        img.bind(&src, &src.node("/v").unwrap());
        assert!(!img.is_available());
        img.bind(&src, &src.node("/t").unwrap());
        assert!(!img.is_available());
    }

    #[test]
    fn levels_and_readout() {
        let src = MemorySource::new("t").with_floats("/m", &[2, 3], |i| (i[0] * 3 + i[1]) as f64);
        let mut img = ImageAdapter::new();
        img.bind(&src, &src.node("/m").unwrap());
        assert_eq!(img.levels(), Some((0.0, 5.0)));
        assert_eq!(img.describe(1, 2).as_deref(), Some("X=2 Y=1, value=5.000e+00"));
        assert_eq!(img.describe(2, 0), None);
    }

    #[test]
    fn readout_exponent_is_signed_and_padded() {
        assert_eq!(scientific(123456.0), "1.235e+05");
        assert_eq!(scientific(1.5e-7), "1.500e-07");
        assert_eq!(scientific(-2.0e120), "-2.000e+120");
        assert_eq!(scientific(0.0), "0.000e+00");
        assert_eq!(scientific(f64::NAN), "nan");
        assert_eq!(scientific(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn only_float_colour_in_unit_range_is_stretched() {
        let bytes = ndarray::ArrayD::from_shape_fn(IxDyn(&[2, 2, 3]), |i| Value::UInt((i[2] % 2) as u64));
        let src = MemorySource::new("t")
            .with_dataset("/u8", ElementKind::Unsigned, "uint8", bytes)
            .with_floats("/unit", &[2, 2, 3], |i| i[2] as f64 / 4.0)
            .with_floats("/wide", &[2, 2, 3], |i| i[2] as f64 * 100.0)
            .with_floats("/grey", &[2, 2], |_| 0.5);
        let mut img = ImageAdapter::new();

        img.bind(&src, &src.node("/u8").unwrap());
        assert!(img.is_color());
        assert_eq!(img.levels(), Some((0.0, 1.0)));
        assert!(!img.stretches_channels());

        img.bind(&src, &src.node("/unit").unwrap());
        assert!(img.stretches_channels());

        img.bind(&src, &src.node("/wide").unwrap());
        assert!(!img.stretches_channels());

        img.bind(&src, &src.node("/grey").unwrap());
        assert!(!img.stretches_channels());
    }
}
