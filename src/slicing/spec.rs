//! Dimension-spec parsing and edit-time validation.

use std::fmt;

/// A half-open range over one axis. Missing bounds take their conventional
/// defaults when resolved against an extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimRange {
    /// First index (inclusive).
    pub start: Option<i64>,
    /// End index (exclusive).
    pub stop: Option<i64>,
    /// Stride; `None` means 1.
    pub step: Option<i64>,
}

impl DimRange {
    /// The range covering a whole axis (`:`).
    pub const FULL: DimRange = DimRange {
        start: None,
        stop: None,
        step: None,
    };

    /// Build a range from explicit bounds.
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }
}

impl fmt::Display for DimRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
        write!(f, "{}:{}", part(self.start), part(self.stop))?;
        if let Some(step) = self.step {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

/// One entry of a [`DimensionSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimEntry {
    /// Fixed index; removes the axis from the view.
    Index(i64),
    /// Range; keeps the axis in the view.
    Range(DimRange),
}

impl DimEntry {
    /// Whether this entry keeps its axis in the view.
    pub fn is_range(&self) -> bool {
        matches!(self, DimEntry::Range(_))
    }

    /// The fixed index, if this entry is one.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            DimEntry::Index(i) => Some(*i),
            DimEntry::Range(_) => None,
        }
    }
}

impl fmt::Display for DimEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimEntry::Index(i) => write!(f, "{}", i),
            DimEntry::Range(r) => write!(f, "{}", r),
        }
    }
}

/// Per-axis indexing plan used to slice a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DimensionSpec {
    entries: Vec<DimEntry>,
}

impl DimensionSpec {
    /// Create a spec from entries.
    pub fn new(entries: Vec<DimEntry>) -> Self {
        Self { entries }
    }

    /// A spec of `ndim` full ranges.
    pub fn full(ndim: usize) -> Self {
        Self::new(vec![DimEntry::Range(DimRange::FULL); ndim])
    }

    /// The entries in axis order.
    pub fn entries(&self) -> &[DimEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `axis`.
    pub fn get(&self, axis: usize) -> Option<&DimEntry> {
        self.entries.get(axis)
    }

    /// Whether any entry is a range.
    pub fn has_range(&self) -> bool {
        self.entries.iter().any(DimEntry::is_range)
    }

    /// Split into the data part (first `ndim` entries) and the trailing
    /// entry, if any, that selects compound fields.
    pub fn split_fields(&self, ndim: usize) -> (&[DimEntry], Option<&DimEntry>) {
        if self.entries.len() > ndim {
            (&self.entries[..ndim], self.entries.get(ndim))
        } else {
            (&self.entries[..], None)
        }
    }

    /// Return a copy with the entry at `axis` replaced.
    pub fn with_entry(&self, axis: usize, entry: DimEntry) -> Self {
        let mut entries = self.entries.clone();
        if let Some(slot) = entries.get_mut(axis) {
            *slot = entry;
        }
        Self { entries }
    }
}

impl fmt::Display for DimensionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.entries.iter().map(|e| e.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<i64>().ok()
}

/// Parse a single token. Returns `None` for tokens that are neither an
/// integer nor a range.
pub fn parse_token(token: &str) -> Option<DimEntry> {
    if let Some(n) = parse_int(token) {
        return Some(DimEntry::Index(n));
    }

    if token.contains(':') {
        let mut parts = token.trim().split(':').map(parse_int);
        let start = parts.next().flatten();
        let stop = parts.next().flatten();
        let step = parts.next().flatten();
        return Some(DimEntry::Range(DimRange::new(start, stop, step)));
    }

    None
}

/// Parse per-axis tokens into a [`DimensionSpec`].
///
/// Never fails. Tokens that are neither integers nor ranges are dropped, so
/// the result can be shorter than the input.
pub fn parse_dims<S: AsRef<str>>(tokens: &[S]) -> DimensionSpec {
    DimensionSpec::new(
        tokens
            .iter()
            .filter_map(|t| parse_token(t.as_ref()))
            .collect(),
    )
}

/// Edit-time check for one dimension token.
///
/// `limit` is the number of valid plain indices for the column: the axis
/// extent, or the field count for a compound field column. Range tokens are
/// accepted as-is since range resolution clamps.
pub fn validate_token(token: &str, limit: usize) -> bool {
    let token = token.trim();
    if token.contains(':') {
        return true;
    }
    match token.parse::<i64>() {
        Ok(n) => n >= 0 && (n as u64) < limit as u64,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> DimEntry {
        DimEntry::Range(DimRange::new(start, stop, step))
    }

    #[test]
    fn parses_plain_integers() {
        let spec = parse_dims(&["0", " 7 ", "-1"]);
        assert_eq!(
            spec.entries(),
            &[DimEntry::Index(0), DimEntry::Index(7), DimEntry::Index(-1)]
        );
    }

    #[test]
    fn parses_range_forms() {
        let spec = parse_dims(&[":", "2:", "::2", "3:8:2", " 1 : 4 "]);
        assert_eq!(
            spec.entries(),
            &[
                range(None, None, None),
                range(Some(2), None, None),
                range(None, None, Some(2)),
                range(Some(3), Some(8), Some(2)),
                range(Some(1), Some(4), None),
            ]
        );
    }

    #[test]
    fn bad_range_fragments_become_unspecified() {
        let spec = parse_dims(&["a:5", "1:x:2"]);
        assert_eq!(
            spec.entries(),
            &[range(None, Some(5), None), range(Some(1), None, Some(2))]
        );
    }

    #[test]
    fn extra_range_parts_are_ignored() {
        let spec = parse_dims(&["1:2:3:4"]);
        assert_eq!(spec.entries(), &[range(Some(1), Some(2), Some(3))]);
    }

    // Known quirk: garbage tokens vanish instead of failing the parse.
    #[test]
    fn quirk_unrecognised_tokens_are_dropped() {
        let spec = parse_dims(&["0", "abc", ":"]);
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.entries(), &[DimEntry::Index(0), range(None, None, None)]);
    }

    #[test]
    fn display_round_trips_through_parser() {
        let spec = parse_dims(&["0", ":", "3:8:2", "::-1"]);
        assert_eq!(spec.to_string(), "(0, :, 3:8:2, ::-1)");
    }

    #[test]
    fn split_fields_separates_trailing_entry() {
        let spec = parse_dims(&[":", "1"]);
        let (data, field) = spec.split_fields(1);
        assert_eq!(data, &[range(None, None, None)]);
        assert_eq!(field, Some(&DimEntry::Index(1)));

        let (data, field) = spec.split_fields(2);
        assert_eq!(data.len(), 2);
        assert!(field.is_none());
    }

    #[test]
    fn validation_checks_plain_index_bounds() {
        assert!(validate_token("0", 8));
        assert!(validate_token("7", 8));
        assert!(!validate_token("8", 8));
        assert!(!validate_token("-1", 8));
        assert!(!validate_token("abc", 8));
        assert!(!validate_token("", 8));
    }

    #[test]
    fn validation_accepts_any_range() {
        assert!(validate_token("100:200", 8));
        assert!(validate_token(" : ", 8));
        assert!(validate_token("x:y", 8));
    }
}
