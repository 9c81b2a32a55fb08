//! Dimension specs: parsing user tokens, choosing defaults, and slicing
//! arrays with the result.

mod layout;
mod select;
mod spec;

pub use layout::{default_layout, is_color_shape, DefaultLayout, Surface};
pub use select::{range_indices, resolve, resolve_index, select, take, AxisPick, SliceError};
pub use spec::{parse_dims, parse_token, validate_token, DimEntry, DimRange, DimensionSpec};
