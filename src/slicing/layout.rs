//! Default slice selection shared by every view surface.

/// Display surface a default is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Table or image: keep two (or three, for colour data) trailing axes.
    Grid,
    /// Line plot: collapse to one value per row.
    Plot,
}

/// Default slice for a dataset: the editable tokens plus the row/column
/// counts they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLayout {
    /// One token per axis (plus the field column for compound data).
    pub tokens: Vec<String>,
    /// Rows of the resulting view.
    pub rows: usize,
    /// Columns of the resulting view.
    pub cols: usize,
}

/// Whether the trailing axis looks like colour channels.
pub fn is_color_shape(shape: &[usize]) -> bool {
    shape.len() > 2 && matches!(shape.last(), Some(3) | Some(4))
}

fn fixed(count: usize) -> Vec<String> {
    vec!["0".to_string(); count]
}

fn full(count: usize) -> Vec<String> {
    vec![":".to_string(); count]
}

/// Compute the default layout for a dataset of `shape`. `fields` is the
/// compound field count, or `None` for plain element types.
pub fn default_layout(shape: &[usize], fields: Option<usize>, surface: Surface) -> DefaultLayout {
    let ndim = shape.len();

    if ndim == 0 {
        return DefaultLayout {
            tokens: Vec::new(),
            rows: 1,
            cols: 1,
        };
    }

    if let Some(nfields) = fields {
        let mut tokens = fixed(ndim - 1);
        tokens.push(":".to_string());
        match surface {
            Surface::Grid => tokens.push(":".to_string()),
            Surface::Plot => tokens.push("0".to_string()),
        }
        let cols = match surface {
            Surface::Grid => nfields,
            Surface::Plot => 1.min(nfields),
        };
        return DefaultLayout {
            tokens,
            rows: shape[ndim - 1],
            cols,
        };
    }

    let (mut tokens, rows, cols) = if ndim == 1 {
        (full(1), shape[0], 1)
    } else if ndim == 2 {
        (full(2), shape[0], shape[1])
    } else if is_color_shape(shape) {
        let mut t = fixed(ndim - 3);
        t.extend(full(3));
        (t, shape[ndim - 3], shape[ndim - 2])
    } else {
        let mut t = fixed(ndim - 2);
        t.extend(full(2));
        (t, shape[ndim - 2], shape[ndim - 1])
    };

    if surface == Surface::Grid || ndim == 1 {
        return DefaultLayout { tokens, rows, cols };
    }

    // Plot keeps the row axis and pins everything after it.
    let pinned = if is_color_shape(shape) { 2 } else { 1 };
    for t in tokens.iter_mut().skip(ndim - pinned) {
        *t = "0".to_string();
    }
    DefaultLayout {
        tokens,
        rows,
        cols: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(layout: &DefaultLayout) -> Vec<&str> {
        layout.tokens.iter().map(String::as_str).collect()
    }

    #[test]
    fn scalar_is_one_cell() {
        let l = default_layout(&[], None, Surface::Grid);
        assert!(l.tokens.is_empty());
        assert_eq!((l.rows, l.cols), (1, 1));
    }

    #[test]
    fn vector_is_a_column() {
        let l = default_layout(&[12], None, Surface::Grid);
        assert_eq!(toks(&l), vec![":"]);
        assert_eq!((l.rows, l.cols), (12, 1));
    }

    #[test]
    fn compound_vector_has_one_column_per_field() {
        let l = default_layout(&[6], Some(3), Surface::Grid);
        assert_eq!(toks(&l), vec![":", ":"]);
        assert_eq!((l.rows, l.cols), (6, 3));

        let p = default_layout(&[6], Some(3), Surface::Plot);
        assert_eq!(toks(&p), vec![":", "0"]);
        assert_eq!((p.rows, p.cols), (6, 1));
    }

    #[test]
    fn matrix_uses_both_axes() {
        let l = default_layout(&[8, 9], None, Surface::Grid);
        assert_eq!(toks(&l), vec![":", ":"]);
        assert_eq!((l.rows, l.cols), (8, 9));

        let p = default_layout(&[8, 9], None, Surface::Plot);
        assert_eq!(toks(&p), vec![":", "0"]);
        assert_eq!((p.rows, p.cols), (8, 1));
    }

    #[test]
    fn rgb_trailing_axis_keeps_three_axes() {
        let l = default_layout(&[10, 20, 3], None, Surface::Grid);
        assert_eq!(toks(&l), vec![":", ":", ":"]);
        assert_eq!((l.rows, l.cols), (10, 20));

        let l = default_layout(&[2, 5, 6, 4], None, Surface::Grid);
        assert_eq!(toks(&l), vec!["0", ":", ":", ":"]);
        assert_eq!((l.rows, l.cols), (5, 6));

        let p = default_layout(&[2, 5, 6, 4], None, Surface::Plot);
        assert_eq!(toks(&p), vec!["0", ":", "0", "0"]);
    }

    #[test]
    fn stack_of_frames_pins_leading_axes() {
        let l = default_layout(&[5, 10, 20], None, Surface::Grid);
        assert_eq!(toks(&l), vec!["0", ":", ":"]);
        assert_eq!((l.rows, l.cols), (10, 20));

        let p = default_layout(&[5, 10, 20], None, Surface::Plot);
        assert_eq!(toks(&p), vec!["0", ":", "0"]);
        assert_eq!((p.rows, p.cols), (10, 1));
    }
}
