//! View tabs and their saved (node, spec) state.

use crate::data::{DataSource, Node};
use crate::view::{ImageAdapter, PlotAdapter, TableAdapter, ViewAdapter};

/// Identifier issued by the workspace for each tab it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabHandle(pub u64);

/// Which surface a tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    /// Text grid, always present.
    Table,
    /// Greyscale or colour pixels.
    Image,
    /// Line plot.
    Plot,
}

impl TabKind {
    /// Tab bar label.
    pub fn label(self) -> &'static str {
        match self {
            TabKind::Table => "Table",
            TabKind::Image => "Image",
            TabKind::Plot => "Plot",
        }
    }
}

/// Adapter owned by a tab.
#[derive(Debug, Clone)]
pub enum TabView {
    /// Table surface.
    Table(TableAdapter),
    /// Image surface.
    Image(ImageAdapter),
    /// Plot surface.
    Plot(PlotAdapter),
}

impl TabView {
    fn for_kind(kind: TabKind) -> Self {
        match kind {
            TabKind::Table => TabView::Table(TableAdapter::new()),
            TabKind::Image => TabView::Image(ImageAdapter::new()),
            TabKind::Plot => TabView::Plot(PlotAdapter::new()),
        }
    }

    /// Rebind to `node` with the surface default.
    pub fn bind(&mut self, source: &dyn DataSource, node: &Node) {
        match self {
            TabView::Table(a) => a.bind(source, node),
            TabView::Image(a) => a.bind(source, node),
            TabView::Plot(a) => a.bind(source, node),
        }
    }

    /// Replace the tokens and re-derive.
    pub fn set_dims(&mut self, source: &dyn DataSource, tokens: &[String]) {
        match self {
            TabView::Table(a) => a.set_dims(source, tokens),
            TabView::Image(a) => a.set_dims(source, tokens),
            TabView::Plot(a) => a.set_dims(source, tokens),
        }
    }

    /// Current tokens.
    pub fn dims(&self) -> &[String] {
        match self {
            TabView::Table(a) => a.dims(),
            TabView::Image(a) => a.dims(),
            TabView::Plot(a) => a.dims(),
        }
    }

    /// Whether the surface has something to show.
    pub fn is_available(&self) -> bool {
        match self {
            TabView::Table(a) => a.is_available(),
            TabView::Image(a) => a.is_available(),
            TabView::Plot(a) => a.is_available(),
        }
    }

    /// `(rows, cols)` of the current view.
    pub fn size(&self) -> (usize, usize) {
        match self {
            TabView::Table(a) => (a.row_count(), a.column_count()),
            TabView::Image(a) => (a.row_count(), a.column_count()),
            TabView::Plot(a) => (a.row_count(), a.column_count()),
        }
    }
}

/// Saved state of one tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabState {
    /// Node the tab is showing.
    pub node_path: Option<String>,
    /// Tokens last applied to it.
    pub dims: Vec<String>,
}

/// One view tab.
#[derive(Debug, Clone)]
pub struct Tab {
    /// Identifier.
    pub handle: TabHandle,
    /// Surface kind.
    pub kind: TabKind,
    /// Adapter.
    pub view: TabView,
    /// Saved state.
    pub state: TabState,
}

impl Tab {
    /// Unbound tab of `kind`.
    pub fn new(handle: TabHandle, kind: TabKind) -> Self {
        Self {
            handle,
            kind,
            view: TabView::for_kind(kind),
            state: TabState::default(),
        }
    }

    /// Bind to `node` and snapshot the default tokens.
    pub fn bind(&mut self, source: &dyn DataSource, node: &Node) {
        self.view.bind(source, node);
        self.state = TabState {
            node_path: Some(node.path.clone()),
            dims: self.view.dims().to_vec(),
        };
    }

    /// Apply `tokens` and snapshot them.
    pub fn apply_dims(&mut self, source: &dyn DataSource, tokens: &[String]) {
        self.view.set_dims(source, tokens);
        self.state.dims = tokens.to_vec();
    }

    /// Title for the tab bar, e.g. `Image: temp`.
    pub fn title(&self) -> String {
        match &self.state.node_path {
            Some(path) if path != "/" => {
                format!("{}: {}", self.kind.label(), crate::data::name_from_path(path))
            },
            _ => self.kind.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;

    #[test]
    fn binding_snapshots_default_tokens() {
        let src = MemorySource::new("t").with_floats("/cube", &[5, 10, 20], |_| 0.0);
        let mut tab = Tab::new(TabHandle(1), TabKind::Image);
        tab.bind(&src, &src.node("/cube").unwrap());
        assert_eq!(tab.state.node_path.as_deref(), Some("/cube"));
        assert_eq!(tab.state.dims, vec!["0", ":", ":"]);
        assert_eq!(tab.view.size(), (10, 20));
        assert_eq!(tab.title(), "Image: cube");
    }

    #[test]
    fn applied_tokens_are_saved() {
        let src = MemorySource::new("t").with_floats("/m", &[8, 8], |_| 1.0);
        let mut tab = Tab::new(TabHandle(0), TabKind::Table);
        tab.bind(&src, &src.node("/m").unwrap());
        let tokens = vec!["3".to_string(), ":".to_string()];
        tab.apply_dims(&src, &tokens);
        assert_eq!(tab.state.dims, tokens);
        assert_eq!(tab.view.dims(), &tokens[..]);
        assert_eq!(tab.view.size(), (1, 8));
    }
}
