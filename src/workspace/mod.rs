//! Per-file coordinator: the tree, the view tabs and the shared dims bar.
//!
//! Every tab owns its adapter and remembers the node and tokens it last
//! showed. Selecting a node rebinds only the focused tab; switching tabs
//! restores the saved pair into the dims editor and the tree cursor.

mod dims;
mod tabs;

pub use dims::DimsEditor;
pub use tabs::{Tab, TabHandle, TabKind, TabState, TabView};

use crate::data::{DataSource, NetcdfSource};
use crate::error::Result;
use crate::explorer::details::NodeDetails;
use crate::explorer::ExplorerState;
use std::path::{Path, PathBuf};

/// One open file.
#[derive(Debug)]
pub struct FileWorkspace {
    source: Box<dyn DataSource>,
    path: Option<PathBuf>,
    explorer: ExplorerState,
    dims: DimsEditor,
    details: NodeDetails,
    tabs: Vec<Tab>,
    active: usize,
    next_handle: u64,
}

impl FileWorkspace {
    /// Wrap an already opened source. The root is selected in a Table tab.
    pub fn new(source: Box<dyn DataSource>) -> Result<Self> {
        let mut explorer = ExplorerState::new();
        explorer.load(source.as_ref())?;
        let mut workspace = Self {
            source,
            path: None,
            explorer,
            dims: DimsEditor::new(),
            details: NodeDetails::default(),
            tabs: Vec::new(),
            active: 0,
            next_handle: 0,
        };
        let handle = workspace.issue_handle();
        workspace.tabs.push(Tab::new(handle, TabKind::Table));
        workspace.select_node("/")?;
        Ok(workspace)
    }

    /// Open the file at `path` read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let source = NetcdfSource::open(path)?;
        let mut workspace = Self::new(Box::new(source))?;
        workspace.path = Some(path.to_path_buf());
        Ok(workspace)
    }

    fn issue_handle(&mut self) -> TabHandle {
        let handle = TabHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Show `path` in the focused tab with that surface's default tokens.
    pub fn select_node(&mut self, path: &str) -> Result<()> {
        let node = self.source.node(path)?;
        let source = self.source.as_ref();
        if let Some(tab) = self.tabs.get_mut(self.active) {
            tab.bind(source, &node);
            self.dims.load(&node, &tab.state.dims);
        }
        self.details = NodeDetails::from_node(&node);
        Ok(())
    }

    /// Select the node under the tree cursor, if it changed.
    pub fn select_current(&mut self) -> Result<()> {
        let Some(path) = self.explorer.current_node().map(|n| n.path.clone()) else {
            return Ok(());
        };
        if self.active_tab().and_then(|t| t.state.node_path.as_deref()) == Some(path.as_str()) {
            return Ok(());
        }
        self.select_node(&path)
    }

    /// Edit one dims column. A rejected token changes nothing.
    pub fn edit_dim(&mut self, column: usize, text: &str) -> bool {
        if !self.dims.edit(column, text) {
            return false;
        }
        self.apply_dims();
        true
    }

    /// Finish the dims bar input session.
    pub fn commit_dims_input(&mut self) -> bool {
        if !self.dims.commit() {
            return false;
        }
        self.apply_dims();
        true
    }

    fn apply_dims(&mut self) {
        let source = self.source.as_ref();
        if let Some(tab) = self.tabs.get_mut(self.active) {
            tab.apply_dims(source, self.dims.tokens());
            tracing::debug!("Applied dims {:?} to tab {:?}", tab.state.dims, tab.handle);
        }
    }

    /// Focus tab `index` and restore its saved node and tokens.
    pub fn switch_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.active = index;
        let Some(path) = self.tabs[index].state.node_path.clone() else {
            return true;
        };
        match self.source.node(&path) {
            Ok(node) => {
                self.dims.load(&node, &self.tabs[index].state.dims);
                self.details = NodeDetails::from_node(&node);
                self.explorer.reveal(self.source.as_ref(), &path);
            },
            Err(e) => tracing::warn!("Tab node {} vanished: {}", path, e),
        }
        true
    }

    /// Focus the next tab, wrapping around.
    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.switch_tab((self.active + 1) % self.tabs.len());
        }
    }

    /// Focus the previous tab, wrapping around.
    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.switch_tab((self.active + self.tabs.len() - 1) % self.tabs.len());
        }
    }

    /// Open a tab of `kind` on the node shown by the focused tab. Only
    /// datasets get extra tabs; the new tab takes focus.
    pub fn add_tab(&mut self, kind: TabKind) -> Option<TabHandle> {
        let path = self.active_tab()?.state.node_path.clone()?;
        let node = self.source.node(&path).ok()?;
        node.dataset_info()?;

        let handle = self.issue_handle();
        let mut tab = Tab::new(handle, kind);
        tab.bind(self.source.as_ref(), &node);
        self.tabs.push(tab);
        self.active = self.tabs.len() - 1;
        self.dims.load(&node, &self.tabs[self.active].state.dims);
        tracing::debug!("Opened {} tab {:?} on {}", kind.label(), handle, path);
        Some(handle)
    }

    /// Close the focused tab. The Table tab stays.
    pub fn close_tab(&mut self) -> bool {
        if self.active == 0 || self.active >= self.tabs.len() {
            return false;
        }
        let tab = self.tabs.remove(self.active);
        tracing::debug!("Closed tab {:?}", tab.handle);
        self.switch_tab(self.active - 1)
    }

    /// Step the image frame by `delta` through the normal edit path.
    pub fn scroll_frame(&mut self, delta: isize) -> bool {
        let Some(TabView::Image(image)) = self.active_tab().map(|t| &t.view) else {
            return false;
        };
        let Some(frame) = image.frame() else {
            return false;
        };
        let last = frame.count.saturating_sub(1);
        let target = frame.index.saturating_add_signed(delta).min(last);
        if target == frame.index {
            return false;
        }
        self.edit_dim(0, &target.to_string())
    }

    /// Move the tree cursor up and select the node under it.
    pub fn cursor_up(&mut self) -> Result<()> {
        self.explorer.cursor_up();
        self.select_current()
    }

    /// Move the tree cursor down and select the node under it.
    pub fn cursor_down(&mut self) -> Result<()> {
        self.explorer.cursor_down();
        self.select_current()
    }

    /// Expand the group under the cursor.
    pub fn expand(&mut self) {
        self.explorer.expand_current(self.source.as_ref());
    }

    /// Collapse the group under the cursor, or move to its parent.
    pub fn collapse(&mut self) -> Result<()> {
        self.explorer.collapse_current();
        self.select_current()
    }

    /// Display name of the file.
    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// Path the file was opened from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The data source.
    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// The tree.
    pub fn explorer(&self) -> &ExplorerState {
        &self.explorer
    }

    /// The tree, for rendering.
    pub fn explorer_mut(&mut self) -> &mut ExplorerState {
        &mut self.explorer
    }

    /// The dims bar.
    pub fn dims(&self) -> &DimsEditor {
        &self.dims
    }

    /// The dims bar, for input handling.
    pub fn dims_mut(&mut self) -> &mut DimsEditor {
        &mut self.dims
    }

    /// Details of the selected node.
    pub fn details(&self) -> &NodeDetails {
        &self.details
    }

    /// All tabs in order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Index of the focused tab.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The focused tab.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active)
    }
}
