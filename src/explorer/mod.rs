//! Explorer feature - file hierarchy browsing.
//!
//! The tree is populated lazily: a group's children are fetched from the
//! data source the first time it is expanded and cached afterwards.

pub mod details;
pub mod tree;

use crate::data::{parent_path, DataSource, Node};
use std::collections::{HashMap, HashSet};

/// Explorer state - a flattened, expandable view of the file hierarchy.
#[derive(Debug, Default)]
pub struct ExplorerState {
    /// All tree items in display order (only visible items).
    items: Vec<TreeItem>,
    /// Cursor position (index into items).
    cursor: usize,
    /// The root node.
    root: Option<Node>,
    /// Children fetched so far, keyed by parent path.
    loaded: HashMap<String, Vec<Node>>,
    /// Set of expanded node paths.
    expanded_paths: HashSet<String>,
    /// Scroll offset for the tree view.
    scroll_offset: usize,
}

/// A single item in the tree view.
#[derive(Debug, Clone)]
pub struct TreeItem {
    /// The data node.
    pub node: Node,
    /// Nesting level.
    pub level: usize,
    /// Whether this node is expanded.
    pub expanded: bool,
}

impl ExplorerState {
    /// Create a new explorer state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the root and its immediate children.
    pub fn load(&mut self, source: &dyn DataSource) -> crate::error::Result<()> {
        let root = source.root()?;
        self.loaded.clear();
        self.expanded_paths.clear();
        self.ensure_loaded(source, &root.path);
        self.expanded_paths.insert(root.path.clone());
        self.root = Some(root);
        self.rebuild_visible_items();
        self.cursor = 0;
        self.scroll_offset = 0;
        Ok(())
    }

    fn ensure_loaded(&mut self, source: &dyn DataSource, path: &str) {
        if self.loaded.contains_key(path) {
            return;
        }
        let children = source.children(path).unwrap_or_else(|e| {
            tracing::warn!("Could not list children of {}: {}", path, e);
            Vec::new()
        });
        tracing::debug!("Loaded {} children of {}", children.len(), path);
        self.loaded.insert(path.to_string(), children);
    }

    /// Whether the children of `path` have been fetched.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.loaded.contains_key(path)
    }

    /// Rebuild the visible items list based on expanded state.
    fn rebuild_visible_items(&mut self) {
        self.items.clear();
        if let Some(root) = self.root.clone() {
            self.add_visible_recursive(&root, 0);
        }
    }

    fn add_visible_recursive(&mut self, node: &Node, level: usize) {
        let is_expanded = self.expanded_paths.contains(&node.path);

        self.items.push(TreeItem {
            node: node.clone(),
            level,
            expanded: is_expanded,
        });

        if is_expanded {
            let children = self.loaded.get(&node.path).cloned().unwrap_or_default();
            for child in &children {
                self.add_visible_recursive(child, level + 1);
            }
        }
    }

    /// Move the cursor up one position.
    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move the cursor down one position.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    /// Adjust scroll to keep cursor visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        }

        if self.cursor >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor.saturating_sub(viewport_height - 1);
        }
    }

    /// Get the current scroll offset.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Expand the group at the current cursor position, fetching its
    /// children on first use.
    pub fn expand_current(&mut self, source: &dyn DataSource) {
        let Some(item) = self.items.get(self.cursor) else {
            return;
        };
        if item.node.is_group() && !item.expanded {
            let path = item.node.path.clone();
            self.ensure_loaded(source, &path);
            self.expanded_paths.insert(path);
            self.rebuild_visible_items();
        }
    }

    /// Collapse the group at the current cursor position. On a collapsed
    /// group or a dataset, jump to the parent instead.
    pub fn collapse_current(&mut self) {
        let Some(item) = self.items.get(self.cursor) else {
            return;
        };
        if item.node.is_group() && item.expanded {
            let path = item.node.path.clone();
            self.expanded_paths.remove(&path);
            self.rebuild_visible_items();
        } else if item.level > 0 {
            let parent = parent_path(&item.node.path);
            self.goto_node(&parent);
        }
    }

    /// Go to the first item.
    pub fn goto_first(&mut self) {
        self.cursor = 0;
    }

    /// Go to the last visible item.
    pub fn goto_last(&mut self) {
        if !self.items.is_empty() {
            self.cursor = self.items.len() - 1;
        }
    }

    /// Get all currently visible items in the tree.
    pub fn visible_items(&self) -> &[TreeItem] {
        &self.items
    }

    /// Get the current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the current node.
    pub fn current_node(&self) -> Option<&Node> {
        self.items.get(self.cursor).map(|item| &item.node)
    }

    /// Move the cursor to a visible node with the given path.
    pub fn goto_node(&mut self, target_path: &str) -> bool {
        match self.items.iter().position(|item| item.node.path == target_path) {
            Some(i) => {
                self.cursor = i;
                true
            },
            None => false,
        }
    }

    /// Expand every ancestor of `path`, loading them as needed, and move
    /// the cursor onto it.
    pub fn reveal(&mut self, source: &dyn DataSource, path: &str) -> bool {
        let Some(root) = self.root.as_ref().map(|r| r.path.clone()) else {
            return false;
        };

        let mut ancestors = Vec::new();
        let mut current = parent_path(path);
        while current != root && current != "/" {
            ancestors.push(current.clone());
            current = parent_path(&current);
        }
        ancestors.push(root);

        for ancestor in ancestors.iter().rev() {
            self.ensure_loaded(source, ancestor);
            self.expanded_paths.insert(ancestor.clone());
        }
        self.rebuild_visible_items();
        self.goto_node(path)
    }
}
