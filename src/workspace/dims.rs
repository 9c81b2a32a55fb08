//! The dimension-editing bar shared by all tabs of a file.

use crate::data::Node;
use crate::slicing::validate_token;

/// Editable per-axis tokens of the focused tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimsEditor {
    tokens: Vec<String>,
    /// Upper bound for a plain index in each column.
    limits: Vec<usize>,
    labels: Vec<String>,
    selected: usize,
    input: Option<String>,
}

impl DimsEditor {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `tokens` for `node`. Compound datasets get an extra column for
    /// the field selection.
    pub fn load(&mut self, node: &Node, tokens: &[String]) {
        let (mut limits, mut labels) = match node.dataset_info() {
            Some(info) => (info.shape.clone(), info.dim_names.clone()),
            None => (Vec::new(), Vec::new()),
        };
        if let Some(fields) = node.dataset_info().and_then(|i| i.element.fields()) {
            limits.push(fields.len());
            labels.push("field".to_string());
        }
        self.tokens = tokens.to_vec();
        self.limits = limits;
        self.labels = labels;
        self.selected = self.selected.min(self.tokens.len().saturating_sub(1));
        self.input = None;
    }

    /// Validate `text` for `column` and, if accepted, replace the token
    /// vector. Returns whether the edit was applied.
    pub fn edit(&mut self, column: usize, text: &str) -> bool {
        let Some(&limit) = self.limits.get(column) else {
            tracing::debug!("Rejected edit of dims column {}: no such axis", column);
            return false;
        };
        if column >= self.tokens.len() || !validate_token(text, limit) {
            tracing::debug!("Rejected dims token {:?} for column {} (extent {})", text, column, limit);
            return false;
        }
        let mut tokens = self.tokens.clone();
        tokens[column] = text.trim().to_string();
        self.tokens = tokens;
        true
    }

    /// Current tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Axis name for each column.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Extent of each column.
    pub fn limits(&self) -> &[usize] {
        &self.limits
    }

    /// Highlighted column.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the highlight by `delta` columns.
    pub fn select_column(&mut self, delta: isize) {
        if self.tokens.is_empty() {
            return;
        }
        let last = self.tokens.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    /// Text being typed, if an edit is in progress.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Whether an edit is in progress.
    pub fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    /// Start editing the highlighted column with its current token.
    pub fn begin(&mut self) -> bool {
        match self.tokens.get(self.selected) {
            Some(token) => {
                self.input = Some(token.clone());
                true
            },
            None => false,
        }
    }

    /// Append a character to the input.
    pub fn push(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.push(c);
        }
    }

    /// Remove the last input character.
    pub fn pop(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.pop();
        }
    }

    /// Finish the edit. Returns whether the token vector changed.
    pub fn commit(&mut self) -> bool {
        match self.input.take() {
            Some(text) => self.edit(self.selected, &text),
            None => false,
        }
    }

    /// Abandon the edit.
    pub fn cancel(&mut self) {
        self.input = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DatasetInfo, ElementKind};

    fn editor(shape: &[usize], tokens: &[&str]) -> DimsEditor {
        let node = Node::dataset("/d", DatasetInfo::new(shape.to_vec(), ElementKind::Float, "float64"));
        let mut dims = DimsEditor::new();
        let tokens: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        dims.load(&node, &tokens);
        dims
    }

    #[test]
    fn index_equal_to_extent_is_rejected() {
        let mut dims = editor(&[8, 8], &[":", ":"]);
        assert!(!dims.edit(0, "8"));
        assert_eq!(dims.tokens(), &[":", ":"]);
        assert!(dims.edit(0, "7"));
        assert_eq!(dims.tokens(), &["7", ":"]);
    }

    #[test]
    fn garbage_and_negative_are_rejected() {
        let mut dims = editor(&[4], &[":"]);
        assert!(!dims.edit(0, "x"));
        assert!(!dims.edit(0, "-1"));
        assert!(!dims.edit(1, "0"));
        assert!(dims.edit(0, "1:3"));
    }

    #[test]
    fn compound_has_a_field_column() {
        let info = DatasetInfo::new(vec![5], ElementKind::Compound(vec!["a".into(), "b".into()]), "compound r");
        let mut dims = DimsEditor::new();
        dims.load(&Node::dataset("/r", info), &[":".to_string(), ":".to_string()]);
        assert_eq!(dims.limits(), &[5, 2]);
        assert_eq!(dims.labels().last().map(String::as_str), Some("field"));
        assert!(dims.edit(1, "1"));
        assert!(!dims.edit(1, "2"));
    }

    #[test]
    fn input_session_commits_through_validation() {
        let mut dims = editor(&[5, 10, 20], &["0", ":", ":"]);
        assert!(dims.begin());
        dims.pop();
        dims.push('4');
        assert!(dims.commit());
        assert_eq!(dims.tokens()[0], "4");

        dims.select_column(1);
        dims.select_column(5);
        assert_eq!(dims.selected(), 2);
        dims.begin();
        dims.pop();
        dims.push('x');
        assert!(!dims.commit());
        assert!(!dims.is_editing());
        assert_eq!(dims.tokens()[2], ":");
    }
}
