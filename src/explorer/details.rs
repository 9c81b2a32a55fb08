//! Details pane: attribute table and dataset descriptor for the selected
//! node.

use crate::data::{format_shape, Attribute, Node};
use crate::ui::formatters::format_number;
use crate::ui::ThemeColors;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Metadata shown for the selected node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDetails {
    /// Node path.
    pub path: String,
    /// Attribute rows (name, value, type).
    pub attributes: Vec<Attribute>,
    /// Dataset descriptor rows (name, value); empty for groups.
    pub dataset: Vec<(String, String)>,
}

fn optional_shape(shape: &[Option<usize>]) -> String {
    let parts: Vec<String> = shape
        .iter()
        .map(|d| d.map(|n| n.to_string()).unwrap_or_else(|| "None".to_string()))
        .collect();
    match parts.len() {
        1 => format!("({},)", parts[0]),
        _ => format!("({})", parts.join(", ")),
    }
}

impl NodeDetails {
    /// Collect the details of `node`.
    pub fn from_node(node: &Node) -> Self {
        let dataset = match node.dataset_info() {
            None => Vec::new(),
            Some(info) => {
                let shape = match info.element.fields() {
                    Some(fields) => format!("{}  (ncols={})", info.shape_string(), fields.len()),
                    None => info.shape_string(),
                };
                vec![
                    ("name".to_string(), node.path.clone()),
                    ("dtype".to_string(), info.type_name.clone()),
                    ("ndim".to_string(), info.ndim().to_string()),
                    ("shape".to_string(), shape),
                    ("maxshape".to_string(), optional_shape(&info.max_shape)),
                    (
                        "chunks".to_string(),
                        info.chunks
                            .as_deref()
                            .map(format_shape)
                            .unwrap_or_else(|| "None".to_string()),
                    ),
                    (
                        "compression".to_string(),
                        info.compression.clone().unwrap_or_else(|| "None".to_string()),
                    ),
                    ("dims".to_string(), info.dim_names.join(", ")),
                    ("size".to_string(), format!("{} elements", format_number(info.len()))),
                ]
            },
        };
        Self {
            path: node.path.clone(),
            attributes: node.attributes.clone(),
            dataset,
        }
    }

    /// Plain-text form, used for the clipboard.
    pub fn to_text(&self) -> String {
        let mut text = format!("Path: {}\n", self.path);
        for (key, value) in &self.dataset {
            text.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.attributes.is_empty() {
            text.push_str("\nAttributes:\n");
            for attr in &self.attributes {
                text.push_str(&format!("  {}: {} ({})\n", attr.name, attr.value, attr.type_name));
            }
        }
        text
    }

    /// Styled lines for the details pane.
    pub fn lines(&self, colors: &ThemeColors) -> Vec<Line<'static>> {
        let heading = |text: &str| {
            Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(colors.aqua).add_modifier(Modifier::BOLD),
            ))
        };

        let mut lines = vec![
            Line::from(Span::styled(
                self.path.clone(),
                Style::default().fg(colors.yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("─".repeat(40), Style::default().fg(colors.bg2))),
        ];

        if !self.dataset.is_empty() {
            lines.push(heading("Dataset"));
            for (key, value) in &self.dataset {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<12}", key), Style::default().fg(colors.fg1)),
                    Span::styled(value.clone(), Style::default().fg(colors.fg0)),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(heading(&format!("Attributes ({})", self.attributes.len())));
        for attr in &self.attributes {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", attr.name), Style::default().fg(colors.fg1)),
                Span::styled(" = ", Style::default().fg(colors.gray)),
                Span::styled(attr.value.clone(), Style::default().fg(colors.green)),
                Span::styled(format!("  {}", attr.type_name), Style::default().fg(colors.gray)),
            ]));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DatasetInfo, ElementKind};

    #[test]
    fn groups_only_list_attributes() {
        let node = Node::group("/g").with_attributes(vec![Attribute::new("title", "x", "str")]);
        let details = NodeDetails::from_node(&node);
        assert!(details.dataset.is_empty());
        assert_eq!(details.attributes.len(), 1);
        assert!(details.to_text().contains("  title: x (str)"));
    }

    #[test]
    fn dataset_descriptor_rows() {
        let mut info = DatasetInfo::new(vec![10, 3], ElementKind::Compound(vec!["a".into(), "b".into()]), "compound rec");
        info.max_shape = vec![None, Some(3)];
        info.chunks = Some(vec![5, 3]);
        let details = NodeDetails::from_node(&Node::dataset("/d", info));
        let get = |k: &str| {
            details
                .dataset
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("shape"), Some("(10, 3)  (ncols=2)"));
        assert_eq!(get("maxshape"), Some("(None, 3)"));
        assert_eq!(get("chunks"), Some("(5, 3)"));
        assert_eq!(get("compression"), Some("None"));
        assert_eq!(get("size"), Some("30 elements"));
    }
}
