//! Clipboard integration.

use crate::error::Result;
use crate::explorer::details::NodeDetails;
use crate::view::TableAdapter;
use arboard::Clipboard;

/// Put `text` on the system clipboard.
pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Copy the description of the selected node.
pub fn copy_details(details: &NodeDetails) -> Result<()> {
    copy_text(&details.to_text())
}

/// Copy the current table view as tab-separated values.
pub fn copy_table(table: &TableAdapter) -> Result<()> {
    copy_text(&table.to_tsv())
}
