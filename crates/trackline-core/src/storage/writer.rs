//! Writer for the .trk document format.

use std::fs;
use std::path::Path;

use crate::document::Document;
use crate::error::Result;

/// Write a Document to a .trk file.
pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let content = document_to_string(doc);
    fs::write(path, content)?;
    Ok(())
}

/// Write a Document to a .trk format string.
pub fn document_to_string(doc: &Document) -> String {
    let mut lines = vec!["# Trackline document".to_string()];

    for block in doc.blocks() {
        lines.push(format!("block {}: \"{}\"", block.id(), escape_text(block.text())));
    }

    for range in doc.named_ranges() {
        let ids: Vec<String> = range.blocks().iter().map(|id| id.to_string()).collect();
        lines.push(format!(
            "range {} \"{}\": {}",
            range.id().0,
            escape_text(range.name()),
            ids.join(" ")
        ));
    }

    lines.join("\n") + "\n"
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
