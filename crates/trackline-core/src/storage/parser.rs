//! Parser for the .trk document format.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::document::{Block, BlockId, Document, NamedRange, RangeId};
use crate::error::{CoreError, Result};

/// Parse a .trk file into a Document.
pub fn parse_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    parse_document_content(&content)
}

/// Parse .trk content from a string.
///
/// Two line forms, in file order:
///
/// ```text
/// block 3: "escaped text"
/// range 1 "escaped name": 3 4 7
/// ```
pub fn parse_document_content(content: &str) -> Result<Document> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut ranges: Vec<NamedRange> = Vec::new();
    let mut seen_blocks: HashSet<u64> = HashSet::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        let line_num = line_num + 1;

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("block ") {
            let (id, text) = parse_block_line(rest, line_num)?;
            if !seen_blocks.insert(id) {
                return Err(CoreError::Parse {
                    line: line_num,
                    message: format!("duplicate block id {}", id),
                });
            }
            blocks.push(Block {
                id: BlockId(id),
                text,
            });
        } else if let Some(rest) = line.strip_prefix("range ") {
            let range = parse_range_line(rest, line_num, ranges.len() as u64)?;
            for block in &range.blocks {
                if !seen_blocks.contains(&block.0) {
                    return Err(CoreError::Parse {
                        line: line_num,
                        message: format!("range references unknown block {}", block),
                    });
                }
            }
            ranges.push(range);
        } else {
            return Err(CoreError::Parse {
                line: line_num,
                message: "Expected 'block <id>: ...' or 'range <id> ...' line".to_string(),
            });
        }
    }

    Ok(Document::from_parts(blocks, ranges))
}

fn parse_block_line(rest: &str, line_num: usize) -> Result<(u64, String)> {
    let Some((id_str, value)) = rest.split_once(':') else {
        return Err(CoreError::Parse {
            line: line_num,
            message: "Expected 'block <id>: \"text\"' format".to_string(),
        });
    };
    let id = parse_id(id_str.trim(), line_num)?;
    let (text, trailing) = parse_quoted(value.trim(), line_num)?;
    if !trailing.trim().is_empty() {
        return Err(CoreError::Parse {
            line: line_num,
            message: format!("unexpected trailing content: {}", trailing.trim()),
        });
    }
    Ok((id, text))
}

fn parse_range_line(rest: &str, line_num: usize, fallback_id: u64) -> Result<NamedRange> {
    // "<id> \"name\": 1 2 3" - the id is optional for hand-written files.
    let (id, rest) = match rest.split_once(' ') {
        Some((id_str, tail)) if !id_str.starts_with('"') => {
            (parse_id(id_str.trim(), line_num)?, tail)
        }
        _ => (fallback_id, rest),
    };
    let (name, tail) = parse_quoted(rest.trim(), line_num)?;
    let Some(ids) = tail.trim().strip_prefix(':') else {
        return Err(CoreError::Parse {
            line: line_num,
            message: "Expected ':' after range name".to_string(),
        });
    };
    let mut blocks = Vec::new();
    for token in ids.split_whitespace() {
        blocks.push(BlockId(parse_id(token, line_num)?));
    }
    Ok(NamedRange {
        id: RangeId(id),
        name,
        blocks,
    })
}

fn parse_id(token: &str, line_num: usize) -> Result<u64> {
    token.parse::<u64>().map_err(|_| CoreError::Parse {
        line: line_num,
        message: format!("Invalid id: {}", token),
    })
}

/// Parse a leading double-quoted string, returning the unescaped text and the
/// remainder of the line.
fn parse_quoted(input: &str, line_num: usize) -> Result<(String, &str)> {
    let Some(rest) = input.strip_prefix('"') else {
        return Err(CoreError::Parse {
            line: line_num,
            message: format!("Expected quoted string, found: {}", input),
        });
    };
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.char_indices();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '"' => return Ok((out, &rest[index + 1..])),
            _ => out.push(ch),
        }
    }
    Err(CoreError::Parse {
        line: line_num,
        message: "Unterminated quoted string".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks_and_ranges() {
        let content = r#"
# Trackline document
block 0: "first paragraph"
block 1: "second paragraph"
range 0 "scan": 0 1
"#;
        let doc = parse_document_content(content).unwrap();
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[0].text(), "first paragraph");
        let range = &doc.named_ranges()[0];
        assert_eq!(range.name(), "scan");
        assert_eq!(doc.range_text(range.id()).unwrap(), "first paragraph second paragraph");
    }

    #[test]
    fn test_parse_escaped_text() {
        let content = r#"block 0: "He said \"hi\"\nand left""#;
        let doc = parse_document_content(content).unwrap();
        assert_eq!(doc.blocks()[0].text(), "He said \"hi\"\nand left");
    }

    #[test]
    fn test_parse_rejects_duplicate_block_id() {
        let content = "block 0: \"a\"\nblock 0: \"b\"";
        let err = parse_document_content(content).unwrap_err();
        assert!(matches!(err, CoreError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_block_reference() {
        let content = "block 0: \"a\"\nrange 0 \"r\": 0 7";
        let err = parse_document_content(content).unwrap_err();
        assert!(matches!(err, CoreError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_garbage_line() {
        let err = parse_document_content("paragraph without prefix").unwrap_err();
        assert!(matches!(err, CoreError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "\n# comment\n\nblock 0: \"a\"\n";
        let doc = parse_document_content(content).unwrap();
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn test_empty_file_still_yields_one_block() {
        let doc = parse_document_content("").unwrap();
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn test_id_counters_resume_past_parsed_ids() {
        let content = "block 7: \"a\"\nblock 2: \"b\"";
        let mut doc = parse_document_content(content).unwrap();
        let fresh = doc.append_block("c");
        assert!(doc.blocks().iter().filter(|block| block.id() == fresh).count() == 1);
        assert_eq!(fresh.to_string(), "8");
    }
}
