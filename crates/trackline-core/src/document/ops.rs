use regex::Regex;

use super::state::{Block, BlockId, Document, NamedRange, RangeId};
use crate::error::{CoreError, Result};

impl Document {
    /// Append a block to the document end.
    pub fn append_block(&mut self, text: impl Into<String>) -> BlockId {
        let id = BlockId(self.next_block);
        self.next_block += 1;
        self.blocks.push(Block {
            id,
            text: text.into(),
        });
        self.modified = true;
        id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_text(&self, id: BlockId) -> Option<&str> {
        self.block_index(id).map(|index| self.blocks[index].text.as_str())
    }

    pub fn set_block_text(&mut self, id: BlockId, text: impl Into<String>) -> Result<()> {
        let index = self.block_index(id).ok_or(CoreError::UnknownBlock(id.0))?;
        self.blocks[index].text = text.into();
        self.modified = true;
        Ok(())
    }

    /// Whether this block is the final block of the document.
    pub fn is_at_document_end(&self, id: BlockId) -> bool {
        self.blocks.last().is_some_and(|block| block.id == id)
    }

    /// Remove a block. The block at the document end cannot be removed; see
    /// [`Document::remove_range_and_content`] for the placeholder workaround
    /// used when a range ends the document.
    pub fn remove_block(&mut self, id: BlockId) -> Result<()> {
        let index = self.block_index(id).ok_or(CoreError::UnknownBlock(id.0))?;
        if index == self.blocks.len() - 1 {
            return Err(CoreError::BlockAtDocumentEnd);
        }
        self.blocks.remove(index);
        self.modified = true;
        Ok(())
    }

    /// Merge a block's text into its predecessor and drop the block.
    pub fn merge_into_previous(&mut self, id: BlockId) -> Result<()> {
        let index = self.block_index(id).ok_or(CoreError::UnknownBlock(id.0))?;
        if index == 0 {
            return Err(CoreError::NoPrecedingBlock);
        }
        let block = self.blocks.remove(index);
        self.blocks[index - 1].text.push_str(&block.text);
        self.modified = true;
        Ok(())
    }

    /// Mark a named range over existing blocks, in the order given.
    pub fn add_named_range(
        &mut self,
        name: impl Into<String>,
        blocks: Vec<BlockId>,
    ) -> Result<RangeId> {
        for &block in &blocks {
            if self.block_index(block).is_none() {
                return Err(CoreError::UnknownBlock(block.0));
            }
        }
        let id = RangeId(self.next_range);
        self.next_range += 1;
        self.ranges.push(NamedRange {
            id,
            name: name.into(),
            blocks,
        });
        self.modified = true;
        Ok(id)
    }

    /// Named ranges in creation order.
    pub fn named_ranges(&self) -> &[NamedRange] {
        &self.ranges
    }

    pub fn range(&self, id: RangeId) -> Option<&NamedRange> {
        self.ranges.iter().find(|range| range.id == id)
    }

    /// Drop a range marker, leaving its content in place. Returns the removed
    /// range, or `None` if the id is unknown.
    pub fn remove_named_range(&mut self, id: RangeId) -> Option<NamedRange> {
        let index = self.ranges.iter().position(|range| range.id == id)?;
        self.modified = true;
        Some(self.ranges.remove(index))
    }

    /// Remove a range's content blocks and then its marker.
    ///
    /// The store forbids removing the block at the document end, so when a
    /// range block sits there the removal appends an empty placeholder block
    /// first, removes the target, then merges the placeholder into its
    /// predecessor. The document is never left empty mid-operation.
    pub fn remove_range_and_content(&mut self, id: RangeId) -> Result<()> {
        let range = self.range(id).ok_or(CoreError::UnknownRange(id.0))?;
        let blocks = range.blocks.clone();
        for block in blocks {
            if self.block_index(block).is_none() {
                continue;
            }
            if self.is_at_document_end(block) {
                let placeholder = self.append_block("");
                self.remove_block(block)?;
                if self.block_index(placeholder) != Some(0) {
                    self.merge_into_previous(placeholder)?;
                }
            } else {
                self.remove_block(block)?;
            }
        }
        self.remove_named_range(id);
        Ok(())
    }

    /// The full text of a range: block texts joined with a single space.
    /// Blocks that no longer exist contribute nothing.
    pub fn range_text(&self, id: RangeId) -> Option<String> {
        let range = self.range(id)?;
        let texts: Vec<&str> = range
            .blocks
            .iter()
            .filter_map(|&block| self.block_text(block))
            .collect();
        Some(texts.join(" "))
    }

    /// Replace every match of `pattern` across all blocks. Returns the number
    /// of blocks that changed.
    pub fn replace_text(&mut self, pattern: &Regex, replacement: &str) -> usize {
        let mut changed = 0;
        for block in &mut self.blocks {
            let replaced = pattern.replace_all(&block.text, replacement);
            if replaced != block.text {
                block.text = replaced.into_owned();
                changed += 1;
            }
        }
        if changed > 0 {
            self.modified = true;
        }
        changed
    }

    /// Replace only the first match of `pattern` in the document. Returns
    /// whether a replacement happened.
    pub fn replace_first(&mut self, pattern: &Regex, replacement: &str) -> bool {
        for block in &mut self.blocks {
            let replaced = pattern.replace(&block.text, replacement);
            if replaced != block.text {
                block.text = replaced.into_owned();
                self.modified = true;
                return true;
            }
        }
        false
    }

    fn block_index(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_one_blank_block() {
        let doc = Document::new();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].text(), "");
    }

    #[test]
    fn test_append_and_read_blocks() {
        let mut doc = Document::new();
        let first = doc.append_block("para1");
        let second = doc.append_block("para2");
        assert_eq!(doc.block_text(first), Some("para1"));
        assert_eq!(doc.block_text(second), Some("para2"));
        assert!(doc.modified);
    }

    #[test]
    fn test_remove_block_at_end_is_rejected() {
        let mut doc = Document::new();
        let last = doc.append_block("tail");
        let err = doc.remove_block(last).unwrap_err();
        assert!(matches!(err, CoreError::BlockAtDocumentEnd));
        assert_eq!(doc.block_text(last), Some("tail"));
    }

    #[test]
    fn test_remove_interior_block() {
        let mut doc = Document::new();
        let middle = doc.append_block("middle");
        doc.append_block("tail");
        doc.remove_block(middle).unwrap();
        assert_eq!(doc.block_text(middle), None);
    }

    #[test]
    fn test_merge_into_previous_concatenates() {
        let mut doc = Document::new();
        let first = doc.append_block("abc");
        let second = doc.append_block("def");
        doc.merge_into_previous(second).unwrap();
        assert_eq!(doc.block_text(first), Some("abcdef"));
        assert_eq!(doc.block_text(second), None);
    }

    #[test]
    fn test_merge_first_block_is_rejected() {
        let mut doc = Document::new();
        let first = doc.blocks()[0].id();
        assert!(matches!(
            doc.merge_into_previous(first),
            Err(CoreError::NoPrecedingBlock)
        ));
    }

    #[test]
    fn test_named_range_over_unknown_block_is_rejected() {
        let mut doc = Document::new();
        let err = doc.add_named_range("missing", vec![BlockId(999)]).unwrap_err();
        assert!(matches!(err, CoreError::UnknownBlock(999)));
    }

    #[test]
    fn test_range_text_joins_blocks_with_spaces() {
        let mut doc = Document::new();
        let first = doc.append_block("John");
        let second = doc.append_block("Smith");
        let range = doc.add_named_range("scan", vec![first, second]).unwrap();
        assert_eq!(doc.range_text(range).unwrap(), "John Smith");
    }

    #[test]
    fn test_remove_range_and_content_at_document_end() {
        let mut doc = Document::new();
        let kept = doc.append_block("kept");
        let target = doc.append_block("tail content");
        let range = doc.add_named_range("tail", vec![target]).unwrap();

        doc.remove_range_and_content(range).unwrap();

        assert_eq!(doc.block_text(target), None);
        assert_eq!(doc.block_text(kept), Some("kept"));
        assert!(doc.range(range).is_none());
        // The placeholder was merged away again.
        assert!(!doc.blocks().is_empty());
        assert!(doc.blocks().iter().all(|block| block.id() != target));
    }

    #[test]
    fn test_remove_range_and_content_never_empties_document() {
        let mut doc = Document::from_parts(
            vec![Block {
                id: BlockId(0),
                text: "only".to_string(),
            }],
            vec![],
        );
        let only = doc.blocks()[0].id();
        let range = doc.add_named_range("only", vec![only]).unwrap();

        doc.remove_range_and_content(range).unwrap();

        assert!(!doc.blocks().is_empty());
        assert!(doc.blocks().iter().all(|block| block.id() != only));
    }

    #[test]
    fn test_remove_named_range_leaves_content() {
        let mut doc = Document::new();
        let block = doc.append_block("content");
        let range = doc.add_named_range("marker", vec![block]).unwrap();
        doc.remove_named_range(range);
        assert!(doc.range(range).is_none());
        assert_eq!(doc.block_text(block), Some("content"));
    }

    #[test]
    fn test_replace_text_all_blocks() {
        let mut doc = Document::new();
        doc.append_block("Borough: old");
        doc.append_block("Borough: stale");
        let pattern = Regex::new(r"Borough[^\t\n]*").unwrap();
        let changed = doc.replace_text(&pattern, "Borough: Queens");
        assert_eq!(changed, 2);
        assert!(doc.blocks().iter().any(|b| b.text() == "Borough: Queens"));
    }

    #[test]
    fn test_replace_first_stops_after_one() {
        let mut doc = Document::new();
        let first = doc.append_block("Phone: 1");
        let second = doc.append_block("Phone: 2");
        let pattern = Regex::new(r"Phone[^\t\n]*").unwrap();
        assert!(doc.replace_first(&pattern, "Phone: 555"));
        assert_eq!(doc.block_text(first), Some("Phone: 555"));
        assert_eq!(doc.block_text(second), Some("Phone: 2"));
    }
}
