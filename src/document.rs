use serde::{Deserialize, Serialize};

use crate::block::Block;

/// A block with its render key.
///
/// The key is the block's position in the document. Consecutive renders of a
/// growing message produce the same key for the same settled block because
/// earlier blocks never move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedBlock {
    pub key: usize,
    #[serde(flatten)]
    pub block: Block,
}

/// An ordered, immutable sequence of blocks built by one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    blocks: Vec<KeyedBlock>,
}

impl Document {
    pub fn blocks(&self) -> &[KeyedBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|keyed| &keyed.block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks.into_iter().map(|keyed| keyed.block).collect()
    }
}

/// Assign each block its 0-based position as key.
pub fn assemble(blocks: Vec<Block>) -> Document {
    let blocks = blocks
        .into_iter()
        .enumerate()
        .map(|(key, block)| KeyedBlock { key, block })
        .collect();
    Document { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Span;

    #[test]
    fn keys_follow_block_order() {
        let doc = assemble(vec![
            Block::Blank,
            Block::Header {
                level: 1,
                text: "t".to_string(),
            },
        ]);
        let keys: Vec<usize> = doc.blocks().iter().map(|b| b.key).collect();
        assert_eq!(keys, vec![0, 1]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.iter().next(), Some(&Block::Blank));
    }

    #[test]
    fn empty_document() {
        let doc = assemble(Vec::new());
        assert!(doc.is_empty());
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn serializes_flat_keyed_blocks() {
        let doc = assemble(vec![Block::BulletItem {
            spans: vec![Span::Plain("x".to_string())],
        }]);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"blocks":[{"key":0,"kind":"bullet_item","spans":[{"kind":"plain","text":"x"}]}]}"#
        );
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
