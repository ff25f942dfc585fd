//! Per-table and per-block coverage counts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalogue::{Catalogue, Repertoire, TOTAL_BLOCK_ID};
use crate::charset::{intersection_len, FontCharacterSet};

/// How many characters of every table and block a font supports.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub table_counts: BTreeMap<String, usize>,
    pub block_counts: BTreeMap<String, usize>,
}

impl ClassificationResult {
    pub fn table_count(&self, id: &str) -> Option<usize> {
        self.table_counts.get(id).copied()
    }

    pub fn block_count(&self, id: &str) -> Option<usize> {
        self.block_counts.get(id).copied()
    }

    /// Number of supported characters in any assigned range of any block.
    pub fn total(&self) -> usize {
        self.block_counts.get(TOTAL_BLOCK_ID).copied().unwrap_or_default()
    }

    /// The count for a table or, failing that, a block.
    pub fn count(&self, id: &str) -> Option<usize> {
        self.table_count(id).or_else(|| self.block_count(id))
    }
}

/// Classify a font's code points against every table and block of the
/// catalogue.
///
/// Counts are independent per table: a character present in several tables
/// counts towards each of them.
pub fn classify(catalogue: &Catalogue, font: &FontCharacterSet) -> ClassificationResult {
    let table_counts = catalogue
        .all_tables()
        .map(|table| {
            (
                table.id().to_string(),
                intersection_len(table.members(), font.code_points()),
            )
        })
        .collect();

    let blocks = catalogue.blocks_ordered();
    let mut per_block = vec![0usize; blocks.len()];
    let index = catalogue.range_index();
    let mut total = 0;
    for cp in font.code_points() {
        if let Some(block) = index.lookup(*cp) {
            per_block[block] += 1;
            total += 1;
        }
    }
    let block_counts = blocks
        .iter()
        .zip(per_block)
        .map(|(block, count)| {
            let count = if block.is_total() { total } else { count };
            (block.id().to_string(), count)
        })
        .collect();

    log::debug!(
        "classified {} code points: {} of them in known blocks",
        font.len(),
        total
    );
    ClassificationResult {
        table_counts,
        block_counts,
    }
}
