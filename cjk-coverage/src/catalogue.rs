//! The catalogue of encoding tables and Unicode blocks.
//!
//! A [`Catalogue`] is built once, is never modified afterwards and is shared by
//! reference with everything that classifies or queries a font. The built-in
//! data is available through [`Catalogue::load`]; other catalogues (mostly for
//! testing) can be assembled with a [`CatalogueBuilder`].

mod blocks;
mod encodings;

use core::ops::RangeInclusive;

use hashbrown::{HashMap, HashSet};

use crate::charset::CodePoint;
use crate::locale::LocalizedName;

/// Id of the pseudo-block covering every assigned range of every other block.
pub const TOTAL_BLOCK_ID: &str = "total";

/// Display group of an encoding table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableGroup {
    /// Standards for simplified Chinese only.
    Simplified,
    /// Standards covering both simplified and traditional characters.
    Shared,
    /// Standards for traditional Chinese only.
    Traditional,
}

impl TableGroup {
    pub const ALL: [TableGroup; 3] = [
        TableGroup::Simplified,
        TableGroup::Shared,
        TableGroup::Traditional,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// A named, fixed set of code points.
///
/// This is what the diff/overlap queries and the report operate on, so that
/// encoding tables and Unicode blocks can be treated alike.
pub trait Repertoire {
    fn id(&self) -> &str;

    fn name(&self) -> &LocalizedName;

    /// Number of code points in the repertoire.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, code_point: CodePoint) -> bool;

    /// Members in ascending order.
    fn sorted_members(&self) -> Box<dyn Iterator<Item = CodePoint> + '_>;
}

/// A regional character encoding standard, reduced to the set of characters it
/// can represent.
#[derive(Clone, Debug)]
pub struct EncodingTable {
    id: String,
    group: TableGroup,
    name: LocalizedName,
    members: HashSet<CodePoint>,
    ordered: Box<[CodePoint]>,
}

impl EncodingTable {
    pub fn new(
        id: impl Into<String>,
        group: TableGroup,
        name: LocalizedName,
        members: impl IntoIterator<Item = CodePoint>,
    ) -> Self {
        let members: HashSet<CodePoint> = members.into_iter().collect();
        let mut ordered: Vec<_> = members.iter().copied().collect();
        ordered.sort_unstable();
        Self {
            id: id.into(),
            group,
            name,
            members,
            ordered: ordered.into_boxed_slice(),
        }
    }

    pub fn from_ranges(
        id: impl Into<String>,
        group: TableGroup,
        name: LocalizedName,
        ranges: &[RangeInclusive<CodePoint>],
    ) -> Self {
        Self::new(id, group, name, ranges.iter().cloned().flatten())
    }

    pub fn group(&self) -> TableGroup {
        self.group
    }

    pub fn members(&self) -> &HashSet<CodePoint> {
        &self.members
    }
}

impl Repertoire for EncodingTable {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &LocalizedName {
        &self.name
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    fn contains(&self, code_point: CodePoint) -> bool {
        self.members.contains(&code_point)
    }

    fn sorted_members(&self) -> Box<dyn Iterator<Item = CodePoint> + '_> {
        Box::new(self.ordered.iter().copied())
    }
}

/// A Unicode block, reduced to the ranges of code points that are assigned.
#[derive(Clone, Debug)]
pub struct UnicodeBlock {
    id: String,
    name: LocalizedName,
    assigned_ranges: Vec<RangeInclusive<CodePoint>>,
    size: usize,
}

impl UnicodeBlock {
    /// Ranges must be non-empty, ascending and disjoint; this is checked when
    /// the block is added to a catalogue.
    pub fn new(
        id: impl Into<String>,
        name: LocalizedName,
        assigned_ranges: impl IntoIterator<Item = RangeInclusive<CodePoint>>,
    ) -> Self {
        let assigned_ranges: Vec<_> = assigned_ranges.into_iter().collect();
        let size = assigned_ranges
            .iter()
            .map(range_len)
            .sum();
        Self {
            id: id.into(),
            name,
            assigned_ranges,
            size,
        }
    }

    pub fn assigned_ranges(&self) -> &[RangeInclusive<CodePoint>] {
        &self.assigned_ranges
    }

    /// Returns true for the aggregate pseudo-block.
    pub fn is_total(&self) -> bool {
        self.id == TOTAL_BLOCK_ID
    }
}

impl Repertoire for UnicodeBlock {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &LocalizedName {
        &self.name
    }

    fn len(&self) -> usize {
        self.size
    }

    fn contains(&self, code_point: CodePoint) -> bool {
        let idx = self
            .assigned_ranges
            .partition_point(|range| *range.end() < code_point);
        self.assigned_ranges
            .get(idx)
            .is_some_and(|range| range.contains(&code_point))
    }

    fn sorted_members(&self) -> Box<dyn Iterator<Item = CodePoint> + '_> {
        Box::new(self.assigned_ranges.iter().cloned().flatten())
    }
}

fn range_len(range: &RangeInclusive<CodePoint>) -> usize {
    if range.is_empty() {
        0
    } else {
        (*range.end() - *range.start()) as usize + 1
    }
}

/// Either kind of catalogue entry, as returned by [`Catalogue::find`].
#[derive(Clone, Copy, Debug)]
pub enum Entry<'a> {
    Table(&'a EncodingTable),
    Block(&'a UnicodeBlock),
}

impl Repertoire for Entry<'_> {
    fn id(&self) -> &str {
        match self {
            Entry::Table(table) => table.id(),
            Entry::Block(block) => block.id(),
        }
    }

    fn name(&self) -> &LocalizedName {
        match self {
            Entry::Table(table) => table.name(),
            Entry::Block(block) => block.name(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Entry::Table(table) => table.len(),
            Entry::Block(block) => block.len(),
        }
    }

    fn contains(&self, code_point: CodePoint) -> bool {
        match self {
            Entry::Table(table) => table.contains(code_point),
            Entry::Block(block) => block.contains(code_point),
        }
    }

    fn sorted_members(&self) -> Box<dyn Iterator<Item = CodePoint> + '_> {
        match self {
            Entry::Table(table) => table.sorted_members(),
            Entry::Block(block) => block.sorted_members(),
        }
    }
}

/// Sorted, disjoint ranges of every block, for locating a code point's block
/// with a binary search.
#[derive(Clone, Debug, Default)]
pub(crate) struct RangeIndex {
    // (start, end, index into `Catalogue::blocks`)
    entries: Vec<(CodePoint, CodePoint, usize)>,
}

impl RangeIndex {
    /// Index of the block whose assigned ranges contain `code_point`.
    pub(crate) fn lookup(&self, code_point: CodePoint) -> Option<usize> {
        let idx = self
            .entries
            .partition_point(|(_, end, _)| *end < code_point);
        match self.entries.get(idx) {
            Some((start, _, block)) if *start <= code_point => Some(*block),
            _ => None,
        }
    }
}

/// A fault in catalogue data, found while building it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    #[error("duplicate table id '{0}'")]
    DuplicateTable(String),
    #[error("duplicate block id '{0}'")]
    DuplicateBlock(String),
    #[error("block id 'total' is reserved")]
    ReservedBlockId,
    #[error("block '{id}' has an empty or out of order range U+{start:04X}..=U+{end:04X}")]
    InvalidRange {
        id: String,
        start: CodePoint,
        end: CodePoint,
    },
    #[error("blocks '{first}' and '{second}' overlap at U+{at:04X}")]
    OverlappingBlocks {
        first: String,
        second: String,
        at: CodePoint,
    },
    #[error("display order for {group:?} does not list table '{id}'")]
    UnorderedTable { group: TableGroup, id: String },
    #[error("display order for {group:?} names '{id}', which is not a table of that group or is listed twice")]
    InvalidGroupOrder { group: TableGroup, id: String },
}

/// Assembles and checks a [`Catalogue`].
#[derive(Debug, Default)]
pub struct CatalogueBuilder {
    tables: Vec<EncodingTable>,
    group_orders: Vec<(TableGroup, Vec<String>)>,
    blocks: Vec<UnicodeBlock>,
    total_name: Option<LocalizedName>,
}

impl CatalogueBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_table(&mut self, table: EncodingTable) -> &mut Self {
        self.tables.push(table);
        self
    }

    /// Set the display order of a group. Every table of the group must be
    /// listed exactly once.
    pub fn order_group(&mut self, group: TableGroup, ids: &[&str]) -> &mut Self {
        self.group_orders.retain(|(existing, _)| *existing != group);
        self.group_orders
            .push((group, ids.iter().map(|id| id.to_string()).collect()));
        self
    }

    /// Blocks are displayed in the order they are added.
    pub fn add_block(&mut self, block: UnicodeBlock) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Display name of the aggregate block.
    pub fn total_name(&mut self, name: LocalizedName) -> &mut Self {
        self.total_name = Some(name);
        self
    }

    pub fn build(&mut self) -> Result<Catalogue, CatalogueError> {
        let tables = std::mem::take(&mut self.tables);
        let mut table_index = HashMap::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            if table_index.insert(table.id.clone(), i).is_some() {
                return Err(CatalogueError::DuplicateTable(table.id.clone()));
            }
        }

        let mut group_orders: [Vec<usize>; 3] = Default::default();
        for (group, ids) in std::mem::take(&mut self.group_orders) {
            let order = &mut group_orders[group.index()];
            for id in ids {
                match table_index.get(&id) {
                    Some(&idx) if tables[idx].group == group && !order.contains(&idx) => {
                        order.push(idx)
                    }
                    _ => return Err(CatalogueError::InvalidGroupOrder { group, id }),
                }
            }
        }
        for (i, table) in tables.iter().enumerate() {
            if !group_orders[table.group.index()].contains(&i) {
                return Err(CatalogueError::UnorderedTable {
                    group: table.group,
                    id: table.id.clone(),
                });
            }
        }

        let mut blocks = std::mem::take(&mut self.blocks);
        let mut block_index = HashMap::with_capacity(blocks.len() + 1);
        let mut entries = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            if block.is_total() {
                return Err(CatalogueError::ReservedBlockId);
            }
            if block_index.insert(block.id.clone(), i).is_some() {
                return Err(CatalogueError::DuplicateBlock(block.id.clone()));
            }
            let mut previous_end = None;
            for range in &block.assigned_ranges {
                let (start, end) = (*range.start(), *range.end());
                if start > end || previous_end.is_some_and(|prev| prev >= start) {
                    return Err(CatalogueError::InvalidRange {
                        id: block.id.clone(),
                        start,
                        end,
                    });
                }
                previous_end = Some(end);
                entries.push((start, end, i));
            }
        }
        entries.sort_unstable();
        for pair in entries.windows(2) {
            let ((_, end, first), (start, _, second)) = (pair[0], pair[1]);
            if end >= start {
                return Err(CatalogueError::OverlappingBlocks {
                    first: blocks[first].id.clone(),
                    second: blocks[second].id.clone(),
                    at: start,
                });
            }
        }

        let total = UnicodeBlock::new(
            TOTAL_BLOCK_ID,
            self.total_name
                .unwrap_or(LocalizedName::new("Total", "总计", "總計")),
            merge_adjacent(entries.iter().map(|(start, end, _)| *start..=*end)),
        );
        block_index.insert(TOTAL_BLOCK_ID.to_string(), blocks.len());
        blocks.push(total);

        Ok(Catalogue {
            tables,
            table_index,
            group_orders,
            blocks,
            block_index,
            ranges: RangeIndex { entries },
        })
    }
}

fn merge_adjacent(
    sorted: impl Iterator<Item = RangeInclusive<CodePoint>>,
) -> Vec<RangeInclusive<CodePoint>> {
    let mut merged: Vec<RangeInclusive<CodePoint>> = Vec::new();
    for range in sorted {
        match merged.last_mut() {
            Some(last) if *last.end() + 1 == *range.start() => {
                *last = *last.start()..=*range.end();
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Every encoding table and Unicode block known to the application.
#[derive(Clone, Debug)]
pub struct Catalogue {
    tables: Vec<EncodingTable>,
    table_index: HashMap<String, usize>,
    group_orders: [Vec<usize>; 3],
    /// Always ends with the total pseudo-block.
    blocks: Vec<UnicodeBlock>,
    block_index: HashMap<String, usize>,
    ranges: RangeIndex,
}

impl Catalogue {
    /// The built-in catalogue.
    pub fn load() -> Catalogue {
        let mut builder = CatalogueBuilder::new();
        encodings::register(&mut builder);
        blocks::register(&mut builder);
        builder
            .build()
            .expect("built-in catalogue data is consistent")
    }

    /// Tables of one group, in display order.
    pub fn tables_in_group(&self, group: TableGroup) -> impl Iterator<Item = &EncodingTable> + '_ {
        self.group_orders[group.index()]
            .iter()
            .map(|idx| &self.tables[*idx])
    }

    /// Every table, in the order the tables were added.
    pub fn all_tables(&self) -> impl Iterator<Item = &EncodingTable> + '_ {
        self.tables.iter()
    }

    pub fn table(&self, id: &str) -> Option<&EncodingTable> {
        self.table_index.get(id).map(|idx| &self.tables[*idx])
    }

    /// Every block in display order; the total pseudo-block is last.
    pub fn blocks_ordered(&self) -> &[UnicodeBlock] {
        &self.blocks
    }

    pub fn block(&self, id: &str) -> Option<&UnicodeBlock> {
        self.block_index.get(id).map(|idx| &self.blocks[*idx])
    }

    pub fn total_block(&self) -> &UnicodeBlock {
        // `build` always appends the total block
        &self.blocks[self.blocks.len() - 1]
    }

    /// Look up a table, or failing that a block, by id.
    pub fn find(&self, id: &str) -> Option<Entry<'_>> {
        self.table(id)
            .map(Entry::Table)
            .or_else(|| self.block(id).map(Entry::Block))
    }

    pub(crate) fn range_index(&self) -> &RangeIndex {
        &self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &'static str) -> LocalizedName {
        LocalizedName::uniform(s)
    }

    fn small_builder() -> CatalogueBuilder {
        let mut builder = CatalogueBuilder::new();
        builder
            .add_table(EncodingTable::new(
                "t",
                TableGroup::Simplified,
                name("T"),
                [0x4E00, 0x4E01, 0x4E02],
            ))
            .add_table(EncodingTable::from_ranges(
                "u",
                TableGroup::Simplified,
                name("U"),
                &[0x4E00..=0x4E0F],
            ))
            .order_group(TableGroup::Simplified, &["u", "t"])
            .add_block(UnicodeBlock::new("b", name("B"), [0x3400..=0x3401]))
            .add_block(UnicodeBlock::new(
                "c",
                name("C"),
                [0x3402..=0x3405, 0x3410..=0x3410],
            ));
        builder
    }

    #[test]
    fn group_order_is_explicit() {
        let catalogue = small_builder().build().unwrap();
        let ids: Vec<_> = catalogue
            .tables_in_group(TableGroup::Simplified)
            .map(|t| t.id())
            .collect();
        assert_eq!(ids, ["u", "t"]);
        assert_eq!(catalogue.tables_in_group(TableGroup::Shared).count(), 0);
        assert_eq!(catalogue.table("u").unwrap().len(), 16);
    }

    #[test]
    fn total_block_is_last_and_sums_sizes() {
        let catalogue = small_builder().build().unwrap();
        let blocks = catalogue.blocks_ordered();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[2].is_total());
        assert_eq!(catalogue.total_block().len(), 2 + 4 + 1);
        // adjacent ranges of different blocks are merged in the total
        assert_eq!(
            catalogue.total_block().assigned_ranges(),
            &[0x3400..=0x3405, 0x3410..=0x3410]
        );
        assert_eq!(catalogue.block(TOTAL_BLOCK_ID).unwrap().len(), 7);
    }

    #[test]
    fn duplicate_table_id() {
        let mut builder = small_builder();
        builder.add_table(EncodingTable::new("t", TableGroup::Shared, name("T2"), [1]));
        assert_eq!(
            builder.build().unwrap_err(),
            CatalogueError::DuplicateTable("t".into())
        );
    }

    #[test]
    fn table_missing_from_order() {
        let mut builder = small_builder();
        builder.add_table(EncodingTable::new("v", TableGroup::Simplified, name("V"), [1]));
        assert!(matches!(
            builder.build(),
            Err(CatalogueError::UnorderedTable { id, .. }) if id == "v"
        ));
    }

    #[test]
    fn order_names_table_of_other_group() {
        let mut builder = small_builder();
        builder.order_group(TableGroup::Traditional, &["t"]);
        assert!(matches!(
            builder.build(),
            Err(CatalogueError::InvalidGroupOrder { group: TableGroup::Traditional, .. })
        ));
    }

    #[test]
    fn overlapping_blocks() {
        let mut builder = small_builder();
        builder.add_block(UnicodeBlock::new("d", name("D"), [0x3405..=0x3406]));
        assert!(matches!(
            builder.build(),
            Err(CatalogueError::OverlappingBlocks { at: 0x3405, .. })
        ));
    }

    #[test]
    fn unsorted_block_ranges() {
        let mut builder = small_builder();
        builder.add_block(UnicodeBlock::new("d", name("D"), [0x5000..=0x5001, 0x4000..=0x4001]));
        assert!(matches!(
            builder.build(),
            Err(CatalogueError::InvalidRange { start: 0x4000, .. })
        ));
    }

    #[test]
    fn reserved_block_id() {
        let mut builder = small_builder();
        builder.add_block(UnicodeBlock::new(TOTAL_BLOCK_ID, name("X"), [0x10..=0x11]));
        assert_eq!(builder.build().unwrap_err(), CatalogueError::ReservedBlockId);
    }

    #[test]
    fn block_membership_uses_assigned_ranges() {
        let block = UnicodeBlock::new("b", name("B"), [0x3400..=0x3401, 0x3410..=0x3412]);
        assert!(block.contains(0x3400));
        assert!(block.contains(0x3411));
        assert!(!block.contains(0x3402));
        assert!(!block.contains(0x34FF));
        assert_eq!(block.len(), 5);
        assert_eq!(
            block.sorted_members().collect::<Vec<_>>(),
            vec![0x3400, 0x3401, 0x3410, 0x3411, 0x3412]
        );
    }

    #[test]
    fn range_index_lookup() {
        let catalogue = small_builder().build().unwrap();
        let index = catalogue.range_index();
        assert_eq!(index.lookup(0x3400), Some(0));
        assert_eq!(index.lookup(0x3405), Some(1));
        assert_eq!(index.lookup(0x3406), None);
        assert_eq!(index.lookup(0x3410), Some(1));
        assert_eq!(index.lookup(0), None);
        assert_eq!(index.lookup(0x10FFFF), None);
    }

    #[test]
    fn find_prefers_tables() {
        let catalogue = small_builder().build().unwrap();
        assert!(matches!(catalogue.find("t"), Some(Entry::Table(_))));
        assert!(matches!(catalogue.find("c"), Some(Entry::Block(_))));
        assert!(catalogue.find("nope").is_none());
    }
}
