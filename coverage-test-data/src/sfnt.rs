//! Minimal sfnt fonts and collections for scenarios not readily produced with ttx
//!
//! The fonts only carry `cmap` and `name` tables, which is all the character
//! introspection code looks at. Glyph ids are assigned sequentially starting at 1,
//! so no mapping ever points at `.notdef`.

use std::collections::BTreeMap;

use crate::bebuffer::{BeBuffer, Uint24};

const TRUETYPE_SFNT_VERSION: u32 = 0x0001_0000;
const TTC_TAG: u32 = u32::from_be_bytes(*b"ttcf");

/// Description of a synthesized font.
#[derive(Debug, Clone, Default)]
pub struct FontSpec {
    pub full_name: String,
    pub code_points: Vec<u32>,
    /// (base, selector) pairs emitted as non-default UVS mappings.
    pub variations: Vec<(u32, u32)>,
    pub omit_cmap: bool,
}

impl FontSpec {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn with_code_points(mut self, code_points: impl IntoIterator<Item = u32>) -> Self {
        self.code_points.extend(code_points);
        self
    }

    pub fn with_variations(mut self, pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.variations.extend(pairs);
        self
    }

    pub fn without_cmap(mut self) -> Self {
        self.omit_cmap = true;
        self
    }

    /// Build a standalone font file.
    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    pub(crate) fn tables(&self) -> Vec<([u8; 4], Vec<u8>)> {
        // table records must be sorted by tag
        let mut tables = Vec::new();
        if !self.omit_cmap {
            tables.push((*b"cmap", cmap(&self.code_points, &self.variations)));
        }
        tables.push((*b"name", name(&self.full_name)));
        tables
    }

    /// Build the font with every table offset relative to `base`, which is
    /// where the table directory will live in the final file.
    fn build_at(&self, base: usize) -> Vec<u8> {
        let tables = self.tables();
        let num_tables = tables.len() as u16;
        let entry_selector = (u16::BITS - 1 - num_tables.leading_zeros()) as u16;
        let search_range = 16 * (1u16 << entry_selector);
        let range_shift = num_tables * 16 - search_range;

        let mut buf = BeBuffer::new()
            .push(TRUETYPE_SFNT_VERSION)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);

        let mut offset = base + 12 + 16 * tables.len();
        for (tag, data) in &tables {
            buf = buf
                .push(u32::from_be_bytes(*tag))
                .push(checksum(data))
                .push(offset as u32)
                .push(data.len() as u32);
            offset += padded_len(data.len());
        }
        for (_, data) in &tables {
            buf = buf.extend_bytes(data).align4();
        }
        buf.into_inner()
    }
}

/// Build a font collection (TTC, version 1.0) containing the given fonts in order.
pub fn build_collection(fonts: &[FontSpec]) -> Vec<u8> {
    let header_len = 12 + 4 * fonts.len();
    let mut offsets = Vec::with_capacity(fonts.len());
    let mut bodies = Vec::with_capacity(fonts.len());
    let mut offset = header_len;
    for font in fonts {
        let body = font.build_at(offset);
        offsets.push(offset as u32);
        offset += body.len();
        bodies.push(body);
    }
    let mut buf = BeBuffer::new()
        .push(TTC_TAG)
        .push(1_u16)
        .push(0_u16)
        .push(fonts.len() as u32)
        .extend(offsets);
    for body in &bodies {
        buf = buf.extend_bytes(body);
    }
    buf.into_inner()
}

/// A `cmap` table with a (3, 10) format 12 subtable and, if there are any
/// variation pairs, a (0, 5) format 14 subtable.
pub fn cmap(code_points: &[u32], variations: &[(u32, u32)]) -> Vec<u8> {
    let mut code_points = code_points.to_vec();
    code_points.sort_unstable();
    code_points.dedup();

    // (platform, encoding, subtable)
    let mut subtables = Vec::new();
    if !variations.is_empty() {
        subtables.push((0_u16, 5_u16, cmap14(variations)));
    }
    subtables.push((3, 10, cmap12(&code_points)));

    let mut buf = BeBuffer::new()
        .push(0_u16)
        .push(subtables.len() as u16);
    let mut offset = 4 + 8 * subtables.len();
    for (platform, encoding, data) in &subtables {
        buf = buf.push(*platform).push(*encoding).push(offset as u32);
        offset += data.len();
    }
    for (_, _, data) in &subtables {
        buf = buf.extend_bytes(data);
    }
    buf.into_inner()
}

fn cmap12(code_points: &[u32]) -> Vec<u8> {
    // (start, end, start glyph)
    let mut groups: Vec<(u32, u32, u32)> = Vec::new();
    for (i, &cp) in code_points.iter().enumerate() {
        let gid = i as u32 + 1;
        match groups.last_mut() {
            Some((_, end, _)) if *end + 1 == cp => *end = cp,
            _ => groups.push((cp, cp, gid)),
        }
    }
    let mut buf = BeBuffer::new()
        .push(12_u16)
        .push(0_u16)
        .push((16 + 12 * groups.len()) as u32)
        .push(0_u32)
        .push(groups.len() as u32);
    for (start, end, gid) in groups {
        buf = buf.push(start).push(end).push(gid);
    }
    buf.into_inner()
}

fn cmap14(variations: &[(u32, u32)]) -> Vec<u8> {
    let mut by_selector: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for &(base, selector) in variations {
        by_selector.entry(selector).or_default().push(base);
    }
    for bases in by_selector.values_mut() {
        bases.sort_unstable();
        bases.dedup();
    }

    let header_len = 10 + 11 * by_selector.len();
    let total_len = header_len
        + by_selector
            .values()
            .map(|bases| 4 + 5 * bases.len())
            .sum::<usize>();

    let mut buf = BeBuffer::new()
        .push(14_u16)
        .push(total_len as u32)
        .push(by_selector.len() as u32);
    let mut offset = header_len;
    for (selector, bases) in &by_selector {
        buf = buf
            .push(Uint24(*selector))
            // no default UVS table
            .push(0_u32)
            .push(offset as u32);
        offset += 4 + 5 * bases.len();
    }
    for bases in by_selector.values() {
        buf = buf.push(bases.len() as u32);
        for base in bases {
            buf = buf.push(Uint24(*base)).push(1_u16);
        }
    }
    buf.into_inner()
}

/// A version 0 `name` table with Windows English family and full names.
pub fn name(full_name: &str) -> Vec<u8> {
    const FAMILY_NAME: u16 = 1;
    const FULL_NAME: u16 = 4;
    let encoded: Vec<u16> = full_name.encode_utf16().collect();
    let byte_len = (encoded.len() * 2) as u16;
    let records = [FAMILY_NAME, FULL_NAME];

    let mut buf = BeBuffer::new()
        .push(0_u16)
        .push(records.len() as u16)
        .push((6 + 12 * records.len()) as u16);
    // both records share the same string storage
    for name_id in records {
        buf = buf
            .push(3_u16)
            .push(1_u16)
            .push(0x0409_u16)
            .push(name_id)
            .push(byte_len)
            .push(0_u16);
    }
    buf.extend(encoded).into_inner()
}

pub(crate) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

pub(crate) fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}
