//! Built-in encoding tables.
//!
//! Rather than carrying tens of thousands of code points as literal data, each
//! repertoire is recovered from the legacy codec it describes: every byte pair
//! in the relevant part of the double-byte plane is decoded with `encoding_rs`
//! and kept if it yields exactly one CJK ideograph.

use core::ops::RangeInclusive;

use encoding_rs::{Encoding, BIG5, EUC_JP, EUC_KR, GBK};

use super::{CatalogueBuilder, EncodingTable, TableGroup};
use crate::charset::CodePoint;
use crate::locale::LocalizedName;

const EUC_TRAILS: &[RangeInclusive<u8>] = &[0xA1..=0xFE];
const GBK_TRAILS: &[RangeInclusive<u8>] = &[0x40..=0x7E, 0x80..=0xFE];
const BIG5_TRAILS: &[RangeInclusive<u8>] = &[0x40..=0x7E, 0xA1..=0xFE];

/// Unified and compatibility ideographs, in every plane they occur.
const IDEOGRAPHS: &[RangeInclusive<CodePoint>] = &[
    0x3400..=0x4DBF,
    0x4E00..=0x9FFF,
    0xF900..=0xFAFF,
    0x20000..=0x2FFFF,
    0x30000..=0x3FFFF,
];

/// The ideographs of GB 18030-2005 that lie outside GBK: Extension A as of
/// Unicode 3.0.
const GB18030_EXTENSION_A: RangeInclusive<CodePoint> = 0x3400..=0x4DB5;

/// A rectangle of the double-byte plane of a legacy encoding.
struct Region {
    encoding: &'static Encoding,
    /// First and last byte pair, inclusive.
    first: u16,
    last: u16,
    trails: &'static [RangeInclusive<u8>],
}

impl Region {
    fn new(
        encoding: &'static Encoding,
        first: u16,
        last: u16,
        trails: &'static [RangeInclusive<u8>],
    ) -> Self {
        Self {
            encoding,
            first,
            last,
            trails,
        }
    }

    fn ideographs(&self) -> impl Iterator<Item = CodePoint> + '_ {
        let [first_lead, _] = self.first.to_be_bytes();
        let [last_lead, _] = self.last.to_be_bytes();
        (first_lead..=last_lead)
            .flat_map(move |lead| {
                self.trails
                    .iter()
                    .cloned()
                    .flatten()
                    .map(move |trail| [lead, trail])
            })
            .filter(move |pair| (self.first..=self.last).contains(&u16::from_be_bytes(*pair)))
            .filter_map(move |pair| decode_single(self.encoding, &pair))
            .filter(|cp| is_ideograph(*cp))
    }
}

fn decode_single(encoding: &'static Encoding, bytes: &[u8]) -> Option<CodePoint> {
    let decoded = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c as CodePoint),
        _ => None,
    }
}

fn is_ideograph(cp: CodePoint) -> bool {
    IDEOGRAPHS.iter().any(|range| range.contains(&cp))
}

fn union(regions: &[Region]) -> Vec<CodePoint> {
    regions.iter().flat_map(Region::ideographs).collect()
}

pub(super) fn register(builder: &mut CatalogueBuilder) {
    use TableGroup::*;

    let gb2312_level1 = union(&[Region::new(GBK, 0xB0A1, 0xD7FE, EUC_TRAILS)]);
    let gb2312_level2 = union(&[Region::new(GBK, 0xD8A1, 0xF7FE, EUC_TRAILS)]);
    let gbk = union(&[Region::new(GBK, 0x8140, 0xFEFE, GBK_TRAILS)]);
    let big5_common = union(&[Region::new(BIG5, 0xA440, 0xC67E, BIG5_TRAILS)]);
    let big5_less_common = union(&[Region::new(BIG5, 0xC940, 0xF9D5, BIG5_TRAILS)]);
    let hkscs = union(&[
        Region::new(BIG5, 0x8740, 0xA0FE, BIG5_TRAILS),
        Region::new(BIG5, 0xC6A1, 0xC8FE, BIG5_TRAILS),
        Region::new(BIG5, 0xF9D6, 0xFEFE, BIG5_TRAILS),
    ]);
    let jis_x_0208 = union(&[Region::new(EUC_JP, 0xB0A1, 0xF4FE, EUC_TRAILS)]);
    let ks_x_1001 = union(&[Region::new(EUC_KR, 0xCAA1, 0xFDFE, EUC_TRAILS)]);

    builder
        .add_table(EncodingTable::new(
            "gb2312",
            Simplified,
            LocalizedName::new("GB/T 2312 (all hanzi)", "GB/T 2312 汉字", "GB/T 2312 漢字"),
            gb2312_level1.iter().chain(&gb2312_level2).copied(),
        ))
        .add_table(EncodingTable::new(
            "gb2312-level1",
            Simplified,
            LocalizedName::new("GB/T 2312 level 1", "GB/T 2312 一级汉字", "GB/T 2312 一級漢字"),
            gb2312_level1,
        ))
        .add_table(EncodingTable::new(
            "gb2312-level2",
            Simplified,
            LocalizedName::new("GB/T 2312 level 2", "GB/T 2312 二级汉字", "GB/T 2312 二級漢字"),
            gb2312_level2,
        ))
        .add_table(EncodingTable::new(
            "gb18030",
            Shared,
            LocalizedName::new("GB 18030-2005", "GB 18030-2005 汉字", "GB 18030-2005 漢字"),
            gbk.iter().copied().chain(GB18030_EXTENSION_A),
        ))
        .add_table(EncodingTable::new(
            "gbk",
            Shared,
            LocalizedName::new("GBK", "GBK 汉字", "GBK 漢字"),
            gbk,
        ))
        .add_table(EncodingTable::new(
            "jis-x-0208",
            Shared,
            LocalizedName::new("JIS X 0208 kanji", "JIS X 0208 日本汉字", "JIS X 0208 日本漢字"),
            jis_x_0208,
        ))
        .add_table(EncodingTable::new(
            "ks-x-1001",
            Shared,
            LocalizedName::new("KS X 1001 hanja", "KS X 1001 韩国汉字", "KS X 1001 韓國漢字"),
            ks_x_1001,
        ))
        .add_table(EncodingTable::new(
            "big5",
            Traditional,
            LocalizedName::new("Big5 (all hanzi)", "大五码 汉字", "大五碼 漢字"),
            big5_common.iter().chain(&big5_less_common).copied(),
        ))
        .add_table(EncodingTable::new(
            "big5-common",
            Traditional,
            LocalizedName::new("Big5 common", "大五码 常用字", "大五碼 常用字"),
            big5_common,
        ))
        .add_table(EncodingTable::new(
            "big5-less-common",
            Traditional,
            LocalizedName::new("Big5 less common", "大五码 次常用字", "大五碼 次常用字"),
            big5_less_common,
        ))
        .add_table(EncodingTable::new(
            "hkscs",
            Traditional,
            LocalizedName::new("HKSCS supplement", "香港增补字符集", "香港增補字符集"),
            hkscs,
        ))
        .order_group(Simplified, &["gb2312-level1", "gb2312-level2", "gb2312"])
        .order_group(Shared, &["gbk", "gb18030", "jis-x-0208", "ks-x-1001"])
        .order_group(
            Traditional,
            &["big5-common", "big5-less-common", "big5", "hkscs"],
        );
}
