//! Built-in Unicode blocks.
//!
//! Only assigned code points are listed, as of Unicode 15.1.

use core::ops::RangeInclusive;

use super::{CatalogueBuilder, UnicodeBlock};
use crate::charset::CodePoint;
use crate::locale::LocalizedName;

#[rustfmt::skip]
static BLOCKS: &[(&str, LocalizedName, &[RangeInclusive<CodePoint>])] = &[
    ("cjk-unified", LocalizedName::new("CJK Unified Ideographs", "中日韩统一表意文字", "中日韓統一表意文字"),
        &[0x4E00..=0x9FFF]),
    ("cjk-ext-a", LocalizedName::new("CJK Unified Ideographs Extension A", "中日韩统一表意文字扩展A区", "中日韓統一表意文字擴展A區"),
        &[0x3400..=0x4DBF]),
    ("cjk-ext-b", LocalizedName::new("CJK Unified Ideographs Extension B", "中日韩统一表意文字扩展B区", "中日韓統一表意文字擴展B區"),
        &[0x20000..=0x2A6DF]),
    ("cjk-ext-c", LocalizedName::new("CJK Unified Ideographs Extension C", "中日韩统一表意文字扩展C区", "中日韓統一表意文字擴展C區"),
        &[0x2A700..=0x2B739]),
    ("cjk-ext-d", LocalizedName::new("CJK Unified Ideographs Extension D", "中日韩统一表意文字扩展D区", "中日韓統一表意文字擴展D區"),
        &[0x2B740..=0x2B81D]),
    ("cjk-ext-e", LocalizedName::new("CJK Unified Ideographs Extension E", "中日韩统一表意文字扩展E区", "中日韓統一表意文字擴展E區"),
        &[0x2B820..=0x2CEA1]),
    ("cjk-ext-f", LocalizedName::new("CJK Unified Ideographs Extension F", "中日韩统一表意文字扩展F区", "中日韓統一表意文字擴展F區"),
        &[0x2CEB0..=0x2EBE0]),
    ("cjk-ext-g", LocalizedName::new("CJK Unified Ideographs Extension G", "中日韩统一表意文字扩展G区", "中日韓統一表意文字擴展G區"),
        &[0x30000..=0x3134A]),
    ("cjk-ext-h", LocalizedName::new("CJK Unified Ideographs Extension H", "中日韩统一表意文字扩展H区", "中日韓統一表意文字擴展H區"),
        &[0x31350..=0x323AF]),
    ("cjk-ext-i", LocalizedName::new("CJK Unified Ideographs Extension I", "中日韩统一表意文字扩展I区", "中日韓統一表意文字擴展I區"),
        &[0x2EBF0..=0x2EE5D]),
    ("cjk-compat", LocalizedName::new("CJK Compatibility Ideographs", "中日韩兼容表意文字", "中日韓相容表意文字"),
        &[0xF900..=0xFA6D, 0xFA70..=0xFAD9]),
    ("cjk-compat-supplement", LocalizedName::new("CJK Compatibility Ideographs Supplement", "中日韩兼容表意文字增补", "中日韓相容表意文字增補"),
        &[0x2F800..=0x2FA1D]),
    ("cjk-radicals-supplement", LocalizedName::new("CJK Radicals Supplement", "中日韩部首补充", "中日韓部首補充"),
        &[0x2E80..=0x2E99, 0x2E9B..=0x2EF3]),
    ("kangxi-radicals", LocalizedName::new("Kangxi Radicals", "康熙部首", "康熙部首"),
        &[0x2F00..=0x2FD5]),
    ("cjk-strokes", LocalizedName::new("CJK Strokes", "中日韩笔画", "中日韓筆畫"),
        &[0x31C0..=0x31E3]),
    ("ideographic-description", LocalizedName::new("Ideographic Description Characters", "表意文字描述符", "表意文字描述字元"),
        &[0x2FF0..=0x2FFF]),
    ("cjk-symbols-punctuation", LocalizedName::new("CJK Symbols and Punctuation", "中日韩符号和标点", "中日韓符號和標點"),
        &[0x3000..=0x303F]),
    ("halfwidth-fullwidth", LocalizedName::new("Halfwidth and Fullwidth Forms", "半角及全角字符", "半形及全形字元"),
        &[0xFF01..=0xFFBE, 0xFFC2..=0xFFC7, 0xFFCA..=0xFFCF, 0xFFD2..=0xFFD7, 0xFFDA..=0xFFDC, 0xFFE0..=0xFFE6, 0xFFE8..=0xFFEE]),
    ("cjk-compat-forms", LocalizedName::new("CJK Compatibility Forms", "中日韩兼容形式", "中日韓相容形式"),
        &[0xFE30..=0xFE4F]),
    ("vertical-forms", LocalizedName::new("Vertical Forms", "竖排形式", "直書形式"),
        &[0xFE10..=0xFE19]),
    ("bopomofo", LocalizedName::new("Bopomofo", "注音符号", "注音符號"),
        &[0x3105..=0x312F]),
    ("bopomofo-extended", LocalizedName::new("Bopomofo Extended", "注音符号扩展", "注音符號擴展"),
        &[0x31A0..=0x31BF]),
    ("kanbun", LocalizedName::new("Kanbun", "汉文训读", "漢文訓讀"),
        &[0x3190..=0x319F]),
    ("hiragana", LocalizedName::new("Hiragana", "平假名", "平假名"),
        &[0x3041..=0x3096, 0x3099..=0x309F]),
    ("katakana", LocalizedName::new("Katakana", "片假名", "片假名"),
        &[0x30A0..=0x30FF]),
    ("hangul-syllables", LocalizedName::new("Hangul Syllables", "谚文音节", "諺文音節"),
        &[0xAC00..=0xD7A3]),
];

pub(super) fn register(builder: &mut CatalogueBuilder) {
    for (id, name, ranges) in BLOCKS {
        builder.add_block(UnicodeBlock::new(*id, *name, ranges.iter().cloned()));
    }
    builder.total_name(LocalizedName::new("Total", "总计", "總計"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Catalogue, Repertoire};

    fn blocks_only() -> Catalogue {
        let mut builder = CatalogueBuilder::new();
        register(&mut builder);
        builder.build().unwrap()
    }

    #[test]
    fn block_sizes() {
        let catalogue = blocks_only();
        let size = |id| catalogue.block(id).unwrap().len();
        assert_eq!(size("cjk-unified"), 20992);
        assert_eq!(size("cjk-ext-a"), 6592);
        assert_eq!(size("cjk-ext-b"), 42720);
        assert_eq!(size("cjk-compat"), 472);
        assert_eq!(size("halfwidth-fullwidth"), 225);
        assert_eq!(size("hangul-syllables"), 11172);
    }

    #[test]
    fn total_is_sum_of_blocks() {
        let catalogue = blocks_only();
        let (total, rest) = catalogue.blocks_ordered().split_last().unwrap();
        assert!(total.is_total());
        assert_eq!(total.len(), rest.iter().map(|b| b.len()).sum::<usize>());
        assert!(!total.contains(0xE000));
        assert!(!total.contains(0x9FFF + 1));
    }
}
