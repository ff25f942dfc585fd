//! End to end checks against the built-in catalogue.

use cjk_coverage::{
    classify, introspect, query, Catalogue, CopyMode, FontCharacterSet, FontFile, Locale, Report,
    Repertoire, Session, TableGroup,
};
use coverage_test_data as test_data;
use pretty_assertions::assert_eq;

#[test]
fn builtin_table_sizes() {
    let catalogue = Catalogue::load();
    let size = |id| catalogue.table(id).unwrap().len();
    assert_eq!(size("gb2312"), 6763);
    assert_eq!(size("gb2312-level1"), 3755);
    assert_eq!(size("gb2312-level2"), 3008);
    assert_eq!(size("big5-common"), 5401);
    assert_eq!(size("jis-x-0208"), 6355);
    assert_eq!(size("ks-x-1001"), 4888);
}

#[test]
fn builtin_table_relations() {
    let catalogue = Catalogue::load();
    let table = |id| catalogue.table(id).unwrap();
    let gb2312 = table("gb2312");
    assert!(gb2312.members().is_subset(table("gbk").members()));
    assert!(table("gbk").members().is_subset(table("gb18030").members()));
    assert!(table("gb18030").contains(0x3400));
    for part in ["gb2312-level1", "gb2312-level2"] {
        assert!(table(part).members().is_subset(gb2312.members()));
    }
    for part in ["big5-common", "big5-less-common"] {
        assert!(table(part).members().is_subset(table("big5").members()));
    }
    assert!(!table("hkscs").is_empty());
}

#[test]
fn every_group_is_populated() {
    let catalogue = Catalogue::load();
    let ids = |group| {
        catalogue
            .tables_in_group(group)
            .map(|t| t.id().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(TableGroup::Simplified), ["gb2312-level1", "gb2312-level2", "gb2312"]);
    assert_eq!(ids(TableGroup::Shared), ["gbk", "gb18030", "jis-x-0208", "ks-x-1001"]);
    assert_eq!(
        ids(TableGroup::Traditional),
        ["big5-common", "big5-less-common", "big5", "hkscs"]
    );
    assert!(catalogue.blocks_ordered().last().unwrap().is_total());
}

#[test]
fn builtin_counts_match_queries() {
    let catalogue = Catalogue::load();
    let font = FontCharacterSet::from_code_points((0x4E00..=0x5FFF).chain(0xE000..=0xE0FF));
    let result = classify(&catalogue, &font);
    for table in catalogue.all_tables() {
        let count = result.table_count(table.id()).unwrap();
        assert_eq!(count, query::overlap(table, &font).len(), "{}", table.id());
        assert_eq!(table.len() - count, query::missing(table, &font).len());
    }
    assert_eq!(result.block_count("cjk-unified"), Some(0x1200));
    assert_eq!(result.total(), 0x1200);
}

#[test]
fn font_file_to_report() {
    let catalogue = Catalogue::load();
    let characters = FontFile::from_bytes(test_data::small_cjk_font())
        .unwrap()
        .load(0)
        .unwrap()
        .characters;
    let result = classify(&catalogue, &characters);
    // all three hanzi are in GBK; U+4E02 is not in GB 2312
    assert_eq!(result.table_count("gb2312"), Some(2));
    assert_eq!(result.table_count("gb2312-level1"), Some(2));
    assert_eq!(result.table_count("gbk"), Some(3));
    assert_eq!(result.block_count("cjk-unified"), Some(3));
    // the private use character is not in any block
    assert_eq!(result.total(), 3);

    let report = Report::build(&catalogue, &result, Locale::Zhs);
    let text = report.to_string();
    assert!(text.starts_with("=== 简体中文编码 ===\n#名称,计数,总数\n\"GB/T 2312 一级汉字\",2,3755\n"));
    assert!(text.contains("\n\"总计\",3,"));
    assert!(text.ends_with("\n==="));
    assert_eq!(Report::parse(&text).unwrap(), report);
}

#[test]
fn collection_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.ttc");
    std::fs::write(&path, test_data::three_font_collection()).unwrap();

    let catalogue = Catalogue::load();
    let mut session = Session::new(&catalogue);
    let font = session
        .load_file(&path, |names| {
            assert_eq!(names.len(), 3);
            Some(2)
        })
        .unwrap();
    assert_eq!(font.sub_font, 2);
    assert_eq!(font.result.block_count("cjk-unified"), Some(3));
    let overlap = session.export("cjk-unified", CopyMode::Overlap).unwrap();
    assert_eq!(overlap, "\u{5000}\u{5001}\u{5002}");

    assert_eq!(introspect::open(&path, 1).unwrap().len(), 2);
}
