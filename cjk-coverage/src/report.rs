//! The plain text coverage report.
//!
//! A report is a series of sections, one per table group followed by the
//! Unicode blocks, in the order the display language prefers:
//!
//! ```text
//! === Chinese (Simp) Encodings ===
//! #name,count,full_size
//! "GB/T 2312 level 1",3755,3755
//! ...
//! ===
//!
//! === Unicode Blocks ===
//! ...
//! ===
//! ```
//!
//! Names are always quoted, with embedded quotes doubled. The document has no
//! trailing newline.

use core::fmt;
use std::path::Path;

use serde::Serialize;

use crate::catalogue::{Catalogue, Repertoire};
use crate::classify::ClassificationResult;
use crate::locale::{Locale, Section};

const SECTION_END: &str = "===";

/// One line of a report section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub count: usize,
    pub full_size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub title: String,
    /// The column header line, including the leading `#`.
    pub header: String,
    pub rows: Vec<ReportRow>,
}

/// A rendered classification result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub sections: Vec<ReportSection>,
}

/// Errors that can occur when reading or saving a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: &'static str },
    #[error("the report ends in the middle of a section")]
    UnexpectedEnd,
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl Report {
    /// Lay out `result` for display in `locale`.
    pub fn build(catalogue: &Catalogue, result: &ClassificationResult, locale: Locale) -> Report {
        let sections = locale
            .section_order()
            .into_iter()
            .map(|section| {
                let rows = match section {
                    Section::Encodings(group) => catalogue
                        .tables_in_group(group)
                        .map(|table| ReportRow::new(table, result.table_count(table.id()), locale))
                        .collect(),
                    Section::UnicodeBlocks => catalogue
                        .blocks_ordered()
                        .iter()
                        .map(|block| ReportRow::new(block, result.block_count(block.id()), locale))
                        .collect(),
                };
                ReportSection {
                    title: locale.section_title(section).to_string(),
                    header: locale.report_header().to_string(),
                    rows,
                }
            })
            .collect();
        Report { sections }
    }

    /// Read a report written by [`Report`]'s `Display` implementation.
    pub fn parse(text: &str) -> Result<Report, ReportError> {
        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .enumerate()
            .map(|(i, line)| (i + 1, line));
        let mut sections = Vec::new();

        while let Some((line_no, line)) = lines.next() {
            if !sections.is_empty() {
                // sections are separated by one blank line; a single trailing
                // newline after the last one is tolerated
                if !line.is_empty() {
                    return Err(malformed(line_no, "expected a blank line between sections"));
                }
                match lines.next() {
                    Some((line_no, line)) => sections.push(parse_section(line_no, line, &mut lines)?),
                    None => break,
                }
            } else {
                sections.push(parse_section(line_no, line, &mut lines)?);
            }
        }
        Ok(Report { sections })
    }

    /// Write the report to `path`, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string())?;
        log::info!("wrote report to {}", path.display());
        Ok(())
    }
}

/// Render `result` as a report document.
pub fn format(catalogue: &Catalogue, result: &ClassificationResult, locale: Locale) -> String {
    Report::build(catalogue, result, locale).to_string()
}

impl ReportRow {
    fn new(entry: &impl Repertoire, count: Option<usize>, locale: Locale) -> Self {
        ReportRow {
            name: entry.name().get(locale).to_string(),
            count: count.unwrap_or_default(),
            full_size: entry.len(),
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\",{},{}",
            self.name.replace('"', "\"\""),
            self.count,
            self.full_size
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            writeln!(f, "=== {} ===", section.title)?;
            writeln!(f, "{}", section.header)?;
            for row in &section.rows {
                writeln!(f, "{row}")?;
            }
            f.write_str(SECTION_END)?;
        }
        Ok(())
    }
}

fn malformed(line: usize, message: &'static str) -> ReportError {
    ReportError::Malformed { line, message }
}

fn parse_section<'a>(
    line_no: usize,
    title_line: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<ReportSection, ReportError> {
    let title = title_line
        .strip_prefix("=== ")
        .and_then(|rest| rest.strip_suffix(" ==="))
        .ok_or_else(|| malformed(line_no, "expected a section title"))?;
    let (line_no, header) = lines.next().ok_or(ReportError::UnexpectedEnd)?;
    if !header.starts_with('#') {
        return Err(malformed(line_no, "expected a column header"));
    }
    let mut rows = Vec::new();
    loop {
        let (line_no, line) = lines.next().ok_or(ReportError::UnexpectedEnd)?;
        if line == SECTION_END {
            break;
        }
        rows.push(parse_row(line).ok_or_else(|| malformed(line_no, "invalid row"))?);
    }
    Ok(ReportSection {
        title: title.to_string(),
        header: header.to_string(),
        rows,
    })
}

fn parse_row(line: &str) -> Option<ReportRow> {
    let mut chars = line.strip_prefix('"')?.char_indices();
    let mut name = String::new();
    let rest = loop {
        let (i, c) = chars.next()?;
        if c != '"' {
            name.push(c);
            continue;
        }
        // `i` is relative to the text after the opening quote
        let after = &line[1 + i + 1..];
        if after.starts_with('"') {
            name.push('"');
            chars.next();
        } else {
            break after;
        }
    };
    let (count, full_size) = rest.strip_prefix(',')?.split_once(',')?;
    Some(ReportRow {
        name,
        count: count.parse().ok()?,
        full_size: full_size.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalogue::{CatalogueBuilder, EncodingTable, TableGroup, UnicodeBlock};
    use crate::charset::FontCharacterSet;
    use crate::classify::classify;
    use crate::locale::LocalizedName;

    fn catalogue() -> Catalogue {
        CatalogueBuilder::new()
            .add_table(EncodingTable::new(
                "simp",
                TableGroup::Simplified,
                LocalizedName::new("Simp", "简", "簡"),
                [0x4E00, 0x4E01],
            ))
            .add_table(EncodingTable::new(
                "both",
                TableGroup::Shared,
                LocalizedName::new("Both \"quoted\"", "双", "雙"),
                [0x4E00],
            ))
            .add_table(EncodingTable::new(
                "trad",
                TableGroup::Traditional,
                LocalizedName::new("Trad", "繁", "繁"),
                [0x4E01, 0x4E02, 0x4E03],
            ))
            .order_group(TableGroup::Simplified, &["simp"])
            .order_group(TableGroup::Shared, &["both"])
            .order_group(TableGroup::Traditional, &["trad"])
            .add_block(UnicodeBlock::new(
                "uro",
                LocalizedName::new("URO", "统一", "統一"),
                [0x4E00..=0x9FFF],
            ))
            .build()
            .unwrap()
    }

    fn result(catalogue: &Catalogue) -> ClassificationResult {
        classify(catalogue, &FontCharacterSet::from_code_points([0x4E00, 0x4E01]))
    }

    #[test]
    fn english_layout() {
        let catalogue = catalogue();
        let text = format(&catalogue, &result(&catalogue), Locale::En);
        let expected = "=== Chinese (Simp) Encodings ===\n\
                        #name,count,full_size\n\
                        \"Simp\",2,2\n\
                        ===\n\
                        \n\
                        === Chinese (Simp/Trad) Encodings ===\n\
                        #name,count,full_size\n\
                        \"Both \"\"quoted\"\"\",1,1\n\
                        ===\n\
                        \n\
                        === Chinese (Trad) Encodings ===\n\
                        #name,count,full_size\n\
                        \"Trad\",1,3\n\
                        ===\n\
                        \n\
                        === Unicode Blocks ===\n\
                        #name,count,full_size\n\
                        \"URO\",2,20992\n\
                        \"Total\",2,20992\n\
                        ===";
        assert_eq!(text, expected);
    }

    #[test]
    fn traditional_leads_with_traditional() {
        let catalogue = catalogue();
        let report = Report::build(&catalogue, &result(&catalogue), Locale::Zht);
        let titles: Vec<_> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            ["正體（繁體）中文編碼", "簡體/正體（繁體）中文編碼", "簡體中文編碼", "統一碼區段"]
        );
        assert_eq!(report.sections[0].header, "#名稱,計數,總數");
        assert_eq!(report.sections[0].rows[0].name, "繁");
        assert_eq!(report.sections[3].rows[1].name, "總計");
    }

    #[test]
    fn parse_round_trip() {
        let catalogue = catalogue();
        for locale in Locale::ALL {
            let report = Report::build(&catalogue, &result(&catalogue), locale);
            let parsed = Report::parse(&report.to_string()).unwrap();
            assert_eq!(parsed, report);
        }
    }

    #[test]
    fn parse_tolerates_trailing_newline() {
        let text = "=== A ===\n#name,count,full_size\n\"x, y\",1,2\n===\n";
        let report = Report::parse(text).unwrap();
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].rows[0].name, "x, y");
    }

    #[test]
    fn parse_accepts_crlf_line_endings() {
        let catalogue = catalogue();
        let report = Report::build(&catalogue, &result(&catalogue), Locale::En);
        let crlf = report.to_string().replace('\n', "\r\n") + "\r\n";
        assert_eq!(Report::parse(&crlf).unwrap(), report);

        let text = "=== A ===\r\n#name,count,full_size\r\n\"\"\"q\"\"\",3,4\r\n===";
        let parsed = Report::parse(text).unwrap();
        assert_eq!(parsed.sections[0].header, "#name,count,full_size");
        assert_eq!(parsed.sections[0].rows[0].name, "\"q\"");
        assert_eq!(parsed.sections[0].rows[0].full_size, 4);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Report::parse("A ===\n#h\n==="),
            Err(ReportError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            Report::parse("=== A ===\n#h\n\"x\",1,2"),
            Err(ReportError::UnexpectedEnd)
        ));
        assert!(matches!(
            Report::parse("=== A ===\n#h\n\"x\",one,2\n==="),
            Err(ReportError::Malformed { line: 3, .. })
        ));
        assert!(matches!(
            Report::parse("=== A ===\n#h\n===\n=== B ===\n#h\n==="),
            Err(ReportError::Malformed { line: 4, .. })
        ));
    }

    #[test]
    fn save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cjk_report").join("font.txt");
        let catalogue = catalogue();
        let report = Report::build(&catalogue, &result(&catalogue), Locale::Zhs);
        report.save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== 简体中文编码 ===\n#名称,计数,总数\n"));
        assert!(text.ends_with("==="));
    }
}
