//! Characters a font lacks, or has, from a single table or block.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalogue::Repertoire;
use crate::charset::{CodePoint, FontCharacterSet};

/// Which side of the comparison to export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyMode {
    /// Members of the table the font does not support.
    #[default]
    Missing,
    /// Members of the table the font supports.
    Overlap,
}

impl CopyMode {
    pub fn code(self) -> &'static str {
        match self {
            CopyMode::Missing => "missing",
            CopyMode::Overlap => "overlap",
        }
    }
}

impl fmt::Display for CopyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown copy mode '{0}', expected 'missing' or 'overlap'")]
pub struct UnknownCopyMode(pub String);

impl FromStr for CopyMode {
    type Err = UnknownCopyMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "missing" | "diff" => Ok(CopyMode::Missing),
            "overlap" => Ok(CopyMode::Overlap),
            _ => Err(UnknownCopyMode(s.to_owned())),
        }
    }
}

/// Members of `table` the font does not support, in ascending order.
pub fn missing(table: &impl Repertoire, font: &FontCharacterSet) -> Vec<CodePoint> {
    table
        .sorted_members()
        .filter(|cp| !font.contains(*cp))
        .collect()
}

/// Members of `table` the font supports, in ascending order.
pub fn overlap(table: &impl Repertoire, font: &FontCharacterSet) -> Vec<CodePoint> {
    // a font usually has far fewer characters than a large block
    if font.len() < table.len() {
        font.sorted_code_points()
            .into_iter()
            .filter(|cp| table.contains(*cp))
            .collect()
    } else {
        table
            .sorted_members()
            .filter(|cp| font.contains(*cp))
            .collect()
    }
}

/// Run the query selected by `mode`.
pub fn query(mode: CopyMode, table: &impl Repertoire, font: &FontCharacterSet) -> Vec<CodePoint> {
    match mode {
        CopyMode::Missing => missing(table, font),
        CopyMode::Overlap => overlap(table, font),
    }
}

/// The characters concatenated without separators.
///
/// Values that are not Unicode scalar values are skipped.
pub fn clipboard_text(code_points: &[CodePoint]) -> String {
    code_points
        .iter()
        .filter_map(|cp| char::from_u32(*cp))
        .collect()
}
