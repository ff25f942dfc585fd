//! Display languages and localized labels.
//!
//! There is one canonical catalogue; localized names are carried alongside
//! each table and block as a [`LocalizedName`], and everything that depends on
//! the language (section order, titles, report header, notices) is looked up
//! through [`Locale`].

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalogue::TableGroup;

/// A supported display language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Simplified Chinese.
    Zhs,
    /// Traditional Chinese.
    Zht,
}

/// A titled section of the results, as shown to the user and in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Encodings(TableGroup),
    UnicodeBlocks,
}

/// User-facing captions and notices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    AppTitle,
    FontCaption,
    FileCaption,
    NoFileSelected,
    NoFileSelectedMessage,
    NotAValidFont,
    NotAValidFontMessage,
    ReportSaved,
    /// Contains a single `{}` placeholder for the path.
    ReportSavedMessage,
    CollectionSelection,
    PickFontForCounting,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Zhs, Locale::Zht];

    /// The name of the language in that language.
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Zhs => "简体中文",
            Locale::Zht => "正體中文",
        }
    }

    /// Order of result sections for this language.
    ///
    /// Traditional Chinese leads with the traditional encodings; every other
    /// language leads with the simplified ones. Unicode blocks always come last.
    pub fn section_order(self) -> [Section; 4] {
        use TableGroup::*;
        match self {
            Locale::Zht => [
                Section::Encodings(Traditional),
                Section::Encodings(Shared),
                Section::Encodings(Simplified),
                Section::UnicodeBlocks,
            ],
            Locale::En | Locale::Zhs => [
                Section::Encodings(Simplified),
                Section::Encodings(Shared),
                Section::Encodings(Traditional),
                Section::UnicodeBlocks,
            ],
        }
    }

    pub fn section_title(self, section: Section) -> &'static str {
        use TableGroup::*;
        match (self, section) {
            (Locale::En, Section::Encodings(Simplified)) => "Chinese (Simp) Encodings",
            (Locale::En, Section::Encodings(Shared)) => "Chinese (Simp/Trad) Encodings",
            (Locale::En, Section::Encodings(Traditional)) => "Chinese (Trad) Encodings",
            (Locale::En, Section::UnicodeBlocks) => "Unicode Blocks",
            (Locale::Zhs, Section::Encodings(Simplified)) => "简体中文编码",
            (Locale::Zhs, Section::Encodings(Shared)) => "简体/繁体中文编码",
            (Locale::Zhs, Section::Encodings(Traditional)) => "繁体中文编码",
            (Locale::Zhs, Section::UnicodeBlocks) => "统一码区段",
            (Locale::Zht, Section::Encodings(Simplified)) => "簡體中文編碼",
            (Locale::Zht, Section::Encodings(Shared)) => "簡體/正體（繁體）中文編碼",
            (Locale::Zht, Section::Encodings(Traditional)) => "正體（繁體）中文編碼",
            (Locale::Zht, Section::UnicodeBlocks) => "統一碼區段",
        }
    }

    /// The column header line of a report section.
    pub fn report_header(self) -> &'static str {
        match self {
            Locale::En => "#name,count,full_size",
            Locale::Zhs => "#名称,计数,总数",
            Locale::Zht => "#名稱,計數,總數",
        }
    }

    pub fn label(self, label: Label) -> &'static str {
        match self {
            Locale::En => match label {
                Label::AppTitle => "CJK Character Count",
                Label::FontCaption => "Font: ",
                Label::FileCaption => "File: ",
                Label::NoFileSelected => "No file",
                Label::NoFileSelectedMessage => "No font file selected.",
                Label::NotAValidFont => "Not a valid font",
                Label::NotAValidFontMessage => "This is not a valid font file.",
                Label::ReportSaved => "Report saved",
                Label::ReportSavedMessage => "Report successfully saved to: {}",
                Label::CollectionSelection => "OpenType Collection Selection",
                Label::PickFontForCounting => "Pick font for counting:",
            },
            Locale::Zhs => match label {
                Label::AppTitle => "字体计数软件",
                Label::FontCaption => "字体：",
                Label::FileCaption => "文件：",
                Label::NoFileSelected => "没有文件",
                Label::NoFileSelectedMessage => "未选择字体文件。",
                Label::NotAValidFont => "不是有效的字体",
                Label::NotAValidFontMessage => "这不是有效的字体文件。",
                Label::ReportSaved => "报告已保存",
                Label::ReportSavedMessage => "报告已成功保存至：{}",
                Label::CollectionSelection => "OpenType合集字体选择",
                Label::PickFontForCounting => "选择计数的字体：",
            },
            Locale::Zht => match label {
                Label::AppTitle => "字型計數軟體",
                Label::FontCaption => "字型：",
                Label::FileCaption => "文檔：",
                Label::NoFileSelected => "沒有文件",
                Label::NoFileSelectedMessage => "未選擇字型文件。",
                Label::NotAValidFont => "不是有效的字型",
                Label::NotAValidFontMessage => "這不是有效的字型文件。",
                Label::ReportSaved => "報告已保存",
                Label::ReportSavedMessage => "報告已成功保存至：{}",
                Label::CollectionSelection => "OpenType合集字型選擇",
                Label::PickFontForCounting => "選擇計數的字型：",
            },
        }
    }

    /// Code used in settings files and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zhs => "zhs",
            Locale::Zht => "zht",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown language code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown language '{0}', expected one of: en, zhs, zht")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "zhs" | "zh-hans" | "zh-cn" => Ok(Locale::Zhs),
            "zht" | "zh-hant" | "zh-tw" | "zh-hk" => Ok(Locale::Zht),
            _ => Err(UnknownLocale(s.to_owned())),
        }
    }
}

/// A display name in every supported language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalizedName {
    pub en: &'static str,
    pub zhs: &'static str,
    pub zht: &'static str,
}

impl LocalizedName {
    pub const fn new(en: &'static str, zhs: &'static str, zht: &'static str) -> Self {
        Self { en, zhs, zht }
    }

    /// The same name in every language.
    pub const fn uniform(name: &'static str) -> Self {
        Self::new(name, name, name)
    }

    pub fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en,
            Locale::Zhs => self.zhs,
            Locale::Zht => self.zht,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traditional_swaps_first_and_third_sections() {
        let default = Locale::En.section_order();
        let zht = Locale::Zht.section_order();
        assert_eq!(default, Locale::Zhs.section_order());
        assert_eq!(zht[0], default[2]);
        assert_eq!(zht[1], default[1]);
        assert_eq!(zht[2], default[0]);
        assert_eq!(zht[3], Section::UnicodeBlocks);
    }

    #[test]
    fn parse_codes() {
        assert_eq!("ZHT".parse::<Locale>(), Ok(Locale::Zht));
        assert_eq!("zh-Hans".parse::<Locale>(), Ok(Locale::Zhs));
        assert!("fr".parse::<Locale>().is_err());
        for locale in Locale::ALL {
            assert_eq!(locale.code().parse::<Locale>(), Ok(locale));
        }
    }

    #[test]
    fn serde_uses_codes() {
        let json = serde_json::to_string(&Locale::Zhs).unwrap();
        assert_eq!(json, "\"zhs\"");
        let back: Locale = serde_json::from_str("\"zht\"").unwrap();
        assert_eq!(back, Locale::Zht);
    }

    #[test]
    fn localized_name_lookup() {
        let name = LocalizedName::new("Big5", "大五码", "大五碼");
        assert_eq!(name.get(Locale::Zhs), "大五码");
        assert_eq!(LocalizedName::uniform("GBK").get(Locale::Zht), "GBK");
    }
}
