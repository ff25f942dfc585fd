//! Count how much of each CJK encoding standard and Unicode block a font covers.
//!
//! The [`Catalogue`] holds every encoding table and Unicode block. A font's
//! repertoire is read with [`introspect`] into a [`FontCharacterSet`], which
//! [`classify()`] turns into per-table and per-block counts. The [`query`]
//! module lists the characters a font lacks (or has) for a single table, and
//! [`report`] renders counts as a plain text document.
//!
//! ```no_run
//! use cjk_coverage::{classify, introspect, Catalogue, Locale, Report};
//!
//! let catalogue = Catalogue::load();
//! let characters = introspect::open("NotoSansCJK.ttc", 0).unwrap();
//! let result = classify(&catalogue, &characters);
//! println!("{}", Report::build(&catalogue, &result, Locale::En));
//! ```

#![forbid(unsafe_code)]

pub mod catalogue;
pub mod charset;
mod classify;
pub mod introspect;
pub mod locale;
pub mod query;
pub mod report;
pub mod session;
pub mod settings;
pub mod woff;

pub use catalogue::{
    Catalogue, CatalogueBuilder, CatalogueError, EncodingTable, Entry, Repertoire, TableGroup,
    UnicodeBlock,
};
pub use charset::{CodePoint, FontCharacterSet, VariationPair};
pub use classify::{classify, ClassificationResult};
pub use introspect::{FontFace, FontFile, LoadError};
pub use locale::{Label, Locale, LocalizedName, Section};
pub use query::CopyMode;
pub use report::{Report, ReportError};
pub use session::{LoadOutcome, LoadTicket, LoadedFont, Session, SessionError};
pub use settings::{Settings, SettingsError, SettingsPatch, SettingsStore, Theme};
pub use woff::WebFontError;
