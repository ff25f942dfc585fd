//! The currently loaded font.
//!
//! A [`Session`] owns at most one [`LoadedFont`]. The font's characters and
//! their classification are produced together and replaced together; a failed
//! load leaves no font behind rather than a mix of old and new state.
//!
//! Loading can be split in two for callers that read fonts off the main
//! thread: [`Session::begin_load`] hands out a ticket, the work is done with
//! [`Session::prepare`], and [`Session::finish_load`] applies the result only
//! if no newer load has been started in the meantime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalogue::Catalogue;
use crate::charset::{CodePoint, FontCharacterSet};
use crate::classify::{classify, ClassificationResult};
use crate::introspect::{FontFile, LoadError};
use crate::locale::Locale;
use crate::query::{self, CopyMode};
use crate::report::Report;

/// A font together with its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedFont {
    pub path: Option<PathBuf>,
    pub font_name: String,
    /// Index of the font within its file; 0 unless the file is a collection.
    pub sub_font: u32,
    pub characters: FontCharacterSet,
    pub result: ClassificationResult,
}

/// Identifies one load started with [`Session::begin_load`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result became the current font.
    Applied,
    /// A newer load was started; the result was dropped.
    Superseded,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no font is loaded")]
    NoFontLoaded,
    #[error("no encoding table or Unicode block has the id '{0}'")]
    UnknownTable(String),
    #[error("no font was chosen from the collection")]
    NoSelection,
    #[error(transparent)]
    Load(#[from] LoadError),
}

pub struct Session<'a> {
    catalogue: &'a Catalogue,
    current: Option<Arc<LoadedFont>>,
    generation: u64,
}

impl<'a> Session<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Session {
            catalogue,
            current: None,
            generation: 0,
        }
    }

    pub fn catalogue(&self) -> &'a Catalogue {
        self.catalogue
    }

    pub fn current(&self) -> Option<Arc<LoadedFont>> {
        self.current.clone()
    }

    /// Load the font at `path`, replacing the current one.
    ///
    /// For collections, `choose` is given the names of the contained fonts and
    /// returns the index to load, or `None` to give up.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        choose: impl FnOnce(&[String]) -> Option<u32>,
    ) -> Result<Arc<LoadedFont>, SessionError> {
        let ticket = self.begin_load();
        let loaded = read_and_classify(self.catalogue, path.as_ref(), choose);
        self.finish_load(ticket, loaded)?;
        self.current().ok_or(SessionError::NoFontLoaded)
    }

    /// Start a load, invalidating any load started earlier.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Introspect and classify one font of `file`.
    ///
    /// This touches no session state and can run on any thread.
    pub fn prepare(
        catalogue: &Catalogue,
        file: &FontFile,
        index: u32,
    ) -> Result<LoadedFont, LoadError> {
        let face = file.load(index)?;
        let result = classify(catalogue, &face.characters);
        Ok(LoadedFont {
            path: file.path().map(Path::to_owned),
            font_name: face.name,
            sub_font: face.index,
            characters: face.characters,
            result,
        })
    }

    /// Apply the result of the load identified by `ticket`.
    ///
    /// Results of anything but the most recent load are dropped. A failed load
    /// clears the current font and returns its error.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        loaded: Result<LoadedFont, impl Into<SessionError>>,
    ) -> Result<LoadOutcome, SessionError> {
        if ticket.0 != self.generation {
            log::debug!("dropping result of superseded load {}", ticket.0);
            return Ok(LoadOutcome::Superseded);
        }
        match loaded {
            Ok(font) => {
                log::info!("loaded font '{}'", font.font_name);
                self.current = Some(Arc::new(font));
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                self.current = None;
                Err(e.into())
            }
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    fn loaded(&self) -> Result<&LoadedFont, SessionError> {
        self.current.as_deref().ok_or(SessionError::NoFontLoaded)
    }

    /// Characters of table or block `id` the current font lacks.
    pub fn missing(&self, id: &str) -> Result<Vec<CodePoint>, SessionError> {
        self.query(id, CopyMode::Missing)
    }

    /// Characters of table or block `id` the current font supports.
    pub fn overlap(&self, id: &str) -> Result<Vec<CodePoint>, SessionError> {
        self.query(id, CopyMode::Overlap)
    }

    fn query(&self, id: &str, mode: CopyMode) -> Result<Vec<CodePoint>, SessionError> {
        let font = self.loaded()?;
        let entry = self
            .catalogue
            .find(id)
            .ok_or_else(|| SessionError::UnknownTable(id.to_string()))?;
        Ok(query::query(mode, &entry, &font.characters))
    }

    /// The text to put on the clipboard for table or block `id`.
    pub fn export(&self, id: &str, mode: CopyMode) -> Result<String, SessionError> {
        Ok(query::clipboard_text(&self.query(id, mode)?))
    }

    pub fn report(&self, locale: Locale) -> Result<Report, SessionError> {
        let font = self.loaded()?;
        Ok(Report::build(self.catalogue, &font.result, locale))
    }
}

fn read_and_classify(
    catalogue: &Catalogue,
    path: &Path,
    choose: impl FnOnce(&[String]) -> Option<u32>,
) -> Result<LoadedFont, SessionError> {
    let file = FontFile::open(path)?;
    let index = if file.is_collection() {
        choose(&file.sub_font_names()).ok_or(SessionError::NoSelection)?
    } else {
        0
    };
    Ok(Session::prepare(catalogue, &file, index)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{CatalogueBuilder, EncodingTable, TableGroup, UnicodeBlock};
    use crate::locale::LocalizedName;
    use coverage_test_data as test_data;

    fn catalogue() -> Catalogue {
        CatalogueBuilder::new()
            .add_table(EncodingTable::new(
                "t",
                TableGroup::Simplified,
                LocalizedName::uniform("T"),
                [0x4E00, 0x4E01, 0x4E02],
            ))
            .order_group(TableGroup::Simplified, &["t"])
            .add_block(UnicodeBlock::new(
                "uro",
                LocalizedName::uniform("URO"),
                [0x4E00..=0x9FFF],
            ))
            .build()
            .unwrap()
    }

    fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    fn never_called(_: &[String]) -> Option<u32> {
        panic!("not a collection")
    }

    #[test]
    fn queries_need_a_font() {
        let catalogue = catalogue();
        let session = Session::new(&catalogue);
        assert!(matches!(session.missing("t"), Err(SessionError::NoFontLoaded)));
        assert!(matches!(
            session.report(Locale::En),
            Err(SessionError::NoFontLoaded)
        ));
    }

    #[test]
    fn load_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "small.ttf", &test_data::small_cjk_font());
        let catalogue = catalogue();
        let mut session = Session::new(&catalogue);
        let font = session.load_file(&path, never_called).unwrap();
        assert_eq!(font.font_name, "Small CJK Regular");
        assert_eq!(font.path.as_deref(), Some(path.as_path()));
        assert_eq!(font.result.table_count("t"), Some(2));
        assert_eq!(session.missing("t").unwrap(), vec![0x4E01]);
        assert_eq!(session.overlap("t").unwrap(), vec![0x4E00, 0x4E02]);
        assert_eq!(session.export("t", CopyMode::Missing).unwrap(), "\u{4E01}");
        assert_eq!(session.overlap("uro").unwrap(), vec![0x4E00, 0x4E02, 0x9999]);
        assert!(matches!(
            session.export("nope", CopyMode::Overlap),
            Err(SessionError::UnknownTable(id)) if id == "nope"
        ));
        assert_eq!(session.report(Locale::En).unwrap().sections.len(), 4);
    }

    #[test]
    fn collection_uses_chosen_font() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "three.ttc", &test_data::three_font_collection());
        let catalogue = catalogue();
        let mut session = Session::new(&catalogue);
        let mut offered = Vec::new();
        let font = session
            .load_file(&path, |names| {
                offered = names.to_vec();
                Some(2)
            })
            .unwrap();
        assert_eq!(offered.len(), 3);
        assert_eq!(font.sub_font, 2);
        assert_eq!(font.font_name, "Collection Member 2");
        assert_eq!(font.characters.len(), 3);
    }

    #[test]
    fn failed_load_clears_current_font() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "small.ttf", &test_data::small_cjk_font());
        let bad = write(dir.path(), "notes.txt", test_data::NOT_A_FONT);
        let ttc = write(dir.path(), "three.ttc", &test_data::three_font_collection());
        let catalogue = catalogue();
        let mut session = Session::new(&catalogue);

        session.load_file(&good, never_called).unwrap();
        assert!(matches!(
            session.load_file(&bad, never_called),
            Err(SessionError::Load(LoadError::NotAFont))
        ));
        assert!(session.current().is_none());

        session.load_file(&good, never_called).unwrap();
        assert!(matches!(
            session.load_file(&ttc, |_| None),
            Err(SessionError::NoSelection)
        ));
        assert!(session.current().is_none());

        session.load_file(&good, never_called).unwrap();
        session.clear();
        assert!(matches!(session.overlap("t"), Err(SessionError::NoFontLoaded)));
    }

    #[test]
    fn stale_loads_are_dropped() {
        let catalogue = catalogue();
        let small = FontFile::from_bytes(test_data::small_cjk_font()).unwrap();
        let ttc = FontFile::from_bytes(test_data::three_font_collection()).unwrap();
        let mut session = Session::new(&catalogue);

        let first = session.begin_load();
        let second = session.begin_load();
        let (first_result, second_result) = std::thread::scope(|scope| {
            let a = scope.spawn(|| Session::prepare(&catalogue, &small, 0));
            let b = scope.spawn(|| Session::prepare(&catalogue, &ttc, 1));
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(
            session.finish_load(second, second_result).unwrap(),
            LoadOutcome::Applied
        );
        assert_eq!(
            session.finish_load(first, first_result).unwrap(),
            LoadOutcome::Superseded
        );
        let current = session.current().unwrap();
        assert_eq!(current.font_name, "Collection Member 1");
        assert_eq!(current.result.table_count("t"), Some(0));
    }

    #[test]
    fn stale_failure_keeps_current_font() {
        let catalogue = catalogue();
        let small = FontFile::from_bytes(test_data::small_cjk_font()).unwrap();
        let mut session = Session::new(&catalogue);
        let stale = session.begin_load();
        let fresh = session.begin_load();
        session
            .finish_load(fresh, Session::prepare(&catalogue, &small, 0))
            .unwrap();
        let outcome = session
            .finish_load(stale, Session::prepare(&catalogue, &small, 5))
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert!(session.current().is_some());
    }
}
