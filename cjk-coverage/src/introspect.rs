//! Reading a font's character repertoire.
//!
//! Only the `cmap` and `name` tables are consulted. Fonts are parsed with
//! [`skrifa`]; the file's bytes are kept in memory so that a collection can be
//! listed first and loaded once the caller has picked one of its fonts.
//! WOFF and WOFF2 files are unpacked to a plain sfnt when they are opened.

use std::path::{Path, PathBuf};

use skrifa::{
    raw::{FileRef, FontRef, ReadError, TableProvider},
    string::StringId,
    GlyphId, MetadataProvider,
};

use crate::charset::{FontCharacterSet, VariationPair};
use crate::woff::{self, WebFontError, WOFF2_SIGNATURE, WOFF_SIGNATURE};

/// Leading four bytes of the containers we know how to read.
const SFNT_VERSIONS: [[u8; 4]; 3] = [[0, 1, 0, 0], *b"OTTO", *b"true"];
const COLLECTION_TAG: [u8; 4] = *b"ttcf";

/// Reasons a font cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not an OpenType font or font collection")]
    NotAFont,
    #[error("the font is damaged: {0}")]
    DamagedFont(ReadError),
    #[error("the web font is damaged: {0}")]
    DamagedWebFont(#[from] WebFontError),
    #[error("there is no font at index {index}, the file contains {count}")]
    NoSuchFont { index: u32, count: u32 },
}

/// A font or font collection file held in memory.
#[derive(Clone, Debug)]
pub struct FontFile {
    data: Vec<u8>,
    path: Option<PathBuf>,
    is_collection: bool,
    font_count: u32,
}

/// One font of a file, with its supported characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFace {
    pub name: String,
    pub index: u32,
    pub characters: FontCharacterSet,
}

impl FontFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut file = Self::from_bytes(data)?;
        file.path = Some(path.to_owned());
        Ok(file)
    }

    /// Check that `data` holds a readable font or collection.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self, LoadError> {
        let data = data.into();
        let magic: Option<[u8; 4]> = data.get(..4).and_then(|bytes| bytes.try_into().ok());
        let data = match magic {
            Some(WOFF_SIGNATURE) => woff::decode_woff(&data)?,
            Some(WOFF2_SIGNATURE) => woff::decode_woff2(&data)?,
            Some(tag) if tag == COLLECTION_TAG || SFNT_VERSIONS.contains(&tag) => data,
            _ => return Err(LoadError::NotAFont),
        };
        let (is_collection, font_count) = match FileRef::new(&data) {
            Ok(FileRef::Font(_)) => (false, 1),
            Ok(FileRef::Collection(collection)) => (true, collection.len()),
            Err(e) => return Err(LoadError::DamagedFont(e)),
        };
        Ok(Self {
            data,
            path: None,
            is_collection,
            font_count,
        })
    }

    /// The path the file was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    /// Number of fonts in the file: 1 unless it is a collection.
    pub fn font_count(&self) -> u32 {
        self.font_count
    }

    fn font(&self, index: u32) -> Result<FontRef<'_>, LoadError> {
        let count = self.font_count();
        if index >= count {
            return Err(LoadError::NoSuchFont { index, count });
        }
        FontRef::from_index(&self.data, index).map_err(LoadError::DamagedFont)
    }

    /// The display name of every font in the file, in index order.
    pub fn sub_font_names(&self) -> Vec<String> {
        (0..self.font_count())
            .map(|index| {
                self.font(index)
                    .ok()
                    .and_then(|font| font_name(&font))
                    .unwrap_or_else(|| format!("Font #{index}"))
            })
            .collect()
    }

    /// Read the characters of the font at `index`.
    pub fn load(&self, index: u32) -> Result<FontFace, LoadError> {
        let font = self.font(index)?;
        // skrifa's charmap quietly treats a missing table as empty
        font.cmap().map_err(LoadError::DamagedFont)?;
        let charmap = font.charmap();
        if !charmap.has_map() {
            log::warn!("font {index} has no Unicode cmap subtable");
        }
        let code_points = charmap
            .mappings()
            .filter(|(_, gid)| *gid != GlyphId::NOTDEF)
            .map(|(cp, _)| cp);
        let variation_pairs = charmap
            .variant_mappings()
            .map(|(base, selector, _)| VariationPair::new(base, selector));
        let characters = FontCharacterSet::new(code_points, variation_pairs);
        let name = font_name(&font).unwrap_or_else(|| format!("Font #{index}"));
        log::debug!(
            "loaded '{name}': {} code points, {} variation sequences",
            characters.len(),
            characters.variation_pairs().len()
        );
        Ok(FontFace {
            name,
            index,
            characters,
        })
    }
}

fn font_name(font: &FontRef) -> Option<String> {
    [StringId::FULL_NAME, StringId::FAMILY_NAME]
        .into_iter()
        .filter_map(|id| font.localized_strings(id).english_or_first())
        .map(|name| name.to_string())
        .find(|name| !name.is_empty())
}

/// Read the characters of font `index` in the file at `path`.
pub fn open(path: impl AsRef<Path>, index: u32) -> Result<FontCharacterSet, LoadError> {
    Ok(FontFile::open(path)?.load(index)?.characters)
}
