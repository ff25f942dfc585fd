//! test data shared between the cjk-coverage crates.

pub mod bebuffer;
pub mod sfnt;
pub mod web;

pub use sfnt::{build_collection, FontSpec};

/// Bytes that are neither an sfnt nor a font collection.
pub static NOT_A_FONT: &[u8] = b"This is a plain text file, not a font.\n";

/// A font mapping three CJK ideographs, one private use character and one
/// variation sequence.
pub fn small_cjk_font() -> Vec<u8> {
    small_cjk_spec().build()
}

/// [`small_cjk_font`] as WOFF 1.0.
pub fn small_cjk_woff() -> Vec<u8> {
    small_cjk_spec().build_woff()
}

/// [`small_cjk_font`] as WOFF2.
pub fn small_cjk_woff2() -> Vec<u8> {
    small_cjk_spec().build_woff2()
}

fn small_cjk_spec() -> FontSpec {
    FontSpec::new("Small CJK Regular")
        .with_code_points([0x4E00, 0x4E02, 0x9999, 0xE000])
        .with_variations([(0x4E00, 0xE0100)])
}

/// A WOFF 1.0 font mapping every other code point from U+4E00 to U+5DFE.
///
/// Its `cmap` has one group per character, so the table is zlib compressed.
pub fn sparse_cjk_woff() -> Vec<u8> {
    FontSpec::new("Sparse CJK")
        .with_code_points((0x4E00..0x5E00).step_by(2))
        .build_woff()
}

/// A font whose table directory is fine but which has no `cmap`.
pub fn font_without_cmap() -> Vec<u8> {
    FontSpec::new("No Cmap").without_cmap().build()
}

/// A collection of three fonts with distinct, non-overlapping repertoires.
///
/// Font `i` maps `0x4E00 + 0x100 * i ..= 0x4E00 + 0x100 * i + i`, so it has
/// `i + 1` characters.
pub fn three_font_collection() -> Vec<u8> {
    let fonts: Vec<_> = (0..3u32)
        .map(|i| {
            let start = 0x4E00 + 0x100 * i;
            FontSpec::new(format!("Collection Member {i}")).with_code_points(start..=start + i)
        })
        .collect();
    build_collection(&fonts)
}
