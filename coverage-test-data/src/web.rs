//! WOFF and WOFF2 containers around synthesized sfnt tables
//!
//! WOFF tables are zlib compressed whenever that makes them smaller. The WOFF2
//! data stream is written as uncompressed brotli meta-blocks, which any
//! conforming decoder reads like a compressed stream.

use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};

use crate::bebuffer::BeBuffer;
use crate::sfnt::{checksum, padded_len, FontSpec};

const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;
const WOFF2_HEADER_LEN: usize = 48;

/// The leading entries of the WOFF2 known tag table; other tags are written out.
const WOFF2_KNOWN_TAGS: [&[u8; 4]; 13] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep",
];
const BROTLI_MAX_STORED_BLOCK: usize = 1 << 16;

impl FontSpec {
    /// Build the font wrapped in WOFF 1.0.
    pub fn build_woff(&self) -> Vec<u8> {
        woff(0x0001_0000, &self.tables())
    }

    /// Build the font wrapped in WOFF2, without table transforms.
    pub fn build_woff2(&self) -> Vec<u8> {
        woff2(0x0001_0000, &self.tables())
    }
}

/// A WOFF 1.0 file holding `tables`, which must be sorted by tag.
pub fn woff(flavor: u32, tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    // (tag, checksum, original length, stored bytes)
    let entries: Vec<_> = tables
        .iter()
        .map(|(tag, data)| {
            let compressed = zlib(data);
            let stored = if compressed.len() < data.len() {
                compressed
            } else {
                data.clone()
            };
            (*tag, checksum(data), data.len(), stored)
        })
        .collect();

    let sfnt_size = 12
        + 16 * tables.len()
        + tables
            .iter()
            .map(|(_, data)| padded_len(data.len()))
            .sum::<usize>();
    let directory_end = WOFF_HEADER_LEN + WOFF_ENTRY_LEN * entries.len();
    let length = directory_end
        + entries
            .iter()
            .map(|(.., stored)| padded_len(stored.len()))
            .sum::<usize>();

    let mut buf = BeBuffer::new()
        .extend_bytes(b"wOFF")
        .push(flavor)
        .push(length as u32)
        .push(entries.len() as u16)
        .push(0_u16)
        .push(sfnt_size as u32)
        .push(1_u16)
        .push(0_u16)
        // no metadata or private data
        .extend([0_u32; 5]);
    let mut offset = directory_end;
    for (tag, checksum, orig_length, stored) in &entries {
        buf = buf
            .extend_bytes(tag)
            .push(offset as u32)
            .push(stored.len() as u32)
            .push(*orig_length as u32)
            .push(*checksum);
        offset += padded_len(stored.len());
    }
    for (.., stored) in &entries {
        buf = buf.extend_bytes(stored).align4();
    }
    buf.into_inner()
}

/// A WOFF2 file holding `tables`.
///
/// `glyf` and `loca` are marked as transformed (version 0) with their data
/// used as is for the transformed stream; every other table uses the null
/// transform.
pub fn woff2(flavor: u32, tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut directory = BeBuffer::new();
    let mut stream = Vec::new();
    for (tag, data) in tables {
        directory = match WOFF2_KNOWN_TAGS.iter().position(|known| *known == tag) {
            Some(index) => directory.push(index as u8),
            None => directory.push(63_u8).extend_bytes(tag),
        };
        directory = directory.extend_bytes(&base128(data.len() as u32));
        if matches!(tag, b"glyf" | b"loca") {
            directory = directory.extend_bytes(&base128(data.len() as u32));
        }
        stream.extend_from_slice(data);
    }
    let directory = directory.into_inner();
    let compressed = brotli_stored(&stream);

    let sfnt_size = 12
        + 16 * tables.len()
        + tables
            .iter()
            .map(|(_, data)| padded_len(data.len()))
            .sum::<usize>();
    let length = padded_len(WOFF2_HEADER_LEN + directory.len() + compressed.len());

    BeBuffer::new()
        .extend_bytes(b"wOF2")
        .push(flavor)
        .push(length as u32)
        .push(tables.len() as u16)
        .push(0_u16)
        .push(sfnt_size as u32)
        .push(compressed.len() as u32)
        .push(1_u16)
        .push(0_u16)
        .extend([0_u32; 5])
        .extend_bytes(&directory)
        .extend_bytes(&compressed)
        .align4()
        .into_inner()
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A `UIntBase128` with no leading zero bytes.
fn base128(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value != 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

/// A brotli stream made of uncompressed meta-blocks.
fn brotli_stored(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    // a single zero bit selects a 16 bit window
    let mut header_bits: usize = 1;
    for chunk in data.chunks(BROTLI_MAX_STORED_BLOCK) {
        // ISLAST = 0, MNIBBLES = 4 (encoded as 0), MLEN - 1, ISUNCOMPRESSED = 1,
        // then zero padding to the byte boundary
        let mut bits = 0_u32;
        let mut len = header_bits + 1 + 2;
        bits |= (chunk.len() as u32 - 1) << len;
        len += 16;
        bits |= 1 << len;
        len += 1;
        out.extend(&bits.to_le_bytes()[..len.div_ceil(8)]);
        out.extend_from_slice(chunk);
        header_bits = 0;
    }
    // ISLAST = 1, ISLASTEMPTY = 1
    out.push(if data.is_empty() { 0b110 } else { 0b11 });
    out
}
