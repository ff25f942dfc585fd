//! Unpacking WOFF and WOFF2 web fonts into plain sfnt data.
//!
//! Only the container is undone. WOFF2 tables stored with a transform
//! (`glyf`, `loca` and sometimes `hmtx`) are left out of the rebuilt font,
//! as reading characters and names never touches them.

use std::cmp::Ordering;
use std::io::Read;

use skrifa::raw::{FontData, ReadError};

pub(crate) const WOFF_SIGNATURE: [u8; 4] = *b"wOFF";
pub(crate) const WOFF2_SIGNATURE: [u8; 4] = *b"wOF2";

const TTC_FLAVOR: u32 = u32::from_be_bytes(*b"ttcf");
const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;
const WOFF2_HEADER_LEN: usize = 48;
const BROTLI_BUFFER_SIZE: usize = 4096;

/// Tags addressed by index in a WOFF2 table directory entry.
#[rustfmt::skip]
const WOFF2_KNOWN_TAGS: [[u8; 4]; 63] = [
    *b"cmap", *b"head", *b"hhea", *b"hmtx", *b"maxp", *b"name", *b"OS/2", *b"post",
    *b"cvt ", *b"fpgm", *b"glyf", *b"loca", *b"prep", *b"CFF ", *b"VORG", *b"EBDT",
    *b"EBLC", *b"gasp", *b"hdmx", *b"kern", *b"LTSH", *b"PCLT", *b"VDMX", *b"vhea",
    *b"vmtx", *b"BASE", *b"GDEF", *b"GPOS", *b"GSUB", *b"EBSC", *b"JSTF", *b"MATH",
    *b"CBDT", *b"CBLC", *b"COLR", *b"CPAL", *b"SVG ", *b"sbix", *b"acnt", *b"avar",
    *b"bdat", *b"bloc", *b"bsln", *b"cvar", *b"fdsc", *b"feat", *b"fmtx", *b"fvar",
    *b"gvar", *b"hsty", *b"just", *b"lcar", *b"mort", *b"morx", *b"opbd", *b"prop",
    *b"trak", *b"Zapf", *b"Silf", *b"Glat", *b"Gloc", *b"Feat", *b"Sill",
];
const WOFF2_ARBITRARY_TAG: u8 = 63;

/// Errors from unpacking a web font container.
#[derive(Debug, thiserror::Error)]
pub enum WebFontError {
    #[error("malformed table directory: {0}")]
    Directory(#[from] ReadError),
    #[error("invalid compressed data: {0}")]
    Decompress(#[from] std::io::Error),
    #[error("table '{}' does not have its declared length", String::from_utf8_lossy(.0))]
    LengthMismatch([u8; 4]),
    #[error("compressed data is longer than the table directory declares")]
    ExcessData,
    #[error("WOFF2 font collections are not supported")]
    Collection,
}

struct Table {
    tag: [u8; 4],
    checksum: u32,
    data: Vec<u8>,
}

/// Rebuild the sfnt wrapped in a WOFF 1.0 file.
pub(crate) fn decode_woff(data: &[u8]) -> Result<Vec<u8>, WebFontError> {
    let header = FontData::new(data);
    let flavor: u32 = header.read_at(4)?;
    let num_tables: u16 = header.read_at(12)?;
    let mut tables = Vec::with_capacity(num_tables as usize);
    for i in 0..num_tables as usize {
        let entry = WOFF_HEADER_LEN + i * WOFF_ENTRY_LEN;
        let tag = header.read_at::<u32>(entry)?.to_be_bytes();
        let offset = header.read_at::<u32>(entry + 4)? as usize;
        let comp_length = header.read_at::<u32>(entry + 8)? as usize;
        let orig_length = header.read_at::<u32>(entry + 12)? as usize;
        let checksum: u32 = header.read_at(entry + 16)?;
        let stored = slice(data, offset, comp_length)?;
        let data = match comp_length.cmp(&orig_length) {
            Ordering::Equal => stored.to_vec(),
            Ordering::Less => {
                let mut table = Vec::with_capacity(orig_length);
                flate2::read::ZlibDecoder::new(stored)
                    .take(orig_length as u64 + 1)
                    .read_to_end(&mut table)?;
                table
            }
            Ordering::Greater => return Err(WebFontError::LengthMismatch(tag)),
        };
        if data.len() != orig_length {
            return Err(WebFontError::LengthMismatch(tag));
        }
        tables.push(Table {
            tag,
            checksum,
            data,
        });
    }
    log::debug!("unpacked WOFF with {} tables", tables.len());
    Ok(build_sfnt(flavor, tables))
}

struct Woff2Entry {
    tag: [u8; 4],
    /// Bytes the table occupies in the decompressed stream.
    stream_length: usize,
    transformed: bool,
}

/// Rebuild the sfnt wrapped in a WOFF2 file.
pub(crate) fn decode_woff2(data: &[u8]) -> Result<Vec<u8>, WebFontError> {
    let header = FontData::new(data);
    let flavor: u32 = header.read_at(4)?;
    if flavor == TTC_FLAVOR {
        return Err(WebFontError::Collection);
    }
    let num_tables: u16 = header.read_at(12)?;
    let compressed_len = header.read_at::<u32>(20)? as usize;

    let mut directory = Cursor {
        data: header,
        pos: WOFF2_HEADER_LEN,
    };
    let mut entries = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let flags = directory.read_u8()?;
        let tag = match flags & 0x3F {
            WOFF2_ARBITRARY_TAG => directory.read_u32()?.to_be_bytes(),
            index => WOFF2_KNOWN_TAGS[index as usize],
        };
        let version = flags >> 6;
        let orig_length = directory.read_base128()?;
        // for glyf and loca version 3 is the null transform, for others it is 0
        let transformed = match &tag {
            b"glyf" | b"loca" => version != 3,
            _ => version != 0,
        };
        let stream_length = if transformed {
            directory.read_base128()?
        } else {
            orig_length
        };
        entries.push(Woff2Entry {
            tag,
            stream_length: stream_length as usize,
            transformed,
        });
    }

    let compressed = slice(data, directory.pos, compressed_len)?;
    let total: usize = entries.iter().map(|entry| entry.stream_length).sum();
    let mut stream = Vec::new();
    brotli_decompressor::Decompressor::new(compressed, BROTLI_BUFFER_SIZE)
        .take(total as u64 + 1)
        .read_to_end(&mut stream)?;

    let mut tables = Vec::with_capacity(entries.len());
    let mut offset = 0;
    for entry in entries {
        let end = offset + entry.stream_length;
        let Some(bytes) = stream.get(offset..end) else {
            return Err(WebFontError::LengthMismatch(entry.tag));
        };
        offset = end;
        if entry.transformed {
            log::debug!(
                "leaving out transformed '{}' table",
                String::from_utf8_lossy(&entry.tag)
            );
            continue;
        }
        tables.push(Table {
            tag: entry.tag,
            checksum: checksum(bytes),
            data: bytes.to_vec(),
        });
    }
    if offset != stream.len() {
        return Err(WebFontError::ExcessData);
    }
    log::debug!("unpacked WOFF2 with {} tables", tables.len());
    Ok(build_sfnt(flavor, tables))
}

/// Sequential reads over a WOFF2 table directory.
struct Cursor<'a> {
    data: FontData<'a>,
    pos: usize,
}

impl Cursor<'_> {
    fn read_u8(&mut self) -> Result<u8, ReadError> {
        let value = self.data.read_at(self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    fn read_u32(&mut self) -> Result<u32, ReadError> {
        let value = self.data.read_at(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// A `UIntBase128`: at most five bytes, seven bits each, most significant first.
    fn read_base128(&mut self) -> Result<u32, ReadError> {
        let mut value = 0u32;
        for i in 0..5 {
            let byte = self.read_u8()?;
            if i == 0 && byte == 0x80 {
                return Err(ReadError::MalformedData("UIntBase128 with leading zeros"));
            }
            if value & 0xFE00_0000 != 0 {
                return Err(ReadError::MalformedData("UIntBase128 overflows 32 bits"));
            }
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReadError::MalformedData("UIntBase128 longer than five bytes"))
    }
}

fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8], ReadError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(ReadError::OutOfBounds)
}

fn build_sfnt(flavor: u32, mut tables: Vec<Table>) -> Vec<u8> {
    // records must be sorted by tag
    tables.sort_by_key(|table| table.tag);
    let num_tables = tables.len() as u32;
    let entry_selector = num_tables.checked_ilog2().unwrap_or(0);
    let search_range = 16 << entry_selector;
    let range_shift = (16 * num_tables).saturating_sub(search_range);

    let directory_len = 12 + 16 * tables.len();
    let body_len: usize = tables
        .iter()
        .map(|table| table.data.len().next_multiple_of(4))
        .sum();
    let mut out = Vec::with_capacity(directory_len + body_len);
    out.extend(flavor.to_be_bytes());
    out.extend((num_tables as u16).to_be_bytes());
    out.extend((search_range as u16).to_be_bytes());
    out.extend((entry_selector as u16).to_be_bytes());
    out.extend((range_shift as u16).to_be_bytes());

    let mut offset = directory_len;
    for table in &tables {
        out.extend(table.tag);
        out.extend(table.checksum.to_be_bytes());
        out.extend((offset as u32).to_be_bytes());
        out.extend((table.data.len() as u32).to_be_bytes());
        offset += table.data.len().next_multiple_of(4);
    }
    for table in &tables {
        out.extend_from_slice(&table.data);
        out.resize(out.len().next_multiple_of(4), 0);
    }
    out
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}
