//! Big-endian byte assembly for the synthesized fonts.

/// A 24-bit unsigned integer, as used by the cmap format 14 subtable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uint24(pub u32);

/// A value with a fixed big-endian encoding.
pub trait Scalar {
    fn write_be(&self, out: &mut Vec<u8>);
}

impl Scalar for u8 {
    fn write_be(&self, out: &mut Vec<u8>) {
        out.push(*self)
    }
}

impl Scalar for u16 {
    fn write_be(&self, out: &mut Vec<u8>) {
        out.extend(self.to_be_bytes())
    }
}

impl Scalar for u32 {
    fn write_be(&self, out: &mut Vec<u8>) {
        out.extend(self.to_be_bytes())
    }
}

impl Scalar for Uint24 {
    fn write_be(&self, out: &mut Vec<u8>) {
        out.extend(&self.0.to_be_bytes()[1..])
    }
}

/// Builder for a byte vector of font data.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer(Vec<u8>);

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(mut self, item: impl Scalar) -> Self {
        item.write_be(&mut self.0);
        self
    }

    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            item.write_be(&mut self.0);
        }
        self
    }

    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    /// Zero padding up to the next four byte boundary.
    pub fn align4(mut self) -> Self {
        let padded = self.0.len().next_multiple_of(4);
        self.0.resize(padded, 0);
        self
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}
