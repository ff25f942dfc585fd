//! The character repertoire of a loaded font.

use hashbrown::HashSet;

/// A Unicode scalar value, stored as its integer code.
pub type CodePoint = u32;

/// A Unicode variation sequence: a base character followed by a variation
/// selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariationPair {
    pub base: CodePoint,
    pub selector: CodePoint,
}

impl VariationPair {
    pub fn new(base: CodePoint, selector: CodePoint) -> Self {
        Self { base, selector }
    }

    /// The two-character string for this sequence, if both halves are valid
    /// scalar values.
    pub fn to_text(self) -> Option<String> {
        let base = char::from_u32(self.base)?;
        let selector = char::from_u32(self.selector)?;
        Some([base, selector].into_iter().collect())
    }
}

/// The characters supported by one font.
///
/// Instances are built in one go by font introspection and never modified
/// afterwards; loading another font produces a new set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontCharacterSet {
    code_points: HashSet<CodePoint>,
    variation_pairs: HashSet<VariationPair>,
}

impl FontCharacterSet {
    pub fn new(
        code_points: impl IntoIterator<Item = CodePoint>,
        variation_pairs: impl IntoIterator<Item = VariationPair>,
    ) -> Self {
        Self {
            code_points: code_points.into_iter().collect(),
            variation_pairs: variation_pairs.into_iter().collect(),
        }
    }

    /// A set with no variation sequences.
    pub fn from_code_points(code_points: impl IntoIterator<Item = CodePoint>) -> Self {
        Self::new(code_points, [])
    }

    /// Code points the font maps to a glyph.
    pub fn code_points(&self) -> &HashSet<CodePoint> {
        &self.code_points
    }

    /// Variation sequences with an explicit mapping in the font.
    pub fn variation_pairs(&self) -> &HashSet<VariationPair> {
        &self.variation_pairs
    }

    pub fn contains(&self, code_point: CodePoint) -> bool {
        self.code_points.contains(&code_point)
    }

    pub fn len(&self) -> usize {
        self.code_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_points.is_empty()
    }

    /// The supported code points in ascending order.
    pub fn sorted_code_points(&self) -> Vec<CodePoint> {
        let mut sorted: Vec<_> = self.code_points.iter().copied().collect();
        sorted.sort_unstable();
        sorted
    }
}

/// Number of elements two sets have in common.
///
/// Walks the smaller set and probes the larger one.
pub(crate) fn intersection_len(a: &HashSet<CodePoint>, b: &HashSet<CodePoint>) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|cp| large.contains(*cp)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_code_points_collapse() {
        let set = FontCharacterSet::from_code_points([0x4E00, 0x4E00, 0x4E01]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(0x4E01));
        assert!(!set.contains(0x4E02));
        assert!(set.variation_pairs().is_empty());
    }

    #[test]
    fn sorted_view() {
        let set = FontCharacterSet::from_code_points([0x9999, 0x41, 0x4E00]);
        assert_eq!(set.sorted_code_points(), vec![0x41, 0x4E00, 0x9999]);
    }

    #[test]
    fn intersection_is_symmetric() {
        let a: HashSet<u32> = [1, 2, 3, 4].into_iter().collect();
        let b: HashSet<u32> = [3, 4, 5].into_iter().collect();
        assert_eq!(intersection_len(&a, &b), 2);
        assert_eq!(intersection_len(&b, &a), 2);
        assert_eq!(intersection_len(&a, &HashSet::new()), 0);
    }

    #[test]
    fn variation_pair_text() {
        let pair = VariationPair::new(0x845B, 0xE0100);
        assert_eq!(pair.to_text().unwrap(), "\u{845B}\u{E0100}");
        assert_eq!(VariationPair::new(0xD800, 0xFE00).to_text(), None);
    }
}
