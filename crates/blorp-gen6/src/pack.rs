//! # Field Packer
//!
//! Hardware registers are described as tables of named bit fields. Every
//! word is assembled through [`pack`], which checks that each value fits its
//! field and that no two fields of one word overlap.

// =============================================================================
// FIELD
// =============================================================================

/// A bit field within a 32-bit hardware word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name used in diagnostics
    pub name: &'static str,
    /// Lowest bit
    pub shift: u32,
    /// Width in bits
    pub width: u32,
}

impl Field {
    /// Define a field. Fails const evaluation if it leaves the word.
    pub const fn new(name: &'static str, shift: u32, width: u32) -> Self {
        assert!(width > 0 && shift + width <= 32);
        Self { name, shift, width }
    }

    /// A single-bit field
    pub const fn bit(name: &'static str, shift: u32) -> Self {
        Self::new(name, shift, 1)
    }

    /// Largest value the field holds
    #[inline]
    pub const fn max(self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    /// Bits the field occupies in the word
    #[inline]
    pub const fn mask(self) -> u32 {
        self.max() << self.shift
    }

    /// Shift `value` into place.
    ///
    /// # Panics
    ///
    /// If `value` is wider than the field.
    #[inline]
    pub fn encode(self, value: u32) -> u32 {
        assert!(
            value <= self.max(),
            "{} value {:#x} overflows {}-bit field",
            self.name,
            value,
            self.width
        );
        value << self.shift
    }

    /// Read the field back out of a word
    #[inline]
    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.shift) & self.max()
    }
}

// =============================================================================
// PACKER
// =============================================================================

/// Assemble one word from `(field, value)` pairs.
///
/// # Panics
///
/// If a value overflows its field or two fields share a bit.
pub fn pack(fields: &[(Field, u32)]) -> u32 {
    let mut word = 0;
    let mut used = 0;
    for &(field, value) in fields {
        assert!(
            used & field.mask() == 0,
            "field {} overlaps another field of the same word",
            field.name
        );
        used |= field.mask();
        word |= field.encode(value);
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOD: Field = Field::new("lod", 2, 4);
    const WIDTH: Field = Field::new("width", 6, 13);
    const HEIGHT: Field = Field::new("height", 19, 13);

    #[test]
    fn test_pack_places_fields() {
        let word = pack(&[(LOD, 0), (WIDTH, 63), (HEIGHT, 31)]);
        assert_eq!(word, 63 << 6 | 31 << 19);
        assert_eq!(WIDTH.extract(word), 63);
        assert_eq!(HEIGHT.extract(word), 31);
    }

    #[test]
    fn test_full_width_field() {
        let addr = Field::new("address", 0, 32);
        assert_eq!(addr.max(), u32::MAX);
        assert_eq!(pack(&[(addr, 0xdead_beef)]), 0xdead_beef);
    }

    #[test]
    #[should_panic(expected = "width value 0x2000 overflows 13-bit field")]
    fn test_overflow_panics() {
        pack(&[(WIDTH, 8192)]);
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn test_overlap_panics() {
        let wide = Field::new("wide lod", 4, 4);
        pack(&[(LOD, 1), (wide, 1)]);
    }
}
