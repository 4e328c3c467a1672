//! Four-valued bit-vectors.
//!
//! A [`LogicValue`] is an immutable, width-tagged vector where each bit is
//! one of `{0, 1, x, z}`. Two values compare equal iff their widths match
//! and every bit matches, including invalid bits.

mod arith;
mod compare;
mod construct;
mod ops;
mod radix;
mod shift;
mod slice;
mod swizzle;

use num_bigint::BigUint;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single four-valued bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
    X,
    Z,
}

impl Bit {
    pub fn is_valid(self) -> bool {
        matches!(self, Bit::Zero | Bit::One)
    }

    pub fn as_char(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
            Bit::X => 'x',
            Bit::Z => 'z',
        }
    }

    fn from_char(c: char) -> Option<Bit> {
        match c {
            '0' => Some(Bit::Zero),
            '1' => Some(Bit::One),
            'x' | 'X' => Some(Bit::X),
            'z' | 'Z' => Some(Bit::Z),
            _ => None,
        }
    }

    /// Decompose into (value-bit, invalid-bit) per §3.1's two-word encoding.
    fn to_parts(self) -> (bool, bool) {
        match self {
            Bit::Zero => (false, false),
            Bit::One => (true, false),
            Bit::X => (false, true),
            Bit::Z => (true, true),
        }
    }

    fn from_parts(value_bit: bool, invalid_bit: bool) -> Bit {
        match (invalid_bit, value_bit) {
            (false, false) => Bit::Zero,
            (false, true) => Bit::One,
            (true, false) => Bit::X,
            (true, true) => Bit::Z,
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The three internal representations described in spec §3.1, kept
/// indistinguishable behind [`LogicValue`]'s public API. `Filled` is the
/// fast path for uniform values (the identity element of concatenation,
/// the result of `filled`, and most `z`/`x` fan-in defaults) since it
/// never materializes a big vector just to represent one repeated bit.
#[derive(Debug, Clone)]
pub(crate) enum Repr {
    Filled(Bit),
    Small { bits: u64, unknown: u64 },
    Big { bits: BigUint, unknown: BigUint },
}

/// An immutable, width-tagged four-valued bit-vector.
#[derive(Debug, Clone)]
pub struct LogicValue {
    pub(crate) width: usize,
    pub(crate) repr: Repr,
}

pub(crate) const WORD_BITS: usize = u64::BITS as usize;

impl LogicValue {
    pub fn width(&self) -> usize {
        self.width
    }

    /// A uniform value: every bit of the given width is `fill`.
    pub fn filled(width: usize, fill: Bit) -> LogicValue {
        LogicValue {
            width,
            repr: Repr::Filled(fill),
        }
    }

    /// `true` iff every bit is `0` or `1`.
    pub fn is_valid(&self) -> bool {
        match &self.repr {
            Repr::Filled(b) => b.is_valid() || self.width == 0,
            Repr::Small { unknown, .. } => *unknown & self.small_mask() == 0,
            Repr::Big { unknown, .. } => unknown.eq(&BigUint::from(0u32)),
        }
    }

    /// The bit at position `i`. Negative `i` counts from the high end
    /// (`-1` is the MSB), per §4.1 "Indexing and slicing".
    pub fn bit_at(&self, i: isize) -> crate::Result<Bit> {
        let idx = self.normalize_index(i)?;
        Ok(self.bit_at_unsigned(idx))
    }

    pub(crate) fn bit_at_unsigned(&self, idx: usize) -> Bit {
        match &self.repr {
            Repr::Filled(b) => *b,
            Repr::Small { bits, unknown } => {
                let value_bit = (bits >> idx) & 1 == 1;
                let invalid_bit = (unknown >> idx) & 1 == 1;
                Bit::from_parts(value_bit, invalid_bit)
            }
            Repr::Big { bits, unknown } => {
                let value_bit = bits.bit(idx as u64);
                let invalid_bit = unknown.bit(idx as u64);
                Bit::from_parts(value_bit, invalid_bit)
            }
        }
    }

    pub(crate) fn normalize_index(&self, i: isize) -> crate::Result<usize> {
        let w = self.width as isize;
        let idx = if i < 0 { w + i } else { i };
        if idx < 0 || idx >= w {
            return Err(crate::Error::IndexError(format!(
                "index {i} out of range for width {}",
                self.width
            )));
        }
        Ok(idx as usize)
    }

    fn small_mask(&self) -> u64 {
        if self.width >= WORD_BITS {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    fn big_mask(&self) -> BigUint {
        (BigUint::from(1u32) << self.width) - BigUint::from(1u32)
    }

    /// Canonicalize to the (value-bits, invalid-bits) `u64` pair, if this
    /// value's width fits in a machine word.
    pub(crate) fn to_small_pair(&self) -> Option<(u64, u64)> {
        if self.width > WORD_BITS {
            return None;
        }
        let mask = self.small_mask();
        Some(match &self.repr {
            Repr::Filled(b) => {
                let (v, u) = b.to_parts();
                (if v { mask } else { 0 }, if u { mask } else { 0 })
            }
            Repr::Small { bits, unknown } => (bits & mask, unknown & mask),
            Repr::Big { bits, unknown } => (
                bits.iter_u64_digits().next().unwrap_or(0) & mask,
                unknown.iter_u64_digits().next().unwrap_or(0) & mask,
            ),
        })
    }

    /// Canonicalize to the (value-bits, invalid-bits) `BigUint` pair.
    /// Always succeeds, regardless of width.
    pub(crate) fn to_big_pair(&self) -> (BigUint, BigUint) {
        match &self.repr {
            Repr::Filled(b) => {
                let (v, u) = b.to_parts();
                let mask = self.big_mask();
                (
                    if v { mask.clone() } else { BigUint::from(0u32) },
                    if u { mask } else { BigUint::from(0u32) },
                )
            }
            Repr::Small { bits, unknown } => {
                (BigUint::from(*bits) & self.big_mask(), BigUint::from(*unknown) & self.big_mask())
            }
            Repr::Big { bits, unknown } => (bits & self.big_mask(), unknown & self.big_mask()),
        }
    }

    /// Build from a (value-bits, invalid-bits) pair, choosing the
    /// cheapest representation for the resulting width.
    pub(crate) fn from_pair(width: usize, bits: BigUint, unknown: BigUint) -> LogicValue {
        if let Some((small_bits, small_unknown)) = small_pair(width, &bits, &unknown) {
            LogicValue {
                width,
                repr: Repr::Small {
                    bits: small_bits,
                    unknown: small_unknown,
                },
            }
        } else {
            LogicValue {
                width,
                repr: Repr::Big { bits, unknown },
            }
        }
    }
}

fn small_pair(width: usize, bits: &BigUint, unknown: &BigUint) -> Option<(u64, u64)> {
    if width > WORD_BITS {
        return None;
    }
    Some((
        bits.iter_u64_digits().next().unwrap_or(0),
        unknown.iter_u64_digits().next().unwrap_or(0),
    ))
}

impl PartialEq for LogicValue {
    fn eq(&self, other: &Self) -> bool {
        if self.width != other.width {
            return false;
        }
        match self.width.cmp(&WORD_BITS) {
            std::cmp::Ordering::Greater => self.to_big_pair() == other.to_big_pair(),
            _ => self.to_small_pair() == other.to_small_pair(),
        }
    }
}

impl Eq for LogicValue {}

impl Hash for LogicValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        if self.width <= WORD_BITS {
            self.to_small_pair().hash(state);
        } else {
            let (bits, unknown) = self.to_big_pair();
            bits.hash(state);
            unknown.hash(state);
        }
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.bit_at_unsigned(i))?;
        }
        Ok(())
    }
}
