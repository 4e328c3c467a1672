use super::{Bit, LogicValue, Repr};
use crate::{Error, Result};
use num_bigint::{BigInt, BigUint, Sign};

impl LogicValue {
    /// Construct from a signed integer and an explicit width, interpreting
    /// `i` as two's-complement modulo `2^width`; every bit is valid.
    pub fn from_int(i: i64, width: usize) -> LogicValue {
        let big = BigInt::from(i);
        Self::from_big_int(&big, width)
    }

    /// Construct from an unsigned integer and an explicit width, modulo
    /// `2^width`; every bit is valid.
    pub fn from_u64(i: u64, width: usize) -> LogicValue {
        Self::from_big_uint(&BigUint::from(i), width)
    }

    /// Construct from an arbitrary-precision signed integer, modulo
    /// `2^width`, two's-complement.
    pub fn from_big_int(i: &BigInt, width: usize) -> LogicValue {
        let modulus = BigInt::from(1) << width;
        let mut reduced = i % &modulus;
        if reduced.sign() == Sign::Minus {
            reduced += &modulus;
        }
        let (_, bits) = reduced.into_parts();
        LogicValue {
            width,
            repr: pack_valid(width, bits),
        }
    }

    /// Construct from an arbitrary-precision unsigned integer, modulo
    /// `2^width`.
    pub fn from_big_uint(i: &BigUint, width: usize) -> LogicValue {
        let mask = (BigUint::from(1u32) << width) - BigUint::from(1u32);
        let bits = i & mask;
        LogicValue {
            width,
            repr: pack_valid(width, bits),
        }
    }

    /// A 1-bit value.
    pub fn from_bool(b: bool) -> LogicValue {
        LogicValue::filled(1, if b { Bit::One } else { Bit::Zero })
    }

    /// Construct from an iterator of bits, index 0 first (LSB-first).
    pub fn from_iter<I: IntoIterator<Item = Bit>>(bits: I) -> LogicValue {
        let collected: Vec<Bit> = bits.into_iter().collect();
        let width = collected.len();
        let mut value_bits = BigUint::from(0u32);
        let mut invalid_bits = BigUint::from(0u32);
        for (idx, bit) in collected.into_iter().enumerate() {
            let (v, u) = bit.to_parts();
            if v {
                value_bits |= BigUint::from(1u32) << idx;
            }
            if u {
                invalid_bits |= BigUint::from(1u32) << idx;
            }
        }
        LogicValue::from_pair(width, value_bits, invalid_bits)
    }

    /// Construct from a string of `0`/`1`/`x`/`z` characters, MSB first.
    /// `separator` characters (default `_`) are skipped. Width equals the
    /// number of digit characters. Any other character is a construction
    /// error.
    pub fn from_str_with_sep(s: &str, separator: char) -> Result<LogicValue> {
        let mut bits = Vec::new();
        for c in s.chars() {
            if c == separator {
                continue;
            }
            match Bit::from_char(c) {
                Some(b) => bits.push(b),
                None => {
                    return Err(Error::Construction(format!(
                        "illegal character '{c}' in logic value string {s:?}"
                    )));
                }
            }
        }
        // string is MSB-first; from_iter is LSB-first, so reverse.
        bits.reverse();
        Ok(LogicValue::from_iter(bits))
    }

    pub fn from_str(s: &str) -> Result<LogicValue> {
        Self::from_str_with_sep(s, '_')
    }
}

impl std::str::FromStr for LogicValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<LogicValue> {
        LogicValue::from_str(s)
    }
}

/// Bits are all valid; choose the cheapest representation.
fn pack_valid(width: usize, bits: BigUint) -> Repr {
    if width <= super::WORD_BITS {
        let small = bits.iter_u64_digits().next().unwrap_or(0);
        Repr::Small {
            bits: small,
            unknown: 0,
        }
    } else {
        Repr::Big {
            bits,
            unknown: BigUint::from(0u32),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for num_bigint::BigUint {}
    impl Sealed for num_bigint::BigInt {}
    impl Sealed for super::LogicValue {}
    impl Sealed for &super::LogicValue {}
}

/// Infers a width from the value being converted, per §9's "Duck-typed
/// value containers" note: the dynamically-typed "anything to LogicValue"
/// constructor of the source is re-expressed as this sealed trait so that
/// unsupported types are rejected at compile time rather than at runtime.
pub trait IntoLogicValue: sealed::Sealed {
    fn into_logic_value(self) -> LogicValue;
}

impl IntoLogicValue for i64 {
    fn into_logic_value(self) -> LogicValue {
        LogicValue::from_int(self, 64)
    }
}

impl IntoLogicValue for u64 {
    fn into_logic_value(self) -> LogicValue {
        LogicValue::from_u64(self, 64)
    }
}

impl IntoLogicValue for i32 {
    fn into_logic_value(self) -> LogicValue {
        LogicValue::from_int(self as i64, 32)
    }
}

impl IntoLogicValue for u32 {
    fn into_logic_value(self) -> LogicValue {
        LogicValue::from_u64(self as u64, 32)
    }
}

impl IntoLogicValue for BigUint {
    fn into_logic_value(self) -> LogicValue {
        let width = self.bits().max(1) as usize;
        LogicValue::from_big_uint(&self, width)
    }
}

impl IntoLogicValue for BigInt {
    fn into_logic_value(self) -> LogicValue {
        let width = (self.bits() + 1).max(1) as usize;
        LogicValue::from_big_int(&self, width)
    }
}

impl IntoLogicValue for LogicValue {
    fn into_logic_value(self) -> LogicValue {
        self
    }
}

impl IntoLogicValue for &LogicValue {
    fn into_logic_value(self) -> LogicValue {
        self.clone()
    }
}

impl LogicValue {
    /// Infer-width constructor accepting `i64`/`u64`/`BigUint`/`BigInt`/
    /// `LogicValue`, and nothing else (enforced at compile time).
    pub fn from_infer_width<T: IntoLogicValue>(v: T) -> LogicValue {
        v.into_logic_value()
    }
}
