use super::{Bit, LogicValue};
use num_bigint::BigUint;

/// A resolved shift amount: either a definite, in-range count, something
/// large enough to act as "shift past the width" (including negative
/// shamts, per §4.1: "Negative shamt is treated as if the shamt's
/// integer value were very large"), or an invalid shamt (`x`/`z` bits),
/// which makes the whole result `x`-filled.
pub enum Shamt {
    Count(BigUint),
    Huge,
    Invalid,
}

impl From<usize> for Shamt {
    fn from(n: usize) -> Shamt {
        Shamt::Count(BigUint::from(n))
    }
}

impl From<i64> for Shamt {
    fn from(n: i64) -> Shamt {
        if n < 0 {
            Shamt::Huge
        } else {
            Shamt::Count(BigUint::from(n as u64))
        }
    }
}

impl From<BigUint> for Shamt {
    fn from(n: BigUint) -> Shamt {
        Shamt::Count(n)
    }
}

impl From<&LogicValue> for Shamt {
    fn from(v: &LogicValue) -> Shamt {
        if !v.is_valid() {
            Shamt::Invalid
        } else {
            Shamt::Count(v.to_big_pair().0)
        }
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Left,
    LogicalRight,
    ArithRight,
}

fn fill_bit(msb: Bit) -> Bit {
    if msb.is_valid() {
        msb
    } else {
        Bit::X
    }
}

impl LogicValue {
    /// Logical left shift; vacated LSBs become `0`.
    pub fn shl(&self, shamt: impl Into<Shamt>) -> LogicValue {
        self.shift(shamt.into(), Kind::Left)
    }

    /// Logical right shift; vacated MSBs become `0`.
    pub fn lshr(&self, shamt: impl Into<Shamt>) -> LogicValue {
        self.shift(shamt.into(), Kind::LogicalRight)
    }

    /// Arithmetic right shift; vacated MSBs replicate the MSB (`x` if the
    /// MSB is invalid).
    pub fn ashr(&self, shamt: impl Into<Shamt>) -> LogicValue {
        self.shift(shamt.into(), Kind::ArithRight)
    }

    fn msb(&self) -> Bit {
        if self.width == 0 {
            Bit::Zero
        } else {
            self.bit_at_unsigned(self.width - 1)
        }
    }

    fn shift(&self, shamt: Shamt, kind: Kind) -> LogicValue {
        if self.width == 0 {
            return self.clone();
        }
        let shamt = match shamt {
            Shamt::Invalid => return LogicValue::filled(self.width, Bit::X),
            Shamt::Huge => None,
            Shamt::Count(n) => {
                if n >= BigUint::from(self.width) {
                    None
                } else {
                    Some(n.iter_u64_digits().next().unwrap_or(0) as usize)
                }
            }
        };
        let Some(n) = shamt else {
            return match kind {
                Kind::Left | Kind::LogicalRight => LogicValue::filled(self.width, Bit::Zero),
                Kind::ArithRight => LogicValue::filled(self.width, fill_bit(self.msb())),
            };
        };
        if n == 0 {
            return self.clone();
        }
        let (bits, unknown) = self.to_big_pair();
        let mask = (BigUint::from(1u32) << self.width) - BigUint::from(1u32);
        match kind {
            Kind::Left => {
                let new_bits = (bits << n) & &mask;
                let new_unknown = (unknown << n) & &mask;
                LogicValue::from_pair(self.width, new_bits, new_unknown)
            }
            Kind::LogicalRight => {
                let new_bits = bits >> n;
                let new_unknown = unknown >> n;
                LogicValue::from_pair(self.width, new_bits, new_unknown)
            }
            Kind::ArithRight => {
                let msb = self.msb();
                let fill_width = n;
                let fill_mask = (&mask) >> (self.width - fill_width);
                let fill_mask = fill_mask << (self.width - fill_width);
                let (fv, fu) = msb.sign_fill_parts();
                let shifted_bits = bits >> n;
                let shifted_unknown = unknown >> n;
                let new_bits = shifted_bits | if fv { fill_mask.clone() } else { BigUint::from(0u32) };
                let new_unknown = shifted_unknown | if fu { fill_mask } else { BigUint::from(0u32) };
                LogicValue::from_pair(self.width, new_bits, new_unknown)
            }
        }
    }
}

impl Bit {
    fn sign_fill_parts(self) -> (bool, bool) {
        if self.is_valid() {
            (self == Bit::One, false)
        } else {
            (false, true)
        }
    }
}
