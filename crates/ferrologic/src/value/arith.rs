use super::LogicValue;
use crate::{Bit, Error, Result};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

fn check_width(a: &LogicValue, b: &LogicValue) -> Result<()> {
    if a.width != b.width {
        return Err(Error::WidthMismatch {
            expected: a.width,
            actual: b.width,
        });
    }
    Ok(())
}

/// All arithmetic is unsigned, wraps modulo `2^w`, and yields `x`-filled
/// width-`w` on any invalid input.
fn binary_arith(
    a: &LogicValue,
    b: &LogicValue,
    f: impl Fn(&BigUint, &BigUint) -> Option<BigUint>,
) -> Result<LogicValue> {
    check_width(a, b)?;
    if !a.is_valid() || !b.is_valid() {
        return Ok(LogicValue::filled(a.width, Bit::X));
    }
    let (av, _) = a.to_big_pair();
    let (bv, _) = b.to_big_pair();
    match f(&av, &bv) {
        Some(result) => Ok(LogicValue::from_big_uint(&result, a.width)),
        None => Ok(LogicValue::filled(a.width, Bit::X)),
    }
}

impl LogicValue {
    pub fn add(&self, other: &LogicValue) -> Result<LogicValue> {
        binary_arith(self, other, |a, b| Some(a + b))
    }

    pub fn sub(&self, other: &LogicValue) -> Result<LogicValue> {
        // BigUint subtraction underflows; do the wrap in modular space by
        // adding the modulus before subtracting.
        check_width(self, other)?;
        if !self.is_valid() || !other.is_valid() {
            return Ok(LogicValue::filled(self.width, Bit::X));
        }
        let modulus = BigUint::from(1u32) << self.width;
        let (av, _) = self.to_big_pair();
        let (bv, _) = other.to_big_pair();
        let result = (&modulus + &av - &bv) % &modulus;
        Ok(LogicValue::from_big_uint(&result, self.width))
    }

    pub fn mul(&self, other: &LogicValue) -> Result<LogicValue> {
        binary_arith(self, other, |a, b| Some(a * b))
    }

    /// Integer division; divide-by-zero yields all-`x`.
    pub fn div(&self, other: &LogicValue) -> Result<LogicValue> {
        binary_arith(self, other, |a, b| {
            if b.is_zero() {
                None
            } else {
                Some(a / b)
            }
        })
    }

    /// Modulo; modulo-by-zero yields all-`x`.
    pub fn rem(&self, other: &LogicValue) -> Result<LogicValue> {
        binary_arith(self, other, |a, b| {
            if b.is_zero() {
                None
            } else {
                Some(a % b)
            }
        })
    }

    /// Exponentiation by successive squaring. The exponent is reduced to
    /// a machine word; if it is not representable there, fails with
    /// `invalid-truncation`.
    pub fn pow(&self, exponent: &LogicValue) -> Result<LogicValue> {
        if !self.is_valid() || !exponent.is_valid() {
            return Ok(LogicValue::filled(self.width, Bit::X));
        }
        let exp = exponent.to_big_int_value();
        let exp_u64: u64 = exp.to_u64().ok_or_else(|| {
            Error::InvalidTruncation(format!(
                "exponent {} does not fit in a machine word",
                exponent
            ))
        })?;
        let (base, _) = self.to_big_pair();
        let modulus = BigUint::from(1u32) << self.width;
        let result = base.modpow(&BigUint::from(exp_u64), &modulus);
        Ok(LogicValue::from_big_uint(&result, self.width))
    }

    /// Reinterprets as two's-complement: negate (truncated to width) if
    /// the sign bit is `1`, otherwise unchanged.
    pub fn abs(&self) -> Result<LogicValue> {
        if self.width == 0 {
            return Ok(self.clone());
        }
        if !self.is_valid() {
            return Ok(LogicValue::filled(self.width, Bit::X));
        }
        let sign = self.bit_at_unsigned(self.width - 1);
        if sign == Bit::Zero {
            return Ok(self.clone());
        }
        let modulus = BigUint::from(1u32) << self.width;
        let (bits, _) = self.to_big_pair();
        let negated = (&modulus - &bits) % &modulus;
        Ok(LogicValue::from_big_uint(&negated, self.width))
    }

    fn to_big_int_value(&self) -> BigUint {
        let (bits, _) = self.to_big_pair();
        bits
    }
}
