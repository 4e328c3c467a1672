use super::{Bit, LogicValue};
use crate::{Error, Result};

fn check_width(a: &LogicValue, b: &LogicValue) -> Result<()> {
    if a.width != b.width {
        return Err(Error::WidthMismatch {
            expected: a.width,
            actual: b.width,
        });
    }
    Ok(())
}

impl LogicValue {
    /// 1-bit `1` iff both sides are fully valid and structurally equal,
    /// `0` if both valid and unequal, `x` if either side has an invalid
    /// bit. Named `eq_value` (not `eq`) to avoid shadowing `PartialEq`,
    /// which backs `==`'s structural comparison (bit-for-bit, including
    /// `x`/`z`).
    pub fn eq_value(&self, other: &LogicValue) -> Result<LogicValue> {
        check_width(self, other)?;
        if !self.is_valid() || !other.is_valid() {
            return Ok(LogicValue::filled(1, Bit::X));
        }
        Ok(LogicValue::from_bool(self == other))
    }

    /// The complement of [`Self::eq_value`]; invalid bits still propagate.
    pub fn neq_value(&self, other: &LogicValue) -> Result<LogicValue> {
        let eq = self.eq_value(other)?;
        Ok(match eq.bit_at_unsigned(0) {
            Bit::Zero => LogicValue::from_bool(true),
            Bit::One => LogicValue::from_bool(false),
            _ => LogicValue::filled(1, Bit::X),
        })
    }

    /// Unsigned comparison: `self < other`. Any invalid bit on either
    /// side yields `x`.
    pub fn lt(&self, other: &LogicValue) -> Result<LogicValue> {
        self.compare(other, std::cmp::Ordering::Less, false)
    }

    /// Unsigned comparison: `self <= other`.
    pub fn lte(&self, other: &LogicValue) -> Result<LogicValue> {
        self.compare(other, std::cmp::Ordering::Less, true)
    }

    /// Unsigned comparison: `self > other`.
    pub fn gt(&self, other: &LogicValue) -> Result<LogicValue> {
        self.compare(other, std::cmp::Ordering::Greater, false)
    }

    /// Unsigned comparison: `self >= other`.
    pub fn gte(&self, other: &LogicValue) -> Result<LogicValue> {
        self.compare(other, std::cmp::Ordering::Greater, true)
    }

    fn compare(
        &self,
        other: &LogicValue,
        wanted: std::cmp::Ordering,
        or_equal: bool,
    ) -> Result<LogicValue> {
        check_width(self, other)?;
        if !self.is_valid() || !other.is_valid() {
            return Ok(LogicValue::filled(1, Bit::X));
        }
        let (a, _) = self.to_big_pair();
        let (b, _) = other.to_big_pair();
        let ord = a.cmp(&b);
        let hit = ord == wanted || (or_equal && ord == std::cmp::Ordering::Equal);
        Ok(LogicValue::from_bool(hit))
    }

    /// Treats `x`/`z` bits on either side as wildcards; positions where
    /// both sides are valid must match. Widths must be equal.
    pub fn equals_with_dont_care(&self, other: &LogicValue) -> Result<bool> {
        check_width(self, other)?;
        for i in 0..self.width {
            let a = self.bit_at_unsigned(i);
            let b = other.bit_at_unsigned(i);
            if !a.is_valid() || !b.is_valid() {
                continue;
            }
            if a != b {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
