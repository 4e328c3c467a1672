use super::{Bit, LogicValue, Repr};
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
    /// Per-bit invert. `~x = x`, `~z = x`.
    pub fn not(&self) -> LogicValue {
        if let Repr::Filled(b) = &self.repr {
            return LogicValue::filled(self.width, not_bit(*b));
        }
        let bits: Vec<Bit> = (0..self.width)
            .map(|i| not_bit(self.bit_at_unsigned(i)))
            .collect();
        LogicValue::from_iter(bits)
    }

    /// Bitwise AND per the four-valued truth table: AND with any `0`
    /// yields `0`; otherwise any invalid operand yields `x`.
    pub fn and(&self, other: &LogicValue) -> Result<LogicValue> {
        check_width(self, other)?;
        Ok(bitwise(self, other, |a, b| match (a, b) {
            (Bit::Zero, _) | (_, Bit::Zero) => Bit::Zero,
            (Bit::One, Bit::One) => Bit::One,
            _ => Bit::X,
        }))
    }

    /// Bitwise OR: OR with any `1` yields `1`; otherwise any invalid
    /// operand yields `x`.
    pub fn or(&self, other: &LogicValue) -> Result<LogicValue> {
        check_width(self, other)?;
        Ok(bitwise(self, other, |a, b| match (a, b) {
            (Bit::One, _) | (_, Bit::One) => Bit::One,
            (Bit::Zero, Bit::Zero) => Bit::Zero,
            _ => Bit::X,
        }))
    }

    /// Bitwise XOR: any invalid operand produces `x`.
    pub fn xor(&self, other: &LogicValue) -> Result<LogicValue> {
        check_width(self, other)?;
        Ok(bitwise(self, other, |a, b| match (a, b) {
            (Bit::Zero, Bit::Zero) | (Bit::One, Bit::One) => Bit::Zero,
            (Bit::Zero, Bit::One) | (Bit::One, Bit::Zero) => Bit::One,
            _ => Bit::X,
        }))
    }

    /// AND-reduction across all bits of this value.
    pub fn reduce_and(&self) -> LogicValue {
        self.reduce(Bit::One, |acc, b| match (acc, b) {
            (Bit::Zero, _) | (_, Bit::Zero) => Bit::Zero,
            (Bit::One, Bit::One) => Bit::One,
            _ => Bit::X,
        })
    }

    /// OR-reduction across all bits of this value.
    pub fn reduce_or(&self) -> LogicValue {
        self.reduce(Bit::Zero, |acc, b| match (acc, b) {
            (Bit::One, _) | (_, Bit::One) => Bit::One,
            (Bit::Zero, Bit::Zero) => Bit::Zero,
            _ => Bit::X,
        })
    }

    /// XOR-reduction across all bits of this value.
    pub fn reduce_xor(&self) -> LogicValue {
        if self.width == 0 {
            return LogicValue::filled(1, Bit::Zero);
        }
        if let Repr::Filled(b) = &self.repr {
            // XOR-folding `width` copies of the same bit: an invalid bit
            // stays invalid regardless of parity; a valid bit survives
            // only when the copy count is odd.
            return LogicValue::filled(
                1,
                if !b.is_valid() {
                    Bit::X
                } else if self.width % 2 == 1 {
                    *b
                } else {
                    Bit::Zero
                },
            );
        }
        let mut acc = Bit::Zero;
        for i in 0..self.width {
            let b = self.bit_at_unsigned(i);
            acc = match (acc, b) {
                (Bit::Zero, Bit::Zero) | (Bit::One, Bit::One) => Bit::Zero,
                (Bit::Zero, Bit::One) | (Bit::One, Bit::Zero) => Bit::One,
                _ => Bit::X,
            };
        }
        LogicValue::filled(1, acc)
    }

    fn reduce(&self, identity: Bit, f: impl Fn(Bit, Bit) -> Bit) -> LogicValue {
        if self.width == 0 {
            return LogicValue::filled(1, identity);
        }
        if let Repr::Filled(b) = &self.repr {
            // AND/OR-folding `width` copies of the same bit is idempotent
            // once an accumulator value is reached, so one application
            // against the identity settles it regardless of width.
            return LogicValue::filled(1, f(identity, *b));
        }
        let mut acc = identity;
        for i in 0..self.width {
            acc = f(acc, self.bit_at_unsigned(i));
        }
        LogicValue::filled(1, acc)
    }
}

fn not_bit(b: Bit) -> Bit {
    match b {
        Bit::Zero => Bit::One,
        Bit::One => Bit::Zero,
        Bit::X | Bit::Z => Bit::X,
    }
}

/// Generic bit-by-bit combinator, choosing the small/big fast path the
/// same way the rest of the algebra does.
fn bitwise(a: &LogicValue, b: &LogicValue, f: impl Fn(Bit, Bit) -> Bit) -> LogicValue {
    // Fast paths using the edge rules directly, without expanding a
    // Filled operand, per §4.1's short-circuit rules.
    if let (Repr::Filled(ba), Repr::Filled(bb)) = (&a.repr, &b.repr) {
        return LogicValue::filled(a.width, f(*ba, *bb));
    }
    let width = a.width;
    let mut bits = Vec::with_capacity(width);
    for i in 0..width {
        bits.push(f(a.bit_at_unsigned(i), b.bit_at_unsigned(i)));
    }
    LogicValue::from_iter(bits)
}
