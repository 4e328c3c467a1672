use super::{Bit, LogicValue};
use crate::{Error, Result};

impl LogicValue {
    /// Single-bit access via a [`crate::Result`]-returning call, as used
    /// internally; `[]`-style indexing is exposed through [`Self::bit_at`].
    pub fn get(&self, i: isize) -> Result<Bit> {
        self.bit_at(i)
    }

    fn normalize_bound(&self, i: isize) -> Result<usize> {
        let w = self.width as isize;
        let idx = if i < 0 { w + i } else { i };
        if idx < 0 || idx > w {
            return Err(Error::IndexError(format!(
                "bound {i} out of range for width {}",
                self.width
            )));
        }
        Ok(idx as usize)
    }

    /// Half-open range `[start, end)`. Negative bounds count from the
    /// high end. `start == end` yields a zero-width value; `start > end`
    /// after normalization is an error.
    pub fn get_range(&self, start: isize, end: isize) -> Result<LogicValue> {
        let s = self.normalize_bound(start)?;
        let e = self.normalize_bound(end)?;
        if s == e {
            return Ok(LogicValue::filled(0, Bit::Zero));
        }
        if s > e {
            return Err(Error::IndexError(format!(
                "range [{start}, {end}) is inverted after normalization"
            )));
        }
        let bits: Vec<Bit> = (s..e).map(|i| self.bit_at_unsigned(i)).collect();
        Ok(LogicValue::from_iter(bits))
    }

    /// Inclusive-endpoint slice. `a <= b` yields the natural subrange
    /// (LSB at `a`, MSB at `b`); `a > b` walks from `a` down to `b`,
    /// which is the reversed traversal of the same positions. Negative
    /// indices count from the high end. Out-of-range indices fail with
    /// `index-error`.
    pub fn slice(&self, a: isize, b: isize) -> Result<LogicValue> {
        let ia = self.normalize_index(a)?;
        let ib = self.normalize_index(b)?;
        let (lo, hi) = if ia <= ib { (ia, ib) } else { (ib, ia) };
        let bits: Vec<Bit> = if ia <= ib {
            (lo..=hi).map(|i| self.bit_at_unsigned(i)).collect()
        } else {
            (lo..=hi).rev().map(|i| self.bit_at_unsigned(i)).collect()
        };
        Ok(LogicValue::from_iter(bits))
    }

    /// MSB/LSB bit order swapped.
    pub fn reversed(&self) -> LogicValue {
        if self.width == 0 {
            return self.clone();
        }
        let bits: Vec<Bit> = (0..self.width)
            .map(|i| self.bit_at_unsigned(self.width - 1 - i))
            .collect();
        LogicValue::from_iter(bits)
    }
}
