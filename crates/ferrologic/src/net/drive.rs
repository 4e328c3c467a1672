//! Operator modules: thin `Logic` factories whose value tracks an
//! operation over their inputs, recomputed on every input glitch (spec
//! §4.2). Each wraps the corresponding [`LogicValue`] algebra already
//! implemented in the `value` module.

use super::Logic;
use crate::{LogicValue, Result};

macro_rules! unary_op {
    ($name:ident, $f:ident) => {
        pub fn $name(&self) -> Logic {
            let a = self.clone();
            let out = Logic::new(a.width());
            out.claim_driver(vec![a.clone()], move || a.value().$f())
                .expect("operator width is self-consistent by construction");
            out
        }
    };
}

macro_rules! binary_op_same_width {
    ($name:ident, $f:ident) => {
        pub fn $name(&self, other: &Logic) -> Result<Logic> {
            if self.width() != other.width() {
                return Err(crate::Error::WidthMismatch {
                    expected: self.width(),
                    actual: other.width(),
                });
            }
            let a = self.clone();
            let b = other.clone();
            let out = Logic::new(a.width());
            out.claim_driver(vec![a.clone(), b.clone()], move || {
                a.value().$f(&b.value()).unwrap_or_else(|_| {
                    LogicValue::filled(a.width(), crate::Bit::X)
                })
            })?;
            Ok(out)
        }
    };
}

macro_rules! compare_op {
    ($name:ident, $f:ident) => {
        pub fn $name(&self, other: &Logic) -> Result<Logic> {
            if self.width() != other.width() {
                return Err(crate::Error::WidthMismatch {
                    expected: self.width(),
                    actual: other.width(),
                });
            }
            let a = self.clone();
            let b = other.clone();
            let out = Logic::new(1);
            out.claim_driver(vec![a.clone(), b.clone()], move || {
                a.value()
                    .$f(&b.value())
                    .unwrap_or_else(|_| LogicValue::filled(1, crate::Bit::X))
            })?;
            Ok(out)
        }
    };
}

impl Logic {
    unary_op!(not, not);
    unary_op!(reversed, reversed);

    binary_op_same_width!(and, and);
    binary_op_same_width!(or, or);
    binary_op_same_width!(xor, xor);
    binary_op_same_width!(add, add);
    binary_op_same_width!(sub, sub);
    binary_op_same_width!(mul, mul);
    binary_op_same_width!(div, div);
    binary_op_same_width!(rem, rem);

    compare_op!(eq_value, eq_value);
    compare_op!(neq_value, neq_value);
    compare_op!(lt, lt);
    compare_op!(lte, lte);
    compare_op!(gt, gt);
    compare_op!(gte, gte);

    /// Single-bit tap, as an operator net rather than an immediate
    /// `LogicValue` read.
    pub fn bit(&self, i: isize) -> Result<Logic> {
        let a = self.clone();
        a.value().bit_at(i)?;
        let out = Logic::new(1);
        out.claim_driver(vec![a.clone()], move || {
            LogicValue::filled(1, a.value().bit_at(i).unwrap_or(crate::Bit::X))
        })?;
        Ok(out)
    }

    /// Inclusive-endpoint slice, as an operator net.
    pub fn slice(&self, a_idx: isize, b_idx: isize) -> Result<Logic> {
        let a = self.clone();
        let width = a.value().slice(a_idx, b_idx)?.width();
        let out = Logic::new(width);
        out.claim_driver(vec![a.clone()], move || {
            a.value()
                .slice(a_idx, b_idx)
                .unwrap_or_else(|_| LogicValue::filled(width, crate::Bit::X))
        })?;
        Ok(out)
    }

    /// Logical shifts, as operator nets; `shamt` is evaluated once at
    /// wiring time as a plain integer (use [`Logic::shl_by`] family for a
    /// dynamic shamt net).
    pub fn shl(&self, shamt: usize) -> Logic {
        let a = self.clone();
        let out = Logic::new(a.width());
        out.claim_driver(vec![a.clone()], move || a.value().shl(shamt))
            .expect("shift preserves width");
        out
    }

    pub fn lshr(&self, shamt: usize) -> Logic {
        let a = self.clone();
        let out = Logic::new(a.width());
        out.claim_driver(vec![a.clone()], move || a.value().lshr(shamt))
            .expect("shift preserves width");
        out
    }

    pub fn ashr(&self, shamt: usize) -> Logic {
        let a = self.clone();
        let out = Logic::new(a.width());
        out.claim_driver(vec![a.clone()], move || a.value().ashr(shamt))
            .expect("shift preserves width");
        out
    }

    /// A net whose value mirrors `on_true` when `sel` is `1` and
    /// `on_false` when `sel` is `0`, `x`-filled when `sel` is invalid.
    /// The building block [`crate::conditional`] lowers `Case`/`CaseZ`
    /// chains into.
    pub fn mux(sel: &Logic, on_true: &Logic, on_false: &Logic) -> Result<Logic> {
        if on_true.width() != on_false.width() {
            return Err(crate::Error::WidthMismatch {
                expected: on_true.width(),
                actual: on_false.width(),
            });
        }
        let width = on_true.width();
        let sel = sel.clone();
        let t = on_true.clone();
        let f = on_false.clone();
        let out = Logic::new(width);
        out.claim_driver(vec![sel.clone(), t.clone(), f.clone()], move || {
            match sel.value().bit_at_unsigned(0) {
                crate::Bit::One => t.value(),
                crate::Bit::Zero => f.value(),
                _ => LogicValue::filled(width, crate::Bit::X),
            }
        })?;
        Ok(out)
    }

    /// Concatenation with `nets[0]` at the MSB end.
    pub fn swizzle(nets: &[Logic]) -> Logic {
        let nets: Vec<Logic> = nets.to_vec();
        let width: usize = nets.iter().map(Logic::width).sum();
        let out = Logic::new(width);
        let sources = nets.clone();
        out.claim_driver(sources, move || {
            let values: Vec<LogicValue> = nets.iter().map(Logic::value).collect();
            LogicValue::swizzle(&values)
        })
        .expect("swizzle width is the sum of inputs by construction");
        out
    }

    /// Concatenation with `nets[0]` at the LSB end.
    pub fn rswizzle(nets: &[Logic]) -> Logic {
        let nets: Vec<Logic> = nets.to_vec();
        let width: usize = nets.iter().map(Logic::width).sum();
        let out = Logic::new(width);
        let sources = nets.clone();
        out.claim_driver(sources, move || {
            let values: Vec<LogicValue> = nets.iter().map(Logic::value).collect();
            LogicValue::rswizzle(&values)
        })
        .expect("rswizzle width is the sum of inputs by construction");
        out
    }
}
