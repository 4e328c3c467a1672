use super::{Bit, LogicValue};
use crate::{Error, Result};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

fn bits_per_digit(radix: u32) -> Option<usize> {
    match radix {
        2 => Some(1),
        4 => Some(2),
        8 => Some(3),
        16 => Some(4),
        _ => None,
    }
}

fn digit_char(n: u32) -> char {
    std::char::from_digit(n, 16).unwrap()
}

impl LogicValue {
    /// Succeeds iff `is_valid()` and the width fits a machine word.
    pub fn to_int(&self) -> Result<u64> {
        if self.width > 64 {
            return Err(Error::InvalidTruncation(format!(
                "width {} does not fit in a machine word",
                self.width
            )));
        }
        if !self.is_valid() {
            return Err(Error::InvalidValueOperation(
                "value contains invalid bits".to_string(),
            ));
        }
        let (bits, _) = self.to_big_pair();
        Ok(bits.to_u64().unwrap_or(0))
    }

    /// Succeeds iff `is_valid()`.
    pub fn to_big_int(&self) -> Result<BigUint> {
        if !self.is_valid() {
            return Err(Error::InvalidValueOperation(
                "value contains invalid bits".to_string(),
            ));
        }
        Ok(self.to_big_pair().0)
    }

    /// Round-trips with [`Self::of_radix_string`]. Supported radices are
    /// `{2, 4, 8, 10, 16}`. Bit groups that don't reduce to a single
    /// radix digit (a mix of valid and invalid bits) are expanded inside
    /// `< >` markers; `x`/`z` digits are emitted uppercase.
    pub fn to_radix_string(&self, radix: u32, leading_zeros: bool, sep: Option<&str>) -> Result<String> {
        if let Some(bpd) = bits_per_digit(radix) {
            self.to_grouped_radix_string(bpd, leading_zeros, sep)
        } else if radix == 10 {
            self.to_decimal_string()
        } else {
            Err(Error::Construction(format!("unsupported radix {radix}")))
        }
    }

    fn to_grouped_radix_string(
        &self,
        bits_per_digit: usize,
        leading_zeros: bool,
        sep: Option<&str>,
    ) -> Result<String> {
        let mut tokens: Vec<String> = Vec::new();
        let mut start = 0usize;
        while start < self.width.max(1) {
            let end = (start + bits_per_digit).min(self.width);
            if start >= self.width {
                break;
            }
            tokens.push(self.group_to_token(start, end));
            start += bits_per_digit;
        }
        if tokens.is_empty() {
            tokens.push("0".to_string());
        }
        tokens.reverse();
        if !leading_zeros {
            while tokens.len() > 1 && tokens.first().map(|t| t.as_str()) == Some("0") {
                tokens.remove(0);
            }
        }
        let joiner = sep.unwrap_or("");
        Ok(tokens.join(joiner))
    }

    fn group_to_token(&self, start: usize, end: usize) -> String {
        let bits: Vec<Bit> = (start..end).map(|i| self.bit_at_unsigned(i)).collect();
        if bits.iter().all(|b| *b == Bit::X) {
            return "X".to_string();
        }
        if bits.iter().all(|b| *b == Bit::Z) {
            return "Z".to_string();
        }
        if bits.iter().all(|b| b.is_valid()) {
            let mut n: u32 = 0;
            for b in bits.iter().rev() {
                n = (n << 1) | if *b == Bit::One { 1 } else { 0 };
            }
            return digit_char(n).to_string();
        }
        let mut expanded = String::from("<");
        for b in bits.iter().rev() {
            expanded.push(match b {
                Bit::Zero => '0',
                Bit::One => '1',
                Bit::X => 'X',
                Bit::Z => 'Z',
            });
        }
        expanded.push('>');
        expanded
    }

    fn to_decimal_string(&self) -> Result<String> {
        if self.is_valid() {
            let (bits, _) = self.to_big_pair();
            Ok(bits.to_str_radix(10))
        } else {
            let mut expanded = String::from("<");
            for i in (0..self.width).rev() {
                expanded.push(self.bit_at_unsigned(i).as_char().to_ascii_uppercase());
            }
            expanded.push('>');
            Ok(expanded)
        }
    }

    /// Parses a string produced by [`Self::to_radix_string`] back into a
    /// value of the given width.
    pub fn of_radix_string(s: &str, radix: u32, width: usize) -> Result<LogicValue> {
        if let Some(bpd) = bits_per_digit(radix) {
            Self::of_grouped_radix_string(s, bpd, width)
        } else if radix == 10 {
            Self::of_decimal_string(s, width)
        } else {
            Err(Error::Construction(format!("unsupported radix {radix}")))
        }
    }

    fn of_decimal_string(s: &str, width: usize) -> Result<LogicValue> {
        if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            let bits: Vec<Bit> = inner
                .chars()
                .map(Self::char_to_bit)
                .collect::<Result<_>>()?;
            if bits.len() != width {
                return Err(Error::Construction(format!(
                    "decimal bracket width {} does not match expected width {width}",
                    bits.len()
                )));
            }
            let mut reversed = bits;
            reversed.reverse();
            return Ok(LogicValue::from_iter(reversed));
        }
        let big = s
            .parse::<BigUint>()
            .map_err(|e| Error::Construction(format!("invalid decimal string {s:?}: {e}")))?;
        Ok(LogicValue::from_big_uint(&big, width))
    }

    fn char_to_bit(c: char) -> Result<Bit> {
        match c {
            '0' => Ok(Bit::Zero),
            '1' => Ok(Bit::One),
            'x' | 'X' => Ok(Bit::X),
            'z' | 'Z' => Ok(Bit::Z),
            other => Err(Error::Construction(format!(
                "illegal character '{other}' in logic value string"
            ))),
        }
    }

    fn of_grouped_radix_string(s: &str, bits_per_digit: usize, width: usize) -> Result<LogicValue> {
        let tokens = tokenize_grouped(s);
        let mut bits: Vec<Bit> = Vec::new();
        for token in tokens.iter().rev() {
            let group_bits = Self::token_to_bits(token, bits_per_digit)?;
            bits.extend(group_bits);
        }
        bits.truncate(width);
        while bits.len() < width {
            bits.push(Bit::Zero);
        }
        Ok(LogicValue::from_iter(bits))
    }

    fn token_to_bits(token: &str, bits_per_digit: usize) -> Result<Vec<Bit>> {
        if let Some(inner) = token.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            let mut chars: Vec<Bit> = inner
                .chars()
                .map(Self::char_to_bit)
                .collect::<Result<_>>()?;
            chars.reverse();
            return Ok(chars);
        }
        if token == "X" {
            return Ok(vec![Bit::X; bits_per_digit]);
        }
        if token == "Z" {
            return Ok(vec![Bit::Z; bits_per_digit]);
        }
        let n = token
            .chars()
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| Error::Construction(format!("illegal digit {token:?}")))?;
        let mut bits = Vec::with_capacity(bits_per_digit);
        for i in 0..bits_per_digit {
            bits.push(if (n >> i) & 1 == 1 { Bit::One } else { Bit::Zero });
        }
        Ok(bits)
    }
}

/// Splits a grouped radix string into tokens, where each token is either
/// a single digit/`X`/`Z` character or a bracketed `<...>` expansion.
fn tokenize_grouped(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '<' {
            let mut tok = String::from("<");
            for c2 in chars.by_ref() {
                tok.push(c2);
                if c2 == '>' {
                    break;
                }
            }
            tokens.push(tok);
        } else {
            tokens.push(c.to_string());
        }
    }
    tokens
}
