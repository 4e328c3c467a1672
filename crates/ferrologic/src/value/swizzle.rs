use super::LogicValue;

impl LogicValue {
    /// Concatenation with `values[0]` at the MSB end. The result's width
    /// is the sum of the components' widths; zero-width components are
    /// the identity.
    pub fn swizzle(values: &[LogicValue]) -> LogicValue {
        let mut bits = Vec::new();
        for v in values.iter().rev() {
            for i in 0..v.width {
                bits.push(v.bit_at_unsigned(i));
            }
        }
        LogicValue::from_iter(bits)
    }

    /// Concatenation with `values[0]` at the LSB end.
    pub fn rswizzle(values: &[LogicValue]) -> LogicValue {
        let mut bits = Vec::new();
        for v in values {
            for i in 0..v.width {
                bits.push(v.bit_at_unsigned(i));
            }
        }
        LogicValue::from_iter(bits)
    }
}
