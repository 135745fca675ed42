use std::sync::OnceLock;

/// Precomputed `round(a * v / 255)` for all `a, v` in `0..=255`.
pub struct BlendTable {
    values: Vec<u8>,
}

impl BlendTable {
    fn build() -> Self {
        let mut values = Vec::with_capacity(256 * 256);
        for a in 0..=255u16 {
            for v in 0..=255u16 {
                values.push(mul_div255(a, v));
            }
        }
        Self { values }
    }

    /// Process-wide table, built on first use.
    pub fn shared() -> &'static BlendTable {
        static TABLE: OnceLock<BlendTable> = OnceLock::new();
        TABLE.get_or_init(BlendTable::build)
    }

    /// `round(a * v / 255)`.
    #[inline]
    pub fn blend(&self, a: u8, v: u8) -> u8 {
        self.values[(usize::from(a) << 8) | usize::from(v)]
    }

    /// Source-over one channel: `blend(255 - alpha, dst) + blend(alpha, src)`.
    ///
    /// Never exceeds 255 for inputs in range.
    #[inline]
    pub fn over(&self, dst: u8, src: u8, alpha: u8) -> u8 {
        let out = u16::from(self.blend(255 - alpha, dst)) + u16::from(self.blend(alpha, src));
        out.min(255) as u8
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
