use std::str::FromStr;

use crate::foundation::error::{LedStripError, LedStripResult};

/// 256-entry brightness lookup table.
pub type CurveTable = [u8; 256];

/// Built-in curve generators, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// Identity mapping.
    Linear,
    /// `255 - v`.
    InvertedLinear,
    /// Linear, scaled to a maximum of 224.
    Linear0To224,
    /// Linear, scaled to a maximum of 192.
    Linear0To192,
    /// Linear, scaled to a maximum of 160.
    Linear0To160,
    /// Linear, scaled to a maximum of 128.
    Linear0To128,
    /// Linear, scaled to a maximum of 96.
    Linear0To96,
    /// Linear, scaled to a maximum of 64.
    Linear0To64,
    /// Linear, scaled to a maximum of 32.
    Linear0To32,
    /// Linear, scaled to a maximum of 16.
    Linear0To16,
    /// Power curve with exponent 2.2 (perceptual brightness).
    Gamma22,
}

impl CurveKind {
    /// All generator kinds.
    pub const ALL: [CurveKind; 11] = [
        CurveKind::Linear,
        CurveKind::InvertedLinear,
        CurveKind::Linear0To224,
        CurveKind::Linear0To192,
        CurveKind::Linear0To160,
        CurveKind::Linear0To128,
        CurveKind::Linear0To96,
        CurveKind::Linear0To64,
        CurveKind::Linear0To32,
        CurveKind::Linear0To16,
        CurveKind::Gamma22,
    ];

    /// Generator name as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            CurveKind::Linear => "Linear",
            CurveKind::InvertedLinear => "InvertedLinear",
            CurveKind::Linear0To224 => "Linear0To224",
            CurveKind::Linear0To192 => "Linear0To192",
            CurveKind::Linear0To160 => "Linear0To160",
            CurveKind::Linear0To128 => "Linear0To128",
            CurveKind::Linear0To96 => "Linear0To96",
            CurveKind::Linear0To64 => "Linear0To64",
            CurveKind::Linear0To32 => "Linear0To32",
            CurveKind::Linear0To16 => "Linear0To16",
            CurveKind::Gamma22 => "Gamma22",
        }
    }

    /// Compute the lookup table of this generator.
    pub fn table(self) -> CurveTable {
        match self {
            CurveKind::Linear => scaled_linear(255),
            CurveKind::InvertedLinear => std::array::from_fn(|i| 255 - i as u8),
            CurveKind::Linear0To224 => scaled_linear(224),
            CurveKind::Linear0To192 => scaled_linear(192),
            CurveKind::Linear0To160 => scaled_linear(160),
            CurveKind::Linear0To128 => scaled_linear(128),
            CurveKind::Linear0To96 => scaled_linear(96),
            CurveKind::Linear0To64 => scaled_linear(64),
            CurveKind::Linear0To32 => scaled_linear(32),
            CurveKind::Linear0To16 => scaled_linear(16),
            CurveKind::Gamma22 => std::array::from_fn(|i| {
                let v = (i as f64 / 255.0).powf(2.2) * 255.0;
                v.round().clamp(0.0, 255.0) as u8
            }),
        }
    }
}

impl FromStr for CurveKind {
    type Err = LedStripError;

    fn from_str(s: &str) -> LedStripResult<Self> {
        CurveKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| LedStripError::validation(format!("unknown curve kind '{s}'")))
    }
}

fn scaled_linear(max: u32) -> CurveTable {
    std::array::from_fn(|i| (((i as u32) * max + 127) / 255) as u8)
}

/// Resolved brightness-correction curve.
///
/// Applied to each color channel after compositing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FadingCurve {
    name: Option<String>,
    table: CurveTable,
}

impl Default for FadingCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl FadingCurve {
    /// Anonymous identity curve.
    pub fn linear() -> Self {
        Self::from_kind(CurveKind::Linear)
    }

    /// Anonymous curve produced by a generator.
    pub fn from_kind(kind: CurveKind) -> Self {
        Self {
            name: None,
            table: kind.table(),
        }
    }

    /// Curve carrying a registry name.
    pub fn named(name: impl Into<String>, table: CurveTable) -> Self {
        Self {
            name: Some(name.into()),
            table,
        }
    }

    /// Registry name, if the curve came from (or was added to) a registry.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The lookup table.
    pub fn table(&self) -> &CurveTable {
        &self.table
    }

    /// Corrected brightness for a linear input.
    #[inline]
    pub fn apply(&self, v: u8) -> u8 {
        self.table[usize::from(v)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fading/curve.rs"]
mod tests;
