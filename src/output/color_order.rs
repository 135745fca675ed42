use std::str::FromStr;

use crate::{
    foundation::error::{LedStripError, LedStripResult},
    mapping::arrangement::normalize_name,
};

/// Byte order the wired LEDs expect for their red, green and blue channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorOrder {
    /// R, G, B.
    #[default]
    Rgb,
    /// R, B, G.
    Rbg,
    /// G, R, B (WS2812 and most clones).
    Grb,
    /// G, B, R.
    Gbr,
    /// B, R, G.
    Brg,
    /// B, G, R.
    Bgr,
}

impl ColorOrder {
    /// All orders.
    pub const ALL: [ColorOrder; 6] = [
        ColorOrder::Rgb,
        ColorOrder::Rbg,
        ColorOrder::Grb,
        ColorOrder::Gbr,
        ColorOrder::Brg,
        ColorOrder::Bgr,
    ];

    /// Configuration name (`"RGB"`, `"GRB"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            ColorOrder::Rgb => "RGB",
            ColorOrder::Rbg => "RBG",
            ColorOrder::Grb => "GRB",
            ColorOrder::Gbr => "GBR",
            ColorOrder::Brg => "BRG",
            ColorOrder::Bgr => "BGR",
        }
    }

    /// Offset within an LED's three bytes for red, green and blue.
    pub fn channel_offsets(self) -> [usize; 3] {
        match self {
            ColorOrder::Rgb => [0, 1, 2],
            ColorOrder::Rbg => [0, 2, 1],
            ColorOrder::Grb => [1, 0, 2],
            ColorOrder::Gbr => [2, 0, 1],
            ColorOrder::Brg => [1, 2, 0],
            ColorOrder::Bgr => [2, 1, 0],
        }
    }

    /// Resolve a configured name; anything unrecognized is RGB.
    pub fn resolve_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::debug!(color_order = name, "unknown color order, using RGB");
            Self::default()
        })
    }
}

impl FromStr for ColorOrder {
    type Err = LedStripError;

    fn from_str(s: &str) -> LedStripResult<Self> {
        let wanted = normalize_name(s.trim());
        ColorOrder::ALL
            .into_iter()
            .find(|o| normalize_name(o.name()) == wanted)
            .ok_or_else(|| LedStripError::validation(format!("unknown color order '{s}'")))
    }
}

impl std::fmt::Display for ColorOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/color_order.rs"]
mod tests;
