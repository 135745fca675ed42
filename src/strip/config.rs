use crate::{
    foundation::{
        core::Dimensions,
        error::{LedStripError, LedStripResult},
    },
    mapping::arrangement::Arrangement,
    output::color_order::ColorOrder,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Bind-time configuration of one LED strip.
///
/// Loaded from JSON (see [`StripConfig::from_json_str`]) or built in code.
/// Every field has a default, so a partial document is valid.
pub struct StripConfig {
    /// Device name used in diagnostics.
    pub name: String,
    /// LEDs in horizontal direction.
    pub width: u32,
    /// LEDs in vertical direction.
    pub height: u32,
    /// Wiring topology name, e.g. `"LeftRight-Alternate-TopDown"`.
    pub arrangement: String,
    /// Color order name, e.g. `"GRB"`.
    pub color_order: String,
    /// 1-based number of the strip's first LED on the controller.
    pub first_led_number: u32,
    /// Fading curve name; blank for an anonymous linear curve.
    pub fading_curve_name: String,
    /// Name of the output controller to bind.
    pub output_controller_name: String,
    /// Switches reproducing older output behavior.
    pub compat: CompatConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Compatibility switches for setups tuned against older firmware behavior.
pub struct CompatConfig {
    /// Route a sample's blue into the green slot and vice versa.
    pub swap_green_blue: bool,
    /// Address updates at the output count and send LED-count-sized resets at
    /// `first_led_number * 3`.
    pub legacy_addressing: bool,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            name: "ledstrip".to_string(),
            width: 1,
            height: 1,
            arrangement: Arrangement::LeftRightTopDown.name().to_string(),
            color_order: ColorOrder::Rgb.name().to_string(),
            first_led_number: 1,
            fading_curve_name: "Linear".to_string(),
            output_controller_name: String::new(),
            compat: CompatConfig::default(),
        }
    }
}

impl StripConfig {
    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> LedStripResult<Self> {
        serde_json::from_str(s).map_err(|e| LedStripError::serde(e.to_string()))
    }

    /// Parse a JSON document from a reader.
    pub fn from_json_reader(r: impl std::io::Read) -> LedStripResult<Self> {
        serde_json::from_reader(r).map_err(|e| LedStripError::serde(e.to_string()))
    }

    /// Grid size.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// `width * height`.
    pub fn number_of_leds(&self) -> usize {
        self.dimensions().number_of_leds()
    }

    /// Three outputs per LED.
    pub fn number_of_outputs(&self) -> usize {
        self.dimensions().number_of_outputs()
    }

    /// First LED number, never below 1.
    pub fn first_led(&self) -> u32 {
        self.first_led_number.max(1)
    }

    /// Controller output index of the strip's first byte.
    pub fn first_output(&self) -> usize {
        (self.first_led() as usize - 1) * 3
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/config.rs"]
mod tests;
