//! `ledstrip` turns layered RGBA overlays into the byte stream an addressable
//! LED strip (WS2812 and friends) expects.
//!
//! # Pipeline overview
//!
//! Every output cycle a [`StripDevice`] runs:
//!
//! 1. **Composite**: its [`LayerSet`] (ascending layer key) is alpha-blended over
//!    black into an [`RgbAccumulator`], using a precomputed [`BlendTable`].
//! 2. **Correct**: each channel goes through the device's [`FadingCurve`].
//! 3. **Pack**: the corrected triplet is written at the byte offset the
//!    [`MappingTable`] assigns to the pixel (one of 16 [`Arrangement`]s), in the
//!    wired [`ColorOrder`].
//! 4. **Push**: the buffer is handed to the bound [`OutputController`].
//!
//! Buffers and the mapping table are built once in [`StripDevice::init`] and
//! reused by every [`StripDevice::update_outputs`]. Layers may be replaced from
//! other threads through a [`LayerHandle`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod fading;
mod foundation;
mod mapping;
mod output;
mod strip;

pub use compose::blend::BlendTable;
pub use compose::compositor::{ChannelRouting, RgbAccumulator, composite};
pub use compose::layers::{LayerHandle, LayerSet};
pub use fading::curve::{CurveKind, CurveTable, FadingCurve};
pub use fading::registry::{CurveList, CurveRegistry, resolve_fading_curve};
pub use foundation::core::{Dimensions, LayerGrid, Rgba8};
pub use foundation::error::{LedStripError, LedStripResult};
pub use mapping::arrangement::{Arrangement, MappingTable};
pub use output::color_order::ColorOrder;
pub use output::controller::{
    ControllerRegistry, OutputController, RecordedWrite, RecordingController, SetValues,
    SharedController,
};
pub use output::packer::{pack_frame, pack_pixel};
pub use strip::config::{CompatConfig, StripConfig};
pub use strip::device::{DeviceState, StripContext, StripDevice};
