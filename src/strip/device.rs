use std::sync::Arc;

use crate::{
    compose::{
        compositor::{ChannelRouting, RgbAccumulator, composite},
        layers::LayerHandle,
    },
    fading::{
        curve::FadingCurve,
        registry::{CurveRegistry, resolve_fading_curve},
    },
    foundation::{
        core::LayerGrid,
        error::{LedStripError, LedStripResult},
    },
    mapping::arrangement::{Arrangement, MappingTable},
    output::{
        color_order::ColorOrder,
        controller::{ControllerRegistry, SharedController, push_values},
        packer::pack_frame,
    },
    strip::config::StripConfig,
};

/// Lifecycle of a [`StripDevice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    /// Constructed, not bound to a controller.
    Uninitialized,
    /// Bound; no cycle has pushed output yet.
    Ready,
    /// At least one cycle pushed output.
    Active,
    /// Outputs were switched off; `init` starts a new active period.
    Reset,
}

/// Collaborators a device binds against.
pub struct StripContext<'a> {
    /// Output controllers by name.
    pub controllers: &'a ControllerRegistry,
    /// Fading curves by name; may gain entries while binding.
    pub curves: &'a mut dyn CurveRegistry,
}

/// Everything built at bind time and reused on every cycle.
struct Bound {
    controller: SharedController,
    mapping: MappingTable,
    color_order: ColorOrder,
    routing: ChannelRouting,
    curve: FadingCurve,
    acc: RgbAccumulator,
    output: Vec<u8>,
}

/// Addressable LED strip: layered RGBA input, packed bytes out.
pub struct StripDevice {
    config: StripConfig,
    layers: LayerHandle,
    state: DeviceState,
    bound: Option<Bound>,
}

impl std::fmt::Debug for StripDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripDevice")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("layers", &self.layers)
            .finish()
    }
}

impl StripDevice {
    /// Unbound device for `config`.
    pub fn new(config: StripConfig) -> Self {
        let layers = LayerHandle::new(config.dimensions());
        Self {
            config,
            layers,
            state: DeviceState::Uninitialized,
            bound: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// `width * height`.
    pub fn number_of_leds(&self) -> usize {
        self.config.number_of_leds()
    }

    /// Three outputs per LED.
    pub fn number_of_outputs(&self) -> usize {
        self.config.number_of_outputs()
    }

    /// Replace the configuration.
    ///
    /// Only allowed while unbound (`Uninitialized` or `Reset`); the mapping
    /// table and buffers are rebuilt by the next [`StripDevice::init`]. Layers
    /// that no longer match the new size are dropped.
    pub fn set_config(&mut self, config: StripConfig) -> LedStripResult<()> {
        if matches!(self.state, DeviceState::Ready | DeviceState::Active) {
            return Err(LedStripError::state(format!(
                "cannot reconfigure '{}' while bound; reset it first",
                self.config.name
            )));
        }
        self.layers.lock()?.resize(config.dimensions());
        self.config = config;
        self.bound = None;
        self.state = DeviceState::Uninitialized;
        Ok(())
    }

    /// Bind to the configured output controller and build the per-cycle state:
    /// mapping table, fading curve and output buffer.
    ///
    /// Fails without changing state when the controller is missing or does not
    /// accept raw value writes. A device re-initialized after [`StripDevice::reset`]
    /// also drops its previous binding on that failure, so a later `reset` is
    /// refused instead of reaching the old controller.
    #[tracing::instrument(skip(self, ctx), fields(device = %self.config.name))]
    pub fn init(&mut self, ctx: StripContext<'_>) -> LedStripResult<()> {
        if matches!(self.state, DeviceState::Ready | DeviceState::Active) {
            return Err(LedStripError::state(format!(
                "'{}' is already initialized",
                self.config.name
            )));
        }

        let controller = match ctx
            .controllers
            .bind_raw_output(&self.config.output_controller_name)
        {
            Ok(controller) => controller,
            Err(err) => {
                // A binding left over from before a reset must not outlive a failed re-bind.
                self.bound = None;
                return Err(err);
            }
        };

        let dims = self.config.dimensions();
        let arrangement = Arrangement::resolve_or_default(&self.config.arrangement);
        let mapping = MappingTable::build(dims, arrangement);
        let curve = resolve_fading_curve(ctx.curves, &self.config.fading_curve_name);

        tracing::info!(
            controller = %self.config.output_controller_name,
            width = dims.width,
            height = dims.height,
            %arrangement,
            "bound led strip"
        );

        self.bound = Some(Bound {
            controller,
            mapping,
            color_order: ColorOrder::resolve_or_default(&self.config.color_order),
            routing: ChannelRouting::from_swap_flag(self.config.compat.swap_green_blue),
            curve,
            acc: RgbAccumulator::new(dims),
            output: vec![0; dims.number_of_outputs()],
        });
        self.state = DeviceState::Ready;
        Ok(())
    }

    /// Replace layer `key` with `grid` (whole-grid swap).
    ///
    /// A grid not sized `width x height` is rejected with
    /// [`LedStripError::Validation`]; the existing layer is kept as it was.
    pub fn set_layer(&self, key: i32, grid: impl Into<Arc<LayerGrid>>) -> LedStripResult<()> {
        self.layers.set_layer(key, grid)
    }

    /// Remove layer `key`.
    pub fn remove_layer(&self, key: i32) -> LedStripResult<Option<Arc<LayerGrid>>> {
        self.layers.remove_layer(key)
    }

    /// Drop every layer. The next cycle becomes a no-op.
    pub fn clear_layers(&self) -> LedStripResult<()> {
        self.layers.clear_layers()
    }

    /// Layer stored at `key`.
    pub fn layer(&self, key: i32) -> LedStripResult<Option<Arc<LayerGrid>>> {
        self.layers.layer(key)
    }

    /// Handle for replacing layers from other threads.
    pub fn layer_handle(&self) -> LayerHandle {
        self.layers.clone()
    }

    /// Packed bytes of the last cycle, once bound.
    pub fn output(&self) -> Option<&[u8]> {
        self.bound.as_ref().map(|b| b.output.as_slice())
    }

    /// Run one output cycle: composite, correct, pack and push.
    ///
    /// With no layers set this does nothing and the previous output stays.
    #[tracing::instrument(skip(self), fields(device = %self.config.name))]
    pub fn update_outputs(&mut self) -> LedStripResult<()> {
        if !matches!(self.state, DeviceState::Ready | DeviceState::Active) {
            return Err(LedStripError::state(format!(
                "'{}' cannot update outputs while {:?}",
                self.config.name, self.state
            )));
        }
        let bound = self
            .bound
            .as_mut()
            .ok_or_else(|| LedStripError::state("device has no bound output"))?;

        {
            let layers = self.layers.lock()?;
            if layers.is_empty() {
                return Ok(());
            }
            composite(&layers, &mut bound.acc, bound.routing);
        }
        pack_frame(
            &bound.acc,
            &bound.mapping,
            &bound.curve,
            bound.color_order,
            &mut bound.output,
        )?;

        let first_output = if self.config.compat.legacy_addressing {
            self.config.number_of_outputs()
        } else {
            self.config.first_output()
        };
        push_values(&bound.controller, first_output, &bound.output)?;
        self.state = DeviceState::Active;
        Ok(())
    }

    /// Switch every LED of the strip off and end the active period.
    pub fn reset(&mut self) -> LedStripResult<()> {
        let Some(bound) = self.bound.as_ref() else {
            return Err(LedStripError::state(format!(
                "'{}' has no bound output controller to reset",
                self.config.name
            )));
        };

        let (first_output, zeros) = if self.config.compat.legacy_addressing {
            (
                self.config.first_led() as usize * 3,
                vec![0u8; self.config.number_of_leds()],
            )
        } else {
            (
                self.config.first_output(),
                vec![0u8; self.config.number_of_outputs()],
            )
        };
        push_values(&bound.controller, first_output, &zeros)?;
        self.state = DeviceState::Reset;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strip/device.rs"]
mod tests;
