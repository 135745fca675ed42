use std::sync::Mutex;

use super::*;
use crate::{
    fading::registry::CurveList,
    foundation::core::Rgba8,
    output::controller::{OutputController, RecordedWrite, RecordingController, SetValues},
};

struct Rig {
    rec: Arc<Mutex<RecordingController>>,
    controllers: ControllerRegistry,
    curves: CurveList,
}

impl Rig {
    fn new() -> Self {
        let rec = Arc::new(Mutex::new(RecordingController::new("ws")));
        let mut controllers = ControllerRegistry::new();
        controllers.insert("ws", rec.clone());
        Self {
            rec,
            controllers,
            curves: CurveList::new(),
        }
    }

    fn init(&mut self, dev: &mut StripDevice) -> LedStripResult<()> {
        dev.init(StripContext {
            controllers: &self.controllers,
            curves: &mut self.curves,
        })
    }

    fn writes(&self) -> Vec<RecordedWrite> {
        self.rec.lock().unwrap().writes().to_vec()
    }
}

fn config(width: u32, height: u32) -> StripConfig {
    StripConfig {
        width,
        height,
        output_controller_name: "ws".to_string(),
        ..StripConfig::default()
    }
}

#[test]
fn init_binds_and_allocates_output() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(config(3, 2));
    assert_eq!(dev.state(), DeviceState::Uninitialized);
    assert!(dev.output().is_none());

    rig.init(&mut dev).unwrap();
    assert_eq!(dev.state(), DeviceState::Ready);
    assert_eq!(dev.output().unwrap().len(), 18);
    assert_eq!(dev.number_of_leds(), 6);
    assert_eq!(dev.number_of_outputs(), 18);
}

#[test]
fn init_fails_naming_missing_controller() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(StripConfig {
        output_controller_name: "teensy".to_string(),
        ..config(1, 1)
    });
    let err = rig.init(&mut dev).unwrap_err();
    assert!(matches!(err, LedStripError::Binding(_)));
    assert!(err.to_string().contains("teensy"));
    assert_eq!(dev.state(), DeviceState::Uninitialized);
}

#[test]
fn failed_rebind_after_reset_drops_old_controller() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(config(1, 1));
    rig.init(&mut dev).unwrap();
    dev.reset().unwrap();
    assert_eq!(rig.writes().len(), 1);

    let empty = ControllerRegistry::new();
    let mut curves = CurveList::new();
    let err = dev
        .init(StripContext {
            controllers: &empty,
            curves: &mut curves,
        })
        .unwrap_err();
    assert!(matches!(err, LedStripError::Binding(_)));
    assert!(dev.output().is_none());

    assert!(matches!(dev.reset().unwrap_err(), LedStripError::State(_)));
    assert_eq!(rig.writes().len(), 1);
}

#[test]
fn init_registers_unknown_curve_name() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(StripConfig {
        fading_curve_name: "CabinetStrip".to_string(),
        ..config(1, 1)
    });
    rig.init(&mut dev).unwrap();
    assert!(rig.curves.contains("CabinetStrip"));
}

#[test]
fn update_before_init_is_a_state_error() {
    let mut dev = StripDevice::new(config(1, 1));
    dev.set_layer(0, LayerGrid::filled(1, 1, Rgba8::opaque(1, 2, 3)))
        .unwrap();
    assert!(matches!(
        dev.update_outputs().unwrap_err(),
        LedStripError::State(_)
    ));
    assert!(matches!(dev.reset().unwrap_err(), LedStripError::State(_)));
}

#[test]
fn update_without_layers_is_a_noop() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(config(2, 1));
    rig.init(&mut dev).unwrap();
    dev.update_outputs().unwrap();
    assert!(rig.writes().is_empty());
    assert_eq!(dev.state(), DeviceState::Ready);
}

#[test]
fn update_pushes_full_buffer_at_first_led() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(StripConfig {
        first_led_number: 3,
        color_order: "BGR".to_string(),
        ..config(1, 1)
    });
    rig.init(&mut dev).unwrap();
    dev.set_layer(0, LayerGrid::filled(1, 1, Rgba8::opaque(10, 20, 30)))
        .unwrap();
    dev.update_outputs().unwrap();

    assert_eq!(
        rig.writes(),
        vec![RecordedWrite {
            first_output: 6,
            values: vec![30, 20, 10],
        }]
    );
    assert_eq!(dev.state(), DeviceState::Active);
}

#[test]
fn rgb_order_keeps_channel_order() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(config(1, 1));
    rig.init(&mut dev).unwrap();
    dev.set_layer(0, LayerGrid::filled(1, 1, Rgba8::opaque(10, 20, 30)))
        .unwrap();
    dev.update_outputs().unwrap();
    assert_eq!(dev.output().unwrap(), &[10, 20, 30]);
}

#[test]
fn swap_green_blue_reproduces_legacy_routing() {
    let mut rig = Rig::new();
    let mut cfg = config(1, 1);
    cfg.compat.swap_green_blue = true;
    let mut dev = StripDevice::new(cfg);
    rig.init(&mut dev).unwrap();
    dev.set_layer(0, LayerGrid::filled(1, 1, Rgba8::opaque(10, 20, 30)))
        .unwrap();
    dev.update_outputs().unwrap();
    assert_eq!(dev.output().unwrap(), &[10, 30, 20]);
}

#[test]
fn update_twice_is_idempotent() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(StripConfig {
        arrangement: "LeftRight-Alternate-TopDown".to_string(),
        fading_curve_name: "Gamma22".to_string(),
        ..config(3, 2)
    });
    rig.init(&mut dev).unwrap();
    dev.set_layer(
        0,
        LayerGrid::from_fn(3, 2, |x, y| Rgba8::new(x as u8 * 80, y as u8 * 90, 7, 200)),
    )
    .unwrap();
    dev.set_layer(1, LayerGrid::filled(3, 2, Rgba8::new(0, 255, 0, 64)))
        .unwrap();

    dev.update_outputs().unwrap();
    let first = dev.output().unwrap().to_vec();
    dev.update_outputs().unwrap();
    assert_eq!(dev.output().unwrap(), first.as_slice());

    let writes = rig.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], writes[1]);
}

#[test]
fn serpentine_mapping_places_second_row_backwards() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(StripConfig {
        arrangement: "LeftRightAlternateTopDown".to_string(),
        ..config(3, 2)
    });
    rig.init(&mut dev).unwrap();
    // Pixel value encodes its row-major index in the red channel.
    dev.set_layer(
        0,
        LayerGrid::from_fn(3, 2, |x, y| Rgba8::opaque((y * 3 + x) as u8, 0, 0)),
    )
    .unwrap();
    dev.update_outputs().unwrap();
    let reds: Vec<u8> = dev.output().unwrap().chunks(3).map(|c| c[0]).collect();
    assert_eq!(reds, vec![0, 1, 2, 5, 4, 3]);
}

#[test]
fn mismatched_layer_keeps_previous_pixels() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(config(2, 2));
    rig.init(&mut dev).unwrap();
    let original = LayerGrid::from_fn(2, 2, |x, y| Rgba8::new(x as u8, y as u8, 9, 255));
    dev.set_layer(4, original.clone()).unwrap();

    let err = dev
        .set_layer(4, LayerGrid::filled(3, 2, Rgba8::opaque(255, 255, 255)))
        .unwrap_err();
    assert!(matches!(err, LedStripError::Validation(_)));
    assert_eq!(*dev.layer(4).unwrap().unwrap(), original);
}

#[test]
fn reset_zeroes_full_strip_after_any_content() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(StripConfig {
        first_led_number: 2,
        ..config(2, 2)
    });
    rig.init(&mut dev).unwrap();
    dev.set_layer(0, LayerGrid::filled(2, 2, Rgba8::opaque(200, 100, 50)))
        .unwrap();
    dev.update_outputs().unwrap();
    dev.reset().unwrap();

    let last = rig.writes().last().cloned().unwrap();
    assert_eq!(last.first_output, 3);
    assert_eq!(last.values, vec![0u8; 12]);
    assert_eq!(dev.state(), DeviceState::Reset);

    assert!(matches!(
        dev.update_outputs().unwrap_err(),
        LedStripError::State(_)
    ));
    dev.reset().unwrap();
}

#[test]
fn legacy_addressing_matches_original_payloads() {
    let mut rig = Rig::new();
    let mut cfg = config(2, 2);
    cfg.first_led_number = 1;
    cfg.compat.legacy_addressing = true;
    let mut dev = StripDevice::new(cfg);
    rig.init(&mut dev).unwrap();
    dev.set_layer(0, LayerGrid::filled(2, 2, Rgba8::opaque(1, 1, 1)))
        .unwrap();
    dev.update_outputs().unwrap();
    dev.reset().unwrap();

    let writes = rig.writes();
    assert_eq!(writes[0].first_output, 12);
    assert_eq!(writes[0].values.len(), 12);
    // Reset payload is sized to the LED count, not the byte count.
    assert_eq!(writes[1].first_output, 3);
    assert_eq!(writes[1].values, vec![0u8; 4]);
}

#[test]
fn reconfigure_is_refused_while_bound_and_rebuilds_after_reset() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(config(3, 1));
    rig.init(&mut dev).unwrap();
    dev.set_layer(0, LayerGrid::filled(3, 1, Rgba8::opaque(1, 2, 3)))
        .unwrap();

    let err = dev.set_config(config(2, 2)).unwrap_err();
    assert!(matches!(err, LedStripError::State(_)));
    assert_eq!(dev.config().width, 3);

    dev.reset().unwrap();
    dev.set_config(StripConfig {
        arrangement: "TopDownLeftRight".to_string(),
        ..config(2, 2)
    })
    .unwrap();
    assert_eq!(dev.state(), DeviceState::Uninitialized);
    // 3x1 layer no longer fits a 2x2 strip.
    assert!(dev.layer(0).unwrap().is_none());

    rig.init(&mut dev).unwrap();
    assert_eq!(dev.output().unwrap().len(), 12);
    dev.set_layer(
        0,
        LayerGrid::from_fn(2, 2, |x, y| Rgba8::opaque((y * 2 + x) as u8, 0, 0)),
    )
    .unwrap();
    dev.update_outputs().unwrap();
    let reds: Vec<u8> = dev.output().unwrap().chunks(3).map(|c| c[0]).collect();
    // Column-major: (0,0), (0,1), (1,0), (1,1).
    assert_eq!(reds, vec![0, 2, 1, 3]);
}

#[test]
fn empty_layer_set_keeps_previous_output() {
    let mut rig = Rig::new();
    let mut dev = StripDevice::new(config(1, 1));
    rig.init(&mut dev).unwrap();
    dev.set_layer(0, LayerGrid::filled(1, 1, Rgba8::opaque(5, 6, 7)))
        .unwrap();
    dev.update_outputs().unwrap();
    dev.clear_layers().unwrap();
    dev.update_outputs().unwrap();
    assert_eq!(dev.output().unwrap(), &[5, 6, 7]);
    assert_eq!(rig.writes().len(), 1);
}

#[test]
fn controller_losing_raw_support_surfaces_output_error() {
    struct Flaky {
        raw: bool,
        inner: RecordingController,
    }
    impl OutputController for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }
        fn raw_values(&mut self) -> Option<&mut dyn SetValues> {
            if self.raw {
                Some(&mut self.inner)
            } else {
                None
            }
        }
    }

    let flaky = Arc::new(Mutex::new(Flaky {
        raw: true,
        inner: RecordingController::new("flaky"),
    }));
    let mut controllers = ControllerRegistry::new();
    controllers.insert("flaky", flaky.clone());
    let mut curves = CurveList::new();

    let mut dev = StripDevice::new(StripConfig {
        output_controller_name: "flaky".to_string(),
        ..StripConfig::default()
    });
    dev.init(StripContext {
        controllers: &controllers,
        curves: &mut curves,
    })
    .unwrap();
    dev.set_layer(0, LayerGrid::filled(1, 1, Rgba8::opaque(1, 1, 1)))
        .unwrap();

    flaky.lock().unwrap().raw = false;
    let err = dev.update_outputs().unwrap_err();
    assert!(matches!(err, LedStripError::Output(_)));
}
