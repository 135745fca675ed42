use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use crate::foundation::error::{LedStripError, LedStripResult};

/// Capability of accepting raw output bytes.
pub trait SetValues {
    /// Write `values` to consecutive outputs starting at `first_output`.
    fn set_values(&mut self, first_output: usize, values: &[u8]) -> LedStripResult<()>;
}

/// An output controller that devices can be bound to by name.
pub trait OutputController: Send {
    /// Registry name.
    fn name(&self) -> &str;

    /// Raw-value write access, if this controller supports it.
    fn raw_values(&mut self) -> Option<&mut dyn SetValues>;
}

/// Controller shared between the registry and the devices bound to it.
pub type SharedController = Arc<Mutex<dyn OutputController>>;

/// Name to controller lookup consulted when devices bind.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: BTreeMap<String, SharedController>,
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("names", &self.controllers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ControllerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `controller` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, controller: SharedController) {
        self.controllers.insert(name.into(), controller);
    }

    /// Controller registered under `name`.
    pub fn get(&self, name: &str) -> Option<SharedController> {
        self.controllers.get(name).cloned()
    }

    /// Look up `name` and check that it accepts raw value writes.
    pub fn bind_raw_output(&self, name: &str) -> LedStripResult<SharedController> {
        let controller = self.get(name).ok_or_else(|| {
            LedStripError::binding(format!("output controller '{name}' not found"))
        })?;
        let supports_raw = controller
            .lock()
            .map_err(|_| LedStripError::binding(format!("output controller '{name}' poisoned")))?
            .raw_values()
            .is_some();
        if !supports_raw {
            return Err(LedStripError::binding(format!(
                "output controller '{name}' does not accept raw value writes"
            )));
        }
        Ok(controller)
    }
}

/// Push `values` through `controller`'s raw-value capability.
pub(crate) fn push_values(
    controller: &SharedController,
    first_output: usize,
    values: &[u8],
) -> LedStripResult<()> {
    let mut guard = controller
        .lock()
        .map_err(|_| LedStripError::output("output controller lock poisoned"))?;
    let name = guard.name().to_string();
    let sink = guard.raw_values().ok_or_else(|| {
        LedStripError::output(format!("output controller '{name}' lost raw value support"))
    })?;
    sink.set_values(first_output, values)
}

/// One recorded `set_values` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedWrite {
    /// First output addressed.
    pub first_output: usize,
    /// Bytes written.
    pub values: Vec<u8>,
}

/// Controller that keeps every write in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingController {
    name: String,
    writes: Vec<RecordedWrite>,
}

impl RecordingController {
    /// Empty recorder registered as `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            writes: Vec::new(),
        }
    }

    /// All writes, oldest first.
    pub fn writes(&self) -> &[RecordedWrite] {
        &self.writes
    }

    /// Most recent write.
    pub fn last_write(&self) -> Option<&RecordedWrite> {
        self.writes.last()
    }

    /// Forget recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl SetValues for RecordingController {
    fn set_values(&mut self, first_output: usize, values: &[u8]) -> LedStripResult<()> {
        self.writes.push(RecordedWrite {
            first_output,
            values: values.to_vec(),
        });
        Ok(())
    }
}

impl OutputController for RecordingController {
    fn name(&self) -> &str {
        &self.name
    }

    fn raw_values(&mut self) -> Option<&mut dyn SetValues> {
        Some(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/controller.rs"]
mod tests;
