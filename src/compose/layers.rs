use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::foundation::{
    core::{Dimensions, LayerGrid},
    error::{LedStripError, LedStripResult},
};

/// Key-ordered set of layers, all sized to the owning strip.
///
/// Iteration (and therefore compositing) runs in ascending key order.
#[derive(Clone, Debug)]
pub struct LayerSet {
    dims: Dimensions,
    layers: BTreeMap<i32, Arc<LayerGrid>>,
}

impl LayerSet {
    /// Empty set accepting `dims`-sized grids.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            layers: BTreeMap::new(),
        }
    }

    /// Size every layer must have.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Replace the layer at `key` with `grid`.
    ///
    /// A grid of any other size is rejected and the set is left untouched.
    pub fn replace(&mut self, key: i32, grid: impl Into<Arc<LayerGrid>>) -> LedStripResult<()> {
        let grid = grid.into();
        if grid.dimensions() != self.dims {
            return Err(LedStripError::validation(format!(
                "layer {key} is {}x{}, strip is {}x{}",
                grid.width(),
                grid.height(),
                self.dims.width,
                self.dims.height
            )));
        }
        self.layers.insert(key, grid);
        Ok(())
    }

    /// Remove the layer at `key`, returning it.
    pub fn remove(&mut self, key: i32) -> Option<Arc<LayerGrid>> {
        self.layers.remove(&key)
    }

    /// Drop every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Layer stored at `key`.
    pub fn get(&self, key: i32) -> Option<Arc<LayerGrid>> {
        self.layers.get(&key).cloned()
    }

    /// Keys in compositing order.
    pub fn keys(&self) -> Vec<i32> {
        self.layers.keys().copied().collect()
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer is set.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &LayerGrid)> {
        self.layers.iter().map(|(k, g)| (*k, g.as_ref()))
    }

    /// Switch to `dims`, dropping layers that no longer fit.
    pub(crate) fn resize(&mut self, dims: Dimensions) {
        if dims == self.dims {
            return;
        }
        self.dims = dims;
        self.layers.retain(|key, grid| {
            let keep = grid.dimensions() == dims;
            if !keep {
                tracing::debug!(layer = key, "dropping layer after strip resize");
            }
            keep
        });
    }
}

/// Shared, cloneable access to a strip's layer set.
///
/// Producers on other threads replace whole grids through this handle while
/// the output cycle composites under the same lock, so a cycle never sees a
/// half-applied replacement.
#[derive(Clone, Debug)]
pub struct LayerHandle {
    inner: Arc<Mutex<LayerSet>>,
}

impl LayerHandle {
    pub(crate) fn new(dims: Dimensions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LayerSet::new(dims))),
        }
    }

    pub(crate) fn lock(&self) -> LedStripResult<MutexGuard<'_, LayerSet>> {
        self.inner
            .lock()
            .map_err(|_| LedStripError::state("layer set lock poisoned"))
    }

    /// Replace the layer at `key`; see [`LayerSet::replace`].
    pub fn set_layer(&self, key: i32, grid: impl Into<Arc<LayerGrid>>) -> LedStripResult<()> {
        let res = self.lock()?.replace(key, grid);
        if let Err(err) = &res {
            tracing::debug!(layer = key, %err, "rejected layer");
        }
        res
    }

    /// Remove the layer at `key`.
    pub fn remove_layer(&self, key: i32) -> LedStripResult<Option<Arc<LayerGrid>>> {
        Ok(self.lock()?.remove(key))
    }

    /// Drop every layer.
    pub fn clear_layers(&self) -> LedStripResult<()> {
        self.lock()?.clear();
        Ok(())
    }

    /// Layer stored at `key`.
    pub fn layer(&self, key: i32) -> LedStripResult<Option<Arc<LayerGrid>>> {
        Ok(self.lock()?.get(key))
    }

    /// Keys in compositing order.
    pub fn layer_keys(&self) -> LedStripResult<Vec<i32>> {
        Ok(self.lock()?.keys())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layers.rs"]
mod tests;
