use crate::{
    compose::{blend::BlendTable, layers::LayerSet},
    foundation::core::Dimensions,
};

/// Which accumulation slot each source channel lands in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelRouting {
    /// Red, green, blue into slots 0, 1, 2.
    #[default]
    Straight,
    /// Red, blue, green into slots 0, 1, 2. Older cabinet configs were tuned
    /// against this routing.
    SwapGreenBlue,
}

impl ChannelRouting {
    /// Routing for the `swap_green_blue` compatibility switch.
    pub fn from_swap_flag(swap_green_blue: bool) -> Self {
        if swap_green_blue {
            Self::SwapGreenBlue
        } else {
            Self::Straight
        }
    }
}

/// Per-pixel RGB accumulation buffer, reused across cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbAccumulator {
    dims: Dimensions,
    values: Vec<[u32; 3]>,
}

impl RgbAccumulator {
    /// Black buffer for a `dims` grid.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            values: vec![[0; 3]; dims.number_of_leds()],
        }
    }

    /// Grid size.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Back to black without reallocating.
    pub fn clear(&mut self) {
        self.values.fill([0; 3]);
    }

    /// Accumulated channels at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> Option<[u32; 3]> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.values.get(self.dims.pixel_index(x, y)).copied()
    }

    /// All pixels in row-major order.
    pub fn values(&self) -> &[[u32; 3]] {
        &self.values
    }
}

/// Source-over composite every layer of `layers`, lowest key first, into `acc`.
///
/// `acc` starts from black on every call. Pixels with alpha 0 leave the
/// accumulated value untouched; alpha 255 replaces it.
pub fn composite(layers: &LayerSet, acc: &mut RgbAccumulator, routing: ChannelRouting) {
    acc.clear();
    let table = BlendTable::shared();

    for (key, grid) in layers.iter() {
        if grid.dimensions() != acc.dims {
            tracing::debug!(layer = key, "skipping layer with foreign dimensions");
            continue;
        }
        for (dst, px) in acc.values.iter_mut().zip(grid.pixels()) {
            let alpha = px.a;
            if alpha == 0 {
                continue;
            }
            let src = match routing {
                ChannelRouting::Straight => [px.r, px.g, px.b],
                ChannelRouting::SwapGreenBlue => [px.r, px.b, px.g],
            };
            for (d, s) in dst.iter_mut().zip(src) {
                let prev = (*d).min(255) as u8;
                *d = u32::from(table.over(prev, s, alpha));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
