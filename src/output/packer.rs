use crate::{
    compose::compositor::RgbAccumulator,
    fading::curve::FadingCurve,
    foundation::error::{LedStripError, LedStripResult},
    mapping::arrangement::MappingTable,
    output::color_order::ColorOrder,
};

/// Write one LED's corrected `[r, g, b]` at byte offset `offset`.
///
/// The three bytes at `offset..offset + 3` must lie inside `out`.
#[inline]
pub fn pack_pixel(
    out: &mut [u8],
    offset: usize,
    rgb: [u8; 3],
    order: ColorOrder,
) -> LedStripResult<()> {
    let Some(led) = offset
        .checked_add(3)
        .and_then(|end| out.get_mut(offset..end))
    else {
        return Err(LedStripError::validation(format!(
            "led at byte offset {offset} does not fit a {}-byte buffer",
            out.len()
        )));
    };
    for (channel, slot) in rgb.into_iter().zip(order.channel_offsets()) {
        led[slot] = channel;
    }
    Ok(())
}

/// Correct every accumulated pixel through `curve` and pack it into `out`
/// at the position given by `mapping`.
pub fn pack_frame(
    acc: &RgbAccumulator,
    mapping: &MappingTable,
    curve: &FadingCurve,
    order: ColorOrder,
    out: &mut [u8],
) -> LedStripResult<()> {
    let dims = mapping.dimensions();
    if acc.dimensions() != dims || out.len() != dims.number_of_outputs() {
        return Err(LedStripError::validation(
            "pack_frame expects accumulator, mapping and buffer of the same strip size",
        ));
    }

    for (&rgb, &offset) in acc.values().iter().zip(mapping.offsets()) {
        let corrected = rgb.map(|c| curve.apply(c.min(255) as u8));
        pack_pixel(out, offset, corrected, order)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/output/packer.rs"]
mod tests;
