use std::str::FromStr;

use crate::foundation::{
    core::Dimensions,
    error::{LedStripError, LedStripResult},
};

/// Physical wiring topology of a strip: scan axis, direction per axis, and
/// whether every other row/column runs backwards (serpentine).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Arrangement {
    /// Rows top to bottom, each row left to right.
    #[default]
    LeftRightTopDown,
    /// Rows bottom to top, each row left to right.
    LeftRightBottomUp,
    /// Rows top to bottom, each row right to left.
    RightLeftTopDown,
    /// Rows bottom to top, each row right to left.
    RightLeftBottomUp,
    /// Columns left to right, each column top to bottom.
    TopDownLeftRight,
    /// Columns right to left, each column top to bottom.
    TopDownRightLeft,
    /// Columns left to right, each column bottom to top.
    BottomUpLeftRight,
    /// Columns right to left, each column bottom to top.
    BottomUpRightLeft,
    /// Serpentine rows starting top left.
    LeftRightAlternateTopDown,
    /// Serpentine rows starting bottom left.
    LeftRightAlternateBottomUp,
    /// Serpentine rows starting top right.
    RightLeftAlternateTopDown,
    /// Serpentine rows starting bottom right.
    RightLeftAlternateBottomUp,
    /// Serpentine columns starting top left.
    TopDownAlternateLeftRight,
    /// Serpentine columns starting on the right.
    TopDownAlternateRightLeft,
    /// Serpentine columns starting bottom left.
    BottomUpAlternateLeftRight,
    /// Serpentine columns starting on the right.
    BottomUpAlternateRightLeft,
}

/// `(x, y, width, height) -> led index`
type IndexFn = fn(usize, usize, usize, usize) -> usize;

struct ArrangementEntry {
    kind: Arrangement,
    name: &'static str,
    index: IndexFn,
}

fn even(v: usize) -> bool {
    v & 1 == 0
}

// Ordered like the enum; `Arrangement::entry` indexes by discriminant.
static ARRANGEMENTS: [ArrangementEntry; 16] = [
    ArrangementEntry {
        kind: Arrangement::LeftRightTopDown,
        name: "LeftRightTopDown",
        index: |x, y, w, _h| y * w + x,
    },
    ArrangementEntry {
        kind: Arrangement::LeftRightBottomUp,
        name: "LeftRightBottomUp",
        index: |x, y, w, h| (h - 1 - y) * w + x,
    },
    ArrangementEntry {
        kind: Arrangement::RightLeftTopDown,
        name: "RightLeftTopDown",
        index: |x, y, w, _h| y * w + (w - 1 - x),
    },
    ArrangementEntry {
        kind: Arrangement::RightLeftBottomUp,
        name: "RightLeftBottomUp",
        index: |x, y, w, h| (h - 1 - y) * w + (w - 1 - x),
    },
    ArrangementEntry {
        kind: Arrangement::TopDownLeftRight,
        name: "TopDownLeftRight",
        index: |x, y, _w, h| x * h + y,
    },
    ArrangementEntry {
        kind: Arrangement::TopDownRightLeft,
        name: "TopDownRightLeft",
        index: |x, y, w, h| (w - 1 - x) * h + y,
    },
    ArrangementEntry {
        kind: Arrangement::BottomUpLeftRight,
        name: "BottomUpLeftRight",
        index: |x, y, _w, h| x * h + (h - 1 - y),
    },
    ArrangementEntry {
        kind: Arrangement::BottomUpRightLeft,
        name: "BottomUpRightLeft",
        index: |x, y, w, h| (w - 1 - x) * h + (h - 1 - y),
    },
    ArrangementEntry {
        kind: Arrangement::LeftRightAlternateTopDown,
        name: "LeftRightAlternateTopDown",
        index: |x, y, w, _h| w * y + if even(y) { x } else { w - 1 - x },
    },
    ArrangementEntry {
        kind: Arrangement::LeftRightAlternateBottomUp,
        name: "LeftRightAlternateBottomUp",
        index: |x, y, w, h| {
            let row = h - 1 - y;
            w * row + if even(row) { x } else { w - 1 - x }
        },
    },
    ArrangementEntry {
        kind: Arrangement::RightLeftAlternateTopDown,
        name: "RightLeftAlternateTopDown",
        index: |x, y, w, _h| w * y + if even(y) { w - 1 - x } else { x },
    },
    ArrangementEntry {
        kind: Arrangement::RightLeftAlternateBottomUp,
        name: "RightLeftAlternateBottomUp",
        index: |x, y, w, h| {
            let row = h - 1 - y;
            w * row + if even(row) { w - 1 - x } else { x }
        },
    },
    ArrangementEntry {
        kind: Arrangement::TopDownAlternateLeftRight,
        name: "TopDownAlternateLeftRight",
        index: |x, y, _w, h| h * x + if even(x) { y } else { h - 1 - y },
    },
    // The two right-to-left serpentine column layouts pick the column direction
    // by the parity of `x`, not of the physical column number.
    ArrangementEntry {
        kind: Arrangement::TopDownAlternateRightLeft,
        name: "TopDownAlternateRightLeft",
        index: |x, y, w, h| h * (w - 1 - x) + if even(x) { h - 1 - y } else { y },
    },
    ArrangementEntry {
        kind: Arrangement::BottomUpAlternateLeftRight,
        name: "BottomUpAlternateLeftRight",
        index: |x, y, _w, h| h * x + if even(x) { h - 1 - y } else { y },
    },
    ArrangementEntry {
        kind: Arrangement::BottomUpAlternateRightLeft,
        name: "BottomUpAlternateRightLeft",
        index: |x, y, w, h| h * (w - 1 - x) + if even(x) { y } else { h - 1 - y },
    },
];

/// Lowercase `name` and drop `-`, `_` and spaces, for loose config matching.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl Arrangement {
    /// All arrangements in declaration order.
    pub const ALL: [Arrangement; 16] = [
        Arrangement::LeftRightTopDown,
        Arrangement::LeftRightBottomUp,
        Arrangement::RightLeftTopDown,
        Arrangement::RightLeftBottomUp,
        Arrangement::TopDownLeftRight,
        Arrangement::TopDownRightLeft,
        Arrangement::BottomUpLeftRight,
        Arrangement::BottomUpRightLeft,
        Arrangement::LeftRightAlternateTopDown,
        Arrangement::LeftRightAlternateBottomUp,
        Arrangement::RightLeftAlternateTopDown,
        Arrangement::RightLeftAlternateBottomUp,
        Arrangement::TopDownAlternateLeftRight,
        Arrangement::TopDownAlternateRightLeft,
        Arrangement::BottomUpAlternateLeftRight,
        Arrangement::BottomUpAlternateRightLeft,
    ];

    fn entry(self) -> &'static ArrangementEntry {
        &ARRANGEMENTS[self as usize]
    }

    /// Canonical configuration name, e.g. `"LeftRightAlternateTopDown"`.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Linear LED index of `(x, y)` on a `dims` grid.
    ///
    /// `(x, y)` must lie inside `dims`.
    pub fn led_index(self, x: u32, y: u32, dims: Dimensions) -> usize {
        (self.entry().index)(
            x as usize,
            y as usize,
            dims.width as usize,
            dims.height as usize,
        )
    }

    /// Resolve a configured name, falling back to [`Arrangement::LeftRightTopDown`]
    /// with a warning when the name is not recognized.
    pub fn resolve_or_default(name: &str) -> Self {
        match name.parse() {
            Ok(a) => a,
            Err(_) => {
                tracing::warn!(
                    arrangement = name,
                    "unknown led strip arrangement, using LeftRightTopDown mapping as fallback"
                );
                Self::default()
            }
        }
    }
}

impl FromStr for Arrangement {
    type Err = LedStripError;

    fn from_str(s: &str) -> LedStripResult<Self> {
        let wanted = normalize_name(s);
        ARRANGEMENTS
            .iter()
            .find(|e| normalize_name(e.name) == wanted)
            .map(|e| e.kind)
            .ok_or_else(|| LedStripError::validation(format!("unknown arrangement '{s}'")))
    }
}

impl std::fmt::Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cached `(x, y) -> output byte offset` table for one arrangement and size.
///
/// Built once per bind; a change of size or arrangement needs a new table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingTable {
    dims: Dimensions,
    arrangement: Arrangement,
    offsets: Vec<usize>,
}

impl MappingTable {
    /// Compute the byte offset (`led_index * 3`) of every pixel.
    pub fn build(dims: Dimensions, arrangement: Arrangement) -> Self {
        let mut offsets = Vec::with_capacity(dims.number_of_leds());
        for y in 0..dims.height {
            for x in 0..dims.width {
                offsets.push(arrangement.led_index(x, y, dims) * 3);
            }
        }
        Self {
            dims,
            arrangement,
            offsets,
        }
    }

    /// Grid size the table was built for.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Arrangement the table was built for.
    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    /// Byte offset of `(x, y)`, or `None` outside the grid.
    pub fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.offsets.get(self.dims.pixel_index(x, y)).copied()
    }

    /// Byte offsets in row-major pixel order.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/arrangement.rs"]
mod tests;
