use crate::winsys::geometry::Dim;
use crate::winsys::geometry::Gravity;
use crate::winsys::geometry::Ratio;
use crate::winsys::hints::SizeHints;

use bitflags::bitflags;

/// Largest coordinate the protocol can carry in a signed 16-bit field.
pub const MAX_SHORT: i32 = 32767;

/// Stand-in for an absent maximum size.
pub const UNBOUNDED_DIM: i32 = 65535;

bitflags! {
    /// The hint fields a client actually declared.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HintFlags: u32 {
        const POSITION = 1 << 0;
        const BASE_SIZE = 1 << 1;
        const MIN_SIZE = 1 << 2;
        const MAX_SIZE = 1 << 3;
        const RESIZE_INC = 1 << 4;
        const ASPECT = 1 << 5;
        const WIN_GRAVITY = 1 << 6;
    }
}

/// A fully populated, internally consistent set of sizing constraints.
///
/// Invariants upheld by [`normalize`]:
/// - `1 <= min <= max <= max_size` on each axis (`max_size` depends on the
///   border width);
/// - `0 <= base <= min` and `inc >= 1`;
/// - `min` lies on the `base + k * inc` grid unless that would exceed
///   `max_size`;
/// - aspect numerators and denominators are at least 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NormalHints {
    pub declared: HintFlags,
    pub min: Dim,
    pub max: Dim,
    pub base: Dim,
    pub inc: Dim,
    pub min_aspect: Ratio,
    pub max_aspect: Ratio,
    pub gravity: Gravity,
}

impl Default for NormalHints {
    fn default() -> Self {
        normalize(&SizeHints::default(), 0)
    }
}

impl NormalHints {
    #[inline]
    pub fn has_aspect(&self) -> bool {
        self.declared.contains(HintFlags::ASPECT)
    }

    #[inline]
    pub fn has_position(&self) -> bool {
        self.declared.contains(HintFlags::POSITION)
    }

    /// Whether min and max pin the window to a single size.
    pub fn is_fixed_size(&self) -> bool {
        self.min == self.max
    }
}

fn align_up(
    value: i32,
    base: i32,
    inc: i32,
) -> i32 {
    let offset = value - base;
    let steps = (offset + inc - 1) / inc;

    base + steps * inc
}

/// Sanitize client-declared sizing hints for a window with the given border.
///
/// Never fails: absent or contradictory fields are replaced with defaults.
pub fn normalize(
    raw: &SizeHints,
    border: i32,
) -> NormalHints {
    let max_size = MAX_SHORT - std::cmp::max(border, 0) * 2;
    let mut declared = HintFlags::empty();

    if raw.has_position() {
        declared |= HintFlags::POSITION;
    }

    let mut base = match (raw.base, raw.min) {
        (Some(base), _) => {
            declared |= HintFlags::BASE_SIZE;
            base
        },
        (None, Some(min)) => min,
        (None, None) => Dim::default(),
    };

    let mut min = match raw.min {
        Some(min) => {
            declared |= HintFlags::MIN_SIZE;
            min
        },
        None => base,
    };

    let mut max = match raw.max {
        Some(max) => {
            declared |= HintFlags::MAX_SIZE;
            max
        },
        None => Dim::new(UNBOUNDED_DIM, UNBOUNDED_DIM),
    };

    let inc = match raw.inc {
        Some(inc) => {
            declared |= HintFlags::RESIZE_INC;
            Dim::new(std::cmp::max(inc.w, 1), std::cmp::max(inc.h, 1))
        },
        None => Dim::new(1, 1),
    };

    base.w = base.w.clamp(0, max_size);
    base.h = base.h.clamp(0, max_size);

    min.w = std::cmp::max(std::cmp::max(min.w, 1), base.w);
    min.h = std::cmp::max(std::cmp::max(min.h, 1), base.h);

    max.w = std::cmp::max(max.w, min.w);
    max.h = std::cmp::max(max.h, min.h);

    min.w = std::cmp::min(min.w, max_size);
    min.h = std::cmp::min(min.h, max_size);
    max.w = std::cmp::min(max.w, max_size);
    max.h = std::cmp::min(max.h, max_size);

    let aligned = Dim::new(align_up(min.w, base.w, inc.w), align_up(min.h, base.h, inc.h));

    if aligned.w <= max_size {
        min.w = aligned.w;
        max.w = std::cmp::max(max.w, min.w);
    }

    if aligned.h <= max_size {
        min.h = aligned.h;
        max.h = std::cmp::max(max.h, min.h);
    }

    let (min_aspect, max_aspect) = match raw.aspect {
        Some((min_aspect, max_aspect)) => {
            declared |= HintFlags::ASPECT;

            (
                Ratio::new(
                    std::cmp::max(min_aspect.numerator, 1),
                    std::cmp::max(min_aspect.denominator, 1),
                ),
                Ratio::new(
                    std::cmp::max(max_aspect.numerator, 1),
                    std::cmp::max(max_aspect.denominator, 1),
                ),
            )
        },
        None => (Ratio::new(1, UNBOUNDED_DIM), Ratio::new(UNBOUNDED_DIM, 1)),
    };

    let gravity = match raw.gravity {
        Some(gravity) => {
            declared |= HintFlags::WIN_GRAVITY;
            gravity
        },
        None => Gravity::NorthWest,
    };

    NormalHints {
        declared,
        min,
        max,
        base,
        inc,
        min_aspect,
        max_aspect,
        gravity,
    }
}
