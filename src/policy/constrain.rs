use crate::policy::hints::NormalHints;
use crate::winsys::event::ChangeMask;
use crate::winsys::event::WindowChanges;
use crate::winsys::geometry::Dim;
use crate::winsys::geometry::Extents;
use crate::winsys::geometry::Geometry;
use crate::winsys::geometry::Gravity;
use crate::winsys::geometry::Region;
use crate::winsys::window::StateMask;

/// How far a restored dimension is nudged when it equals the current one, so
/// that the client still sees a change.
const RESTORE_NUDGE: i32 = 10;

#[inline]
fn ceil_to(
    value: i64,
    inc: i64,
) -> i64 {
    (value + inc - 1) / inc * inc
}

#[inline]
fn ceil_div(
    value: i64,
    divisor: i64,
) -> i64 {
    (value + divisor - 1) / divisor
}

/// The grid point `base + k * inc` closest to `value` from below.
#[inline]
fn grid_floor(
    value: i64,
    base: i64,
    inc: i64,
) -> i64 {
    base + (value - base).div_euclid(inc) * inc
}

/// The grid point `base + k * inc` closest to `value` from above.
#[inline]
fn grid_ceil(
    value: i64,
    base: i64,
    inc: i64,
) -> i64 {
    base - (base - value).div_euclid(inc) * inc
}

fn snap_to_grid(
    value: i32,
    base: i32,
    inc: i32,
) -> i32 {
    base + ((value - base) / inc) * inc
}

/// Solve a requested client size against normalized hints.
///
/// Returns the permitted size and whether it differs from the request.
pub fn constrain(
    requested: Dim,
    hints: &NormalHints,
    maximized: StateMask,
    ignore_hints_when_maximized: bool,
) -> (Dim, bool) {
    let maximized = maximized & StateMask::MAXIMIZED;
    let suppress = ignore_hints_when_maximized && !maximized.is_empty();

    let xinc = if suppress && maximized.contains(StateMask::MAXIMIZED_HORZ) {
        1
    } else {
        hints.inc.w
    };

    let yinc = if suppress && maximized.contains(StateMask::MAXIMIZED_VERT) {
        1
    } else {
        hints.inc.h
    };

    let (min, max, base) = (hints.min, hints.max, hints.base);

    let mut width = requested.w.clamp(min.w, max.w);
    let mut height = requested.h.clamp(min.h, max.h);

    width = snap_to_grid(width, base.w, xinc);
    height = snap_to_grid(height, base.h, yinc);

    if hints.has_aspect() && !suppress {
        let (w, h) = aspect_adjust(
            width as i64,
            height as i64,
            hints,
            xinc as i64,
            yinc as i64,
        );

        width = w as i32;
        height = h as i32;
    }

    let solved = Dim::new(width, height);
    (solved, solved != requested)
}

/// Aspect bounds and size limits in the wide integer domain the ratio
/// comparisons are done in.
struct AspectBounds {
    min_ax: i64,
    min_ay: i64,
    max_ax: i64,
    max_ay: i64,
    min: (i64, i64),
    max: (i64, i64),
    base: (i64, i64),
    inc: (i64, i64),
}

impl AspectBounds {
    fn new(
        hints: &NormalHints,
        xinc: i64,
        yinc: i64,
    ) -> Self {
        Self {
            min_ax: hints.min_aspect.numerator as i64,
            min_ay: hints.min_aspect.denominator as i64,
            max_ax: hints.max_aspect.numerator as i64,
            max_ay: hints.max_aspect.denominator as i64,
            min: (hints.min.w as i64, hints.min.h as i64),
            max: (hints.max.w as i64, hints.max.h as i64),
            base: (hints.base.w as i64, hints.base.h as i64),
            inc: (xinc, yinc),
        }
    }

    #[inline]
    fn too_tall(
        &self,
        width: i64,
        height: i64,
    ) -> bool {
        self.min_ax * height > width * self.min_ay
    }

    #[inline]
    fn too_wide(
        &self,
        width: i64,
        height: i64,
    ) -> bool {
        width * self.max_ay > self.max_ax * height
    }

    /// The grid width at `height` within the ratio and size limits that is
    /// closest to `width`, preferring the narrower side.
    fn width_at(
        &self,
        height: i64,
        width: i64,
    ) -> Option<i64> {
        let lo = std::cmp::max(ceil_div(height * self.min_ax, self.min_ay), self.min.0);
        let hi = std::cmp::min(height * self.max_ax / self.max_ay, self.max.0);

        if lo > hi {
            return None;
        }

        let below = grid_floor(std::cmp::min(width, hi), self.base.0, self.inc.0);

        if below >= lo {
            return Some(below);
        }

        let above = grid_ceil(lo, self.base.0, self.inc.0);

        if above <= hi {
            Some(above)
        } else {
            None
        }
    }

    /// Scan the height grid outward from `height`, lower heights first, for
    /// a size that satisfies every bound at once.
    fn search(
        &self,
        width: i64,
        height: i64,
    ) -> Option<(i64, i64)> {
        let (min_h, max_h) = (self.min.1, self.max.1);
        let yinc = self.inc.1;

        let shrinking = (0..)
            .map(|k| height - k * yinc)
            .take_while(|&h| h >= min_h);

        let growing = (1..)
            .map(|k| height + k * yinc)
            .take_while(|&h| h <= max_h);

        shrinking
            .chain(growing)
            .find_map(|h| self.width_at(h, width).map(|w| (w, h)))
    }
}

/// Bring a grid-aligned size into the declared aspect range, shrinking the
/// offending axis where the minimum size allows and growing the other axis
/// otherwise. Every step is a whole number of increments. A size that cannot
/// be fixed one axis at a time is searched for; when no size satisfies every
/// bound the input is returned untouched.
fn aspect_adjust(
    width: i64,
    height: i64,
    hints: &NormalHints,
    xinc: i64,
    yinc: i64,
) -> (i64, i64) {
    let bounds = AspectBounds::new(hints, xinc, yinc);
    let (mut w, mut h) = (width, height);

    if bounds.too_tall(w, h) {
        let shrunk = h - ceil_to(h - w * bounds.min_ay / bounds.min_ax, yinc);

        if shrunk >= bounds.min.1 {
            h = shrunk;
        } else {
            let grown = w + ceil_to(ceil_div(h * bounds.min_ax, bounds.min_ay) - w, xinc);

            if grown <= bounds.max.0 {
                w = grown;
            }
        }
    }

    if bounds.too_wide(w, h) {
        let shrunk = w - ceil_to(w - h * bounds.max_ax / bounds.max_ay, xinc);

        if shrunk >= bounds.min.0 {
            w = shrunk;
        } else {
            let grown = h + ceil_to(ceil_div(w * bounds.max_ay, bounds.max_ax) - h, yinc);

            if grown <= bounds.max.1 {
                h = grown;
            }
        }
    }

    if !bounds.too_tall(w, h) && !bounds.too_wide(w, h) {
        return (w, h);
    }

    match bounds.search(width, height) {
        Some(solved) => solved,
        None => {
            trace!("aspect range unsatisfiable for {}x{}", width, height);
            (width, height)
        },
    }
}

/// Geometry fields remembered before a window is maximized or made
/// fullscreen, restored once the state is left again.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SavedGeometry {
    pub changes: WindowChanges,
    pub mask: ChangeMask,
}

impl SavedGeometry {
    /// Remember the fields of `server` selected by `mask` that are not
    /// already saved. Unplaced windows have nothing worth saving.
    pub fn save(
        &mut self,
        server: Geometry,
        mask: ChangeMask,
        placed: bool,
    ) {
        if !placed {
            return;
        }

        let fresh = mask & !self.mask & ChangeMask::GEOMETRY;

        if fresh.contains(ChangeMask::X) {
            self.changes.x = server.pos.x;
        }

        if fresh.contains(ChangeMask::Y) {
            self.changes.y = server.pos.y;
        }

        if fresh.contains(ChangeMask::WIDTH) {
            self.changes.width = server.dim.w;
        }

        if fresh.contains(ChangeMask::HEIGHT) {
            self.changes.height = server.dim.h;
        }

        if fresh.contains(ChangeMask::BORDER_WIDTH) {
            self.changes.border_width = server.border;
        }

        self.mask |= fresh;
    }

    /// Write the saved fields selected by `mask` into `changes` and forget
    /// them. A restored dimension identical to the current one is shrunk
    /// slightly (and recentred) so the client observes a change.
    pub fn restore(
        &mut self,
        changes: &mut WindowChanges,
        mask: ChangeMask,
        server: Geometry,
    ) -> ChangeMask {
        let restored = mask & self.mask;

        if restored.contains(ChangeMask::X) {
            changes.x = self.changes.x;
        }

        if restored.contains(ChangeMask::Y) {
            changes.y = self.changes.y;
        }

        if restored.contains(ChangeMask::WIDTH) {
            changes.width = self.changes.width;

            if changes.width == server.dim.w {
                changes.width -= RESTORE_NUDGE;

                if restored.contains(ChangeMask::X) {
                    changes.x += RESTORE_NUDGE / 2;
                }
            }
        }

        if restored.contains(ChangeMask::HEIGHT) {
            changes.height = self.changes.height;

            if changes.height == server.dim.h {
                changes.height -= RESTORE_NUDGE;

                if restored.contains(ChangeMask::Y) {
                    changes.y += RESTORE_NUDGE / 2;
                }
            }
        }

        if restored.contains(ChangeMask::BORDER_WIDTH) {
            changes.border_width = self.changes.border_width;
        }

        self.mask.remove(mask);
        restored
    }
}

/// Everything the size-change computation needs to know about a window and
/// the screen it lives on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SizeContext {
    pub state: StateMask,
    pub fullscreen: bool,
    pub hints: NormalHints,
    pub ignore_hints_when_maximized: bool,
    pub placed: bool,
    pub extents: Extents,
    pub workarea: Region,
    /// The output (or fullscreen-monitor rectangle) a fullscreen window
    /// covers.
    pub fullscreen_region: Region,
}

/// Derive the geometry changes implied by a window's state, hints and screen
/// from `old`, returning only the fields that differ from it.
pub fn compute_size_changes(
    ctx: &SizeContext,
    old: Geometry,
    server: Geometry,
    saved: &mut SavedGeometry,
) -> (WindowChanges, ChangeMask) {
    let mut changes = WindowChanges::from_geometry(old);
    let mut mask = ChangeMask::empty();
    let extents = ctx.extents;

    if ctx.fullscreen {
        saved.save(server, ChangeMask::GEOMETRY, ctx.placed);

        let region = ctx.fullscreen_region;
        changes.x = region.pos.x;
        changes.y = region.pos.y;
        changes.width = region.dim.w;
        changes.height = region.dim.h;
        changes.border_width = 0;

        mask |= ChangeMask::GEOMETRY;
    } else {
        mask |= saved.restore(&mut changes, ChangeMask::BORDER_WIDTH, server);

        if ctx.state.contains(StateMask::MAXIMIZED_VERT) {
            saved.save(server, ChangeMask::Y | ChangeMask::HEIGHT, ctx.placed);
            changes.height =
                ctx.workarea.dim.h - extents.top - extents.bottom - old.border * 2;
            mask |= ChangeMask::HEIGHT;
        } else {
            mask |= saved.restore(&mut changes, ChangeMask::Y | ChangeMask::HEIGHT, server);
        }

        if ctx.state.contains(StateMask::MAXIMIZED_HORZ) {
            saved.save(server, ChangeMask::X | ChangeMask::WIDTH, ctx.placed);
            changes.width =
                ctx.workarea.dim.w - extents.left - extents.right - old.border * 2;
            mask |= ChangeMask::WIDTH;
        } else {
            mask |= saved.restore(&mut changes, ChangeMask::X | ChangeMask::WIDTH, server);
        }

        let hints = &ctx.hints;

        if !mask.contains(ChangeMask::WIDTH) && old.dim.w < hints.min.w {
            changes.width = hints.min.w;
            mask |= ChangeMask::WIDTH;
        }

        if !mask.contains(ChangeMask::WIDTH) && old.dim.w > hints.max.w {
            changes.width = hints.max.w;
            mask |= ChangeMask::WIDTH;
        }

        if !mask.contains(ChangeMask::HEIGHT) && old.dim.h < hints.min.h {
            changes.height = hints.min.h;
            mask |= ChangeMask::HEIGHT;
        }

        if !mask.contains(ChangeMask::HEIGHT) && old.dim.h > hints.max.h {
            changes.height = hints.max.h;
            mask |= ChangeMask::HEIGHT;
        }

        if mask.intersects(ChangeMask::SIZE) {
            let requested = Dim::new(
                if mask.contains(ChangeMask::WIDTH) {
                    changes.width
                } else {
                    old.dim.w
                },
                if mask.contains(ChangeMask::HEIGHT) {
                    changes.height
                } else {
                    old.dim.h
                },
            );

            let (solved, _) = constrain(
                requested,
                hints,
                ctx.state,
                ctx.ignore_hints_when_maximized,
            );

            changes.width = solved.w;
            changes.height = solved.h;
            mask.set(ChangeMask::WIDTH, solved.w != old.dim.w);
            mask.set(ChangeMask::HEIGHT, solved.h != old.dim.h);

            if ctx.state.contains(StateMask::MAXIMIZED_VERT) {
                let workarea = ctx.workarea;
                let height = changes.height + old.border * 2;
                let bottom = workarea.bottom();

                if old.pos.y < workarea.pos.y + extents.top {
                    changes.y = workarea.pos.y + extents.top;
                    mask |= ChangeMask::Y;
                } else if old.pos.y + old.dim.h + extents.bottom > bottom {
                    changes.y = bottom - height - extents.bottom;
                    mask |= ChangeMask::Y;
                } else if old.pos.y + height + extents.bottom > bottom {
                    changes.y = workarea.pos.y
                        + (workarea.dim.h - extents.top - height - extents.bottom) / 2
                        + extents.top;
                    mask |= ChangeMask::Y;
                }
            }

            if ctx.state.contains(StateMask::MAXIMIZED_HORZ) {
                let workarea = ctx.workarea;
                let width = changes.width + old.border * 2;
                let right = workarea.right();

                if old.pos.x < workarea.pos.x + extents.left {
                    changes.x = workarea.pos.x + extents.left;
                    mask |= ChangeMask::X;
                } else if old.pos.x + old.dim.w + extents.right > right {
                    changes.x = right - width - extents.right;
                    mask |= ChangeMask::X;
                } else if old.pos.x + width + extents.right > right {
                    changes.x = workarea.pos.x
                        + (workarea.dim.w - extents.left - width - extents.right) / 2
                        + extents.left;
                    mask |= ChangeMask::X;
                }
            }
        }
    }

    mask.set(ChangeMask::X, mask.contains(ChangeMask::X) && changes.x != old.pos.x);
    mask.set(ChangeMask::Y, mask.contains(ChangeMask::Y) && changes.y != old.pos.y);
    mask.set(
        ChangeMask::WIDTH,
        mask.contains(ChangeMask::WIDTH) && changes.width != old.dim.w,
    );
    mask.set(
        ChangeMask::HEIGHT,
        mask.contains(ChangeMask::HEIGHT) && changes.height != old.dim.h,
    );
    mask.set(
        ChangeMask::BORDER_WIDTH,
        mask.contains(ChangeMask::BORDER_WIDTH) && changes.border_width != old.border,
    );

    (changes, mask)
}

/// Translate a configure request's reference point into a client position
/// according to `gravity`, returning which position fields moved.
pub fn adjust_for_gravity(
    changes: &mut WindowChanges,
    mask: ChangeMask,
    gravity: Gravity,
    extents: Extents,
    server: Geometry,
) -> ChangeMask {
    let mut x = changes.x;
    let mut y = changes.y;

    if mask.intersects(ChangeMask::X | ChangeMask::WIDTH) {
        let has_x = mask.contains(ChangeMask::X);

        match gravity {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest => {
                if has_x {
                    x += extents.left;
                }
            },
            Gravity::North | Gravity::Center | Gravity::South => {
                if has_x {
                    x -= changes.width / 2 - extents.left + extents.horizontal() / 2;
                } else {
                    x -= (changes.width - server.dim.w) / 2;
                }
            },
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => {
                if has_x {
                    x -= changes.width + extents.right;
                } else {
                    x -= changes.width - server.dim.w;
                }
            },
            Gravity::Static => {},
        }
    }

    if mask.intersects(ChangeMask::Y | ChangeMask::HEIGHT) {
        let has_y = mask.contains(ChangeMask::Y);

        match gravity {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast => {
                if has_y {
                    y += extents.top;
                }
            },
            Gravity::West | Gravity::Center | Gravity::East => {
                if has_y {
                    y -= changes.height / 2 - extents.top + extents.vertical() / 2;
                } else {
                    y -= (changes.height - server.dim.h) / 2;
                }
            },
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => {
                if has_y {
                    y -= changes.height + extents.bottom;
                } else {
                    y -= changes.height - server.dim.h;
                }
            },
            Gravity::Static => {},
        }
    }

    let mut moved = ChangeMask::empty();

    if x != changes.x {
        changes.x = x;
        moved |= ChangeMask::X;
    }

    if y != changes.y {
        changes.y = y;
        moved |= ChangeMask::Y;
    }

    moved
}

/// Keep a requested position inside the work area, so that at least the
/// frame's top-left corner stays reachable.
pub fn clamp_to_workarea(
    changes: &mut WindowChanges,
    extents: Extents,
    workarea: Region,
) -> ChangeMask {
    let mut moved = ChangeMask::empty();
    let min_x = workarea.pos.x + extents.left;
    let min_y = workarea.pos.y + extents.top;
    let max_x = std::cmp::max(min_x, workarea.right() - extents.right - changes.width);
    let max_y = std::cmp::max(min_y, workarea.bottom() - extents.bottom - changes.height);

    let x = changes.x.clamp(min_x, max_x);
    let y = changes.y.clamp(min_y, max_y);

    if x != changes.x {
        changes.x = x;
        moved |= ChangeMask::X;
    }

    if y != changes.y {
        changes.y = y;
        moved |= ChangeMask::Y;
    }

    moved
}
