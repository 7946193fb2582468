use crate::winsys::geometry::Region;

/// Screen-edge reservations declared by a window, one rectangle per edge,
/// in root coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Struts {
    pub left: Region,
    pub right: Region,
    pub top: Region,
    pub bottom: Region,
}

impl Struts {
    fn empty(screen: Region) -> Self {
        let (w, h) = (screen.dim.w, screen.dim.h);

        Self {
            left: Region::new(0, 0, 0, h),
            right: Region::new(w, 0, 0, h),
            top: Region::new(0, 0, w, 0),
            bottom: Region::new(0, h, w, 0),
        }
    }

    /// Build reservations from the partial strut property (twelve values)
    /// or, failing that, the plain strut property (four values), clipped
    /// to the edges of the output each one touches.
    pub fn from_properties(
        partial: Option<&[u32]>,
        plain: Option<&[u32]>,
        screen: Region,
        outputs: &[Region],
    ) -> Option<Self> {
        let mut struts = Self::empty(screen);
        let (w, h) = (screen.dim.w, screen.dim.h);
        let value = |values: &[u32], i: usize| values[i] as i32;

        match (partial, plain) {
            (Some(s), _) if s.len() == 12 => {
                struts.left = Region::new(0, value(s, 4), value(s, 0), value(s, 5) - value(s, 4) + 1);
                struts.right = Region::new(
                    w - value(s, 1),
                    value(s, 6),
                    value(s, 1),
                    value(s, 7) - value(s, 6) + 1,
                );
                struts.top = Region::new(value(s, 8), 0, value(s, 9) - value(s, 8) + 1, value(s, 2));
                struts.bottom = Region::new(
                    value(s, 10),
                    h - value(s, 3),
                    value(s, 11) - value(s, 10) + 1,
                    value(s, 3),
                );
            },
            (_, Some(s)) if s.len() == 4 => {
                struts.left.dim.w = value(s, 0);
                struts.right.dim.w = value(s, 1);
                struts.right.pos.x = w - value(s, 1);
                struts.top.dim.h = value(s, 2);
                struts.bottom.dim.h = value(s, 3);
                struts.bottom.pos.y = h - value(s, 3);
            },
            _ => return None,
        }

        for output in outputs {
            struts.clip_to_output(*output);
        }

        Some(struts)
    }

    fn clip_to_output(
        &mut self,
        output: Region,
    ) {
        let (x1, y1, x2, y2) = (output.pos.x, output.pos.y, output.right(), output.bottom());

        let left = self.left;
        if left.right() > x1 && left.right() <= x2 && left.pos.y < y2 && left.bottom() > y1 {
            self.left.dim.w = left.right() - x1;
            self.left.pos.x = x1;
        }

        let right = self.right;
        if right.pos.x > x1 && right.pos.x <= x2 && right.pos.y < y2 && right.bottom() > y1 {
            self.right.dim.w = x2 - right.pos.x;
        }

        let top = self.top;
        if top.pos.x < x2 && top.right() > x1 && top.bottom() > y1 && top.bottom() <= y2 {
            self.top.dim.h = top.bottom() - y1;
            self.top.pos.y = y1;
        }

        let bottom = self.bottom;
        if bottom.pos.x < x2 && bottom.right() > x1 && bottom.pos.y > y1 && bottom.pos.y <= y2 {
            self.bottom.dim.h = y2 - bottom.pos.y;
        }
    }

    /// Shrink `area` so that it no longer overlaps any of these reservations.
    pub fn reserve(
        &self,
        area: Region,
    ) -> Region {
        let (mut x1, mut y1, mut x2, mut y2) = (area.pos.x, area.pos.y, area.right(), area.bottom());
        let overlaps = |strut: Region| !strut.is_empty() && strut.intersects(area);

        if overlaps(self.left) {
            x1 = std::cmp::max(x1, self.left.right());
        }

        if overlaps(self.right) {
            x2 = std::cmp::min(x2, self.right.pos.x);
        }

        if overlaps(self.top) {
            y1 = std::cmp::max(y1, self.top.bottom());
        }

        if overlaps(self.bottom) {
            y2 = std::cmp::min(y2, self.bottom.pos.y);
        }

        if x2 <= x1 || y2 <= y1 {
            return area;
        }

        Region::new(x1, y1, x2 - x1, y2 - y1)
    }
}

/// The part of `area` not reserved by any of `struts`.
pub fn compute_workarea<'s>(
    area: Region,
    struts: impl Iterator<Item = &'s Struts>,
) -> Region {
    struts.fold(area, |area, struts| struts.reserve(area))
}
