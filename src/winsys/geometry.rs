use std::ops::Add;
use std::ops::Sub;

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Default for Pos {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
        }
    }
}

impl Pos {
    pub fn new(
        x: i32,
        y: i32,
    ) -> Self {
        Self {
            x,
            y,
        }
    }

    pub fn values(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl Add<Pos> for Pos {
    type Output = Self;

    fn add(
        self,
        other: Pos,
    ) -> Self::Output {
        Self::Output {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Dim {
    pub w: i32,
    pub h: i32,
}

impl Default for Dim {
    fn default() -> Self {
        Self {
            w: 0,
            h: 0,
        }
    }
}

impl Dim {
    pub fn new(
        w: i32,
        h: i32,
    ) -> Self {
        Self {
            w,
            h,
        }
    }

    pub fn values(&self) -> (i32, i32) {
        (self.w, self.h)
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Region {
    pub pos: Pos,
    pub dim: Dim,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            pos: Default::default(),
            dim: Default::default(),
        }
    }
}

impl Region {
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
        }
    }

    pub fn values(&self) -> (Pos, Dim) {
        (self.pos, self.dim)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.dim.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.dim.h
    }

    pub fn is_empty(&self) -> bool {
        self.dim.w <= 0 || self.dim.h <= 0
    }

    pub fn contains(
        &self,
        region: Region,
    ) -> bool {
        self.pos.x <= region.pos.x
            && self.pos.y <= region.pos.y
            && self.right() >= region.right()
            && self.bottom() >= region.bottom()
    }

    pub fn intersects(
        &self,
        region: Region,
    ) -> bool {
        self.pos.x < region.right()
            && region.pos.x < self.right()
            && self.pos.y < region.bottom()
            && region.pos.y < self.bottom()
    }

    pub fn intersection(
        &self,
        region: Region,
    ) -> Option<Region> {
        let x1 = std::cmp::max(self.pos.x, region.pos.x);
        let y1 = std::cmp::max(self.pos.y, region.pos.y);
        let x2 = std::cmp::min(self.right(), region.right());
        let y2 = std::cmp::min(self.bottom(), region.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Region::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    pub fn without_extents(
        &self,
        extents: Extents,
    ) -> Self {
        Self {
            pos: Pos {
                x: self.pos.x + extents.left,
                y: self.pos.y + extents.top,
            },
            dim: Dim {
                w: self.dim.w - extents.left - extents.right,
                h: self.dim.h - extents.top - extents.bottom,
            },
        }
    }

    pub fn with_extents(
        &self,
        extents: Extents,
    ) -> Self {
        Self {
            pos: Pos {
                x: self.pos.x - extents.left,
                y: self.pos.y - extents.top,
            },
            dim: Dim {
                w: self.dim.w + extents.left + extents.right,
                h: self.dim.h + extents.top + extents.bottom,
            },
        }
    }
}

/// Decoration thickness on each side of a client window.
#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Extents {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for Extents {
    fn default() -> Self {
        Self {
            left: 0,
            right: 0,
            top: 0,
            bottom: 0,
        }
    }
}

impl Extents {
    #[inline]
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

impl Add<Extents> for Region {
    type Output = Self;

    fn add(
        self,
        extents: Extents,
    ) -> Self::Output {
        self.with_extents(extents)
    }
}

impl Sub<Extents> for Region {
    type Output = Self;

    fn sub(
        self,
        extents: Extents,
    ) -> Self::Output {
        self.without_extents(extents)
    }
}

/// A window rectangle together with the width of its window-system border.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Geometry {
    pub pos: Pos,
    pub dim: Dim,
    pub border: i32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            pos: Default::default(),
            dim: Default::default(),
            border: 0,
        }
    }
}

impl Geometry {
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        border: i32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
            border,
        }
    }

    pub fn from_region(
        region: Region,
        border: i32,
    ) -> Self {
        Self {
            pos: region.pos,
            dim: region.dim,
            border,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.dim.w
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.dim.h
    }

    pub fn region(&self) -> Region {
        Region {
            pos: self.pos,
            dim: self.dim,
        }
    }

    /// The rectangle covered including the border on every side.
    pub fn bordered_region(&self) -> Region {
        Region::new(
            self.pos.x,
            self.pos.y,
            self.dim.w + self.border * 2,
            self.dim.h + self.border * 2,
        )
    }
}

/// The per-field difference between two geometries, as reported to move and
/// resize listeners.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Default)]
pub struct GeometryDelta {
    pub dx: i32,
    pub dy: i32,
    pub dw: i32,
    pub dh: i32,
    pub dborder: i32,
}

impl GeometryDelta {
    pub fn is_move_only(&self) -> bool {
        self.dw == 0 && self.dh == 0 && self.dborder == 0
    }

    pub fn is_zero(&self) -> bool {
        self.is_move_only() && self.dx == 0 && self.dy == 0
    }
}

impl Sub for Geometry {
    type Output = GeometryDelta;

    fn sub(
        self,
        other: Self,
    ) -> Self::Output {
        GeometryDelta {
            dx: self.pos.x - other.pos.x,
            dy: self.pos.y - other.pos.y,
            dw: self.dim.w - other.dim.w,
            dh: self.dim.h - other.dim.h,
            dborder: self.border - other.border,
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: i32,
    pub denominator: i32,
}

impl Ratio {
    pub fn new(
        numerator: i32,
        denominator: i32,
    ) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

/// The anchor point a window keeps fixed when its size changes implicitly.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum Gravity {
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
    Static,
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::NorthWest
    }
}
