use crate::winsys::geometry::Dim;
use crate::winsys::geometry::Gravity;
use crate::winsys::geometry::Pos;
use crate::winsys::geometry::Ratio;
use crate::winsys::hints::Hints;
use crate::winsys::hints::SizeHints;
use crate::winsys::window::IcccmWindowState;

use x11rb::properties;
use x11rb::protocol::xproto;

fn positive_dim(value: Option<(i32, i32)>) -> Option<Dim> {
    value.and_then(|(w, h)| {
        if w > 0 || h > 0 {
            Some(Dim {
                w: std::cmp::max(w, 0),
                h: std::cmp::max(h, 0),
            })
        } else {
            None
        }
    })
}

impl From<&properties::WmSizeHints> for SizeHints {
    fn from(size_hints: &properties::WmSizeHints) -> Self {
        let (by_user, pos) = size_hints.position.map_or((false, None), |(spec, x, y)| {
            (
                matches!(spec, properties::WmSizeHintsSpecification::UserSpecified),
                Some(Pos {
                    x,
                    y,
                }),
            )
        });

        let aspect = size_hints.aspect.map(|(min, max)| {
            (
                Ratio::new(min.numerator, min.denominator),
                Ratio::new(max.numerator, max.denominator),
            )
        });

        Self {
            by_user,
            pos,
            min: positive_dim(size_hints.min_size),
            max: positive_dim(size_hints.max_size),
            base: size_hints.base_size.map(|(w, h)| Dim {
                w: std::cmp::max(w, 0),
                h: std::cmp::max(h, 0),
            }),
            inc: size_hints.size_increment.map(|(w, h)| Dim {
                w,
                h,
            }),
            aspect,
            gravity: size_hints.win_gravity.map(Gravity::from),
        }
    }
}

impl From<&properties::WmHints> for Hints {
    fn from(hints: &properties::WmHints) -> Self {
        Self {
            urgent: hints.urgent,
            input: hints.input,
            initial_state: hints.initial_state.map(|state| match state {
                properties::WmHintsState::Normal => IcccmWindowState::Normal,
                properties::WmHintsState::Iconic => IcccmWindowState::Iconic,
            }),
            group: hints.window_group,
        }
    }
}

impl From<xproto::Gravity> for Gravity {
    fn from(gravity: xproto::Gravity) -> Self {
        match gravity {
            xproto::Gravity::NORTH => Gravity::North,
            xproto::Gravity::NORTH_EAST => Gravity::NorthEast,
            xproto::Gravity::WEST => Gravity::West,
            xproto::Gravity::CENTER => Gravity::Center,
            xproto::Gravity::EAST => Gravity::East,
            xproto::Gravity::SOUTH_WEST => Gravity::SouthWest,
            xproto::Gravity::SOUTH => Gravity::South,
            xproto::Gravity::SOUTH_EAST => Gravity::SouthEast,
            xproto::Gravity::STATIC => Gravity::Static,
            _ => Gravity::NorthWest,
        }
    }
}

impl From<Gravity> for xproto::Gravity {
    fn from(gravity: Gravity) -> Self {
        match gravity {
            Gravity::NorthWest => xproto::Gravity::NORTH_WEST,
            Gravity::North => xproto::Gravity::NORTH,
            Gravity::NorthEast => xproto::Gravity::NORTH_EAST,
            Gravity::West => xproto::Gravity::WEST,
            Gravity::Center => xproto::Gravity::CENTER,
            Gravity::East => xproto::Gravity::EAST,
            Gravity::SouthWest => xproto::Gravity::SOUTH_WEST,
            Gravity::South => xproto::Gravity::SOUTH,
            Gravity::SouthEast => xproto::Gravity::SOUTH_EAST,
            Gravity::Static => xproto::Gravity::STATIC,
        }
    }
}
