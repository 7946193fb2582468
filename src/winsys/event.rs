use crate::winsys::connection::Timestamp;
use crate::winsys::geometry::Geometry;
use crate::winsys::geometry::Gravity;
use crate::winsys::window::Window;
use crate::winsys::window::WindowState;

use bitflags::bitflags;

bitflags! {
    /// Which fields of a `WindowChanges` are meaningful.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangeMask: u16 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const WIDTH = 1 << 2;
        const HEIGHT = 1 << 3;
        const BORDER_WIDTH = 1 << 4;
        const SIBLING = 1 << 5;
        const STACK_MODE = 1 << 6;

        const POSITION = Self::X.bits() | Self::Y.bits();
        const SIZE = Self::WIDTH.bits() | Self::HEIGHT.bits();
        const GEOMETRY = Self::POSITION.bits() | Self::SIZE.bits() | Self::BORDER_WIDTH.bits();
        const RESTACK = Self::SIBLING.bits() | Self::STACK_MODE.bits();
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum StackMode {
    Above,
    Below,
}

impl Default for StackMode {
    fn default() -> Self {
        StackMode::Above
    }
}

/// A configure request or reply; only the fields selected by an accompanying
/// `ChangeMask` carry meaning.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct WindowChanges {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub border_width: i32,
    pub sibling: Option<Window>,
    pub stack_mode: StackMode,
}

impl WindowChanges {
    pub fn from_geometry(geometry: Geometry) -> Self {
        Self {
            x: geometry.pos.x,
            y: geometry.pos.y,
            width: geometry.dim.w,
            height: geometry.dim.h,
            border_width: geometry.border,
            sibling: None,
            stack_mode: StackMode::Above,
        }
    }

    pub fn above(sibling: Option<Window>) -> Self {
        Self {
            sibling,
            stack_mode: StackMode::Above,
            ..Default::default()
        }
    }

    /// Overlay the masked fields onto `geometry`.
    pub fn apply_to(
        &self,
        geometry: Geometry,
        mask: ChangeMask,
    ) -> Geometry {
        let mut geometry = geometry;

        if mask.contains(ChangeMask::X) {
            geometry.pos.x = self.x;
        }

        if mask.contains(ChangeMask::Y) {
            geometry.pos.y = self.y;
        }

        if mask.contains(ChangeMask::WIDTH) {
            geometry.dim.w = self.width;
        }

        if mask.contains(ChangeMask::HEIGHT) {
            geometry.dim.h = self.height;
        }

        if mask.contains(ChangeMask::BORDER_WIDTH) {
            geometry.border = self.border_width;
        }

        geometry
    }

    /// Copy the masked fields of `other`, stacking fields included.
    pub fn merge(
        &mut self,
        other: &WindowChanges,
        mask: ChangeMask,
    ) {
        if mask.contains(ChangeMask::X) {
            self.x = other.x;
        }

        if mask.contains(ChangeMask::Y) {
            self.y = other.y;
        }

        if mask.contains(ChangeMask::WIDTH) {
            self.width = other.width;
        }

        if mask.contains(ChangeMask::HEIGHT) {
            self.height = other.height;
        }

        if mask.contains(ChangeMask::BORDER_WIDTH) {
            self.border_width = other.border_width;
        }

        if mask.contains(ChangeMask::SIBLING) {
            self.sibling = other.sibling;
        }

        if mask.contains(ChangeMask::STACK_MODE) {
            self.stack_mode = other.stack_mode;
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum CirculatePlace {
    OnTop,
    OnBottom,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum ToggleAction {
    Toggle,
    Add,
    Remove,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum PropertyKind {
    NormalHints,
    Hints,
    TransientFor,
    ClientLeader,
    WindowType,
    Protocols,
    UserTime,
    Strut,
}

/// Notifications and requests the dispatcher consumes, already decoded from
/// the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Create {
        window: Window,
    },
    MapRequest {
        window: Window,
    },
    Map {
        window: Window,
    },
    Unmap {
        window: Window,
    },
    Destroy {
        window: Window,
    },
    Configure {
        window: Window,
        geometry: Geometry,
        above: Option<Window>,
        override_redirect: bool,
        on_root: bool,
    },
    ConfigureRequest {
        window: Window,
        changes: WindowChanges,
        mask: ChangeMask,
    },
    Circulate {
        window: Window,
        place: CirculatePlace,
    },
    RestackRequest {
        window: Window,
        sibling: Window,
        mode: StackMode,
    },
    MoveResizeRequest {
        window: Window,
        changes: WindowChanges,
        mask: ChangeMask,
        gravity: Option<Gravity>,
    },
    Property {
        window: Window,
        kind: PropertyKind,
    },
    StateRequest {
        window: Window,
        state: WindowState,
        action: ToggleAction,
    },
    ActivateRequest {
        window: Window,
        time: Timestamp,
    },
    CloseRequest {
        window: Window,
        time: Timestamp,
    },
    DesktopRequest {
        window: Window,
        desktop: u32,
    },
    FullscreenMonitorsRequest {
        window: Window,
        monitors: [u32; 4],
    },
    SyncAlarm {
        window: Window,
    },
    Pong {
        window: Window,
        time: Timestamp,
    },
}
