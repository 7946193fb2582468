use bitflags::bitflags;
use strum::EnumIter;

pub type Window = u32;

/// A handle that no live window can carry; records of destroyed windows are
/// re-keyed to it so late events cannot reach them.
pub const DESTROYED_WINDOW: Window = 1;

/// The desktop index meaning "on every desktop".
pub const ALL_DESKTOPS: u32 = 0xffff_ffff;

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum IcccmWindowState {
    Withdrawn,
    Normal,
    Iconic,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, EnumIter)]
pub enum WindowState {
    Modal,
    Sticky,
    MaximizedVert,
    MaximizedHorz,
    Shaded,
    SkipTaskbar,
    SkipPager,
    Hidden,
    Fullscreen,
    Above,
    Below,
    DemandsAttention,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum WindowType {
    Desktop,
    Dock,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Dialog,
    ModalDialog,
    DropdownMenu,
    PopupMenu,
    Tooltip,
    Notification,
    Combo,
    Dnd,
    Normal,
    Fullscreen,
    Unknown,
}

bitflags! {
    /// The state bitset carried by every window record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateMask: u32 {
        const MODAL = 1 << 0;
        const STICKY = 1 << 1;
        const MAXIMIZED_VERT = 1 << 2;
        const MAXIMIZED_HORZ = 1 << 3;
        const SHADED = 1 << 4;
        const SKIP_TASKBAR = 1 << 5;
        const SKIP_PAGER = 1 << 6;
        const HIDDEN = 1 << 7;
        const FULLSCREEN = 1 << 8;
        const ABOVE = 1 << 9;
        const BELOW = 1 << 10;
        const DEMANDS_ATTENTION = 1 << 11;

        const MAXIMIZED = Self::MAXIMIZED_VERT.bits() | Self::MAXIMIZED_HORZ.bits();
    }
}

impl From<WindowState> for StateMask {
    fn from(state: WindowState) -> Self {
        match state {
            WindowState::Modal => StateMask::MODAL,
            WindowState::Sticky => StateMask::STICKY,
            WindowState::MaximizedVert => StateMask::MAXIMIZED_VERT,
            WindowState::MaximizedHorz => StateMask::MAXIMIZED_HORZ,
            WindowState::Shaded => StateMask::SHADED,
            WindowState::SkipTaskbar => StateMask::SKIP_TASKBAR,
            WindowState::SkipPager => StateMask::SKIP_PAGER,
            WindowState::Hidden => StateMask::HIDDEN,
            WindowState::Fullscreen => StateMask::FULLSCREEN,
            WindowState::Above => StateMask::ABOVE,
            WindowState::Below => StateMask::BELOW,
            WindowState::DemandsAttention => StateMask::DEMANDS_ATTENTION,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeMask: u32 {
        const DESKTOP = 1 << 0;
        const DOCK = 1 << 1;
        const TOOLBAR = 1 << 2;
        const MENU = 1 << 3;
        const UTILITY = 1 << 4;
        const SPLASH = 1 << 5;
        const DIALOG = 1 << 6;
        const NORMAL = 1 << 7;
        const DROPDOWN_MENU = 1 << 8;
        const POPUP_MENU = 1 << 9;
        const TOOLTIP = 1 << 10;
        const NOTIFICATION = 1 << 11;
        const COMBO = 1 << 12;
        const DND = 1 << 13;
        const MODAL_DIALOG = 1 << 14;
        const FULLSCREEN = 1 << 15;
        const UNKNOWN = 1 << 16;

        /// Types that may be group transients of their client leader.
        const GROUP_TRANSIENT = Self::UTILITY.bits()
            | Self::TOOLBAR.bits()
            | Self::MENU.bits()
            | Self::DIALOG.bits()
            | Self::MODAL_DIALOG.bits();

        /// Types never given focus when they map.
        const NO_FOCUS = Self::DESKTOP.bits() | Self::DOCK.bits() | Self::SPLASH.bits();

        /// The shared layer above normal windows.
        const DOCK_LAYER = Self::DOCK.bits() | Self::FULLSCREEN.bits();
    }
}

impl From<WindowType> for TypeMask {
    fn from(window_type: WindowType) -> Self {
        match window_type {
            WindowType::Desktop => TypeMask::DESKTOP,
            WindowType::Dock => TypeMask::DOCK,
            WindowType::Toolbar => TypeMask::TOOLBAR,
            WindowType::Menu => TypeMask::MENU,
            WindowType::Utility => TypeMask::UTILITY,
            WindowType::Splash => TypeMask::SPLASH,
            WindowType::Dialog => TypeMask::DIALOG,
            WindowType::ModalDialog => TypeMask::MODAL_DIALOG,
            WindowType::DropdownMenu => TypeMask::DROPDOWN_MENU,
            WindowType::PopupMenu => TypeMask::POPUP_MENU,
            WindowType::Tooltip => TypeMask::TOOLTIP,
            WindowType::Notification => TypeMask::NOTIFICATION,
            WindowType::Combo => TypeMask::COMBO,
            WindowType::Dnd => TypeMask::DND,
            WindowType::Normal => TypeMask::NORMAL,
            WindowType::Fullscreen => TypeMask::FULLSCREEN,
            WindowType::Unknown => TypeMask::UNKNOWN,
        }
    }
}

impl WindowType {
    #[inline]
    pub fn mask(self) -> TypeMask {
        self.into()
    }

    #[inline]
    pub fn is(
        self,
        mask: TypeMask,
    ) -> bool {
        mask.contains(self.mask())
    }
}

bitflags! {
    /// Operations a window allows the user to perform on it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u32 {
        const MOVE = 1 << 0;
        const RESIZE = 1 << 1;
        const STICK = 1 << 2;
        const MINIMIZE = 1 << 3;
        const MAXIMIZE_HORZ = 1 << 4;
        const MAXIMIZE_VERT = 1 << 5;
        const FULLSCREEN = 1 << 6;
        const CLOSE = 1 << 7;
        const SHADE = 1 << 8;
        const CHANGE_DESKTOP = 1 << 9;
        const ABOVE = 1 << 10;
        const BELOW = 1 << 11;
    }
}

bitflags! {
    /// WM_PROTOCOLS a client declares support for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Protocols: u32 {
        const DELETE = 1 << 0;
        const TAKE_FOCUS = 1 << 1;
        const PING = 1 << 2;
        const SYNC_REQUEST = 1 << 3;
    }
}
