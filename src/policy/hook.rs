use crate::policy::client::Client;
use crate::winsys::geometry::GeometryDelta;
use crate::winsys::geometry::Pos;
use crate::winsys::window::StateMask;

use strum::AsRefStr;
use strum::EnumIter;

/// Lifecycle transitions reported to hooks. `Before*` variants fire ahead of
/// the state mutation they announce; the rest fire after it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum WindowNotify {
    BeforeMap,
    Map,
    BeforeUnmap,
    Unmap,
    BeforeDestroy,
    Restack,
    Hide,
    Show,
    Minimize,
    Unminimize,
    Shade,
    Unshade,
    Close,
    Grab,
    Ungrab,
    EnterShowDesktopMode,
    LeaveShowDesktopMode,
    Reparent,
    Unreparent,
    FrameUpdate,
    AliveChanged,
    SyncAlarm,
}

/// An observer of window records. Every method defaults to doing nothing.
pub trait WindowHook {
    fn window_notify(
        &self,
        _client: &Client,
        _notify: WindowNotify,
    ) {
    }

    fn move_notify(
        &self,
        _client: &Client,
        _delta: GeometryDelta,
    ) {
    }

    fn resize_notify(
        &self,
        _client: &Client,
        _delta: GeometryDelta,
    ) {
    }

    fn state_change_notify(
        &self,
        _client: &Client,
        _last_state: StateMask,
    ) {
    }

    fn activate(
        &self,
        _client: &Client,
    ) {
    }

    /// Offer an initial position for a window about to be mapped; `None`
    /// keeps the position the core computed.
    fn place(
        &self,
        _client: &Client,
        _pos: Pos,
    ) -> Option<Pos> {
        None
    }
}
