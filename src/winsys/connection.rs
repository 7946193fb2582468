use crate::winsys::event::ChangeMask;
use crate::winsys::event::WindowChanges;
use crate::winsys::geometry::Extents;
use crate::winsys::geometry::Geometry;
use crate::winsys::geometry::Pos;
use crate::winsys::geometry::Region;
use crate::winsys::hints::Hints;
use crate::winsys::hints::SizeHints;
use crate::winsys::window::Actions;
use crate::winsys::window::IcccmWindowState;
use crate::winsys::window::Protocols;
use crate::winsys::window::StateMask;
use crate::winsys::window::Window;
use crate::winsys::window::WindowType;
use crate::Result;

pub type Timestamp = u32;

/// The subset of window attributes the core needs when it starts tracking a
/// top-level window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub geometry: Geometry,
    pub override_redirect: bool,
    pub viewable: bool,
    pub input_only: bool,
    pub alpha: bool,
}

impl Default for WindowAttributes {
    fn default() -> Self {
        Self {
            geometry: Geometry::new(0, 0, 1, 1, 0),
            override_redirect: true,
            viewable: false,
            input_only: true,
            alpha: false,
        }
    }
}

/// Window-system primitives the policy core drives. Implementations talk to
/// the display server; the core never issues protocol requests itself.
pub trait Connection {
    fn root(&self) -> Window;
    fn screen_region(&self) -> Region;
    fn connected_outputs(&self) -> Vec<Region>;
    fn current_time(&self) -> Timestamp;

    // Window queries
    fn get_window_attributes(
        &self,
        window: Window,
    ) -> Result<WindowAttributes>;
    fn get_icccm_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints>;
    fn get_icccm_window_hints(
        &self,
        window: Window,
    ) -> Option<Hints>;
    fn get_icccm_window_transient_for(
        &self,
        window: Window,
    ) -> Option<Window>;
    fn get_icccm_window_client_leader(
        &self,
        window: Window,
    ) -> Option<Window>;
    fn get_icccm_window_protocols(
        &self,
        window: Window,
    ) -> Protocols;
    fn get_window_preferred_type(
        &self,
        window: Window,
    ) -> Option<WindowType>;
    fn get_window_preferred_state(
        &self,
        window: Window,
    ) -> StateMask;
    fn get_window_user_time(
        &self,
        window: Window,
    ) -> Option<Timestamp>;
    fn get_window_strut(
        &self,
        window: Window,
    ) -> Option<Vec<u32>>;
    fn get_window_strut_partial(
        &self,
        window: Window,
    ) -> Option<Vec<u32>>;

    // Decoration handles
    fn create_frame(
        &self,
        region: Region,
    ) -> Window;
    fn create_wrapper(
        &self,
        frame: Window,
        region: Region,
    ) -> Window;
    fn destroy_window(
        &self,
        window: Window,
    );
    fn reparent_window(
        &self,
        window: Window,
        parent: Window,
        pos: Pos,
    );
    fn unparent_window(
        &self,
        window: Window,
        pos: Pos,
    );
    fn insert_window_in_save_set(
        &self,
        window: Window,
    );

    // Window manipulation
    fn map_window(
        &self,
        window: Window,
    );
    fn unmap_window(
        &self,
        window: Window,
    );
    fn configure_window(
        &self,
        window: Window,
        changes: &WindowChanges,
        mask: ChangeMask,
    );
    fn lower_window(
        &self,
        window: Window,
    );
    fn focus_window(
        &self,
        window: Window,
    );
    fn unfocus(&self);
    fn send_take_focus(
        &self,
        window: Window,
        time: Timestamp,
    );
    fn send_configure_notify(
        &self,
        window: Window,
        geometry: Geometry,
        above: Option<Window>,
        override_redirect: bool,
    );
    fn close_window(
        &self,
        window: Window,
        time: Timestamp,
    );
    fn kill_window(
        &self,
        window: Window,
    );
    fn send_ping(
        &self,
        window: Window,
        time: Timestamp,
    );

    // Sync counter
    fn init_sync_counter(
        &self,
        window: Window,
    ) -> bool;
    fn send_sync_request(
        &self,
        window: Window,
        value: u64,
    );

    // Published state
    fn set_icccm_window_state(
        &self,
        window: Window,
        state: IcccmWindowState,
    );
    fn set_window_state(
        &self,
        window: Window,
        state: StateMask,
    );
    fn set_window_allowed_actions(
        &self,
        window: Window,
        actions: Actions,
    );
    fn set_window_desktop(
        &self,
        window: Window,
        desktop: u32,
    );
    fn set_window_frame_extents(
        &self,
        window: Window,
        extents: Extents,
    );
    fn set_window_user_time(
        &self,
        window: Window,
        time: Timestamp,
    );
    fn update_active_window(
        &self,
        window: Option<Window>,
    );
    fn update_current_desktop(
        &self,
        desktop: u32,
    );
    fn update_client_list(
        &self,
        clients: &[Window],
    );
    fn update_client_list_stacking(
        &self,
        clients: &[Window],
    );
    fn update_workarea(
        &self,
        workarea: Region,
    );
}
