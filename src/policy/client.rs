use crate::policy::constrain::SavedGeometry;
use crate::policy::hints::normalize;
use crate::policy::hints::NormalHints;
use crate::policy::lifecycle::Visibility;
use crate::policy::slot::Slots;
use crate::policy::struts::Struts;
use crate::policy::sync::SyncState;
use crate::winsys::connection::Timestamp;
use crate::winsys::connection::WindowAttributes;
use crate::winsys::geometry::Extents;
use crate::winsys::geometry::Geometry;
use crate::winsys::geometry::Region;
use crate::winsys::hints::Hints;
use crate::winsys::hints::SizeHints;
use crate::winsys::window::Actions;
use crate::winsys::window::Protocols;
use crate::winsys::window::StateMask;
use crate::winsys::window::TypeMask;
use crate::winsys::window::Window;
use crate::winsys::window::WindowType;
use crate::winsys::window::ALL_DESKTOPS;

use std::cell::Cell;
use std::cell::RefCell;

/// The record kept for every top-level window the core tracks.
pub struct Client {
    window: Cell<Window>,
    frame: Cell<Option<Window>>,
    wrapper: Cell<Option<Window>>,
    override_redirect: Cell<bool>,
    input_only: bool,
    alpha: bool,
    geometry: Cell<Geometry>,
    server_geometry: Cell<Geometry>,
    saved_geometry: Cell<SavedGeometry>,
    extents: Cell<Extents>,
    size_hints: Cell<SizeHints>,
    normal_hints: Cell<NormalHints>,
    hints: Cell<Hints>,
    state: Cell<StateMask>,
    window_type: Cell<WindowType>,
    wm_type: Cell<WindowType>,
    actions: Cell<Actions>,
    protocols: Cell<Protocols>,
    transient_for: Cell<Option<Window>>,
    transient_hint: Cell<Option<Window>>,
    client_leader: Cell<Option<Window>>,
    user_time: Cell<Option<Timestamp>>,
    desktop: Cell<u32>,
    struts: Cell<Option<Struts>>,
    fullscreen_monitors: Cell<Option<Region>>,
    destroy_refcnt: Cell<u32>,
    unmap_refcnt: Cell<u32>,
    pending_maps: Cell<u32>,
    pending_unmaps: Cell<u32>,
    map_num: Cell<u32>,
    active_num: Cell<u32>,
    viewable: Cell<bool>,
    managed: Cell<bool>,
    placed: Cell<bool>,
    grabbed: Cell<bool>,
    destroyed: Cell<bool>,
    alive: Cell<bool>,
    minimized: Cell<bool>,
    shaded: Cell<bool>,
    in_show_desktop_mode: Cell<bool>,
    hidden: Cell<bool>,
    visibility: Cell<Visibility>,
    sync: RefCell<SyncState>,
    close_requests: Cell<u32>,
    last_close_request: Cell<Timestamp>,
    last_ping: Cell<Timestamp>,
    last_pong: Cell<Timestamp>,
    slots: RefCell<Slots>,
}

impl Client {
    pub fn new(
        window: Window,
        attributes: WindowAttributes,
    ) -> Self {
        let geometry = attributes.geometry;

        Self {
            window: Cell::new(window),
            frame: Cell::new(None),
            wrapper: Cell::new(None),
            override_redirect: Cell::new(attributes.override_redirect),
            input_only: attributes.input_only,
            alpha: attributes.alpha,
            geometry: Cell::new(geometry),
            server_geometry: Cell::new(geometry),
            saved_geometry: Cell::new(Default::default()),
            extents: Cell::new(Default::default()),
            size_hints: Cell::new(Default::default()),
            normal_hints: Cell::new(normalize(&Default::default(), geometry.border)),
            hints: Cell::new(Default::default()),
            state: Cell::new(StateMask::empty()),
            window_type: Cell::new(WindowType::Unknown),
            wm_type: Cell::new(WindowType::Unknown),
            actions: Cell::new(Actions::empty()),
            protocols: Cell::new(Protocols::empty()),
            transient_for: Cell::new(None),
            transient_hint: Cell::new(None),
            client_leader: Cell::new(None),
            user_time: Cell::new(None),
            desktop: Cell::new(0),
            struts: Cell::new(None),
            fullscreen_monitors: Cell::new(None),
            destroy_refcnt: Cell::new(1),
            unmap_refcnt: Cell::new(1),
            pending_maps: Cell::new(0),
            pending_unmaps: Cell::new(0),
            map_num: Cell::new(0),
            active_num: Cell::new(0),
            viewable: Cell::new(attributes.viewable),
            managed: Cell::new(false),
            placed: Cell::new(false),
            grabbed: Cell::new(false),
            destroyed: Cell::new(false),
            alive: Cell::new(true),
            minimized: Cell::new(false),
            shaded: Cell::new(false),
            in_show_desktop_mode: Cell::new(false),
            hidden: Cell::new(false),
            visibility: Cell::new(if attributes.viewable {
                Visibility::Shown
            } else {
                Visibility::Hidden
            }),
            sync: RefCell::new(Default::default()),
            close_requests: Cell::new(0),
            last_close_request: Cell::new(0),
            last_ping: Cell::new(0),
            last_pong: Cell::new(0),
            slots: RefCell::new(Default::default()),
        }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window.get()
    }

    #[inline]
    pub fn set_window(
        &self,
        window: Window,
    ) {
        self.window.set(window);
    }

    #[inline]
    pub fn frame(&self) -> Option<Window> {
        self.frame.get()
    }

    #[inline]
    pub fn set_frame(
        &self,
        frame: Option<Window>,
    ) {
        self.frame.set(frame);
    }

    #[inline]
    pub fn wrapper(&self) -> Option<Window> {
        self.wrapper.get()
    }

    #[inline]
    pub fn set_wrapper(
        &self,
        wrapper: Option<Window>,
    ) {
        self.wrapper.set(wrapper);
    }

    /// The handle that sits directly below the root window: the frame once
    /// reparented, the client window before that.
    #[inline]
    pub fn root_parent(&self) -> Window {
        self.frame.get().unwrap_or_else(|| self.window.get())
    }

    #[inline]
    pub fn is_override_redirect(&self) -> bool {
        self.override_redirect.get()
    }

    #[inline]
    pub fn set_override_redirect(
        &self,
        override_redirect: bool,
    ) {
        self.override_redirect.set(override_redirect);
    }

    #[inline]
    pub fn is_input_only(&self) -> bool {
        self.input_only
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry.get()
    }

    #[inline]
    pub fn set_geometry(
        &self,
        geometry: Geometry,
    ) {
        self.geometry.set(geometry);
    }

    #[inline]
    pub fn server_geometry(&self) -> Geometry {
        self.server_geometry.get()
    }

    #[inline]
    pub fn set_server_geometry(
        &self,
        geometry: Geometry,
    ) {
        self.server_geometry.set(geometry);
    }

    #[inline]
    pub fn saved_geometry(&self) -> SavedGeometry {
        self.saved_geometry.get()
    }

    #[inline]
    pub fn set_saved_geometry(
        &self,
        saved: SavedGeometry,
    ) {
        self.saved_geometry.set(saved);
    }

    #[inline]
    pub fn extents(&self) -> Extents {
        self.extents.get()
    }

    #[inline]
    pub fn set_extents(
        &self,
        extents: Extents,
    ) {
        self.extents.set(extents);
    }

    #[inline]
    pub fn size_hints(&self) -> SizeHints {
        self.size_hints.get()
    }

    /// Store raw hints and renormalize them against the server border.
    pub fn set_size_hints(
        &self,
        size_hints: SizeHints,
    ) {
        self.size_hints.set(size_hints);
        self.renormalize_hints();
    }

    pub fn renormalize_hints(&self) {
        self.normal_hints.set(normalize(
            &self.size_hints.get(),
            self.server_geometry.get().border,
        ));
    }

    #[inline]
    pub fn normal_hints(&self) -> NormalHints {
        self.normal_hints.get()
    }

    #[inline]
    pub fn hints(&self) -> Hints {
        self.hints.get()
    }

    #[inline]
    pub fn set_hints(
        &self,
        hints: Hints,
    ) {
        self.hints.set(hints);
    }

    #[inline]
    pub fn state(&self) -> StateMask {
        self.state.get()
    }

    #[inline]
    pub fn set_state(
        &self,
        state: StateMask,
    ) {
        self.state.set(state);
    }

    #[inline]
    pub fn has_state(
        &self,
        state: StateMask,
    ) -> bool {
        self.state.get().intersects(state)
    }

    #[inline]
    pub fn window_type(&self) -> WindowType {
        self.window_type.get()
    }

    #[inline]
    pub fn is_type(
        &self,
        mask: TypeMask,
    ) -> bool {
        self.window_type.get().is(mask)
    }

    #[inline]
    pub fn wm_type(&self) -> WindowType {
        self.wm_type.get()
    }

    #[inline]
    pub fn set_wm_type(
        &self,
        wm_type: WindowType,
    ) {
        self.wm_type.set(wm_type);
    }

    #[inline]
    pub fn actions(&self) -> Actions {
        self.actions.get()
    }

    #[inline]
    pub fn protocols(&self) -> Protocols {
        self.protocols.get()
    }

    #[inline]
    pub fn set_protocols(
        &self,
        protocols: Protocols,
    ) {
        self.protocols.set(protocols);
    }

    /// Whether the window can be given input focus at all, either directly
    /// or through the take-focus protocol.
    pub fn accepts_focus(&self) -> bool {
        self.hints.get().accepts_input() || self.protocols.get().contains(Protocols::TAKE_FOCUS)
    }

    #[inline]
    pub fn transient_for(&self) -> Option<Window> {
        self.transient_for.get()
    }

    #[inline]
    pub fn set_transient_for(
        &self,
        transient_for: Option<Window>,
    ) {
        self.transient_for.set(transient_for);
    }

    /// The transient-for handle as the client last set it, kept even when
    /// it names a window that is not tracked yet.
    #[inline]
    pub fn transient_hint(&self) -> Option<Window> {
        self.transient_hint.get()
    }

    #[inline]
    pub fn set_transient_hint(
        &self,
        transient_hint: Option<Window>,
    ) {
        self.transient_hint.set(transient_hint);
    }

    #[inline]
    pub fn client_leader(&self) -> Option<Window> {
        self.client_leader.get()
    }

    #[inline]
    pub fn set_client_leader(
        &self,
        client_leader: Option<Window>,
    ) {
        self.client_leader.set(client_leader);
    }

    /// A window without a transient-for whose type implies it belongs to
    /// the application led by `leader`.
    pub fn is_group_transient(
        &self,
        leader: Option<Window>,
    ) -> bool {
        match leader {
            Some(leader) => {
                self.transient_for.get().is_none()
                    && self.is_type(TypeMask::GROUP_TRANSIENT)
                    && self.client_leader.get() == Some(leader)
            },
            None => false,
        }
    }

    #[inline]
    pub fn user_time(&self) -> Option<Timestamp> {
        self.user_time.get()
    }

    #[inline]
    pub fn set_user_time(
        &self,
        user_time: Option<Timestamp>,
    ) {
        self.user_time.set(user_time);
    }

    #[inline]
    pub fn desktop(&self) -> u32 {
        self.desktop.get()
    }

    #[inline]
    pub fn set_desktop(
        &self,
        desktop: u32,
    ) {
        self.desktop.set(desktop);
    }

    pub fn is_on_desktop(
        &self,
        desktop: u32,
    ) -> bool {
        self.desktop.get() == ALL_DESKTOPS || self.desktop.get() == desktop
    }

    #[inline]
    pub fn struts(&self) -> Option<Struts> {
        self.struts.get()
    }

    #[inline]
    pub fn set_struts(
        &self,
        struts: Option<Struts>,
    ) {
        self.struts.set(struts);
    }

    #[inline]
    pub fn fullscreen_monitors(&self) -> Option<Region> {
        self.fullscreen_monitors.get()
    }

    #[inline]
    pub fn set_fullscreen_monitors(
        &self,
        region: Option<Region>,
    ) {
        self.fullscreen_monitors.set(region);
    }

    #[inline]
    pub fn destroy_refcnt(&self) -> &Cell<u32> {
        &self.destroy_refcnt
    }

    #[inline]
    pub fn unmap_refcnt(&self) -> &Cell<u32> {
        &self.unmap_refcnt
    }

    #[inline]
    pub fn pending_maps(&self) -> &Cell<u32> {
        &self.pending_maps
    }

    #[inline]
    pub fn pending_unmaps(&self) -> &Cell<u32> {
        &self.pending_unmaps
    }

    #[inline]
    pub fn map_num(&self) -> u32 {
        self.map_num.get()
    }

    #[inline]
    pub fn set_map_num(
        &self,
        map_num: u32,
    ) {
        self.map_num.set(map_num);
    }

    #[inline]
    pub fn active_num(&self) -> u32 {
        self.active_num.get()
    }

    #[inline]
    pub fn set_active_num(
        &self,
        active_num: u32,
    ) {
        self.active_num.set(active_num);
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.map_num.get() != 0
    }

    #[inline]
    pub fn is_viewable(&self) -> bool {
        self.viewable.get()
    }

    #[inline]
    pub fn set_viewable(
        &self,
        viewable: bool,
    ) {
        self.viewable.set(viewable);
    }

    #[inline]
    pub fn is_managed(&self) -> bool {
        self.managed.get()
    }

    #[inline]
    pub fn set_managed(
        &self,
        managed: bool,
    ) {
        self.managed.set(managed);
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placed.get()
    }

    #[inline]
    pub fn set_placed(
        &self,
        placed: bool,
    ) {
        self.placed.set(placed);
    }

    #[inline]
    pub fn is_grabbed(&self) -> bool {
        self.grabbed.get()
    }

    #[inline]
    pub fn set_grabbed(
        &self,
        grabbed: bool,
    ) {
        self.grabbed.set(grabbed);
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    #[inline]
    pub fn set_destroyed(
        &self,
        destroyed: bool,
    ) {
        self.destroyed.set(destroyed);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    #[inline]
    pub fn set_alive(
        &self,
        alive: bool,
    ) {
        self.alive.set(alive);
    }

    #[inline]
    pub fn is_minimized(&self) -> bool {
        self.minimized.get()
    }

    #[inline]
    pub fn set_minimized(
        &self,
        minimized: bool,
    ) {
        self.minimized.set(minimized);
    }

    #[inline]
    pub fn is_shaded(&self) -> bool {
        self.shaded.get()
    }

    #[inline]
    pub fn set_shaded(
        &self,
        shaded: bool,
    ) {
        self.shaded.set(shaded);
    }

    #[inline]
    pub fn is_in_show_desktop_mode(&self) -> bool {
        self.in_show_desktop_mode.get()
    }

    #[inline]
    pub fn set_in_show_desktop_mode(
        &self,
        in_show_desktop_mode: bool,
    ) {
        self.in_show_desktop_mode.set(in_show_desktop_mode);
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden.get()
    }

    #[inline]
    pub fn set_hidden(
        &self,
        hidden: bool,
    ) {
        self.hidden.set(hidden);
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility.get()
    }

    #[inline]
    pub fn set_visibility(
        &self,
        visibility: Visibility,
    ) {
        self.visibility.set(visibility);
    }

    #[inline]
    pub fn sync(&self) -> &RefCell<SyncState> {
        &self.sync
    }

    pub fn register_close_request(
        &self,
        time: Timestamp,
    ) {
        self.close_requests.set(self.close_requests.get() + 1);
        self.last_close_request.set(time);
    }

    #[inline]
    pub fn close_requests(&self) -> u32 {
        self.close_requests.get()
    }

    #[inline]
    pub fn last_close_request(&self) -> Timestamp {
        self.last_close_request.get()
    }

    pub fn clear_close_requests(&self) {
        self.close_requests.set(0);
    }

    #[inline]
    pub fn set_last_close_request(
        &self,
        time: Timestamp,
    ) {
        self.last_close_request.set(time);
    }

    #[inline]
    pub fn last_ping(&self) -> Timestamp {
        self.last_ping.get()
    }

    #[inline]
    pub fn set_last_ping(
        &self,
        last_ping: Timestamp,
    ) {
        self.last_ping.set(last_ping);
    }

    #[inline]
    pub fn last_pong(&self) -> Timestamp {
        self.last_pong.get()
    }

    #[inline]
    pub fn set_last_pong(
        &self,
        last_pong: Timestamp,
    ) {
        self.last_pong.set(last_pong);
    }

    #[inline]
    pub fn slots(&self) -> &RefCell<Slots> {
        &self.slots
    }

    /// Derive the effective type from the declared type and current state.
    pub fn recalc_type(&self) -> WindowType {
        let state = self.state.get();
        let mut window_type = self.wm_type.get();

        if !self.is_override_redirect() && window_type == WindowType::Unknown {
            window_type = WindowType::Normal;
        }

        if state.contains(StateMask::FULLSCREEN) {
            window_type = WindowType::Fullscreen;
        }

        if window_type == WindowType::Normal && self.transient_for.get().is_some() {
            window_type = WindowType::Dialog;
        }

        if window_type == WindowType::Dock && state.contains(StateMask::BELOW) {
            window_type = WindowType::Normal;
        }

        if matches!(window_type, WindowType::Normal | WindowType::Dialog)
            && state.contains(StateMask::MODAL)
        {
            window_type = WindowType::ModalDialog;
        }

        self.window_type.set(window_type);
        window_type
    }

    /// Derive the actions a user may perform from type, hints and frame.
    pub fn recalc_actions(&self) -> Actions {
        let mut actions = match self.window_type.get() {
            WindowType::Normal | WindowType::Fullscreen => {
                Actions::MAXIMIZE_HORZ
                    | Actions::MAXIMIZE_VERT
                    | Actions::FULLSCREEN
                    | Actions::MOVE
                    | Actions::RESIZE
                    | Actions::STICK
                    | Actions::MINIMIZE
                    | Actions::CLOSE
                    | Actions::CHANGE_DESKTOP
            },
            WindowType::Utility | WindowType::Menu | WindowType::Toolbar => {
                Actions::MOVE
                    | Actions::RESIZE
                    | Actions::STICK
                    | Actions::CLOSE
                    | Actions::CHANGE_DESKTOP
            },
            WindowType::Dialog | WindowType::ModalDialog => {
                let mut actions = Actions::MAXIMIZE_HORZ
                    | Actions::MAXIMIZE_VERT
                    | Actions::MOVE
                    | Actions::RESIZE
                    | Actions::STICK
                    | Actions::CLOSE
                    | Actions::CHANGE_DESKTOP;

                // transients minimize with their parent
                if self.transient_for.get().is_none()
                    && !self.state.get().contains(StateMask::SKIP_TASKBAR)
                {
                    actions |= Actions::MINIMIZE;
                }

                actions
            },
            _ => Actions::empty(),
        };

        if self.extents.get().top > 0 {
            actions |= Actions::SHADE;
        }

        actions |= Actions::ABOVE | Actions::BELOW;

        if self.wm_type.get() == WindowType::Normal {
            actions |= Actions::FULLSCREEN | Actions::MINIMIZE;
        }

        if self.normal_hints.get().is_fixed_size() {
            actions.remove(
                Actions::RESIZE
                    | Actions::MAXIMIZE_HORZ
                    | Actions::MAXIMIZE_VERT
                    | Actions::FULLSCREEN,
            );
        }

        self.actions.set(actions);
        actions
    }

    /// Strip the state bits the window's allowed actions do not permit.
    pub fn constrain_state(
        &self,
        state: StateMask,
    ) -> StateMask {
        let actions = self.actions.get();
        let mut state = state;

        if !actions.contains(Actions::MAXIMIZE_HORZ) {
            state.remove(StateMask::MAXIMIZED_HORZ);
        }

        if !actions.contains(Actions::MAXIMIZE_VERT) {
            state.remove(StateMask::MAXIMIZED_VERT);
        }

        if !actions.contains(Actions::SHADE) {
            state.remove(StateMask::SHADED);
        }

        if !actions.contains(Actions::FULLSCREEN) {
            state.remove(StateMask::FULLSCREEN);
        }

        state
    }
}

impl PartialEq for Client {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.window.get() == other.window.get()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("window", &format!("{:#0x}", &self.window.get()))
            .field("frame", &self.frame.get().map(|frame| format!("{:#0x}", frame)))
            .field("window_type", &self.window_type.get())
            .field("geometry", &self.geometry.get())
            .field("server_geometry", &self.server_geometry.get())
            .field("state", &self.state.get())
            .field("transient_for", &self.transient_for.get())
            .field("client_leader", &self.client_leader.get())
            .field("map_num", &self.map_num.get())
            .field("managed", &self.managed.get())
            .field("visibility", &self.visibility.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::winsys::geometry::Dim;
    use simple_test_case::test_case;

    fn client(wm_type: WindowType) -> Client {
        let client = Client::new(0x200, WindowAttributes {
            override_redirect: false,
            viewable: false,
            input_only: false,
            ..Default::default()
        });

        client.set_wm_type(wm_type);
        client
    }

    #[test_case(WindowType::Unknown, StateMask::empty(), None, WindowType::Normal; "unknown becomes normal")]
    #[test_case(WindowType::Normal, StateMask::FULLSCREEN, None, WindowType::Fullscreen; "fullscreen state")]
    #[test_case(WindowType::Normal, StateMask::empty(), Some(0x100), WindowType::Dialog; "normal transient is dialog")]
    #[test_case(WindowType::Dock, StateMask::BELOW, None, WindowType::Normal; "dock below is normal")]
    #[test_case(WindowType::Dialog, StateMask::MODAL, None, WindowType::ModalDialog; "modal dialog")]
    #[test_case(WindowType::Utility, StateMask::MODAL, None, WindowType::Utility; "modal utility stays")]
    #[test]
    fn recalc_type(
        wm_type: WindowType,
        state: StateMask,
        transient_for: Option<Window>,
        expected: WindowType,
    ) {
        let client = client(wm_type);
        client.set_state(state);
        client.set_transient_for(transient_for);

        assert_eq!(client.recalc_type(), expected);
        assert_eq!(client.window_type(), expected);
    }

    #[test]
    fn override_redirect_unknown_stays_unknown() {
        let client = Client::new(0x200, WindowAttributes::default());
        assert_eq!(client.recalc_type(), WindowType::Unknown);
    }

    #[test]
    fn fixed_size_windows_cannot_resize_or_maximize() {
        let client = client(WindowType::Normal);
        client.set_size_hints(SizeHints {
            min: Some(Dim::new(200, 100)),
            max: Some(Dim::new(200, 100)),
            ..Default::default()
        });

        client.recalc_type();
        let actions = client.recalc_actions();

        assert!(actions.contains(Actions::MOVE | Actions::CLOSE | Actions::MINIMIZE));
        assert!(!actions.intersects(
            Actions::RESIZE | Actions::MAXIMIZE_HORZ | Actions::MAXIMIZE_VERT | Actions::FULLSCREEN
        ));

        let state = client.constrain_state(StateMask::MAXIMIZED | StateMask::FULLSCREEN | StateMask::ABOVE);
        assert_eq!(state, StateMask::ABOVE);
    }

    #[test]
    fn transient_dialogs_cannot_minimize() {
        let client = client(WindowType::Dialog);
        client.recalc_type();
        assert!(client.recalc_actions().contains(Actions::MINIMIZE));

        client.set_transient_for(Some(0x100));
        client.recalc_type();
        assert!(!client.recalc_actions().contains(Actions::MINIMIZE));
    }

    #[test]
    fn shade_requires_a_title_extent() {
        let client = client(WindowType::Normal);
        client.recalc_type();
        assert!(!client.recalc_actions().contains(Actions::SHADE));

        client.set_extents(Extents {
            left: 1,
            right: 1,
            top: 20,
            bottom: 1,
        });
        assert!(client.recalc_actions().contains(Actions::SHADE));
    }

    #[test]
    fn group_transience_needs_matching_leader_and_type() {
        let client = client(WindowType::Utility);
        client.recalc_type();
        client.set_client_leader(Some(0x500));

        assert!(client.is_group_transient(Some(0x500)));
        assert!(!client.is_group_transient(Some(0x600)));
        assert!(!client.is_group_transient(None));

        client.set_transient_for(Some(0x100));
        assert!(!client.is_group_transient(Some(0x500)));
    }

    #[test]
    fn all_desktops_is_on_every_desktop() {
        let client = client(WindowType::Normal);
        client.set_desktop(2);

        assert!(client.is_on_desktop(2));
        assert!(!client.is_on_desktop(0));

        client.set_desktop(ALL_DESKTOPS);
        assert!(client.is_on_desktop(0));
    }
}
