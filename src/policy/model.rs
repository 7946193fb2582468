use crate::policy::client::Client;
use crate::policy::config::Config;
use crate::policy::config::Settings;
use crate::policy::constrain::adjust_for_gravity;
use crate::policy::constrain::clamp_to_workarea;
use crate::policy::constrain::compute_size_changes;
use crate::policy::constrain::constrain;
use crate::policy::constrain::SizeContext;
use crate::policy::error::StateChangeError;
use crate::policy::hook::WindowHook;
use crate::policy::hook::WindowNotify;
use crate::policy::slot::SlotAllocator;
use crate::policy::stack::StackManager;
use crate::policy::stack::StackingUpdateMode;
use crate::policy::struts::compute_workarea;
use crate::policy::struts::Struts;
use crate::policy::timer::Clock;
use crate::policy::timer::Timer;
use crate::policy::transient::resolve_client_leader;
use crate::policy::transient::validate_transient_for;
use crate::policy::transient::ClientMap;
use crate::policy::util::BuildIdHasher;
use crate::policy::util::Util;
use crate::winsys::connection::Connection;
use crate::winsys::connection::Timestamp;
use crate::winsys::event::ChangeMask;
use crate::winsys::event::CirculatePlace;
use crate::winsys::event::Event;
use crate::winsys::event::PropertyKind;
use crate::winsys::event::StackMode;
use crate::winsys::event::ToggleAction;
use crate::winsys::event::WindowChanges;
use crate::winsys::geometry::Dim;
use crate::winsys::geometry::Extents;
use crate::winsys::geometry::Geometry;
use crate::winsys::geometry::Gravity;
use crate::winsys::geometry::Pos;
use crate::winsys::geometry::Region;
use crate::winsys::window::IcccmWindowState;
use crate::winsys::window::Protocols;
use crate::winsys::window::StateMask;
use crate::winsys::window::TypeMask;
use crate::winsys::window::Window;
use crate::winsys::window::WindowState;
use crate::winsys::window::WindowType;
use crate::winsys::window::ALL_DESKTOPS;

use std::collections::HashMap;

/// How far a window lying entirely outside the work area is pulled back in.
const VISIBILITY_MARGIN: i32 = 25;

/// The policy core: owns every window record and the stacking list, and
/// drives the window system through a `Connection`.
pub struct Model<'a> {
    pub(crate) conn: &'a dyn Connection,
    pub(crate) clock: Box<dyn Clock + 'a>,
    pub(crate) settings: Settings,
    pub(crate) client_map: ClientMap,
    pub(crate) frame_map: HashMap<Window, Window, BuildIdHasher>,
    pub(crate) pending_destroy: ClientMap,
    pub(crate) stack: StackManager,
    pub(crate) hooks: Vec<Box<dyn WindowHook + 'a>>,
    pub(crate) slot_allocator: SlotAllocator,
    pub(crate) active_window: Option<Window>,
    pub(crate) active_counter: u32,
    pub(crate) map_counter: u32,
    pub(crate) current_desktop: u32,
    pub(crate) desktop_count: u32,
    pub(crate) show_desktop_mode: bool,
    pub(crate) workarea: Region,
    pub(crate) client_list: Vec<Window>,
    pub(crate) published_client_list: Vec<Window>,
    pub(crate) published_client_list_stacking: Vec<Window>,
    pub(crate) ping_timer: Timer,
    pub(crate) last_ping: Timestamp,
}

impl<'a> Model<'a> {
    pub fn new(
        conn: &'a dyn Connection,
        config: &dyn Config,
        clock: Box<dyn Clock + 'a>,
    ) -> Self {
        let settings = Settings::load(config);
        let mut ping_timer = Timer::new(settings.ping_delay, settings.ping_delay);
        ping_timer.start(clock.now());

        info!("initializing policy core");
        debug!("settings: {:?}", settings);

        Self {
            conn,
            clock,
            settings,
            client_map: ClientMap::default(),
            frame_map: HashMap::default(),
            pending_destroy: ClientMap::default(),
            stack: StackManager::new(),
            hooks: Vec::new(),
            slot_allocator: SlotAllocator::new(),
            active_window: None,
            active_counter: 0,
            map_counter: 1,
            current_desktop: 0,
            desktop_count: 1,
            show_desktop_mode: false,
            workarea: conn.screen_region(),
            client_list: Vec::new(),
            published_client_list: Vec::new(),
            published_client_list_stacking: Vec::new(),
            ping_timer,
            last_ping: 0,
        }
    }

    pub fn register_hook(
        &mut self,
        hook: Box<dyn WindowHook + 'a>,
    ) {
        self.hooks.push(hook);
    }

    /// Reserve an extension slot index valid on every record.
    pub fn allocate_slot(&mut self) -> usize {
        self.slot_allocator.allocate()
    }

    /// Release a slot index, dropping whatever every record kept in it.
    pub fn release_slot(
        &mut self,
        index: usize,
    ) {
        for client in self.client_map.values() {
            client.slots().borrow_mut().clear(index);
        }

        self.slot_allocator.release(index);
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn stack(&self) -> &StackManager {
        &self.stack
    }

    #[inline]
    pub fn active_window(&self) -> Option<Window> {
        self.active_window
    }

    #[inline]
    pub fn current_desktop(&self) -> u32 {
        self.current_desktop
    }

    #[inline]
    pub fn desktop_count(&self) -> u32 {
        self.desktop_count
    }

    #[inline]
    pub fn workarea(&self) -> Region {
        self.workarea
    }

    #[inline]
    pub fn is_in_show_desktop_mode(&self) -> bool {
        self.show_desktop_mode
    }

    /// Managed windows in the order they were first mapped.
    #[inline]
    pub fn client_list(&self) -> &[Window] {
        &self.client_list
    }

    /// The record of a managed window, looked up by client or frame handle.
    pub fn client(
        &self,
        window: Window,
    ) -> Option<&Client> {
        self.client_any(window).filter(|client| client.is_managed())
    }

    /// The record of any tracked window, looked up by client or frame
    /// handle.
    pub fn client_any(
        &self,
        window: Window,
    ) -> Option<&Client> {
        match self.frame_map.get(&window) {
            Some(inside) => self.client_map.get(inside),
            None => self.client_map.get(&window),
        }
    }

    /// The client handle owning `window`, which may be a frame handle.
    pub(crate) fn owner(
        &self,
        window: Window,
    ) -> Option<Window> {
        self.client_any(window).map(|client| client.window())
    }

    pub(crate) fn notify(
        &self,
        client: &Client,
        notify: WindowNotify,
    ) {
        trace!("window {:#0x}: {}", client.window(), notify.as_ref());

        for hook in self.hooks.iter() {
            hook.window_notify(client, notify);
        }
    }

    /// Report the move and resize parts of a geometry change separately.
    pub(crate) fn notify_geometry(
        &self,
        client: &Client,
        old: Geometry,
        new: Geometry,
    ) {
        let delta = new - old;

        if delta.dx != 0 || delta.dy != 0 {
            for hook in self.hooks.iter() {
                hook.move_notify(client, delta);
            }
        }

        if !delta.is_move_only() {
            for hook in self.hooks.iter() {
                hook.resize_notify(client, delta);
            }
        }
    }

    pub fn set_desktop_count(
        &mut self,
        count: u32,
    ) {
        self.desktop_count = std::cmp::max(count, 1);

        if self.current_desktop >= self.desktop_count {
            self.set_current_desktop(self.desktop_count - 1);
        }
    }

    pub fn handle_event(
        &mut self,
        event: Event,
    ) {
        trace!("received event: {:?}", event);

        match event {
            Event::Create {
                window,
            } => self.add_window(window),
            Event::MapRequest {
                window,
            } => self.handle_map_request(window),
            Event::Map {
                window,
            } => self.handle_map(window),
            Event::Unmap {
                window,
            } => self.handle_unmap(window),
            Event::Destroy {
                window,
            } => self.handle_destroy(window),
            Event::Configure {
                window,
                geometry,
                above,
                override_redirect,
                on_root,
            } => self.handle_configure(window, geometry, above, override_redirect, on_root),
            Event::ConfigureRequest {
                window,
                changes,
                mask,
            } => self.handle_configure_request(window, changes, mask),
            Event::Circulate {
                window,
                place,
            } => self.handle_circulate(window, place),
            Event::RestackRequest {
                window,
                sibling,
                mode,
            } => self.handle_restack_request(window, sibling, mode),
            Event::MoveResizeRequest {
                window,
                changes,
                mask,
                gravity,
            } => self.handle_move_resize_request(window, changes, mask, gravity),
            Event::Property {
                window,
                kind,
            } => self.handle_property(window, kind),
            Event::StateRequest {
                window,
                state,
                action,
            } => self.handle_state_request(window, state, action),
            Event::ActivateRequest {
                window,
                time,
            } => self.handle_activate_request(window, time),
            Event::CloseRequest {
                window,
                time,
            } => self.close(window, time),
            Event::DesktopRequest {
                window,
                desktop,
            } => self.set_desktop(window, desktop),
            Event::FullscreenMonitorsRequest {
                window,
                monitors,
            } => self.set_fullscreen_monitors(window, Some(monitors)),
            Event::SyncAlarm {
                window,
            } => self.handle_sync_alarm(window),
            Event::Pong {
                window,
                time,
            } => self.handle_ping(window, time),
        }
    }

    /// Fire every timer that has come due: resize sync timeouts commit the
    /// geometry still in flight, the ping timer checks client liveness.
    pub fn poll_timers(&mut self) {
        let now = self.clock.now();

        let expired: Vec<(Window, Geometry)> = self
            .client_map
            .values()
            .filter_map(|client| {
                let geometry = client.sync().borrow_mut().poll_timeout(now)?;
                Some((client.window(), geometry))
            })
            .collect();

        for (window, geometry) in expired {
            debug!("resize sync with window {:#0x} timed out", window);
            self.commit_sync(window, geometry);
        }

        if self.ping_timer.fire(now) {
            self.ping_windows();
            self.ping_timer.start(now);
        }
    }

    fn handle_map_request(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => {
                debug!("mapping untracked window {:#0x}", window);
                self.conn.map_window(window);
                return;
            },
        };

        if let Ok(attributes) = self.conn.get_window_attributes(window) {
            client.set_override_redirect(attributes.override_redirect);
        }

        let hidden_by_policy = client.has_state(StateMask::HIDDEN)
            && !client.is_minimized()
            && !client.is_in_show_desktop_mode();

        if !hidden_by_policy {
            self.process_map(window);
        }

        if let Some(client) = self.client_map.get(&window) {
            self.conn.set_window_desktop(window, client.desktop());
        }
    }

    fn handle_map(
        &mut self,
        window: Window,
    ) {
        if self.client_map.contains_key(&window) {
            self.map(window);
        }
    }

    fn handle_unmap(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.pending_unmaps().get() > 0 {
            // an unmap we caused ourselves: the window stays managed
            if !client.is_override_redirect() {
                self.conn.set_icccm_window_state(window, IcccmWindowState::Iconic);
            }

            Util::decrement_counter(client.pending_unmaps(), "pending unmap");
        } else {
            self.withdraw(window);
        }

        self.unmap(window);

        if let Some(client) = self.client_map.get(&window) {
            if !client.is_shaded() && client.pending_maps().get() == 0 {
                self.move_input_focus_to_other_window(window);
            }
        }
    }

    fn handle_destroy(
        &mut self,
        window: Window,
    ) {
        if self.client_map.contains_key(&window) {
            self.move_input_focus_to_other_window(window);
        }

        self.destroy(window);
    }

    fn handle_configure(
        &mut self,
        window: Window,
        geometry: Geometry,
        above: Option<Window>,
        override_redirect: bool,
        on_root: bool,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            if client.frame().is_some() {
                // the reply to a configure inside the wrapper
                return;
            }

            client.set_override_redirect(override_redirect);
            self.apply_configure(window, geometry);

            if on_root {
                self.apply_configure_restack(window, above);
            }

            return;
        }

        if let Some(&inside) = self.frame_map.get(&window) {
            let client = match self.client_map.get(&inside) {
                Some(client) => client,
                None => return,
            };

            let extents = client.extents();
            let border = client.server_geometry().border;

            let geometry = Geometry::new(
                geometry.pos.x + extents.left,
                geometry.pos.y + extents.top,
                geometry.dim.w - extents.horizontal() - border * 2,
                geometry.dim.h - extents.vertical() - border * 2,
                border,
            );

            self.apply_configure(inside, geometry);
            self.apply_configure_restack(inside, above);
        }
    }

    /// Bring the current geometry in line with what the server reports,
    /// unless a resize sync is pending, in which case the report only
    /// replaces the geometry in flight.
    fn apply_configure(
        &self,
        window: Window,
        geometry: Geometry,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.sync().borrow_mut().update_in_flight(geometry) {
            trace!("window {:#0x} configured during resize sync", window);
            return;
        }

        if client.is_override_redirect() {
            client.set_server_geometry(geometry);
        }

        let old = client.geometry();

        if old != geometry {
            client.set_geometry(geometry);
            self.notify_geometry(client, old, geometry);
        }
    }

    /// Mirror a stacking change the server reports; the window went directly
    /// above `above`, or to the bottom when there is none.
    fn apply_configure_restack(
        &mut self,
        window: Window,
        above: Option<Window>,
    ) {
        let moved = match above.and_then(|above| self.owner(above)) {
            Some(sibling) => self.stack.restack(window, Some(sibling)),
            None if above.is_some() => {
                debug!("window {:#0x} configured above untracked window", window);
                false
            },
            None => self.stack.restack_to_bottom(window),
        };

        if moved {
            if let Some(client) = self.client_map.get(&window) {
                self.notify(client, WindowNotify::Restack);
            }

            self.update_client_lists();
        }
    }

    fn handle_configure_request(
        &mut self,
        window: Window,
        changes: WindowChanges,
        mask: ChangeMask,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if !client.is_managed() {
            // unmanaged windows configure themselves, minus stacking
            let geometric = mask - ChangeMask::RESTACK;
            self.conn.configure_window(window, &changes, geometric);

            let geometry = changes.apply_to(client.server_geometry(), geometric);
            client.set_server_geometry(geometry);
            client.set_geometry(geometry);
            return;
        }

        self.move_resize(window, &changes, mask, None);

        if mask.contains(ChangeMask::STACK_MODE) {
            let sibling = if mask.contains(ChangeMask::SIBLING) {
                changes.sibling.and_then(|sibling| self.owner(sibling))
            } else {
                None
            };

            match changes.stack_mode {
                StackMode::Above => {
                    if self.allow_window_focus(window, TypeMask::NO_FOCUS, 0) {
                        match sibling {
                            Some(sibling) => self.restack_above(window, sibling),
                            None => self.raise(window),
                        }
                    }
                },
                StackMode::Below => match sibling {
                    Some(sibling) => self.restack_below(window, sibling),
                    None => self.lower(window),
                },
            }
        }
    }

    fn handle_circulate(
        &mut self,
        window: Window,
        place: CirculatePlace,
    ) {
        let window = match self.owner(window) {
            Some(window) => window,
            None => return,
        };

        let moved = match place {
            CirculatePlace::OnTop => self.stack.restack(window, None),
            CirculatePlace::OnBottom => self.stack.restack_to_bottom(window),
        };

        if moved {
            if let Some(client) = self.client_map.get(&window) {
                self.notify(client, WindowNotify::Restack);
            }

            self.update_client_lists();
        }
    }

    fn handle_restack_request(
        &mut self,
        window: Window,
        sibling: Window,
        mode: StackMode,
    ) {
        let (window, sibling) = match (self.owner(window), self.owner(sibling)) {
            (Some(window), Some(sibling)) => (window, sibling),
            _ => return,
        };

        match mode {
            StackMode::Above => self.restack_above(window, sibling),
            StackMode::Below => self.restack_below(window, sibling),
        }
    }

    fn handle_move_resize_request(
        &mut self,
        window: Window,
        changes: WindowChanges,
        mask: ChangeMask,
        gravity: Option<Gravity>,
    ) {
        if self.client(window).is_some() {
            self.move_resize(window, &changes, mask, gravity);
        }
    }

    fn handle_property(
        &mut self,
        window: Window,
        kind: PropertyKind,
    ) {
        if !self.client_map.contains_key(&window) {
            return;
        }

        match kind {
            PropertyKind::NormalHints => self.update_normal_hints(window),
            PropertyKind::Hints => self.update_hints(window),
            PropertyKind::TransientFor => self.update_transient_for(window),
            PropertyKind::ClientLeader => self.update_client_leader(window),
            PropertyKind::WindowType => {
                if self.update_window_type(window) {
                    let managed = self.client_map.get(&window).map_or(false, Client::is_managed);

                    if managed {
                        self.update_client_lists();
                        self.update_attributes(window, StackingUpdateMode::None);
                    }
                }
            },
            PropertyKind::Protocols => self.update_protocols(window),
            PropertyKind::UserTime => self.update_user_time(window),
            PropertyKind::Strut => {
                let mapped = self.update_struts(window)
                    && self.client_map.get(&window).map_or(false, Client::is_mapped);

                if mapped {
                    self.update_workarea();
                }
            },
        }
    }

    fn handle_state_request(
        &mut self,
        window: Window,
        state: WindowState,
        action: ToggleAction,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let current = client.state();
        let requested = StateMask::from(state);

        let mut wanted = match action {
            ToggleAction::Add => current | requested,
            ToggleAction::Remove => current - requested,
            ToggleAction::Toggle => current ^ requested,
        };

        // the hidden bit belongs to the core
        wanted = (wanted - StateMask::HIDDEN) | (current & StateMask::HIDDEN);
        wanted = client.constrain_state(wanted);

        if self.active_window == Some(window) {
            wanted.remove(StateMask::DEMANDS_ATTENTION);
        }

        if wanted != current {
            self.change_state(window, wanted);
            self.update_attributes(window, StackingUpdateMode::Normal);
        }
    }

    fn handle_activate_request(
        &mut self,
        window: Window,
        time: Timestamp,
    ) {
        let window = match self.client(window) {
            Some(client) => client.window(),
            None => return,
        };

        if self.allow_window_focus(window, TypeMask::empty(), time) {
            self.activate(window);
        }
    }

    fn handle_sync_alarm(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let geometry = client.sync().borrow_mut().acknowledge();

        if let Some(geometry) = geometry {
            self.notify(client, WindowNotify::SyncAlarm);
            self.commit_sync(window, geometry);
        }
    }

    fn update_normal_hints(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            let size_hints = self.conn.get_icccm_window_size_hints(window).unwrap_or_else(|| {
                debug!("window {:#0x} has no size hints", window);
                Default::default()
            });

            client.set_size_hints(size_hints);
            client.recalc_actions();
        }
    }

    fn update_hints(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.set_hints(self.conn.get_icccm_window_hints(window).unwrap_or_default());
        }
    }

    /// Link windows whose transient-for hint named `target` before it was
    /// tracked.
    pub(crate) fn resolve_transients_of(
        &mut self,
        target: Window,
    ) {
        let waiting: Vec<Window> = self
            .client_map
            .values()
            .filter(|client| client.window() != target)
            .filter(|client| {
                client.transient_for().is_none() && client.transient_hint() == Some(target)
            })
            .map(Client::window)
            .collect();

        for window in waiting {
            debug!("window {:#0x} is transient for late window {:#0x}", window, target);
            self.update_transient_for(window);
        }
    }

    fn update_transient_for(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            let hint = self.conn.get_icccm_window_transient_for(window);
            let transient_for = validate_transient_for(&self.client_map, client, hint);

            client.set_transient_hint(hint);
            client.set_transient_for(transient_for);
            client.recalc_type();
            client.recalc_actions();
        }

        self.update_client_leader(window);
    }

    fn update_client_leader(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            let declared = self.conn.get_icccm_window_client_leader(window);
            client.set_client_leader(resolve_client_leader(&self.client_map, client, declared));
        }
    }

    /// Re-read the declared type, reporting whether it changed.
    fn update_window_type(
        &mut self,
        window: Window,
    ) -> bool {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return false,
        };

        let wm_type = self
            .conn
            .get_window_preferred_type(window)
            .unwrap_or(WindowType::Unknown);

        if wm_type == client.wm_type() {
            return false;
        }

        client.set_wm_type(wm_type);
        client.recalc_type();
        client.recalc_actions();

        if client.is_type(TypeMask::DESKTOP | TypeMask::DOCK) {
            client.set_desktop(ALL_DESKTOPS);
        }

        true
    }

    fn update_protocols(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.set_protocols(self.conn.get_icccm_window_protocols(window));
        }
    }

    fn update_user_time(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.set_user_time(self.conn.get_window_user_time(window));
        }
    }

    /// Re-read the strut properties, reporting whether the reservation
    /// changed.
    fn update_struts(
        &mut self,
        window: Window,
    ) -> bool {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return false,
        };

        let partial = self.conn.get_window_strut_partial(window);
        let plain = self.conn.get_window_strut(window);
        let outputs = self.conn.connected_outputs();

        let struts = Struts::from_properties(
            partial.as_deref(),
            plain.as_deref(),
            self.conn.screen_region(),
            &outputs,
        );

        if struts == client.struts() {
            return false;
        }

        client.set_struts(struts);
        true
    }

    /// Read every property the core tracks for a freshly created window.
    pub(crate) fn read_properties(
        &mut self,
        window: Window,
    ) {
        self.update_normal_hints(window);
        self.update_hints(window);
        self.update_protocols(window);
        self.update_user_time(window);
        self.update_window_type(window);
        self.update_transient_for(window);
        self.update_struts(window);

        if let Some(client) = self.client_map.get(&window) {
            client.recalc_type();
            client.recalc_actions();

            let state = self.conn.get_window_preferred_state(window);
            client.set_state(client.constrain_state(state - StateMask::HIDDEN));
            client.recalc_type();
            client.recalc_actions();
        }
    }

    fn mapped_struts(&self) -> Vec<Struts> {
        self.client_map
            .values()
            .filter(|client| client.is_mapped())
            .filter_map(Client::struts)
            .collect()
    }

    /// The output a window lies mostly on, or the screen without outputs.
    pub(crate) fn output_region(
        &self,
        client: &Client,
    ) -> Region {
        let outputs = self.conn.connected_outputs();

        Util::best_overlap(&outputs, client.server_geometry().bordered_region())
            .map(|index| outputs[index])
            .unwrap_or_else(|| self.conn.screen_region())
    }

    /// The work area of the output a window lies mostly on.
    pub(crate) fn output_workarea(
        &self,
        client: &Client,
    ) -> Region {
        let struts = self.mapped_struts();
        compute_workarea(self.output_region(client), struts.iter())
    }

    pub(crate) fn fullscreen_region(
        &self,
        client: &Client,
    ) -> Region {
        client.fullscreen_monitors().unwrap_or_else(|| self.output_region(client))
    }

    pub(crate) fn size_context(
        &self,
        client: &Client,
    ) -> SizeContext {
        SizeContext {
            state: client.state(),
            fullscreen: client.is_type(TypeMask::FULLSCREEN),
            hints: client.normal_hints(),
            ignore_hints_when_maximized: self.settings.ignore_hints_when_maximized,
            placed: client.is_placed(),
            extents: client.extents(),
            workarea: self.output_workarea(client),
            fullscreen_region: self.fullscreen_region(client),
        }
    }

    /// Size changes implied by state, hints and screen for `old`, merged
    /// into `changes`.
    pub(crate) fn add_window_size_changes(
        &self,
        client: &Client,
        changes: &mut WindowChanges,
        old: Geometry,
    ) -> ChangeMask {
        let ctx = self.size_context(client);
        let mut saved = client.saved_geometry();

        let (size_changes, mask) =
            compute_size_changes(&ctx, old, client.server_geometry(), &mut saved);

        client.set_saved_geometry(saved);
        changes.merge(&size_changes, mask);
        mask
    }

    /// Recompute the screen work area from the struts of mapped windows;
    /// maximized and fullscreen windows follow a change.
    pub fn update_workarea(&mut self) {
        let struts = self.mapped_struts();
        let workarea = compute_workarea(self.conn.screen_region(), struts.iter());

        if workarea == self.workarea {
            return;
        }

        debug!("work area changed to {:?}", workarea);
        self.workarea = workarea;
        self.conn.update_workarea(workarea);

        let affected: Vec<Window> = self
            .client_map
            .values()
            .filter(|client| {
                client.has_state(StateMask::MAXIMIZED) || client.is_type(TypeMask::FULLSCREEN)
            })
            .map(Client::window)
            .collect();

        for window in affected {
            self.update_attributes(window, StackingUpdateMode::None);
        }
    }

    /// Change the decoration extents around a window.
    pub fn set_window_extents(
        &mut self,
        window: Window,
        extents: Extents,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.extents() == extents {
            return;
        }

        client.set_extents(extents);
        client.recalc_actions();
        self.conn.set_window_frame_extents(window, extents);

        if let Some(frame) = client.frame() {
            let server = client.server_geometry();
            let region = server.bordered_region() + extents;

            self.conn.configure_window(
                frame,
                &WindowChanges::from_geometry(Geometry::from_region(region, 0)),
                ChangeMask::POSITION | ChangeMask::SIZE,
            );

            if let Some(wrapper) = client.wrapper() {
                self.conn.configure_window(
                    wrapper,
                    &WindowChanges {
                        x: extents.left,
                        y: extents.top,
                        ..Default::default()
                    },
                    ChangeMask::POSITION,
                );
            }
        }

        self.update_attributes(window, StackingUpdateMode::None);

        if let Some(client) = self.client_map.get(&window) {
            self.notify(client, WindowNotify::FrameUpdate);
        }
    }

    /// Send a geometry and stacking change to the window system and mirror
    /// it in the record. Resizes of windows speaking the sync protocol only
    /// reach the client now; the decoration and the committed geometry
    /// follow once the client acknowledges.
    pub(crate) fn reconfigure(
        &mut self,
        window: Window,
        changes: &WindowChanges,
        mask: ChangeMask,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let server = client.server_geometry();
        let pending = client.sync().borrow().in_flight();
        let requested = changes.apply_to(pending.unwrap_or(server), mask);

        client.set_geometry(requested);

        if mask.intersects(ChangeMask::RESTACK) {
            self.apply_restack(window, changes.sibling, changes.stack_mode);
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let resized = requested.dim != server.dim || requested.border != server.border;

        if (resized || pending.is_some()) && client.is_mapped() && self.request_sync(window, requested)
        {
            trace!("deferring decoration of window {:#0x} until sync", window);

            match client.frame() {
                Some(frame) => {
                    self.conn.configure_window(
                        window,
                        &Self::client_changes(requested),
                        ChangeMask::SIZE | ChangeMask::BORDER_WIDTH,
                    );

                    if mask.intersects(ChangeMask::RESTACK) {
                        self.conn.configure_window(frame, changes, mask & ChangeMask::RESTACK);
                    }
                },
                None => self.conn.configure_window(window, changes, mask),
            }

            return;
        }

        client.set_server_geometry(requested);

        if requested.border != server.border {
            client.renormalize_hints();
        }

        self.configure_decoration(client, server, requested, changes, mask, true);
        self.notify_geometry(client, server, requested);
    }

    fn client_changes(geometry: Geometry) -> WindowChanges {
        WindowChanges {
            x: 0,
            y: 0,
            width: geometry.dim.w,
            height: geometry.dim.h,
            border_width: geometry.border,
            ..Default::default()
        }
    }

    /// Lay out frame, wrapper and client for a new server geometry.
    fn configure_decoration(
        &self,
        client: &Client,
        old: Geometry,
        new: Geometry,
        changes: &WindowChanges,
        mask: ChangeMask,
        include_client: bool,
    ) {
        let window = client.window();

        let frame = match client.frame() {
            Some(frame) => frame,
            None => {
                if include_client && !mask.is_empty() {
                    self.conn.configure_window(window, changes, mask);
                }

                return;
            },
        };

        let extents = client.extents();
        let region = new.bordered_region() + extents;
        let resized = new.dim != old.dim || new.border != old.border;

        let mut frame_mask = mask & ChangeMask::RESTACK;

        if new != old {
            frame_mask |= ChangeMask::POSITION | ChangeMask::SIZE;
        }

        if !frame_mask.is_empty() {
            self.conn.configure_window(
                frame,
                &WindowChanges {
                    x: region.pos.x,
                    y: region.pos.y,
                    width: region.dim.w,
                    height: region.dim.h,
                    border_width: 0,
                    sibling: changes.sibling,
                    stack_mode: changes.stack_mode,
                },
                frame_mask,
            );
        }

        if resized {
            if let Some(wrapper) = client.wrapper() {
                let bordered = new.bordered_region();

                self.conn.configure_window(
                    wrapper,
                    &WindowChanges {
                        x: extents.left,
                        y: extents.top,
                        width: bordered.dim.w,
                        height: bordered.dim.h,
                        ..Default::default()
                    },
                    ChangeMask::POSITION | ChangeMask::SIZE,
                );
            }

            if include_client {
                self.conn.configure_window(window, &Self::client_changes(new), ChangeMask::GEOMETRY);
            }
        } else if new.pos != old.pos {
            // a moved but unresized client learns its root position from us
            self.conn.send_configure_notify(window, new, None, false);
        }
    }

    /// Start (or extend) a resize sync round-trip, reporting whether the
    /// change is now gated on the client's acknowledgement.
    pub(crate) fn request_sync(
        &self,
        window: Window,
        geometry: Geometry,
    ) -> bool {
        let now = self.clock.now();

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return false,
        };

        if !client.protocols().contains(Protocols::SYNC_REQUEST) {
            return false;
        }

        let mut sync = client.sync().borrow_mut();

        if !sync.is_counter_ready() {
            if !self.conn.init_sync_counter(window) {
                debug!("window {:#0x} has no usable sync counter", window);
                return false;
            }

            sync.set_counter_ready(1);
        }

        if let Some(value) = sync.request(geometry, now) {
            debug!("sync request {} to window {:#0x}", value, window);
            self.conn.send_sync_request(window, value);
        }

        true
    }

    /// Apply a geometry whose resize sync completed, by acknowledgement or
    /// timeout.
    pub(crate) fn commit_sync(
        &mut self,
        window: Window,
        geometry: Geometry,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let old = client.server_geometry();

        client.set_server_geometry(geometry);
        client.sync().borrow_mut().complete();

        if geometry.border != old.border {
            client.renormalize_hints();
        }

        self.configure_decoration(
            client,
            old,
            geometry,
            &WindowChanges::from_geometry(geometry),
            ChangeMask::GEOMETRY,
            false,
        );

        self.notify_geometry(client, old, geometry);
    }

    /// Handle a client's request to move or resize, applying its size
    /// hints, gravity, the work area and any maximized or fullscreen state.
    pub fn move_resize(
        &mut self,
        window: Window,
        changes: &WindowChanges,
        mask: ChangeMask,
        gravity: Option<Gravity>,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let server = client.server_geometry();
        let mut mask = mask & ChangeMask::GEOMETRY;
        let mut changes = *changes;
        changes.sibling = None;

        let placed = mask.intersects(ChangeMask::POSITION) && client.size_hints().has_position();
        let gravity = gravity.unwrap_or(client.normal_hints().gravity);

        if !mask.contains(ChangeMask::X) {
            changes.x = server.pos.x;
        }

        if !mask.contains(ChangeMask::Y) {
            changes.y = server.pos.y;
        }

        if !mask.contains(ChangeMask::WIDTH) {
            changes.width = server.dim.w;
        }

        if !mask.contains(ChangeMask::HEIGHT) {
            changes.height = server.dim.h;
        }

        if !mask.contains(ChangeMask::BORDER_WIDTH) {
            changes.border_width = server.border;
        }

        if mask.intersects(ChangeMask::SIZE) {
            let (dim, changed) = constrain(
                Dim::new(changes.width, changes.height),
                &client.normal_hints(),
                client.state(),
                self.settings.ignore_hints_when_maximized,
            );

            if changed {
                if dim.w != changes.width {
                    mask |= ChangeMask::WIDTH;
                }

                if dim.h != changes.height {
                    mask |= ChangeMask::HEIGHT;
                }

                changes.width = dim.w;
                changes.height = dim.h;
            }
        }

        let extents = client.extents();
        mask |= adjust_for_gravity(&mut changes, mask, gravity, extents, server);

        if !client.is_type(TypeMask::DOCK | TypeMask::FULLSCREEN | TypeMask::UNKNOWN)
            && mask.intersects(ChangeMask::POSITION)
        {
            mask |= clamp_to_workarea(&mut changes, extents, self.output_workarea(client));
        }

        // maximized axes only change through the size computation below
        if client.has_state(StateMask::MAXIMIZED_HORZ) {
            mask.remove(ChangeMask::WIDTH);
        }

        if client.has_state(StateMask::MAXIMIZED_VERT) {
            mask.remove(ChangeMask::HEIGHT);
        }

        let requested = Geometry::new(
            changes.x,
            changes.y,
            changes.width,
            changes.height,
            changes.border_width,
        );

        mask |= self.add_window_size_changes(client, &mut changes, requested);

        // fields equal to the server geometry are no change at all
        if changes.x == server.pos.x {
            mask.remove(ChangeMask::X);
        }

        if changes.y == server.pos.y {
            mask.remove(ChangeMask::Y);
        }

        if changes.width == server.dim.w {
            mask.remove(ChangeMask::WIDTH);
        }

        if changes.height == server.dim.h {
            mask.remove(ChangeMask::HEIGHT);
        }

        if changes.border_width == server.border {
            mask.remove(ChangeMask::BORDER_WIDTH);
        }

        let mut saved = client.saved_geometry();

        if mask.contains(ChangeMask::X) && saved.mask.contains(ChangeMask::X) {
            saved.changes.x += changes.x - server.pos.x;
        }

        if mask.contains(ChangeMask::Y) && saved.mask.contains(ChangeMask::Y) {
            saved.changes.y += changes.y - server.pos.y;
        }

        client.set_saved_geometry(saved);

        if mask.is_empty() {
            // nothing changes, yet the client expects an answer
            self.conn.send_configure_notify(window, server, None, false);
        } else {
            self.configure_x_window(window, &changes, mask);
        }

        if placed {
            if let Some(client) = self.client_map.get(&window) {
                client.set_placed(true);
            }
        }
    }

    /// Replace a window's state bitset.
    pub fn change_state(
        &mut self,
        window: Window,
        state: StateMask,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let last_state = client.state();

        if last_state == state {
            return;
        }

        client.set_state(state);
        client.recalc_type();
        client.recalc_actions();

        if client.is_managed() {
            self.conn.set_window_state(window, state);
            self.conn.set_window_allowed_actions(window, client.actions());
        }

        for hook in self.hooks.iter() {
            hook.state_change_notify(client, last_state);
        }
    }

    /// Set the maximized axes of a window to exactly `state`.
    pub fn maximize(
        &mut self,
        window: Window,
        state: StateMask,
    ) -> Result<(), StateChangeError> {
        let client = self.client_map.get(&window).ok_or(StateChangeError::NotManaged)?;

        if client.is_override_redirect() {
            return Err(StateChangeError::InvalidCaller);
        }

        let maximized = client.constrain_state(state) & StateMask::MAXIMIZED;

        if maximized == client.state() & StateMask::MAXIMIZED {
            return Err(StateChangeError::StateUnchanged);
        }

        let state = (client.state() - StateMask::MAXIMIZED) | maximized;

        info!("setting maximized state {:?} of window {:#0x}", maximized, window);
        self.change_state(window, state);
        self.update_attributes(window, StackingUpdateMode::None);

        Ok(())
    }

    /// Set or clear the outputs a fullscreen window spans, given as output
    /// indices of its top, bottom, left and right edges.
    pub fn set_fullscreen_monitors(
        &mut self,
        window: Window,
        monitors: Option<[u32; 4]>,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let had_monitors = client.fullscreen_monitors().is_some();
        client.set_fullscreen_monitors(None);

        if let Some([top, bottom, left, right]) = monitors {
            let outputs = self.conn.connected_outputs();
            let valid = [top, bottom, left, right].iter().all(|&i| (i as usize) < outputs.len());

            if valid {
                let x1 = outputs[left as usize].pos.x;
                let y1 = outputs[top as usize].pos.y;
                let x2 = outputs[right as usize].right();
                let y2 = outputs[bottom as usize].bottom();
                let region = Region::new(x1, y1, x2 - x1, y2 - y1);

                if !region.is_empty() {
                    client.set_fullscreen_monitors(Some(region));
                }
            } else {
                debug!("window {:#0x} names unknown outputs {:?}", window, monitors);
            }
        }

        let has_monitors = client.fullscreen_monitors().is_some();

        if client.is_type(TypeMask::FULLSCREEN) && (had_monitors || has_monitors) {
            self.update_attributes(window, StackingUpdateMode::None);
        }
    }

    /// Move a window lying entirely outside the work area back into view.
    pub(crate) fn ensure_window_visibility(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.struts().is_some() || client.is_override_redirect() {
            return;
        }

        if client.is_type(TypeMask::DOCK | TypeMask::FULLSCREEN | TypeMask::UNKNOWN) {
            return;
        }

        let server = client.server_geometry();
        let extents = client.extents();
        let bordered = server.bordered_region();
        let area = self.workarea;

        let mut dx = 0;
        let mut dy = 0;

        if server.pos.x - extents.left >= area.right() {
            dx = (area.right() - VISIBILITY_MARGIN) - server.pos.x;
        } else if server.pos.x + bordered.dim.w + extents.right <= area.pos.x {
            dx = (area.pos.x + VISIBILITY_MARGIN) - (server.pos.x + bordered.dim.w);
        }

        if server.pos.y - extents.top >= area.bottom() {
            dy = (area.bottom() - VISIBILITY_MARGIN) - server.pos.y;
        } else if server.pos.y + bordered.dim.h + extents.bottom <= area.pos.y {
            dy = (area.pos.y + VISIBILITY_MARGIN) - (server.pos.y + bordered.dim.h);
        }

        if dx != 0 || dy != 0 {
            debug!("pulling window {:#0x} back by ({}, {})", window, dx, dy);

            let changes = WindowChanges {
                x: server.pos.x + dx,
                y: server.pos.y + dy,
                ..Default::default()
            };

            self.configure_x_window(window, &changes, ChangeMask::POSITION);
        }
    }

    /// Publish the mapping-order and stacking-order client lists, each only
    /// when it changed since it was last published.
    pub(crate) fn update_client_lists(&mut self) {
        let client_map = &self.client_map;
        let listed = |window: &Window| {
            client_map
                .get(window)
                .map_or(false, |client| client.is_managed() && !client.is_override_redirect())
        };

        self.client_list.retain(|window| listed(window));

        if self.client_list != self.published_client_list {
            self.conn.update_client_list(&self.client_list);
            self.published_client_list = self.client_list.clone();
        }

        let stacking: Vec<Window> = self.stack.bottom_up().filter(|window| listed(window)).collect();

        if stacking != self.published_client_list_stacking {
            self.conn.update_client_list_stacking(&stacking);
            self.published_client_list_stacking = stacking;
        }
    }

    pub fn grab_notify(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.set_grabbed(true);
            self.notify(client, WindowNotify::Grab);
        }
    }

    pub fn ungrab_notify(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.set_grabbed(false);
            self.notify(client, WindowNotify::Ungrab);
        }
    }

    /// The position a window would take given its gravity and extents.
    pub(crate) fn gravity_position(
        &self,
        client: &Client,
    ) -> (WindowChanges, ChangeMask) {
        let server = client.server_geometry();
        let mut changes = WindowChanges::from_geometry(server);

        let mask = adjust_for_gravity(
            &mut changes,
            ChangeMask::POSITION,
            client.normal_hints().gravity,
            client.extents(),
            server,
        );

        (changes, mask)
    }

    /// Offer a placement position to hooks; the first taker wins.
    pub(crate) fn place(
        &self,
        client: &Client,
        pos: Pos,
    ) -> Option<Pos> {
        self.hooks.iter().find_map(|hook| hook.place(client, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::config::MapConfig;
    use crate::policy::mock::geometry;
    use crate::policy::mock::manage;
    use crate::policy::mock::Call;
    use crate::policy::mock::MockConnection;
    use crate::policy::mock::RecordingHook;
    use crate::policy::sync::SyncPhase;
    use crate::policy::timer::FakeClock;

    use simplelog::LevelFilter;

    use std::time::Duration;

    fn resize(
        width: i32,
        height: i32,
    ) -> WindowChanges {
        WindowChanges {
            width,
            height,
            ..Default::default()
        }
    }

    fn synced<'a>(
        conn: &'a MockConnection,
        clock: &FakeClock,
    ) -> Model<'a> {
        Util::init_logging(LevelFilter::Debug);

        conn.add_window(0x100, geometry(), WindowType::Normal);
        conn.set_protocols(0x100, Protocols::SYNC_REQUEST);

        let mut model = Model::new(conn, &MapConfig::new(), Box::new(clock.clone()));
        manage(&mut model, 0x100);

        // the map itself is synchronized
        assert_eq!(conn.count(&Call::SyncRequest(0x100, 1)), 1);

        model.handle_event(Event::SyncAlarm {
            window: 0x100,
        });

        conn.take_calls();
        model
    }

    #[test]
    fn resizes_during_sync_are_coalesced() {
        let conn = MockConnection::new();
        let mut model = synced(&conn, &FakeClock::new());

        model.move_resize(0x100, &resize(500, 400), ChangeMask::SIZE, None);
        model.move_resize(0x100, &resize(600, 450), ChangeMask::SIZE, None);

        let calls = conn.take_calls();
        let requests = calls.iter().filter(|call| matches!(call, Call::SyncRequest(..))).count();

        assert_eq!(requests, 1);
        assert_eq!(model.client(0x100).map(Client::server_geometry), Some(geometry()));
        assert_eq!(
            model.client(0x100).map(|client| client.sync().borrow().phase()),
            Some(SyncPhase::Requested)
        );

        model.handle_event(Event::SyncAlarm {
            window: 0x100,
        });

        assert_eq!(
            model.client(0x100).map(Client::server_geometry),
            Some(Geometry::new(100, 100, 600, 450, 0))
        );

        assert_eq!(
            model.client(0x100).map(|client| client.sync().borrow().phase()),
            Some(SyncPhase::Idle)
        );
    }

    #[test]
    fn unanswered_sync_commits_on_timeout() {
        let conn = MockConnection::new();
        let clock = FakeClock::new();
        let mut model = synced(&conn, &clock);

        model.move_resize(0x100, &resize(500, 400), ChangeMask::SIZE, None);

        clock.advance(Duration::from_millis(999));
        model.poll_timers();
        assert_eq!(model.client(0x100).map(Client::server_geometry), Some(geometry()));

        clock.advance(Duration::from_millis(1));
        model.poll_timers();

        assert_eq!(
            model.client(0x100).map(Client::server_geometry),
            Some(Geometry::new(100, 100, 500, 400, 0))
        );

        assert_eq!(
            model.client(0x100).map(|client| client.sync().borrow().phase()),
            Some(SyncPhase::Idle)
        );
    }

    #[test]
    fn resize_without_sync_counter_applies_immediately() {
        let conn = MockConnection::new();
        conn.set_sync_supported(false);
        conn.add_window(0x100, geometry(), WindowType::Normal);
        conn.set_protocols(0x100, Protocols::SYNC_REQUEST);

        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));
        manage(&mut model, 0x100);
        conn.take_calls();

        model.move_resize(0x100, &resize(500, 400), ChangeMask::SIZE, None);

        assert_eq!(
            model.client(0x100).map(Client::server_geometry),
            Some(Geometry::new(100, 100, 500, 400, 0))
        );

        assert!(!conn.take_calls().iter().any(|call| matches!(call, Call::SyncRequest(..))));
    }

    #[test]
    fn unchanged_request_is_answered_with_a_synthetic_configure() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);

        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));
        manage(&mut model, 0x100);
        conn.take_calls();

        model.handle_event(Event::ConfigureRequest {
            window: 0x100,
            changes: resize(400, 300),
            mask: ChangeMask::SIZE,
        });

        assert_eq!(conn.take_calls(), vec![Call::ConfigureNotify(0x100, geometry())]);
    }

    #[test]
    fn maximize_fills_the_workarea_once() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);

        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));
        manage(&mut model, 0x100);

        assert_eq!(model.maximize(0x100, StateMask::MAXIMIZED), Ok(()));
        assert_eq!(
            model.maximize(0x100, StateMask::MAXIMIZED),
            Err(StateChangeError::StateUnchanged)
        );

        let client = model.client(0x100).expect("managed");
        assert!(client.has_state(StateMask::MAXIMIZED));
        assert_eq!(client.server_geometry(), Geometry::new(0, 0, 1920, 1080, 0));

        assert_eq!(model.maximize(0x200, StateMask::MAXIMIZED), Err(StateChangeError::NotManaged));
    }

    #[test]
    fn reported_restack_to_current_position_is_ignored() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);
        conn.add_window(0x200, geometry(), WindowType::Normal);

        let hook = RecordingHook::default();
        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));

        model.register_hook(Box::new(hook.clone()));
        manage(&mut model, 0x100);
        manage(&mut model, 0x200);

        let frame = |window| model.client(window).and_then(Client::frame).expect("framed");
        let (lower, upper) = (frame(0x100), frame(0x200));
        let (restacked_lower, restacked_upper) = (
            hook.count(0x100, WindowNotify::Restack),
            hook.count(0x200, WindowNotify::Restack),
        );

        model.handle_event(Event::Configure {
            window: upper,
            geometry: geometry(),
            above: Some(lower),
            override_redirect: false,
            on_root: true,
        });

        assert_eq!(hook.count(0x200, WindowNotify::Restack), restacked_upper);
        assert_eq!(model.stack().as_slice(), &[0x100, 0x200]);

        model.handle_event(Event::Configure {
            window: lower,
            geometry: geometry(),
            above: Some(upper),
            override_redirect: false,
            on_root: true,
        });

        assert_eq!(hook.count(0x100, WindowNotify::Restack), restacked_lower + 1);
        assert_eq!(model.stack().as_slice(), &[0x200, 0x100]);
    }

    #[test]
    fn raised_window_carries_its_transients() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);
        conn.add_window(0x200, geometry(), WindowType::Normal);
        conn.add_window(0x300, geometry(), WindowType::Normal);
        conn.set_transient_for(0x300, 0x100);

        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));

        manage(&mut model, 0x100);
        manage(&mut model, 0x300);
        manage(&mut model, 0x200);

        model.raise(0x100);

        assert_eq!(model.stack().as_slice(), &[0x200, 0x100, 0x300]);
    }

    #[test]
    fn unmanaged_window_configures_itself_without_restacking() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);

        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));

        model.handle_event(Event::Create {
            window: 0x100,
        });

        let changes = WindowChanges {
            x: 10,
            y: 20,
            sibling: Some(0x999),
            ..Default::default()
        };

        model.handle_event(Event::ConfigureRequest {
            window: 0x100,
            changes,
            mask: ChangeMask::POSITION | ChangeMask::RESTACK,
        });

        assert_eq!(conn.take_calls(), vec![Call::Configure(0x100, changes, ChangeMask::POSITION)]);
        assert_eq!(
            model.client_any(0x100).map(Client::server_geometry),
            Some(Geometry::new(10, 20, 400, 300, 0))
        );
    }

    #[test]
    fn decorated_window_can_be_shaded() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);

        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));
        manage(&mut model, 0x100);

        assert_eq!(model.shade(0x100), Err(StateChangeError::InvalidCaller));

        let frame = model.client(0x100).and_then(Client::frame).expect("framed");
        conn.take_calls();

        model.set_window_extents(0x100, Extents {
            left: 2,
            right: 2,
            top: 20,
            bottom: 2,
        });

        assert!(conn.take_calls().contains(&Call::Configure(
            frame,
            WindowChanges::from_geometry(Geometry::new(98, 80, 404, 322, 0)),
            ChangeMask::POSITION | ChangeMask::SIZE,
        )));

        assert_eq!(model.shade(0x100), Ok(()));
        assert_eq!(model.shade(0x100), Err(StateChangeError::StateUnchanged));
        assert_eq!(model.client(0x100).map(|client| client.has_state(StateMask::SHADED)), Some(true));

        assert_eq!(model.unshade(0x100), Ok(()));
        assert_eq!(model.client(0x100).map(|client| client.has_state(StateMask::SHADED)), Some(false));
    }

    #[test]
    fn grabs_are_flagged_and_announced() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);

        let hook = RecordingHook::default();
        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));

        model.register_hook(Box::new(hook.clone()));
        manage(&mut model, 0x100);

        model.grab_notify(0x100);
        assert_eq!(model.client(0x100).map(Client::is_grabbed), Some(true));
        assert_eq!(hook.count(0x100, WindowNotify::Grab), 1);

        model.ungrab_notify(0x100);
        assert_eq!(model.client(0x100).map(Client::is_grabbed), Some(false));
        assert_eq!(hook.count(0x100, WindowNotify::Ungrab), 1);
    }

    #[test]
    fn released_slot_is_cleared_on_every_record() {
        let conn = MockConnection::new();
        conn.add_window(0x100, geometry(), WindowType::Normal);
        conn.add_window(0x200, geometry(), WindowType::Normal);

        let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));
        manage(&mut model, 0x100);
        manage(&mut model, 0x200);

        let index = model.allocate_slot();

        for window in [0x100, 0x200] {
            if let Some(client) = model.client(window) {
                client.slots().borrow_mut().set(index, window as u64);
            }
        }

        assert_eq!(
            model.client(0x200).and_then(|client| client.slots().borrow().get::<u64>(index).copied()),
            Some(0x200)
        );

        model.release_slot(index);

        for window in [0x100, 0x200] {
            assert_eq!(
                model.client(window).and_then(|client| client.slots().borrow().get::<u64>(index).copied()),
                None
            );
        }

        assert_eq!(model.allocate_slot(), index);
    }
}
