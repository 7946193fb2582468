use crate::policy::client::Client;
use crate::policy::error::StateChangeError;
use crate::policy::hook::WindowNotify;
use crate::policy::model::Model;
use crate::policy::stack::StackingUpdateMode;
use crate::policy::util::Util;
use crate::winsys::connection::Timestamp;
use crate::winsys::event::ChangeMask;
use crate::winsys::geometry::Pos;
use crate::winsys::geometry::Region;
use crate::winsys::window::Actions;
use crate::winsys::window::IcccmWindowState;
use crate::winsys::window::Protocols;
use crate::winsys::window::StateMask;
use crate::winsys::window::TypeMask;
use crate::winsys::window::Window;
use crate::winsys::window::DESTROYED_WINDOW;
use crate::winsys::window::ALL_DESKTOPS;

use strum::AsRefStr;

/// What the window system currently shows of a managed window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, AsRefStr)]
pub enum Visibility {
    /// Frame and client mapped.
    Shown,
    /// Frame mapped, client unmapped.
    Shaded,
    /// Nothing mapped.
    Hidden,
}

impl<'a> Model<'a> {
    /// Start tracking a newly created top-level window. Windows already
    /// viewable (present before the core started) are adopted as mapped.
    pub(crate) fn add_window(
        &mut self,
        window: Window,
    ) {
        if self.client_map.contains_key(&window) || self.frame_map.contains_key(&window) {
            return;
        }

        let attributes = match self.conn.get_window_attributes(window) {
            Ok(attributes) => attributes,
            Err(err) => {
                debug!("not tracking window {:#0x}: {}", window, err);
                return;
            },
        };

        info!("tracking window {:#0x}", window);

        let client = Client::new(window, attributes);
        client
            .sync()
            .borrow_mut()
            .set_timeouts(self.settings.sync_timeout_min, self.settings.sync_timeout_max);

        self.client_map.insert(window, client);
        self.stack.insert(window, None);
        self.read_properties(window);
        self.resolve_transients_of(window);

        if !attributes.viewable {
            return;
        }

        if let Some(client) = self.client_map.get(&window) {
            client.set_placed(true);

            if !client.is_override_redirect() {
                client.set_managed(true);
                self.client_list.push(window);
            }
        }

        self.reparent(window);

        // replay the map we missed
        if let Some(client) = self.client_map.get(&window) {
            client.set_viewable(false);
            client.pending_maps().set(client.pending_maps().get() + 1);
        }

        self.map(window);
        self.update_attributes(window, StackingUpdateMode::Normal);
    }

    /// Record that the server mapped `window`.
    pub(crate) fn map(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        self.notify(client, WindowNotify::BeforeMap);

        if client.is_viewable() {
            return;
        }

        if client.pending_maps().get() > 0 {
            Util::decrement_counter(client.pending_maps(), "pending map");
        }

        client.set_map_num(self.map_counter);
        self.map_counter += 1;

        if client.struts().is_some() {
            self.update_workarea();
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.is_input_only() {
            return;
        }

        client.unmap_refcnt().set(1);
        client.set_viewable(true);

        if !client.is_override_redirect() {
            self.conn.set_icccm_window_state(window, IcccmWindowState::Normal);
        }

        client.set_last_pong(self.last_ping);
        self.update_client_lists();

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.protocols().contains(Protocols::SYNC_REQUEST) {
            let server = client.server_geometry();

            self.request_sync(window, server);
            self.conn.send_configure_notify(window, server, None, client.is_override_redirect());
        }

        self.notify(client, WindowNotify::Map);
    }

    /// Record that the server unmapped `window`. Outstanding unmap
    /// references keep the window viewable.
    pub(crate) fn unmap(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        self.notify(client, WindowNotify::BeforeUnmap);
        client.set_map_num(0);

        if Util::decrement_counter(client.unmap_refcnt(), "unmap") > 0 {
            debug!("window {:#0x} still referenced, keeping it viewable", window);
            return;
        }

        if client.struts().is_some() {
            self.update_workarea();
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if !client.is_viewable() {
            return;
        }

        client.set_viewable(false);
        client.sync().borrow_mut().cancel();
        self.update_client_lists();

        if let Some(client) = self.client_map.get(&window) {
            self.notify(client, WindowNotify::Unmap);
        }
    }

    /// Keep `window` viewable across one more unmap.
    pub fn increment_unmap_reference(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.unmap_refcnt().set(client.unmap_refcnt().get() + 1);
        }
    }

    /// Keep the record of `window` alive across one more destroy.
    pub fn increment_destroy_reference(
        &mut self,
        window: Window,
    ) {
        let client = self
            .client_map
            .get(&window)
            .or_else(|| self.pending_destroy.get(&window));

        if let Some(client) = client {
            client.destroy_refcnt().set(client.destroy_refcnt().get() + 1);
        }
    }

    /// Release `window` after its client withdrew it.
    pub(crate) fn withdraw(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        info!("window {:#0x} withdrawn", window);

        if client.has_state(StateMask::HIDDEN) {
            let state = client.state() - StateMask::HIDDEN;

            client.set_minimized(false);
            self.change_state(window, state);
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if !client.is_override_redirect() {
            self.conn.set_icccm_window_state(window, IcccmWindowState::Withdrawn);
        }

        client.set_placed(false);
        client.set_managed(false);
        client.set_shaded(false);
        client.set_visibility(Visibility::Hidden);

        self.unreparent(window);
        self.update_client_lists();
    }

    /// Stop tracking `window` once every destroy reference is released. The
    /// record leaves every lookup immediately; what the server still holds
    /// for it is released with the last reference.
    pub fn destroy(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            self.notify(client, WindowNotify::BeforeDestroy);
        }

        if let Some(client) = self.client_map.remove(&window) {
            info!("window {:#0x} destroyed", window);

            self.stack.remove(window);

            if let Some(frame) = client.frame() {
                self.frame_map.remove(&frame);
                self.conn.unmap_window(frame);
            }

            for other in self.client_map.values() {
                if other.transient_for() == Some(window) {
                    other.set_transient_for(None);
                    other.recalc_type();
                    other.recalc_actions();
                }
            }

            if self.active_window == Some(window) {
                self.active_window = None;
                self.conn.update_active_window(None);
            }

            client.set_window(DESTROYED_WINDOW);
            client.set_map_num(0);
            client.set_managed(false);

            if let Some(stale) = self.pending_destroy.insert(window, client) {
                warn!(
                    "window {:#0x} reused while its old record held {} references",
                    window,
                    stale.destroy_refcnt().get()
                );

                self.release_record(window, stale);
            }

            self.update_client_lists();
        }

        let remaining = match self.pending_destroy.get(&window) {
            Some(client) => Util::decrement_counter(client.destroy_refcnt(), "destroy"),
            None => return,
        };

        if remaining > 0 {
            debug!("window {:#0x} destroyed with {} references left", window, remaining);
            return;
        }

        if let Some(client) = self.pending_destroy.remove(&window) {
            self.release_record(window, client);
        }
    }

    /// Free what the server still holds for a destroyed record.
    fn release_record(
        &mut self,
        window: Window,
        client: Client,
    ) {
        client.set_destroyed(true);
        client.sync().borrow_mut().cancel();

        if let Some(wrapper) = client.wrapper() {
            self.conn.destroy_window(wrapper);
        }

        if let Some(frame) = client.frame() {
            self.conn.destroy_window(frame);
        }

        if client.struts().is_some() {
            self.update_workarea();
        }

        debug!("released record of window {:#0x}", window);
    }

    /// Put `window` into a frame and wrapper of our own.
    pub(crate) fn reparent(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) if client.is_managed() && client.frame().is_none() => client,
            _ => return,
        };

        let server = client.server_geometry();
        let extents = client.extents();
        let bordered = server.bordered_region();

        let frame = self.conn.create_frame(bordered + extents);
        let wrapper = self.conn.create_wrapper(
            frame,
            Region::new(extents.left, extents.top, bordered.dim.w, bordered.dim.h),
        );

        info!("reparenting window {:#0x} into frame {:#0x}", window, frame);

        self.conn.insert_window_in_save_set(window);

        // the server unmaps a mapped window it reparents
        if client.is_viewable() {
            client.pending_unmaps().set(client.pending_unmaps().get() + 1);
        }

        self.conn.reparent_window(window, wrapper, Pos::new(0, 0));
        self.conn.map_window(wrapper);

        if client.is_viewable() {
            self.conn.map_window(frame);
        }

        client.set_frame(Some(frame));
        client.set_wrapper(Some(wrapper));
        self.frame_map.insert(frame, window);

        self.conn.set_window_frame_extents(window, extents);
        self.notify(client, WindowNotify::Reparent);
    }

    /// Hand `window` back to the root window and drop its frame.
    pub(crate) fn unreparent(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let frame = match client.frame() {
            Some(frame) => frame,
            None => return,
        };

        debug!("unparenting window {:#0x} from frame {:#0x}", window, frame);

        self.conn.unparent_window(window, client.server_geometry().pos);

        if let Some(wrapper) = client.wrapper() {
            self.conn.destroy_window(wrapper);
        }

        self.conn.destroy_window(frame);
        self.frame_map.remove(&frame);

        client.set_frame(None);
        client.set_wrapper(None);
        self.notify(client, WindowNotify::Unreparent);
    }

    /// What a window should show given its flags and the current desktop.
    fn target_visibility(
        &self,
        client: &Client,
    ) -> Visibility {
        if !client.is_on_desktop(self.current_desktop)
            || client.is_minimized()
            || client.is_in_show_desktop_mode()
            || client.is_hidden()
        {
            Visibility::Hidden
        } else if client.has_state(StateMask::SHADED) {
            Visibility::Shaded
        } else {
            Visibility::Shown
        }
    }

    /// Map or unmap frame and client so that `window` shows what its flags
    /// call for. Every hiding flag folds into the hidden state bit.
    pub(crate) fn apply_visibility(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) if client.is_managed() => client,
            _ => return,
        };

        let from = client.visibility();
        let to = self.target_visibility(client);
        let live = client.is_viewable() || client.pending_maps().get() > 0;
        let frame = client.frame();

        if from != to {
            debug!("window {:#0x}: {} -> {}", window, from.as_ref(), to.as_ref());

            match (from, to) {
                (Visibility::Shown, Visibility::Hidden) if live => {
                    self.notify(client, WindowNotify::Hide);
                    client.pending_unmaps().set(client.pending_unmaps().get() + 1);

                    if let Some(frame) = frame {
                        self.conn.unmap_window(frame);
                    }

                    self.conn.unmap_window(window);
                },
                (Visibility::Shown, Visibility::Shaded) if live => {
                    self.notify(client, WindowNotify::Hide);
                    client.pending_unmaps().set(client.pending_unmaps().get() + 1);
                    self.conn.unmap_window(window);
                },
                (Visibility::Shaded, Visibility::Hidden) => {
                    if let Some(frame) = frame {
                        self.conn.unmap_window(frame);
                    }
                },
                (Visibility::Hidden, Visibility::Shown) => {
                    self.notify(client, WindowNotify::Show);
                    client.pending_maps().set(client.pending_maps().get() + 1);

                    if let Some(frame) = frame {
                        self.conn.map_window(frame);
                    }

                    if let Some(wrapper) = client.wrapper() {
                        self.conn.map_window(wrapper);
                    }

                    self.conn.map_window(window);
                },
                (Visibility::Hidden, Visibility::Shaded) => {
                    if let Some(frame) = frame {
                        self.conn.map_window(frame);
                    }
                },
                (Visibility::Shaded, Visibility::Shown) => {
                    self.notify(client, WindowNotify::Show);
                    client.pending_maps().set(client.pending_maps().get() + 1);
                    self.conn.map_window(window);
                },
                _ => {},
            }

            client.set_visibility(to);
        }

        client.set_shaded(to == Visibility::Shaded);

        let hidden = client.is_minimized()
            || client.is_in_show_desktop_mode()
            || client.is_hidden()
            || to == Visibility::Shaded;

        let state = if hidden {
            client.state() | StateMask::HIDDEN
        } else {
            client.state() - StateMask::HIDDEN
        };

        let refocus = from != to && to == Visibility::Shaded && self.active_window == Some(window);

        self.change_state(window, state);

        if refocus {
            self.move_input_focus_to(window);
        }
    }

    /// Hide a window independently of minimization and desktops.
    pub fn hide(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.set_hidden(true);
            self.apply_visibility(window);
        }
    }

    pub fn show(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.client_map.get(&window) {
            client.set_hidden(false);
            self.apply_visibility(window);
        }
    }

    /// Windows that follow `window` when it is minimized or shaded: its
    /// direct transients and the group transients of its leader.
    fn dependent_transients(
        &self,
        window: Window,
    ) -> Vec<Window> {
        let leader = match self.client_map.get(&window) {
            Some(client) => client.client_leader(),
            None => return Vec::new(),
        };

        self.client_map
            .values()
            .filter(|other| other.window() != window)
            .filter(|other| {
                other.transient_for() == Some(window) || other.is_group_transient(leader)
            })
            .map(Client::window)
            .collect()
    }

    pub fn minimize(
        &mut self,
        window: Window,
    ) -> Result<(), StateChangeError> {
        let client = match self.client_map.get(&window) {
            Some(client) if client.is_managed() => client,
            _ => return Err(StateChangeError::NotManaged),
        };

        if client.is_minimized() {
            return Err(StateChangeError::StateUnchanged);
        }

        info!("minimizing window {:#0x}", window);

        self.notify(client, WindowNotify::Minimize);
        client.set_minimized(true);

        for transient in self.dependent_transients(window) {
            let _ = self.minimize(transient);
        }

        self.apply_visibility(window);
        Ok(())
    }

    pub fn unminimize(
        &mut self,
        window: Window,
    ) -> Result<(), StateChangeError> {
        let client = match self.client_map.get(&window) {
            Some(client) if client.is_managed() => client,
            _ => return Err(StateChangeError::NotManaged),
        };

        if !client.is_minimized() {
            return Err(StateChangeError::StateUnchanged);
        }

        info!("unminimizing window {:#0x}", window);

        self.notify(client, WindowNotify::Unminimize);
        client.set_minimized(false);
        self.apply_visibility(window);

        for transient in self.dependent_transients(window) {
            let _ = self.unminimize(transient);
        }

        Ok(())
    }

    /// Roll a window up to its title bar, along with its transients.
    pub fn shade(
        &mut self,
        window: Window,
    ) -> Result<(), StateChangeError> {
        self.set_shaded(window, true)
    }

    pub fn unshade(
        &mut self,
        window: Window,
    ) -> Result<(), StateChangeError> {
        self.set_shaded(window, false)
    }

    fn set_shaded(
        &mut self,
        window: Window,
        shaded: bool,
    ) -> Result<(), StateChangeError> {
        let client = match self.client_map.get(&window) {
            Some(client) if client.is_managed() => client,
            _ => return Err(StateChangeError::NotManaged),
        };

        if client.has_state(StateMask::SHADED) == shaded {
            return Err(StateChangeError::StateUnchanged);
        }

        if shaded && !client.actions().contains(Actions::SHADE) {
            return Err(StateChangeError::InvalidCaller);
        }

        let state = if shaded {
            client.state() | StateMask::SHADED
        } else {
            client.state() - StateMask::SHADED
        };

        self.change_state(window, state);
        self.update_attributes(window, StackingUpdateMode::None);

        for transient in self.dependent_transients(window) {
            let _ = self.set_shaded(transient, shaded);
        }

        Ok(())
    }

    /// Move a window to `desktop`, or onto every desktop.
    pub fn set_desktop(
        &mut self,
        window: Window,
        desktop: u32,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if desktop != ALL_DESKTOPS {
            if client.is_type(TypeMask::DESKTOP | TypeMask::DOCK) || desktop >= self.desktop_count {
                return;
            }
        }

        if desktop == client.desktop() {
            return;
        }

        info!("moving window {:#0x} to desktop {}", window, desktop);

        client.set_desktop(desktop);
        self.apply_visibility(window);
        self.conn.set_window_desktop(window, desktop);
    }

    /// Switch desktops, hiding and showing windows accordingly.
    pub fn set_current_desktop(
        &mut self,
        desktop: u32,
    ) {
        if desktop >= self.desktop_count || desktop == self.current_desktop {
            return;
        }

        info!("switching to desktop {}", desktop);
        self.current_desktop = desktop;

        let windows: Vec<Window> = self
            .client_map
            .values()
            .filter(|client| client.desktop() != ALL_DESKTOPS)
            .map(Client::window)
            .collect();

        for window in windows {
            self.apply_visibility(window);
        }

        self.conn.update_current_desktop(desktop);
    }

    /// Hide every ordinary window to reveal the desktop.
    pub fn enter_show_desktop_mode(&mut self) {
        let windows: Vec<Window> = self
            .client_map
            .values()
            .filter(|client| {
                !client.is_type(TypeMask::DESKTOP | TypeMask::DOCK)
                    && !client.has_state(StateMask::SKIP_TASKBAR)
                    && !client.is_in_show_desktop_mode()
                    && !client.is_grabbed()
                    && self.is_focusable(client)
            })
            .map(Client::window)
            .collect();

        info!("entering show desktop mode");

        for &window in windows.iter() {
            if let Some(client) = self.client_map.get(&window) {
                client.set_in_show_desktop_mode(true);
                self.notify(client, WindowNotify::EnterShowDesktopMode);
                self.apply_visibility(window);
            }
        }

        if !windows.is_empty() {
            self.show_desktop_mode = true;
        }

        self.focus_default_window();
    }

    /// Bring `window`, or every window when `None`, back from show desktop
    /// mode. The mode ends once no window is left in it.
    pub fn leave_show_desktop_mode(
        &mut self,
        window: Option<Window>,
    ) {
        let windows: Vec<Window> = match window {
            Some(window) => match self.client_map.get(&window) {
                Some(client) if client.is_in_show_desktop_mode() => vec![window],
                _ => return,
            },
            None => self
                .client_map
                .values()
                .filter(|client| client.is_in_show_desktop_mode())
                .map(Client::window)
                .collect(),
        };

        for window in windows {
            if let Some(client) = self.client_map.get(&window) {
                client.set_in_show_desktop_mode(false);
                self.notify(client, WindowNotify::LeaveShowDesktopMode);
                self.apply_visibility(window);
            }
        }

        if self.client_map.values().any(Client::is_in_show_desktop_mode) {
            return;
        }

        if self.show_desktop_mode {
            info!("leaving show desktop mode");
        }

        self.show_desktop_mode = false;

        if window.is_none() {
            self.focus_default_window();
        }
    }

    /// Manage a window its client asked to map: frame it, place it, stack
    /// it and focus it if the focus arbitrator agrees.
    pub(crate) fn process_map(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.is_override_redirect() {
            self.conn.map_window(window);
            return;
        }

        let newly_managed = !client.is_managed();
        client.set_managed(true);

        if newly_managed && !self.client_list.contains(&window) {
            self.client_list.push(window);
        }

        self.reparent(window);

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if !client.is_placed() {
            let (mut changes, mut mask) = self.gravity_position(client);

            if let Some(pos) = self.place(client, Pos::new(changes.x, changes.y)) {
                changes.x = pos.x;
                changes.y = pos.y;
                mask |= ChangeMask::POSITION;
            }

            client.set_placed(true);

            if !mask.is_empty() {
                self.configure_x_window(window, &changes, mask);
            }
        }

        let allow = self.allow_window_focus(window, TypeMask::NO_FOCUS, 0);

        let denied = !allow
            && self
                .client_map
                .get(&window)
                .map_or(false, |client| !client.is_type(TypeMask::NO_FOCUS));

        self.update_attributes(
            window,
            if denied {
                StackingUpdateMode::InitialMapDeniedFocus
            } else {
                StackingUpdateMode::InitialMap
            },
        );

        if self.client_map.get(&window).map_or(false, Client::is_minimized) {
            let _ = self.unminimize(window);
        }

        self.leave_show_desktop_mode(Some(window));

        let desktop = match self.client_map.get(&window) {
            Some(client) => client.desktop(),
            None => return,
        };

        if allow && desktop != ALL_DESKTOPS && desktop != self.current_desktop {
            self.set_current_desktop(desktop);
        }

        if !self.client_map.get(&window).map_or(true, |client| client.has_state(StateMask::HIDDEN)) {
            self.apply_visibility(window);
        }

        if allow {
            self.move_input_focus_to(window);
        }

        self.update_client_lists();
    }

    /// Ask a window to close, or disconnect its client when it either lacks
    /// the delete protocol or stopped answering pings.
    pub fn close(
        &mut self,
        window: Window,
        time: Timestamp,
    ) {
        let client = match self.client(window) {
            Some(client) => client,
            None => return,
        };

        let window = client.window();
        let time = if time == 0 {
            self.conn.current_time()
        } else {
            time
        };

        if client.is_alive() {
            if client.protocols().contains(Protocols::DELETE) {
                info!("asking window {:#0x} to close", window);
                self.conn.close_window(window, time);
            } else {
                info!("killing client of window {:#0x}", window);
                self.conn.kill_window(window);
            }

            client.register_close_request(time);
        } else {
            info!("window {:#0x} is unresponsive, killing its client", window);
            self.conn.kill_window(window);
        }

        client.set_last_close_request(time);
        self.notify(client, WindowNotify::Close);
    }

    /// Check whether `window` answered the ping round `last_ping`, marking
    /// it unresponsive if not. Reports whether the window is pinged at all.
    fn handle_ping_timeout(
        &self,
        window: Window,
        last_ping: Timestamp,
    ) -> bool {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return false,
        };

        if !client.is_viewable()
            || !client.is_type(TypeMask::NORMAL)
            || !client.protocols().contains(Protocols::PING)
            || client.transient_for().is_some()
        {
            return false;
        }

        if client.is_alive() && client.last_pong() < last_ping {
            info!("window {:#0x} stopped answering pings", window);

            client.set_alive(false);
            self.notify(client, WindowNotify::AliveChanged);
            client.clear_close_requests();
        }

        true
    }

    /// Start the next ping round, marking windows that missed the previous
    /// one as unresponsive.
    pub fn ping_windows(&mut self) {
        let ping = self.last_ping.wrapping_add(1);
        let windows: Vec<Window> = self.client_map.keys().copied().collect();

        for window in windows {
            if self.handle_ping_timeout(window, self.last_ping) {
                if let Some(client) = self.client_map.get(&window) {
                    client.set_last_ping(ping);
                }

                self.conn.send_ping(window, ping);
            }
        }

        self.last_ping = ping;
    }

    /// Record a window's answer to a ping.
    pub(crate) fn handle_ping(
        &mut self,
        window: Window,
        time: Timestamp,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if !client.is_alive() {
            info!("window {:#0x} is responsive again", window);

            client.set_alive(true);
            self.notify(client, WindowNotify::AliveChanged);
            client.set_last_close_request(0);
        }

        client.set_last_pong(time);
    }
}
