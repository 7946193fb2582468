use crate::policy::client::Client;
use crate::policy::config::MatchPredicate;
use crate::policy::model::Model;
use crate::policy::stack::StackManager;
use crate::policy::stack::StackingUpdateMode;
use crate::policy::transient::is_ancestor_to;
use crate::policy::transient::same_leader;
use crate::policy::transient::Clients;
use crate::winsys::connection::Timestamp;
use crate::winsys::window::Protocols;
use crate::winsys::window::StateMask;
use crate::winsys::window::TypeMask;
use crate::winsys::window::Window;

use std::convert::TryFrom;

use strum::AsRefStr;
use strum::EnumIter;

/// How reluctantly newly mapped and activating windows are given focus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, EnumIter, AsRefStr)]
pub enum FocusPreventionLevel {
    Off = 0,
    Low = 1,
    Normal = 2,
    High = 3,
    VeryHigh = 4,
}

impl TryFrom<i32> for FocusPreventionLevel {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Low),
            2 => Ok(Self::Normal),
            3 => Ok(Self::High),
            4 => Ok(Self::VeryHigh),
            _ => Err(value),
        }
    }
}

/// Whether server time `t1` precedes `t2`, allowing for wraparound. Zero
/// precedes everything, zero included.
pub fn is_before(
    t1: Timestamp,
    t2: Timestamp,
) -> bool {
    const HALF: Timestamp = Timestamp::MAX / 2;

    t1 == 0
        || (((t1 < t2 && t2 - t1 < HALF) || (t1 > t2 && t1 - t2 > HALF)) && t2 != 0)
}

/// The screen-wide inputs of a focus decision.
pub struct FocusContext<'c> {
    pub level: FocusPreventionLevel,
    pub exclusions: &'c dyn MatchPredicate,
    pub active: Option<&'c Client>,
    pub current_desktop: u32,
}

/// The last user interaction with `client`, or failing that with its
/// nearest transient-for ancestor that recorded one.
pub fn usage_timestamp(
    clients: &impl Clients,
    client: &Client,
) -> Option<Timestamp> {
    if let Some(time) = client.user_time() {
        return Some(time);
    }

    let mut current = client.transient_for();

    for _ in 0..=clients.len() {
        let ancestor = clients.client(current?)?;

        if let Some(time) = ancestor.user_time() {
            return Some(time);
        }

        current = ancestor.transient_for();
    }

    None
}

/// Decide whether `client` may take focus away from the active window.
pub fn is_window_focus_allowed(
    clients: &impl Clients,
    ctx: &FocusContext,
    client: &Client,
    timestamp: Timestamp,
) -> bool {
    if ctx.level == FocusPreventionLevel::Off {
        return true;
    }

    let usage = if timestamp != 0 {
        Some(timestamp)
    } else {
        usage_timestamp(clients, client)
    };

    // zero means the client asked not to be focused
    if usage == Some(0) {
        return false;
    }

    if ctx.exclusions.evaluate(client) {
        return true;
    }

    if ctx.level == FocusPreventionLevel::VeryHigh {
        return false;
    }

    let active = match ctx.active {
        Some(active) if !active.is_type(TypeMask::DESKTOP) => active,
        _ => return true,
    };

    // two windows without a leader count as one application here
    if client.client_leader() == active.client_leader() {
        return true;
    }

    if ctx.level == FocusPreventionLevel::High {
        return false;
    }

    if !client.is_on_desktop(ctx.current_desktop) {
        return false;
    }

    let usage = match usage {
        Some(usage) => usage,
        None => return ctx.level <= FocusPreventionLevel::Low,
    };

    let active_usage = usage_timestamp(clients, active).unwrap_or(0);

    !is_before(usage, active_usage)
}

/// The top-most mapped modal window that must receive focus in place of
/// `client`: a modal transient chain hanging off it, or failing that a modal
/// group transient of its leader.
pub fn modal_transient(
    stack: &StackManager,
    clients: &impl Clients,
    client: &Client,
) -> Option<Window> {
    let mut modal = client;

    // every restart descends one link of an acyclic chain
    'restart: for _ in 0..=clients.len() {
        for handle in stack.top_down() {
            let candidate = match clients.client(handle) {
                Some(candidate) => candidate,
                None => continue,
            };

            if candidate.window() == modal.window() || !candidate.is_mapped() {
                continue;
            }

            if candidate.transient_for() == Some(modal.window())
                && candidate.has_state(StateMask::MODAL)
            {
                modal = candidate;
                continue 'restart;
            }
        }

        break;
    }

    if modal.window() == client.window() {
        if client.has_state(StateMask::MODAL) {
            return None;
        }

        for handle in stack.top_down() {
            let candidate = match clients.client(handle) {
                Some(candidate) => candidate,
                None => continue,
            };

            if candidate.window() == client.window()
                || !candidate.is_mapped()
                || is_ancestor_to(clients, client, candidate)
            {
                continue;
            }

            if candidate.is_group_transient(client.client_leader())
                && candidate.has_state(StateMask::MODAL)
            {
                return modal_transient(stack, clients, candidate).or(Some(candidate.window()));
            }
        }
    }

    if modal.window() == client.window() {
        None
    } else {
        Some(modal.window())
    }
}

impl<'a> Model<'a> {
    pub fn is_window_focus_allowed(
        &self,
        window: Window,
        timestamp: Timestamp,
    ) -> bool {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return false,
        };

        let ctx = FocusContext {
            level: self.settings.focus_prevention_level,
            exclusions: &self.settings.focus_prevention_match,
            active: self.active_window.and_then(|active| self.client_map.get(&active)),
            current_desktop: self.current_desktop,
        };

        is_window_focus_allowed(&self.client_map, &ctx, client, timestamp)
    }

    /// Gate a focus change on window type, input model and the focus
    /// arbitrator. A denied window is flagged as demanding attention.
    pub(crate) fn allow_window_focus(
        &mut self,
        window: Window,
        no_focus: TypeMask,
        timestamp: Timestamp,
    ) -> bool {
        if self.active_window == Some(window) {
            return true;
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return false,
        };

        if client.is_type(no_focus) || !client.accepts_focus() {
            return false;
        }

        if self.is_window_focus_allowed(window, timestamp) {
            return true;
        }

        debug!("focus prevented for window {:#0x}", window);

        let state = client.state() | StateMask::DEMANDS_ATTENTION;
        self.change_state(window, state);

        false
    }

    /// Whether `client` can hold input focus right now.
    pub fn is_focusable(
        &self,
        client: &Client,
    ) -> bool {
        if client.is_override_redirect() || !client.is_managed() || client.is_destroyed() {
            return false;
        }

        if !client.is_on_desktop(self.current_desktop) {
            return false;
        }

        if !client.is_shaded() && client.has_state(StateMask::HIDDEN) {
            return false;
        }

        let server = client.server_geometry();
        let screen = self.conn.screen_region();

        server.pos.x + server.dim.w > screen.pos.x
            && server.pos.y + server.dim.h > screen.pos.y
            && server.pos.x < screen.right()
            && server.pos.y < screen.bottom()
    }

    fn set_active(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if self.active_window != Some(window) {
            info!("activating window {:#0x}", window);
        }

        self.active_counter += 1;
        client.set_active_num(self.active_counter);
        self.active_window = Some(window);
        self.conn.update_active_window(Some(window));

        if client.has_state(StateMask::DEMANDS_ATTENTION) {
            let state = client.state() - StateMask::DEMANDS_ATTENTION;
            self.change_state(window, state);
        }
    }

    fn unfocus(&mut self) {
        debug!("no window to focus, focusing root");

        self.conn.unfocus();

        if self.active_window.is_some() {
            self.active_window = None;
            self.conn.update_active_window(None);
        }
    }

    /// Give input focus to `window`, or to the modal window standing in for
    /// it. A window refusing input passes focus on to an ancestor.
    pub fn move_input_focus_to(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if let Some(modal) = modal_transient(&self.stack, &self.client_map, client) {
            debug!("focus of window {:#0x} redirected to modal {:#0x}", window, modal);
            self.move_input_focus_to(modal);
            return;
        }

        if client.has_state(StateMask::HIDDEN) {
            // a hidden window can only hold focus through its frame
            if let Some(frame) = client.frame() {
                self.conn.focus_window(frame);
            }

            self.set_active(window);
            return;
        }

        let mut focused = false;

        if client.hints().accepts_input() {
            self.conn.focus_window(window);
            focused = true;
        }

        if client.protocols().contains(Protocols::TAKE_FOCUS) {
            self.conn.send_take_focus(window, self.conn.current_time());
            focused = true;
        }

        if focused {
            self.set_active(window);
            return;
        }

        let ancestor = self.stack.bottom_up().find(|&handle| {
            self.client_map
                .get(&handle)
                .map_or(false, |ancestor| is_ancestor_to(&self.client_map, client, ancestor))
        });

        if let Some(ancestor) = ancestor {
            self.move_input_focus_to(ancestor);
        }
    }

    /// Pick the most recently active of two candidates, preferring the
    /// first unless the second is an ordinary window.
    fn more_active<'c>(
        current: Option<&'c Client>,
        candidate: &'c Client,
    ) -> Option<&'c Client> {
        match current {
            None => Some(candidate),
            Some(current)
                if candidate.is_type(
                    TypeMask::NORMAL | TypeMask::DIALOG | TypeMask::MODAL_DIALOG,
                ) && current.active_num() < candidate.active_num() =>
            {
                Some(candidate)
            },
            current => current,
        }
    }

    /// Hand focus away from `window`, which is going away, to the window
    /// the user most likely expects.
    pub(crate) fn move_input_focus_to_other_window(
        &mut self,
        window: Window,
    ) {
        if self.active_window != Some(window) {
            return;
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let target = if let Some(parent) = client.transient_for() {
            self.client_map
                .get(&parent)
                .filter(|parent| {
                    self.is_focusable(parent)
                        && !parent.is_type(TypeMask::DESKTOP | TypeMask::DOCK)
                })
                .map(Client::window)
        } else if client.is_type(TypeMask::DIALOG | TypeMask::MODAL_DIALOG) {
            self.stack
                .top_down()
                .filter(|&handle| handle != window)
                .filter_map(|handle| self.client_map.get(&handle))
                .filter(|other| same_leader(client, other) && self.is_focusable(other))
                .fold(None, Self::more_active)
                .filter(|focus| !focus.is_type(TypeMask::DESKTOP | TypeMask::DOCK))
                .map(Client::window)
        } else {
            None
        };

        match target {
            Some(target) => self.move_input_focus_to(target),
            None => self.focus_default_window_except(Some(window)),
        }
    }

    fn default_focus_candidate(
        &self,
        exclude: Option<Window>,
    ) -> Option<Window> {
        let eligible = |client: &Client| Some(client.window()) != exclude && self.is_focusable(client);

        if let Some(active) = self.active_window.and_then(|active| self.client_map.get(&active)) {
            if eligible(active) && !active.is_type(TypeMask::DESKTOP | TypeMask::DOCK) {
                return Some(active.window());
            }
        }

        self.stack
            .top_down()
            .filter_map(|handle| self.client_map.get(&handle))
            .filter(|client| !client.is_type(TypeMask::DOCK) && eligible(*client))
            .fold(None, Self::more_active)
            .map(Client::window)
    }

    /// Focus the most recently active ordinary window, or nothing.
    pub fn focus_default_window(&mut self) {
        self.focus_default_window_except(None);
    }

    fn focus_default_window_except(
        &mut self,
        exclude: Option<Window>,
    ) {
        match self.default_focus_candidate(exclude) {
            Some(window) => {
                if self.active_window != Some(window) {
                    self.move_input_focus_to(window);
                }
            },
            None => self.unfocus(),
        }
    }

    /// Focus the top-most focusable window that is not a dock.
    pub fn focus_top_most_window(&mut self) -> Option<Window> {
        let focus = self.stack.top_down().find(|&handle| {
            self.client_map
                .get(&handle)
                .map_or(false, |client| !client.is_type(TypeMask::DOCK) && self.is_focusable(client))
        });

        match focus {
            Some(window) => {
                if self.active_window != Some(window) {
                    self.move_input_focus_to(window);
                }
            },
            None => self.unfocus(),
        }

        focus
    }

    fn reveal(
        &mut self,
        window: Window,
    ) {
        if self.client_map.get(&window).map_or(false, Client::is_minimized) {
            let _ = self.unminimize(window);
        }

        self.leave_show_desktop_mode(Some(window));
    }

    /// Bring `window` into view on its desktop, raise it and focus it.
    pub fn activate(
        &mut self,
        window: Window,
    ) {
        let client = match self.client(window) {
            Some(client) => client,
            None => return,
        };

        let window = client.window();

        for hook in self.hooks.iter() {
            hook.activate(client);
        }

        let desktop = client.desktop();

        let ancestors: Vec<Window> = self
            .stack
            .bottom_up()
            .filter(|&handle| {
                self.client_map
                    .get(&handle)
                    .map_or(false, |ancestor| is_ancestor_to(&self.client_map, client, ancestor))
            })
            .collect();

        self.set_current_desktop(desktop);

        for ancestor in ancestors {
            self.reveal(ancestor);
        }

        self.reveal(window);

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.has_state(StateMask::HIDDEN) {
            let state = client.state() - StateMask::SHADED;

            self.change_state(window, state);
            self.apply_visibility(window);
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if client.has_state(StateMask::HIDDEN) || !client.is_on_desktop(self.current_desktop) {
            return;
        }

        self.ensure_window_visibility(window);
        self.update_attributes(window, StackingUpdateMode::AboveFullscreen);
        self.move_input_focus_to(window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::config::Match;
    use crate::policy::transient::tests::managed_client;
    use crate::policy::transient::ClientMap;
    use crate::winsys::window::WindowType;
    use simple_test_case::test_case;

    static NO_EXCLUSIONS: Match = Match::Never;

    fn ctx<'c>(
        level: FocusPreventionLevel,
        active: Option<&'c Client>,
    ) -> FocusContext<'c> {
        FocusContext {
            level,
            exclusions: &NO_EXCLUSIONS,
            active,
            current_desktop: 0,
        }
    }

    fn pair() -> ClientMap {
        let mut clients = ClientMap::default();

        clients.insert(0x10, managed_client(0x10, WindowType::Normal));
        clients.insert(0x20, managed_client(0x20, WindowType::Normal));
        clients[&0x10].set_client_leader(Some(0x1));
        clients[&0x20].set_client_leader(Some(0x2));
        clients
    }

    #[test_case(0, 0, true; "zero precedes zero")]
    #[test_case(0, 5, true; "zero precedes everything")]
    #[test_case(5, 0, false; "nothing precedes zero")]
    #[test_case(5, 10, true; "earlier")]
    #[test_case(10, 5, false; "later")]
    #[test_case(7, 7, false; "equal")]
    #[test_case(u32::MAX - 5, 10, true; "wrapped around")]
    #[test_case(10, u32::MAX - 5, false; "before the wrap")]
    #[test]
    fn server_time_ordering(
        t1: Timestamp,
        t2: Timestamp,
        expected: bool,
    ) {
        assert_eq!(is_before(t1, t2), expected);
    }

    #[test]
    fn levels_convert_from_integers() {
        assert_eq!(FocusPreventionLevel::try_from(3), Ok(FocusPreventionLevel::High));
        assert_eq!(FocusPreventionLevel::try_from(5), Err(5));
        assert_eq!(FocusPreventionLevel::VeryHigh as i32, 4);
    }

    #[test]
    fn high_level_denies_foreign_window_without_timestamp() {
        let clients = pair();
        let ctx = ctx(FocusPreventionLevel::High, Some(&clients[&0x10]));

        assert!(!is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 0));
    }

    #[test_case(FocusPreventionLevel::Off, true; "off always allows")]
    #[test_case(FocusPreventionLevel::Low, true; "low allows without timestamp")]
    #[test_case(FocusPreventionLevel::Normal, false; "normal denies without timestamp")]
    #[test_case(FocusPreventionLevel::VeryHigh, false; "very high denies")]
    #[test]
    fn level_without_timestamp(
        level: FocusPreventionLevel,
        expected: bool,
    ) {
        let clients = pair();
        let ctx = ctx(level, Some(&clients[&0x10]));

        assert_eq!(is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 0), expected);
    }

    #[test]
    fn off_allows_even_explicit_refusal() {
        let clients = pair();
        clients[&0x20].set_user_time(Some(0));
        let ctx = ctx(FocusPreventionLevel::Off, Some(&clients[&0x10]));

        assert!(is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 0));
    }

    #[test]
    fn zero_user_time_refuses_focus() {
        let clients = pair();
        clients[&0x20].set_user_time(Some(0));
        let ctx = ctx(FocusPreventionLevel::Low, None);

        assert!(!is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 0));
    }

    #[test]
    fn exclusions_win_over_very_high() {
        let clients = pair();
        let exclusions = Match::Window(0x20);
        let ctx = FocusContext {
            exclusions: &exclusions,
            ..ctx(FocusPreventionLevel::VeryHigh, Some(&clients[&0x10]))
        };

        assert!(is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 0));
    }

    #[test]
    fn leaderless_windows_are_allowed_at_high() {
        let clients = pair();
        clients[&0x10].set_client_leader(None);
        clients[&0x20].set_client_leader(None);
        let ctx = ctx(FocusPreventionLevel::High, Some(&clients[&0x10]));

        assert!(is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 500));

        // one leaderless window is still foreign to a led one
        clients[&0x10].set_client_leader(Some(0x1));
        assert!(!is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 500));
    }

    #[test]
    fn same_application_is_allowed_at_high() {
        let clients = pair();
        clients[&0x20].set_client_leader(Some(0x1));
        let ctx = ctx(FocusPreventionLevel::High, Some(&clients[&0x10]));

        assert!(is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 0));
    }

    #[test]
    fn desktop_or_no_active_window_allows() {
        let mut clients = pair();
        clients.insert(0x30, managed_client(0x30, WindowType::Desktop));

        let ctx_desktop = ctx(FocusPreventionLevel::High, Some(&clients[&0x30]));
        let ctx_none = ctx(FocusPreventionLevel::High, None);

        assert!(is_window_focus_allowed(&clients, &ctx_desktop, &clients[&0x20], 0));
        assert!(is_window_focus_allowed(&clients, &ctx_none, &clients[&0x20], 0));
    }

    #[test]
    fn off_desktop_window_is_denied() {
        let clients = pair();
        clients[&0x20].set_desktop(1);
        let ctx = ctx(FocusPreventionLevel::Low, Some(&clients[&0x10]));

        assert!(!is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 500));
    }

    #[test]
    fn older_interaction_than_active_is_denied() {
        let clients = pair();
        clients[&0x10].set_user_time(Some(1000));
        let ctx = ctx(FocusPreventionLevel::Normal, Some(&clients[&0x10]));

        assert!(!is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 900));
        assert!(is_window_focus_allowed(&clients, &ctx, &clients[&0x20], 1100));
    }

    #[test]
    fn usage_timestamp_falls_back_to_ancestors() {
        let mut clients = pair();
        clients.insert(0x30, managed_client(0x30, WindowType::Dialog));
        clients.insert(0x40, managed_client(0x40, WindowType::Dialog));
        clients[&0x30].set_transient_for(Some(0x20));
        clients[&0x40].set_transient_for(Some(0x30));
        clients[&0x20].set_user_time(Some(777));

        assert_eq!(usage_timestamp(&clients, &clients[&0x40]), Some(777));
        assert_eq!(usage_timestamp(&clients, &clients[&0x10]), None);
    }

    fn modal_scene() -> (StackManager, ClientMap) {
        let mut stack = StackManager::new();
        let mut clients = ClientMap::default();

        for &(window, wm_type) in &[
            (0x10, WindowType::Normal),
            (0x20, WindowType::Dialog),
            (0x30, WindowType::Dialog),
            (0x40, WindowType::Dialog),
        ] {
            let client = managed_client(window, wm_type);
            client.set_viewable(true);
            client.set_map_num(window);
            client.set_client_leader(Some(0x1));

            stack.insert(window, None);
            clients.insert(window, client);
        }

        (stack, clients)
    }

    #[test]
    fn modal_chain_is_followed_to_its_end() {
        let (stack, clients) = modal_scene();
        clients[&0x20].set_transient_for(Some(0x10));
        clients[&0x20].set_state(StateMask::MODAL);
        clients[&0x30].set_transient_for(Some(0x20));
        clients[&0x30].set_state(StateMask::MODAL);

        assert_eq!(modal_transient(&stack, &clients, &clients[&0x10]), Some(0x30));
        assert_eq!(modal_transient(&stack, &clients, &clients[&0x30]), None);
    }

    #[test]
    fn non_modal_transients_do_not_redirect() {
        let (stack, clients) = modal_scene();
        clients[&0x20].set_transient_for(Some(0x10));

        assert_eq!(modal_transient(&stack, &clients, &clients[&0x10]), None);
    }

    #[test]
    fn modal_group_transient_redirects() {
        let (stack, clients) = modal_scene();
        clients[&0x40].set_state(StateMask::MODAL);
        clients[&0x40].recalc_type();

        assert_eq!(modal_transient(&stack, &clients, &clients[&0x10]), Some(0x40));

        // a modal window is never redirected to a group sibling
        clients[&0x10].set_state(StateMask::MODAL);
        assert_eq!(modal_transient(&stack, &clients, &clients[&0x10]), None);
    }

    #[test]
    fn unmapped_modals_are_ignored() {
        let (stack, clients) = modal_scene();
        clients[&0x20].set_transient_for(Some(0x10));
        clients[&0x20].set_state(StateMask::MODAL);
        clients[&0x20].set_map_num(0);

        assert_eq!(modal_transient(&stack, &clients, &clients[&0x10]), None);
    }

    mod scenario {
        use super::super::*;
        use crate::policy::config::MapConfig;
        use crate::policy::config::FOCUS_PREVENTION_LEVEL;
        use crate::policy::mock::geometry;
        use crate::policy::mock::manage;
        use crate::policy::mock::Call;
        use crate::policy::mock::MockConnection;
        use crate::policy::timer::FakeClock;
        use crate::winsys::event::CirculatePlace;
        use crate::winsys::event::Event;
        use crate::winsys::window::WindowType;
        use simple_test_case::test_case;

        fn connection(windows: &[Window]) -> MockConnection {
            let conn = MockConnection::new();

            for &window in windows {
                conn.add_window(window, geometry(), WindowType::Normal);
                conn.set_client_leader(window, window);
            }

            conn
        }

        #[test_case(0, 0x200; "off focuses the new window")]
        #[test_case(1, 0x200; "low focuses the new window")]
        #[test_case(3, 0x100; "high keeps the active window")]
        #[test]
        fn new_window_focus_follows_prevention_level(
            level: i32,
            expected: Window,
        ) {
            let conn = connection(&[0x100, 0x200]);
            let config = options! { FOCUS_PREVENTION_LEVEL => level };
            let mut model = Model::new(&conn, &config, Box::new(FakeClock::new()));

            manage(&mut model, 0x100);
            manage(&mut model, 0x200);

            assert_eq!(model.active_window(), Some(expected));

            let denied = model
                .client(0x200)
                .map_or(false, |client| client.has_state(StateMask::DEMANDS_ATTENTION));

            assert_eq!(denied, expected != 0x200);
        }

        #[test]
        fn leaderless_windows_share_focus_at_high_level() {
            let conn = MockConnection::new();
            conn.add_window(0x100, geometry(), WindowType::Normal);
            conn.add_window(0x200, geometry(), WindowType::Normal);

            let config = options! { FOCUS_PREVENTION_LEVEL => 3 };
            let mut model = Model::new(&conn, &config, Box::new(FakeClock::new()));

            manage(&mut model, 0x100);
            manage(&mut model, 0x200);

            assert_eq!(model.active_window(), Some(0x200));
        }

        #[test]
        fn newer_activation_overrides_earlier_denial() {
            let conn = connection(&[0x100, 0x200]);
            let config = options! { FOCUS_PREVENTION_LEVEL => 2 };
            let mut model = Model::new(&conn, &config, Box::new(FakeClock::new()));

            conn.set_user_time(0x100, 100);
            conn.set_user_time(0x200, 50);
            manage(&mut model, 0x100);
            manage(&mut model, 0x200);

            assert_eq!(model.active_window(), Some(0x100));

            model.handle_event(Event::ActivateRequest {
                window: 0x200,
                time: 80,
            });

            assert_eq!(model.active_window(), Some(0x100));

            model.handle_event(Event::ActivateRequest {
                window: 0x200,
                time: 200,
            });

            assert_eq!(model.active_window(), Some(0x200));
            assert!(!model
                .client(0x200)
                .map_or(true, |client| client.has_state(StateMask::DEMANDS_ATTENTION)));
        }

        #[test]
        fn modal_transient_holds_focus_for_its_parent() {
            let conn = connection(&[0x100, 0x300]);
            let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));

            conn.set_transient_for(0x300, 0x100);
            conn.set_state(0x300, StateMask::MODAL);
            manage(&mut model, 0x100);
            manage(&mut model, 0x300);

            assert_eq!(
                model.client(0x300).map(Client::window_type),
                Some(WindowType::ModalDialog)
            );

            conn.take_calls();
            model.activate(0x100);

            assert_eq!(model.active_window(), Some(0x300));
            assert_eq!(conn.count(&Call::Focus(0x100)), 0);
            assert_eq!(conn.count(&Call::Focus(0x300)), 1);
        }

        #[test]
        fn focus_falls_back_to_most_recently_active_window() {
            let conn = connection(&[0x100, 0x200, 0x300]);
            let mut model = Model::new(&conn, &MapConfig::new(), Box::new(FakeClock::new()));

            manage(&mut model, 0x100);
            manage(&mut model, 0x200);
            manage(&mut model, 0x300);
            model.activate(0x100);

            model.handle_event(Event::Circulate {
                window: 0x200,
                place: CirculatePlace::OnTop,
            });

            assert_eq!(model.stack().top(), Some(0x200));
            assert_eq!(model.active_window(), Some(0x100));

            model.handle_event(Event::Destroy {
                window: 0x100,
            });

            assert_eq!(model.active_window(), Some(0x300));
        }
    }
}
