use crate::policy::client::Client;
use crate::policy::hook::WindowNotify;
use crate::policy::model::Model;
use crate::policy::transient::is_ancestor_to;
use crate::policy::transient::Clients;
use crate::winsys::event::ChangeMask;
use crate::winsys::event::StackMode;
use crate::winsys::event::WindowChanges;
use crate::winsys::window::StateMask;
use crate::winsys::window::TypeMask;
use crate::winsys::window::Window;
use crate::winsys::window::WindowType;

use strum::AsRefStr;

/// The authoritative z-order of every tracked top-level window, kept
/// bottom-to-top. Only the operations below reorder it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackManager {
    windows: Vec<Window>,
}

impl StackManager {
    pub fn new() -> Self {
        Self {
            windows: Vec::with_capacity(50),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    #[inline]
    pub fn contains(
        &self,
        window: Window,
    ) -> bool {
        self.windows.contains(&window)
    }

    #[inline]
    pub fn position(
        &self,
        window: Window,
    ) -> Option<usize> {
        self.windows.iter().position(|&w| w == window)
    }

    #[inline]
    pub fn bottom(&self) -> Option<Window> {
        self.windows.first().copied()
    }

    #[inline]
    pub fn top(&self) -> Option<Window> {
        self.windows.last().copied()
    }

    /// The window directly beneath `window`.
    pub fn below(
        &self,
        window: Window,
    ) -> Option<Window> {
        match self.position(window)? {
            0 => None,
            index => Some(self.windows[index - 1]),
        }
    }

    /// The window directly on top of `window`.
    pub fn above(
        &self,
        window: Window,
    ) -> Option<Window> {
        self.windows.get(self.position(window)? + 1).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Window] {
        &self.windows
    }

    pub fn bottom_up(&self) -> impl Iterator<Item = Window> + '_ {
        self.windows.iter().copied()
    }

    pub fn top_down(&self) -> impl Iterator<Item = Window> + '_ {
        self.windows.iter().rev().copied()
    }

    /// Place a window not yet in the list directly above `above`, or on top
    /// if no (known) sibling is given.
    pub fn insert(
        &mut self,
        window: Window,
        above: Option<Window>,
    ) {
        if self.contains(window) {
            error!("window {:#0x} is already in the stacking list", window);
            debug_assert!(false, "duplicate stacking list entry");
            self.remove(window);
        }

        let index = above
            .and_then(|sibling| self.position(sibling))
            .map_or(self.windows.len(), |index| index + 1);

        self.windows.insert(index, window);
    }

    pub fn remove(
        &mut self,
        window: Window,
    ) -> Option<usize> {
        let index = self.position(window)?;
        self.windows.remove(index);
        Some(index)
    }

    /// Move `window` directly above `above`, or to the top when `above` is
    /// `None` or no longer in the list. Returns `false` without touching the
    /// list when the window already sits there.
    pub fn restack(
        &mut self,
        window: Window,
        above: Option<Window>,
    ) -> bool {
        if !self.contains(window) {
            return false;
        }

        let above = match above {
            Some(sibling) if sibling == window => return false,
            Some(sibling) if !self.contains(sibling) => {
                debug!("stale sibling {:#0x}, restacking {:#0x} to top", sibling, window);
                None
            },
            above => above,
        };

        match above {
            Some(sibling) if self.below(window) == Some(sibling) => return false,
            None if self.top() == Some(window) => return false,
            _ => {},
        }

        self.remove(window);
        self.insert(window, above);
        true
    }

    /// Move `window` below every other window.
    pub fn restack_to_bottom(
        &mut self,
        window: Window,
    ) -> bool {
        match self.position(window) {
            None | Some(0) => false,
            Some(index) => {
                self.windows.remove(index);
                self.windows.insert(0, window);
                true
            },
        }
    }
}

/// Windows whose position no other window may be stacked relative to.
pub fn avoid_stacking_relative_to(client: &Client) -> bool {
    if client.is_override_redirect() {
        return true;
    }

    if !client.is_shaded() && client.pending_maps().get() == 0 {
        return !client.is_viewable() || !client.is_mapped();
    }

    false
}

/// The type governing where a window may be stacked: fullscreen windows in
/// the below state stack like normal ones.
fn stacking_type(client: &Client) -> WindowType {
    match client.window_type() {
        WindowType::Fullscreen if client.has_state(StateMask::BELOW) => WindowType::Normal,
        window_type => window_type,
    }
}

/// The leader whose group transients a window must stay below, if any.
fn stacking_leader(client: &Client) -> Option<Window> {
    let leader = client.client_leader();

    if client.transient_for().is_some() || client.is_group_transient(leader) {
        None
    } else {
        leader
    }
}

/// Whether `window` may be stacked above `below`, given the layer rules for
/// transients, group transients and the above/below states.
pub fn stack_layer_check(
    clients: &impl Clients,
    window: &Client,
    leader: Option<Window>,
    below: &Client,
) -> bool {
    if is_ancestor_to(clients, window, below) {
        return true;
    }

    if is_ancestor_to(clients, below, window) {
        return false;
    }

    if leader.is_some() && below.client_leader() == leader && below.is_group_transient(leader) {
        return false;
    }

    if window.has_state(StateMask::ABOVE) {
        true
    } else if window.has_state(StateMask::BELOW) {
        below.has_state(StateMask::BELOW)
    } else {
        !below.has_state(StateMask::ABOVE)
    }
}

/// Walk the list top-down for the first window `window` may be placed
/// directly above. Normal windows may go above fullscreen ones (and
/// fullscreen windows above the rest of their layer) when `above_fullscreen`
/// is set. `None` means the bottom of the stack.
pub fn find_sibling_below(
    stack: &StackManager,
    clients: &impl Clients,
    window: &Client,
    above_fullscreen: bool,
) -> Option<Window> {
    let below_mask = if above_fullscreen {
        TypeMask::DOCK
    } else {
        TypeMask::DOCK_LAYER
    };

    let window_type = stacking_type(window);
    let leader = stacking_leader(window);

    for handle in stack.top_down() {
        let below = match clients.client(handle) {
            Some(below) if below.window() != window.window() => below,
            _ => continue,
        };

        if avoid_stacking_relative_to(below) {
            continue;
        }

        // nothing goes beneath a desktop window
        if below.is_type(TypeMask::DESKTOP) {
            return Some(handle);
        }

        match window_type {
            WindowType::Desktop => {},
            WindowType::Fullscreen | WindowType::Dock => {
                if window_type == WindowType::Fullscreen && above_fullscreen {
                    return Some(handle);
                }

                if !below.is_type(TypeMask::DOCK_LAYER)
                    || stack_layer_check(clients, window, leader, below)
                {
                    return Some(handle);
                }
            },
            _ => {
                if !below.is_type(below_mask) && stack_layer_check(clients, window, leader, below)
                {
                    return Some(handle);
                }
            },
        }
    }

    None
}

/// Walk the list top-down for the lowest window `window` may be placed
/// directly above when it is lowered: the first window it may not sink
/// beneath, or `None` for the bottom of the stack.
pub fn find_lowest_sibling_below(
    stack: &StackManager,
    clients: &impl Clients,
    window: &Client,
) -> Option<Window> {
    let window_type = stacking_type(window);
    let leader = stacking_leader(window);

    for handle in stack.top_down() {
        let below = match clients.client(handle) {
            Some(below) if below.window() != window.window() => below,
            _ => continue,
        };

        if avoid_stacking_relative_to(below) {
            continue;
        }

        if below.is_type(TypeMask::DESKTOP) {
            return Some(handle);
        }

        match window_type {
            WindowType::Desktop => return None,
            WindowType::Fullscreen | WindowType::Dock => {
                if !below.is_type(TypeMask::DOCK_LAYER)
                    || !stack_layer_check(clients, below, leader, window)
                {
                    return Some(handle);
                }
            },
            _ => {
                if !below.is_type(TypeMask::DOCK)
                    && !stack_layer_check(clients, below, leader, window)
                {
                    return Some(handle);
                }
            },
        }
    }

    None
}

/// Whether `window` may be placed directly above `sibling`.
pub fn valid_sibling_below(
    clients: &impl Clients,
    window: &Client,
    sibling: &Client,
) -> bool {
    if sibling.window() == window.window() || avoid_stacking_relative_to(sibling) {
        return false;
    }

    if sibling.is_type(TypeMask::DESKTOP) {
        return true;
    }

    let leader = stacking_leader(window);

    match stacking_type(window) {
        WindowType::Desktop => false,
        WindowType::Fullscreen | WindowType::Dock => {
            !sibling.is_type(TypeMask::DOCK_LAYER)
                || stack_layer_check(clients, window, leader, sibling)
        },
        _ => {
            !sibling.is_type(TypeMask::DOCK) && stack_layer_check(clients, window, leader, sibling)
        },
    }
}

/// The highest window below `sibling` that `window` may be placed directly
/// above.
pub fn find_valid_stack_sibling_below(
    stack: &StackManager,
    clients: &impl Clients,
    window: &Client,
    sibling: Window,
) -> Option<Window> {
    let mut lowest = find_lowest_sibling_below(stack, clients, window);
    let mut last = lowest;

    for handle in stack.bottom_up() {
        if handle == sibling {
            return lowest;
        }

        let candidate = match clients.client(handle) {
            Some(candidate) if candidate.window() != window.window() => candidate,
            _ => continue,
        };

        if avoid_stacking_relative_to(candidate) {
            continue;
        }

        // only advance while every window passed so far was valid
        if valid_sibling_below(clients, window, candidate) && last == lowest {
            lowest = Some(handle);
        }

        last = Some(handle);
    }

    lowest
}

#[inline]
fn is_sibling(
    client: &Client,
    sibling: Option<Window>,
) -> bool {
    sibling.is_some() && (sibling == Some(client.window()) || sibling == client.frame())
}

/// Collect, depth first, the mapped transients (and group transients) of
/// `window` that must move along with it. Fails when moving them would put
/// a non-dock transient of a dock in the dock layer, or when one of them is
/// the very `sibling` being stacked against.
pub fn stack_transients(
    stack: &StackManager,
    clients: &impl Clients,
    window: &Client,
    avoid: Option<Window>,
    sibling: Option<Window>,
    list: &mut Vec<Window>,
) -> bool {
    let leader = stacking_leader(window);

    for handle in stack.top_down() {
        if handle == window.window() || Some(handle) == avoid {
            continue;
        }

        let transient = match clients.client(handle) {
            Some(transient) => transient,
            None => continue,
        };

        if transient.transient_for() == Some(window.window())
            || transient.is_group_transient(leader)
        {
            if window.is_type(TypeMask::DOCK) && !transient.is_type(TypeMask::DOCK) {
                return false;
            }

            if !stack_transients(stack, clients, transient, avoid, sibling, list) {
                return false;
            }

            if is_sibling(transient, sibling) {
                return false;
            }

            if transient.is_mapped() || transient.pending_maps().get() > 0 {
                list.push(handle);
            }
        }
    }

    true
}

/// Collect the ancestors of `window` (or, for a group transient, the
/// leader's other windows) together with their transients, which must be
/// stacked directly below it.
pub fn stack_ancestors(
    stack: &StackManager,
    clients: &impl Clients,
    window: &Client,
    sibling: Option<Window>,
    list: &mut Vec<Window>,
) {
    let ancestor = window.transient_for().and_then(|handle| clients.client(handle));

    if let Some(ancestor) = ancestor {
        if is_sibling(ancestor, sibling) {
            return;
        }

        if !stack_transients(stack, clients, ancestor, Some(window.window()), sibling, list) {
            return;
        }

        if ancestor.is_type(TypeMask::DESKTOP) {
            return;
        }

        if ancestor.is_type(TypeMask::DOCK) && !window.is_type(TypeMask::DOCK) {
            return;
        }

        if ancestor.is_mapped() || ancestor.pending_maps().get() > 0 {
            list.push(ancestor.window());
        }

        stack_ancestors(stack, clients, ancestor, sibling, list);
    } else if window.is_group_transient(window.client_leader()) {
        let leader = window.client_leader();

        for handle in stack.top_down() {
            let member = match clients.client(handle) {
                Some(member) => member,
                None => continue,
            };

            if member.client_leader() != leader
                || member.transient_for().is_some()
                || member.is_group_transient(leader)
            {
                continue;
            }

            if is_sibling(member, sibling) {
                break;
            }

            if !stack_transients(stack, clients, member, Some(window.window()), sibling, list) {
                break;
            }

            if member.is_type(TypeMask::DESKTOP) {
                continue;
            }

            if member.is_type(TypeMask::DOCK) && !window.is_type(TypeMask::DOCK) {
                break;
            }

            if member.is_mapped() || member.pending_maps().get() > 0 {
                list.push(handle);
            }
        }
    }
}

/// How `update_attributes` repositions a window in the stack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, AsRefStr)]
pub enum StackingUpdateMode {
    /// Geometry only.
    None,
    Normal,
    AboveFullscreen,
    /// A window being mapped that may take focus.
    InitialMap,
    /// A window being mapped that was denied focus; it goes below the
    /// active window where the layer rules allow it.
    InitialMapDeniedFocus,
}

impl<'a> Model<'a> {
    /// Move `window` in the stacking list as a configure with `sibling` and
    /// `mode` would, reporting whether it moved.
    pub(crate) fn apply_restack(
        &mut self,
        window: Window,
        sibling: Option<Window>,
        mode: StackMode,
    ) -> bool {
        let owner = sibling.and_then(|sibling| self.owner(sibling));

        if sibling.is_some() && owner.is_none() {
            debug!("restacking window {:#0x} against a stale sibling", window);
        }

        let moved = match (mode, owner) {
            (StackMode::Above, owner) => self.stack.restack(window, owner),
            (StackMode::Below, Some(owner)) => match self.stack.below(owner) {
                Some(below) if below == window => false,
                Some(below) => self.stack.restack(window, Some(below)),
                None => self.stack.restack_to_bottom(window),
            },
            (StackMode::Below, None) => self.stack.restack_to_bottom(window),
        };

        if moved {
            trace!("window {:#0x} restacked: {:?}", window, self.stack.as_slice());

            if let Some(client) = self.client_map.get(&window) {
                self.notify(client, WindowNotify::Restack);
            }

            self.update_client_lists();
        }

        moved
    }

    /// Fill in the stacking part of a configure placing `window` directly
    /// above `sibling`, or at the bottom for `None`.
    pub(crate) fn add_window_stack_changes(
        &mut self,
        window: Window,
        changes: &mut WindowChanges,
        sibling: Option<Window>,
    ) -> ChangeMask {
        let mut mask = ChangeMask::empty();

        let sibling = match sibling {
            Some(sibling) if sibling == window => return mask,
            Some(sibling) => sibling,
            None => {
                if self.stack.below(window).is_some() {
                    if let Some(client) = self.client_map.get(&window) {
                        self.conn.lower_window(client.root_parent());
                    }

                    self.apply_restack(window, None, StackMode::Below);
                }

                return mask;
            },
        };

        if self.stack.below(window) != Some(sibling) {
            if let Some(below) = self.client_map.get(&sibling) {
                mask |= ChangeMask::RESTACK;
                changes.stack_mode = StackMode::Above;
                changes.sibling = Some(below.root_parent());
            }
        }

        if mask.is_empty() {
            return mask;
        }

        let (client, below) = match (self.client_map.get(&window), self.client_map.get(&sibling)) {
            (Some(client), Some(below)) => (client, below),
            _ => return mask,
        };

        // normal windows may go above a fullscreen window, never above docks
        if below.is_type(TypeMask::FULLSCREEN)
            && !client.is_type(TypeMask::DOCK_LAYER)
            && !is_ancestor_to(&self.client_map, client, below)
        {
            let docks: Vec<Window> = self
                .stack
                .top_down()
                .skip_while(|&handle| handle != sibling)
                .filter(|handle| {
                    self.client_map
                        .get(handle)
                        .map_or(false, |dock| dock.is_type(TypeMask::DOCK))
                })
                .collect();

            let dock_changes = WindowChanges::above(changes.sibling);

            for dock in docks {
                debug!("raising dock {:#0x} along with window {:#0x}", dock, window);
                self.configure_x_window(dock, &dock_changes, ChangeMask::RESTACK);
            }
        }

        mask
    }

    /// Configure a window, carrying its transients and ancestors along
    /// when it is restacked.
    pub fn configure_x_window(
        &mut self,
        window: Window,
        changes: &WindowChanges,
        mask: ChangeMask,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        if !client.is_managed() || !mask.intersects(ChangeMask::RESTACK) {
            self.reconfigure(window, changes, mask);
            return;
        }

        let mut transients = Vec::new();
        let mut ancestors = Vec::new();

        if !stack_transients(
            &self.stack,
            &self.client_map,
            client,
            None,
            changes.sibling,
            &mut transients,
        ) {
            debug!("window {:#0x} cannot be restacked with its transients", window);
            return;
        }

        stack_ancestors(&self.stack, &self.client_map, client, changes.sibling, &mut ancestors);

        let mut changes = *changes;

        for &ancestor in ancestors.iter().rev() {
            self.reconfigure(ancestor, &changes, ChangeMask::RESTACK);
            changes.sibling = self.client_map.get(&ancestor).map(Client::root_parent);
        }

        self.reconfigure(window, &changes, mask);
        changes.sibling = self.client_map.get(&window).map(Client::root_parent);

        for &transient in transients.iter().rev() {
            self.reconfigure(transient, &changes, ChangeMask::RESTACK);
            changes.sibling = self.client_map.get(&transient).map(Client::root_parent);
        }
    }

    /// Raise a window as far as its layer allows.
    pub fn raise(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        // an active fullscreen window goes above the rest of its layer
        let above_fullscreen =
            client.is_type(TypeMask::FULLSCREEN) && self.active_window == Some(window);

        let sibling = find_sibling_below(&self.stack, &self.client_map, client, above_fullscreen);
        let mut changes = WindowChanges::default();
        let mask = self.add_window_stack_changes(window, &mut changes, sibling);

        if !mask.is_empty() {
            self.configure_x_window(window, &changes, mask);
        }
    }

    /// Lower a window as far as its layer and transient relations allow.
    pub fn lower(
        &mut self,
        window: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let sibling = find_lowest_sibling_below(&self.stack, &self.client_map, client);
        let mut changes = WindowChanges::default();
        let mask = self.add_window_stack_changes(window, &mut changes, sibling);

        if !mask.is_empty() {
            self.configure_x_window(window, &changes, mask);
        }

        if self.settings.click_to_focus {
            let focused = self.focus_top_most_window();

            // the desktop never takes focus away from the lowered window
            let desktop = focused
                .and_then(|focused| self.client_map.get(&focused))
                .map_or(false, |focused| focused.is_type(TypeMask::DESKTOP));

            if desktop {
                self.move_input_focus_to(window);
            }
        }
    }

    /// Place `window` directly above the first window at or above `sibling`
    /// it may be stacked on.
    pub fn restack_above(
        &mut self,
        window: Window,
        sibling: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let target = self
            .stack
            .bottom_up()
            .skip_while(|&handle| handle != sibling)
            .find(|handle| {
                self.client_map
                    .get(handle)
                    .map_or(false, |below| valid_sibling_below(&self.client_map, client, below))
            });

        if let Some(target) = target {
            let mut changes = WindowChanges::default();
            let mask = self.add_window_stack_changes(window, &mut changes, Some(target));

            if !mask.is_empty() {
                self.configure_x_window(window, &changes, mask);
            }
        }
    }

    /// Place `window` below `sibling`, as high as the layer rules allow.
    pub fn restack_below(
        &mut self,
        window: Window,
        sibling: Window,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let target = find_valid_stack_sibling_below(&self.stack, &self.client_map, client, sibling);
        let mut changes = WindowChanges::default();
        let mask = self.add_window_stack_changes(window, &mut changes, target);

        if !mask.is_empty() {
            self.configure_x_window(window, &changes, mask);
        }
    }

    /// Bring a managed window's shading, stacking and size in line with its
    /// state.
    pub fn update_attributes(
        &mut self,
        window: Window,
        mode: StackingUpdateMode,
    ) {
        let client = match self.client_map.get(&window) {
            Some(client) if client.is_managed() && !client.is_override_redirect() => client,
            _ => return,
        };

        let shade = client.has_state(StateMask::SHADED);

        if shade != client.is_shaded() {
            self.notify(
                client,
                if shade {
                    WindowNotify::Shade
                } else {
                    WindowNotify::Unshade
                },
            );

            self.apply_visibility(window);
        }

        let mut changes = WindowChanges::default();
        let mut mask = ChangeMask::empty();

        if mode != StackingUpdateMode::None {
            let client = match self.client_map.get(&window) {
                Some(client) => client,
                None => return,
            };

            let above_fullscreen = matches!(
                mode,
                StackingUpdateMode::AboveFullscreen | StackingUpdateMode::InitialMap
            ) || (client.is_type(TypeMask::FULLSCREEN) && self.active_window == Some(window));

            let mut sibling =
                find_sibling_below(&self.stack, &self.client_map, client, above_fullscreen);

            if let (Some(below), StackingUpdateMode::InitialMapDeniedFocus) = (sibling, mode) {
                let active = self
                    .stack
                    .top_down()
                    .skip_while(|&handle| handle != below)
                    .find(|&handle| Some(handle) == self.active_window)
                    .and_then(|handle| self.client_map.get(&handle));

                // stay below the active window if it may sit on top of us
                if let Some(active) = active {
                    if valid_sibling_below(&self.client_map, active, client) {
                        let target = find_valid_stack_sibling_below(
                            &self.stack,
                            &self.client_map,
                            client,
                            active.window(),
                        );

                        if target.is_some() {
                            sibling = target;
                        }
                    }
                }
            }

            mask |= self.add_window_stack_changes(window, &mut changes, sibling);
        }

        let client = match self.client_map.get(&window) {
            Some(client) => client,
            None => return,
        };

        let server = client.server_geometry();
        let mut size_changes = WindowChanges::from_geometry(server);
        let size_mask = self.add_window_size_changes(client, &mut size_changes, server);

        changes.merge(&size_changes, size_mask);
        mask |= size_mask;

        if !mask.is_empty() {
            self.configure_x_window(window, &changes, mask);
        }
    }
}
