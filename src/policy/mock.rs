use crate::policy::client::Client;
use crate::policy::hook::WindowHook;
use crate::policy::hook::WindowNotify;
use crate::policy::model::Model;
use crate::winsys::connection::Connection;
use crate::winsys::connection::Timestamp;
use crate::winsys::connection::WindowAttributes;
use crate::winsys::event::ChangeMask;
use crate::winsys::event::Event;
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

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::anyhow;

/// A request the core issued, as recorded by `MockConnection`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateFrame(Window),
    CreateWrapper(Window, Window),
    Destroy(Window),
    Reparent(Window, Window),
    Unparent(Window),
    Map(Window),
    Unmap(Window),
    Configure(Window, WindowChanges, ChangeMask),
    Lower(Window),
    Focus(Window),
    Unfocus,
    TakeFocus(Window),
    ConfigureNotify(Window, Geometry),
    Close(Window, Timestamp),
    Kill(Window),
    Ping(Window, Timestamp),
    SyncRequest(Window, u64),
    IcccmState(Window, IcccmWindowState),
    State(Window, StateMask),
    ActiveWindow(Option<Window>),
    Desktop(Window, u32),
    CurrentDesktop(u32),
    ClientList(Vec<Window>),
    ClientListStacking(Vec<Window>),
    Workarea(Region),
}

/// An in-memory window system: properties are whatever the test stored,
/// requests are recorded in order.
pub(crate) struct MockConnection {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<Window>,
    screen: Region,
    time: Cell<Timestamp>,
    sync_supported: Cell<bool>,
    attributes: RefCell<HashMap<Window, WindowAttributes>>,
    types: RefCell<HashMap<Window, WindowType>>,
    protocols: RefCell<HashMap<Window, Protocols>>,
    transient_for: RefCell<HashMap<Window, Window>>,
    leaders: RefCell<HashMap<Window, Window>>,
    user_times: RefCell<HashMap<Window, Timestamp>>,
    size_hints: RefCell<HashMap<Window, SizeHints>>,
    hints: RefCell<HashMap<Window, Hints>>,
    states: RefCell<HashMap<Window, StateMask>>,
    struts: RefCell<HashMap<Window, Vec<u32>>>,
}

impl MockConnection {
    pub(crate) fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_handle: Cell::new(0x1000_0000),
            screen: Region::new(0, 0, 1920, 1080),
            time: Cell::new(1),
            sync_supported: Cell::new(true),
            attributes: RefCell::new(HashMap::new()),
            types: RefCell::new(HashMap::new()),
            protocols: RefCell::new(HashMap::new()),
            transient_for: RefCell::new(HashMap::new()),
            leaders: RefCell::new(HashMap::new()),
            user_times: RefCell::new(HashMap::new()),
            size_hints: RefCell::new(HashMap::new()),
            hints: RefCell::new(HashMap::new()),
            states: RefCell::new(HashMap::new()),
            struts: RefCell::new(HashMap::new()),
        }
    }

    /// Create an unmapped top-level window.
    pub(crate) fn add_window(
        &self,
        window: Window,
        geometry: Geometry,
        wm_type: WindowType,
    ) {
        self.attributes.borrow_mut().insert(window, WindowAttributes {
            geometry,
            override_redirect: false,
            viewable: false,
            input_only: false,
            alpha: false,
        });

        self.types.borrow_mut().insert(window, wm_type);
    }

    pub(crate) fn set_protocols(
        &self,
        window: Window,
        protocols: Protocols,
    ) {
        self.protocols.borrow_mut().insert(window, protocols);
    }

    pub(crate) fn set_transient_for(
        &self,
        window: Window,
        parent: Window,
    ) {
        self.transient_for.borrow_mut().insert(window, parent);
    }

    pub(crate) fn set_client_leader(
        &self,
        window: Window,
        leader: Window,
    ) {
        self.leaders.borrow_mut().insert(window, leader);
    }

    pub(crate) fn set_user_time(
        &self,
        window: Window,
        time: Timestamp,
    ) {
        self.user_times.borrow_mut().insert(window, time);
    }

    pub(crate) fn set_state(
        &self,
        window: Window,
        state: StateMask,
    ) {
        self.states.borrow_mut().insert(window, state);
    }

    pub(crate) fn set_strut(
        &self,
        window: Window,
        strut: Vec<u32>,
    ) {
        self.struts.borrow_mut().insert(window, strut);
    }

    pub(crate) fn set_sync_supported(
        &self,
        supported: bool,
    ) {
        self.sync_supported.set(supported);
    }

    /// Drain the requests recorded so far.
    pub(crate) fn take_calls(&self) -> Vec<Call> {
        self.calls.replace(Vec::new())
    }

    pub(crate) fn count(
        &self,
        call: &Call,
    ) -> usize {
        self.calls.borrow().iter().filter(|&recorded| recorded == call).count()
    }

    fn record(
        &self,
        call: Call,
    ) {
        self.calls.borrow_mut().push(call);
    }

    fn next_handle(&self) -> Window {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }
}

impl Connection for MockConnection {
    fn root(&self) -> Window {
        0x1
    }

    fn screen_region(&self) -> Region {
        self.screen
    }

    fn connected_outputs(&self) -> Vec<Region> {
        vec![self.screen]
    }

    fn current_time(&self) -> Timestamp {
        self.time.get()
    }

    fn get_window_attributes(
        &self,
        window: Window,
    ) -> Result<WindowAttributes> {
        self.attributes
            .borrow()
            .get(&window)
            .copied()
            .ok_or_else(|| anyhow!("no such window {:#0x}", window))
    }

    fn get_icccm_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints> {
        self.size_hints.borrow().get(&window).copied()
    }

    fn get_icccm_window_hints(
        &self,
        window: Window,
    ) -> Option<Hints> {
        self.hints.borrow().get(&window).copied()
    }

    fn get_icccm_window_transient_for(
        &self,
        window: Window,
    ) -> Option<Window> {
        self.transient_for.borrow().get(&window).copied()
    }

    fn get_icccm_window_client_leader(
        &self,
        window: Window,
    ) -> Option<Window> {
        self.leaders.borrow().get(&window).copied()
    }

    fn get_icccm_window_protocols(
        &self,
        window: Window,
    ) -> Protocols {
        self.protocols.borrow().get(&window).copied().unwrap_or_default()
    }

    fn get_window_preferred_type(
        &self,
        window: Window,
    ) -> Option<WindowType> {
        self.types.borrow().get(&window).copied()
    }

    fn get_window_preferred_state(
        &self,
        window: Window,
    ) -> StateMask {
        self.states.borrow().get(&window).copied().unwrap_or_default()
    }

    fn get_window_user_time(
        &self,
        window: Window,
    ) -> Option<Timestamp> {
        self.user_times.borrow().get(&window).copied()
    }

    fn get_window_strut(
        &self,
        window: Window,
    ) -> Option<Vec<u32>> {
        self.struts.borrow().get(&window).cloned()
    }

    fn get_window_strut_partial(
        &self,
        _window: Window,
    ) -> Option<Vec<u32>> {
        None
    }

    fn create_frame(
        &self,
        _region: Region,
    ) -> Window {
        let frame = self.next_handle();
        self.record(Call::CreateFrame(frame));
        frame
    }

    fn create_wrapper(
        &self,
        frame: Window,
        _region: Region,
    ) -> Window {
        let wrapper = self.next_handle();
        self.record(Call::CreateWrapper(frame, wrapper));
        wrapper
    }

    fn destroy_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Destroy(window));
    }

    fn reparent_window(
        &self,
        window: Window,
        parent: Window,
        _pos: Pos,
    ) {
        self.record(Call::Reparent(window, parent));
    }

    fn unparent_window(
        &self,
        window: Window,
        _pos: Pos,
    ) {
        self.record(Call::Unparent(window));
    }

    fn insert_window_in_save_set(
        &self,
        _window: Window,
    ) {
    }

    fn map_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Map(window));
    }

    fn unmap_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Unmap(window));
    }

    fn configure_window(
        &self,
        window: Window,
        changes: &WindowChanges,
        mask: ChangeMask,
    ) {
        self.record(Call::Configure(window, *changes, mask));
    }

    fn lower_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Lower(window));
    }

    fn focus_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Focus(window));
    }

    fn unfocus(&self) {
        self.record(Call::Unfocus);
    }

    fn send_take_focus(
        &self,
        window: Window,
        _time: Timestamp,
    ) {
        self.record(Call::TakeFocus(window));
    }

    fn send_configure_notify(
        &self,
        window: Window,
        geometry: Geometry,
        _above: Option<Window>,
        _override_redirect: bool,
    ) {
        self.record(Call::ConfigureNotify(window, geometry));
    }

    fn close_window(
        &self,
        window: Window,
        time: Timestamp,
    ) {
        self.record(Call::Close(window, time));
    }

    fn kill_window(
        &self,
        window: Window,
    ) {
        self.record(Call::Kill(window));
    }

    fn send_ping(
        &self,
        window: Window,
        time: Timestamp,
    ) {
        self.record(Call::Ping(window, time));
    }

    fn init_sync_counter(
        &self,
        _window: Window,
    ) -> bool {
        self.sync_supported.get()
    }

    fn send_sync_request(
        &self,
        window: Window,
        value: u64,
    ) {
        self.record(Call::SyncRequest(window, value));
    }

    fn set_icccm_window_state(
        &self,
        window: Window,
        state: IcccmWindowState,
    ) {
        self.record(Call::IcccmState(window, state));
    }

    fn set_window_state(
        &self,
        window: Window,
        state: StateMask,
    ) {
        self.record(Call::State(window, state));
    }

    fn set_window_allowed_actions(
        &self,
        _window: Window,
        _actions: Actions,
    ) {
    }

    fn set_window_desktop(
        &self,
        window: Window,
        desktop: u32,
    ) {
        self.record(Call::Desktop(window, desktop));
    }

    fn set_window_frame_extents(
        &self,
        _window: Window,
        _extents: Extents,
    ) {
    }

    fn set_window_user_time(
        &self,
        _window: Window,
        _time: Timestamp,
    ) {
    }

    fn update_active_window(
        &self,
        window: Option<Window>,
    ) {
        self.record(Call::ActiveWindow(window));
    }

    fn update_current_desktop(
        &self,
        desktop: u32,
    ) {
        self.record(Call::CurrentDesktop(desktop));
    }

    fn update_client_list(
        &self,
        clients: &[Window],
    ) {
        self.record(Call::ClientList(clients.to_vec()));
    }

    fn update_client_list_stacking(
        &self,
        clients: &[Window],
    ) {
        self.record(Call::ClientListStacking(clients.to_vec()));
    }

    fn update_workarea(
        &self,
        workarea: Region,
    ) {
        self.record(Call::Workarea(workarea));
    }
}

/// Remembers every lifecycle notification it sees.
#[derive(Clone, Default)]
pub(crate) struct RecordingHook {
    seen: Rc<RefCell<Vec<(Window, WindowNotify)>>>,
}

impl RecordingHook {
    pub(crate) fn count(
        &self,
        window: Window,
        notify: WindowNotify,
    ) -> usize {
        self.seen
            .borrow()
            .iter()
            .filter(|&&(seen, kind)| seen == window && kind == notify)
            .count()
    }
}

impl WindowHook for RecordingHook {
    fn window_notify(
        &self,
        client: &Client,
        notify: WindowNotify,
    ) {
        self.seen.borrow_mut().push((client.window(), notify));
    }
}

/// Walk `window` through creation, the map request and the resulting map.
pub(crate) fn manage(
    model: &mut Model,
    window: Window,
) {
    model.handle_event(Event::Create {
        window,
    });

    model.handle_event(Event::MapRequest {
        window,
    });

    model.handle_event(Event::Map {
        window,
    });
}

pub(crate) fn geometry() -> Geometry {
    Geometry::new(100, 100, 400, 300, 0)
}
