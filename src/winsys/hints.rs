use crate::winsys::geometry::Dim;
use crate::winsys::geometry::Gravity;
use crate::winsys::geometry::Pos;
use crate::winsys::geometry::Ratio;
use crate::winsys::window::IcccmWindowState;
use crate::winsys::window::Window;

/// WM_NORMAL_HINTS as declared by the client; every field may be absent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SizeHints {
    pub by_user: bool,
    pub pos: Option<Pos>,
    pub min: Option<Dim>,
    pub max: Option<Dim>,
    pub base: Option<Dim>,
    pub inc: Option<Dim>,
    pub aspect: Option<(Ratio, Ratio)>,
    pub gravity: Option<Gravity>,
}

impl SizeHints {
    /// Whether the client (or the user through it) positioned the window.
    pub fn has_position(&self) -> bool {
        self.by_user || self.pos.is_some()
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Default)]
pub struct Hints {
    pub urgent: bool,
    pub input: Option<bool>,
    pub initial_state: Option<IcccmWindowState>,
    pub group: Option<Window>,
}

impl Hints {
    /// Clients that leave the input field unset accept focus.
    pub fn accepts_input(&self) -> bool {
        self.input.unwrap_or(true)
    }
}
