use crate::winsys::event::ChangeMask;
use crate::winsys::event::Event;
use crate::winsys::event::StackMode;
use crate::winsys::event::WindowChanges;
use crate::winsys::geometry::Geometry;
use crate::winsys::window::Window;

use x11rb::protocol::xproto;
use x11rb::NONE;

fn sibling(window: Window) -> Option<Window> {
    if window == NONE {
        None
    } else {
        Some(window)
    }
}

impl From<StackMode> for xproto::StackMode {
    fn from(mode: StackMode) -> Self {
        match mode {
            StackMode::Above => xproto::StackMode::ABOVE,
            StackMode::Below => xproto::StackMode::BELOW,
        }
    }
}

impl From<xproto::StackMode> for StackMode {
    fn from(mode: xproto::StackMode) -> Self {
        match mode {
            xproto::StackMode::BELOW => StackMode::Below,
            _ => StackMode::Above,
        }
    }
}

impl From<xproto::ConfigWindow> for ChangeMask {
    fn from(mask: xproto::ConfigWindow) -> Self {
        ChangeMask::from_bits_truncate(u16::from(mask))
    }
}

/// Build the request body for `changes`, carrying only the masked fields.
pub fn configure_aux(
    changes: &WindowChanges,
    mask: ChangeMask,
) -> xproto::ConfigureWindowAux {
    let mut aux = xproto::ConfigureWindowAux::new();

    if mask.contains(ChangeMask::X) {
        aux = aux.x(changes.x);
    }

    if mask.contains(ChangeMask::Y) {
        aux = aux.y(changes.y);
    }

    if mask.contains(ChangeMask::WIDTH) {
        aux = aux.width(std::cmp::max(changes.width, 1) as u32);
    }

    if mask.contains(ChangeMask::HEIGHT) {
        aux = aux.height(std::cmp::max(changes.height, 1) as u32);
    }

    if mask.contains(ChangeMask::BORDER_WIDTH) {
        aux = aux.border_width(std::cmp::max(changes.border_width, 0) as u32);
    }

    if mask.contains(ChangeMask::SIBLING) {
        if let Some(sibling) = changes.sibling {
            aux = aux.sibling(sibling);
        }
    }

    if mask.contains(ChangeMask::STACK_MODE) {
        aux = aux.stack_mode(xproto::StackMode::from(changes.stack_mode));
    }

    aux
}

pub fn configure_request(event: &xproto::ConfigureRequestEvent) -> Event {
    Event::ConfigureRequest {
        window: event.window,
        changes: WindowChanges {
            x: event.x as i32,
            y: event.y as i32,
            width: event.width as i32,
            height: event.height as i32,
            border_width: event.border_width as i32,
            sibling: sibling(event.sibling),
            stack_mode: StackMode::from(event.stack_mode),
        },
        mask: ChangeMask::from(event.value_mask),
    }
}

pub fn configure_notify(
    event: &xproto::ConfigureNotifyEvent,
    root: Window,
) -> Event {
    Event::Configure {
        window: event.window,
        geometry: Geometry::new(
            event.x as i32,
            event.y as i32,
            event.width as i32,
            event.height as i32,
            event.border_width as i32,
        ),
        above: sibling(event.above_sibling),
        override_redirect: event.override_redirect,
        on_root: event.event == root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_mask_shares_the_protocol_bit_layout() {
        let mask = xproto::ConfigWindow::X
            | xproto::ConfigWindow::HEIGHT
            | xproto::ConfigWindow::STACK_MODE;

        assert_eq!(
            ChangeMask::from(mask),
            ChangeMask::X | ChangeMask::HEIGHT | ChangeMask::STACK_MODE
        );
    }

    #[test]
    fn configure_aux_skips_unmasked_fields() {
        let changes = WindowChanges {
            x: 5,
            y: 6,
            width: 70,
            height: 80,
            ..Default::default()
        };

        let aux = configure_aux(&changes, ChangeMask::X | ChangeMask::WIDTH);

        assert_eq!(aux.x, Some(5));
        assert_eq!(aux.y, None);
        assert_eq!(aux.width, Some(70));
        assert_eq!(aux.height, None);
        assert_eq!(aux.stack_mode, None);
    }

    #[test]
    fn configure_request_keeps_the_sibling_only_when_set() {
        let mut event = xproto::ConfigureRequestEvent {
            response_type: xproto::CONFIGURE_REQUEST_EVENT,
            stack_mode: xproto::StackMode::BELOW,
            sequence: 0,
            parent: 0x1,
            window: 0x100,
            sibling: 0x200,
            x: 10,
            y: 20,
            width: 300,
            height: 200,
            border_width: 1,
            value_mask: xproto::ConfigWindow::SIBLING | xproto::ConfigWindow::STACK_MODE,
        };

        match configure_request(&event) {
            Event::ConfigureRequest {
                window,
                changes,
                mask,
            } => {
                assert_eq!(window, 0x100);
                assert_eq!(changes.sibling, Some(0x200));
                assert_eq!(changes.stack_mode, StackMode::Below);
                assert_eq!(mask, ChangeMask::RESTACK);
            },
            _ => panic!("expected a configure request"),
        }

        event.sibling = NONE;

        match configure_request(&event) {
            Event::ConfigureRequest {
                changes,
                ..
            } => assert_eq!(changes.sibling, None),
            _ => panic!("expected a configure request"),
        }
    }
}
