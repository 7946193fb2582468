//! Conversions between x11rb protocol types and the window-system types the
//! policy core works with.

pub mod event;
pub mod hints;
