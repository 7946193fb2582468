pub mod connection;
pub mod event;
pub mod geometry;
pub mod hints;
pub mod window;
pub mod xdata;
