pub mod client;
pub mod config;
pub mod constrain;
pub mod error;
pub mod focus;
pub mod hints;
pub mod hook;
pub mod lifecycle;
pub mod model;
pub mod slot;
pub mod stack;
pub mod struts;
pub mod sync;
pub mod timer;
pub mod transient;
pub mod util;

#[cfg(test)]
mod mock;
