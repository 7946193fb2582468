#![allow(dead_code)]

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub type Result<T> = anyhow::Result<T>;

pub mod policy;
pub mod winsys;
