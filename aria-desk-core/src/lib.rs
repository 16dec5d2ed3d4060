#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod alarm;
pub mod app;
pub mod input;
pub mod pages;
pub mod pagination;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{Device, Peripherals};
