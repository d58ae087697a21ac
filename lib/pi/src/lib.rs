#![no_std]

pub mod common;
pub mod gpio;
pub mod uart;
