//! Host side of the serial image protocol: turns an ELF file or a raw
//! binary into frames and writes them to the loader.

pub mod frame;
pub mod image;
pub mod parsers;

pub use frame::Encoder;
pub use image::{Error, Op, Plan};
