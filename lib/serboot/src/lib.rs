#![cfg_attr(not(test), no_std)]

//! Receiver side of the serial image protocol.
//!
//! A sender streams framed segments, zero-section descriptors and an entry
//! point over a byte link. The [`Loader`] writes each segment straight into
//! the target address space, zero-fills the recorded sections once every
//! segment has landed, and hands control to the entry point.
//!
//! The crate has no heap and no allocator. Everything it touches outside of
//! its own state goes through three collaborator traits: [`ByteSource`],
//! [`StatusIndicator`] and [`AddressSpace`].

pub mod code;
pub mod memory;
pub mod segment;
pub mod sequencer;
pub mod window;
pub mod word;
pub mod zero;

#[cfg(test)]
mod mock;

pub use code::ControlCode;
pub use memory::{AddressSpace, PhysicalMemory};
pub use segment::Segment;
pub use sequencer::{Image, Loader, State, Stats};
pub use window::Window;
pub use zero::{RegistryFull, ZeroSection, ZeroSections, MAX_ZERO_SECTIONS};

/// Status pattern shown while an image is being received.
pub const STATUS_RECEIVING: u8 = 0b1;

/// Status pattern shown right before control leaves the loader.
pub const STATUS_IDLE: u8 = 0b0;

/// A blocking source of bytes from the link.
///
/// The link is trusted: every call eventually returns the next byte the
/// sender transmitted. There is no timeout and no error path.
pub trait ByteSource {
    /// Blocks until a byte is available and returns it.
    fn read_byte(&mut self) -> u8;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_byte(&mut self) -> u8 {
        (**self).read_byte()
    }
}

/// A side channel showing whether a transfer is in progress.
pub trait StatusIndicator {
    /// Displays the bit pattern `bits`.
    fn show(&mut self, bits: u8);
}

impl<T: StatusIndicator + ?Sized> StatusIndicator for &mut T {
    fn show(&mut self, bits: u8) {
        (**self).show(bits)
    }
}
