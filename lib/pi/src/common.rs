use core::ptr::{read_volatile, write_volatile};

/// The address where I/O peripherals are mapped to.
pub const IO_BASE: usize = 0x3F000000;

/// A memory-mapped device register.
///
/// Every access is volatile; registers are never cached in a local.
#[repr(transparent)]
pub struct Reg<T: Copy> {
    value: T,
}

impl<T: Copy> Reg<T> {
    #[inline(always)]
    pub fn read(&self) -> T {
        unsafe { read_volatile(&self.value) }
    }

    #[inline(always)]
    pub fn write(&mut self, value: T) {
        unsafe { write_volatile(&mut self.value, value) }
    }
}

macro_rules! reg_bits {
    ($($t:ty),*) => {$(
        impl Reg<$t> {
            /// Sets the bits in `mask`.
            #[inline(always)]
            pub fn or_mask(&mut self, mask: $t) {
                let value = self.read();
                self.write(value | mask);
            }

            /// Clears the bits in `mask`.
            #[inline(always)]
            pub fn and_mask(&mut self, mask: $t) {
                let value = self.read();
                self.write(value & mask);
            }

            /// Returns `true` if every bit in `mask` is set.
            #[inline(always)]
            pub fn has_mask(&self, mask: $t) -> bool {
                self.read() & mask == mask
            }
        }
    )*};
}

reg_bits!(u8, u16, u32);
