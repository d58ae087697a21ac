//! The only path from the loader to raw memory.
//!
//! Every store the loader performs goes through [`AddressSpace`]. On
//! hardware that is [`PhysicalMemory`], which issues volatile stores so the
//! compiler can neither elide nor reorder them past the final barrier;
//! host tests substitute a map-backed space.

use core::mem::size_of;
use core::ptr::write_volatile;

/// Width of the wide store used for zero-fill.
pub const WIDE_BYTES: usize = size_of::<u64>();

/// Byte-addressed target memory.
pub trait AddressSpace {
    /// Stores `value` at `addr`.
    fn write_u8(&mut self, addr: usize, value: u8);

    /// Stores `value` little-endian at `addr`. `addr` is 8-byte aligned.
    fn write_u64(&mut self, addr: usize, value: u64);

    /// Orders every previous store before whatever runs next.
    fn sync(&mut self) {}

    /// Zeroes `[start, start + size)`.
    ///
    /// Leading bytes are written singly up to the first 8-byte boundary,
    /// the bulk in 8-byte units, and the tail singly again.
    fn fill_zero(&mut self, start: usize, size: usize) {
        let mut addr = start;
        let mut left = size;

        while left > 0 && addr % WIDE_BYTES != 0 {
            self.write_u8(addr, 0);
            addr = addr.wrapping_add(1);
            left -= 1;
        }

        while left >= WIDE_BYTES {
            self.write_u64(addr, 0);
            addr = addr.wrapping_add(WIDE_BYTES);
            left -= WIDE_BYTES;
        }

        while left > 0 {
            self.write_u8(addr, 0);
            addr = addr.wrapping_add(1);
            left -= 1;
        }
    }
}

impl<T: AddressSpace + ?Sized> AddressSpace for &mut T {
    fn write_u8(&mut self, addr: usize, value: u8) {
        (**self).write_u8(addr, value)
    }

    fn write_u64(&mut self, addr: usize, value: u64) {
        (**self).write_u64(addr, value)
    }

    fn sync(&mut self) {
        (**self).sync()
    }

    fn fill_zero(&mut self, start: usize, size: usize) {
        (**self).fill_zero(start, size)
    }
}

/// The machine's own physical address space.
#[derive(Debug)]
pub struct PhysicalMemory {
    _private: (),
}

impl PhysicalMemory {
    /// Returns a handle that writes anywhere.
    ///
    /// # Safety
    ///
    /// The caller must ensure that no addresses the sender names overlap the
    /// loader's own code, stack or statics, and that nothing else accesses
    /// those addresses while the loader runs.
    pub const unsafe fn new() -> PhysicalMemory {
        PhysicalMemory { _private: () }
    }
}

impl AddressSpace for PhysicalMemory {
    fn write_u8(&mut self, addr: usize, value: u8) {
        unsafe { write_volatile(addr as *mut u8, value) }
    }

    fn write_u64(&mut self, addr: usize, value: u64) {
        debug_assert_eq!(addr % WIDE_BYTES, 0);
        unsafe { write_volatile(addr as *mut u64, value.to_le()) }
    }

    fn sync(&mut self) {
        barrier();
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "aarch64")] {
        /// Completes outstanding stores and flushes the pipeline so freshly
        /// written code is fetched from memory.
        #[inline(always)]
        fn barrier() {
            unsafe {
                core::arch::asm!("dsb sy", "isb", options(nostack, preserves_flags));
            }
        }
    } else {
        #[inline(always)]
        fn barrier() {
            core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
        }
    }
}
