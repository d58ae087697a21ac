use core::arch::global_asm;
use core::mem::zeroed;
use core::ptr::{addr_of_mut, write_volatile};

mod panic;

use crate::bootloader;

global_asm!(include_str!("init/init.s"));

unsafe fn zeros_bss() {
    extern "C" {
        static mut __bss_beg: u64;
        static mut __bss_end: u64;
    }

    let mut iter: *mut u64 = addr_of_mut!(__bss_beg);
    let end: *mut u64 = addr_of_mut!(__bss_end);

    while iter < end {
        write_volatile(iter, zeroed());
        iter = iter.add(1);
    }
}

/// Loader entrypoint for core 0, called from `_start` with the stack set up.
#[no_mangle]
pub unsafe extern "C" fn kinit() -> ! {
    if aarch64::affinity() != 0 {
        aarch64::halt();
    }
    zeros_bss();
    bootloader();
}
