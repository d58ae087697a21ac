#![no_std]

pub mod asm;

pub use asm::*;

/// Returns the core currently executing.
pub fn affinity() -> usize {
    let mpidr: u64;
    unsafe {
        core::arch::asm!("mrs {0}, mpidr_el1", out(reg) mpidr, options(nomem, nostack, preserves_flags));
    }
    (mpidr & 0xff) as usize
}

/// Branches to the address `addr` unconditionally.
///
/// # Safety
///
/// `addr` must hold code for the current exception level. Nothing after the
/// call runs; the caller's stack and state are abandoned.
pub unsafe fn jump_to(addr: usize) -> ! {
    core::arch::asm!(
        "br {dest}",
        dest = in(reg) addr,
        options(noreturn)
    )
}
