use core::arch::asm;

/// Wait for event not to burn CPU.
#[inline(always)]
pub fn wfe() {
    unsafe { asm!("wfe", options(nomem, nostack)) };
}

/// Parks the calling core forever.
pub fn halt() -> ! {
    loop {
        wfe();
    }
}
