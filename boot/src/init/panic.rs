use core::panic::PanicInfo;

use log::error;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    error!("---------- PANIC ----------");
    if let Some(location) = info.location() {
        error!(
            "FILE: {}\nLINE: {}\nCOL: {}\n\n{}",
            location.file(),
            location.line(),
            location.column(),
            info.message()
        );
    }
    aarch64::halt()
}
