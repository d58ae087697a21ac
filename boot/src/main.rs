#![no_std]
#![no_main]

mod board;
mod init;
mod logger;

use log::info;
use serboot::{Loader, PhysicalMemory};

use board::{Link, StatusLeds};

/// Start address of the bootloader. Images must stay below it; the loader's
/// stack grows down from here.
const BOOTLOADER_START_ADDR: usize = 0x4000000;

/// GPIO pins of the status LEDs, least significant status bit first.
const STATUS_LED_PINS: [u8; 1] = [16];

fn bootloader() -> ! {
    unsafe {
        logger::init_logger();
    }
    info!("serboot: waiting for image (loader at {:#x})", BOOTLOADER_START_ADDR);

    let link = Link::new();
    let leds = StatusLeds::new(STATUS_LED_PINS);
    let memory = unsafe { PhysicalMemory::new() };

    Loader::new(link, memory, leds).boot(|entry| {
        log::logger().flush();
        unsafe { aarch64::jump_to(entry) }
    })
}
