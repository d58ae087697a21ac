use core::fmt::Write;

use log::{LevelFilter, Metadata, Record};
use pi::uart::MiniUart;
use spin::Mutex;

/// Transmit side of the link, shared by every log call.
static CONSOLE: Mutex<Option<MiniUart>> = Mutex::new(None);

struct UartLogger;
static LOGGER: UartLogger = UartLogger;

impl log::Log for UartLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut console = CONSOLE.lock();
            let uart = console.get_or_insert_with(MiniUart::new);
            let _ = writeln!(uart, "[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        if let Some(uart) = CONSOLE.lock().as_mut() {
            uart.flush();
        }
    }
}

/// Installs the UART logger.
///
/// The mini UART has an 8-byte receive FIFO and logging is synchronous, so a
/// line written mid-transfer can cost incoming image bytes. Per-frame
/// messages sit at `debug` and below and only print in a `VERBOSE_BUILD`,
/// which should be paired with a sender that paces its output.
///
/// # Safety
///
/// Must be called once, before any other core runs.
pub unsafe fn init_logger() {
    if log::set_logger_racy(&LOGGER).is_ok() {
        log::set_max_level(if option_env!("VERBOSE_BUILD").is_some() {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        });
    }
}
