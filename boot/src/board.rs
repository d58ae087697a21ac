//! The loader's collaborators on the Raspberry Pi.

use pi::gpio::states::Output;
use pi::gpio::Gpio;
use pi::uart::MiniUart;
use serboot::{ByteSource, StatusIndicator};

/// Receive side of the mini UART.
pub struct Link(MiniUart);

impl Link {
    /// Configures the mini UART for 8N1 at ~115200 baud.
    pub fn new() -> Link {
        Link(MiniUart::new())
    }
}

impl ByteSource for Link {
    fn read_byte(&mut self) -> u8 {
        self.0.read_byte()
    }
}

/// A row of LEDs; bit `i` of a status pattern drives LED `i`.
pub struct StatusLeds<const N: usize> {
    leds: [Gpio<Output>; N],
}

impl<const N: usize> StatusLeds<N> {
    pub fn new(pins: [u8; N]) -> StatusLeds<N> {
        StatusLeds {
            leds: pins.map(|pin| Gpio::new(pin).into_output()),
        }
    }
}

impl<const N: usize> StatusIndicator for StatusLeds<N> {
    fn show(&mut self, bits: u8) {
        for (i, led) in self.leds.iter_mut().enumerate() {
            led.drive(bits & (1 << i) != 0);
        }
    }
}
