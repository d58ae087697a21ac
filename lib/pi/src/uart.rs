use core::fmt;

use crate::common::{Reg, IO_BASE};
use crate::gpio::{Function, Gpio};

/// The base address for the `MU` registers.
const MU_REG_BASE: usize = IO_BASE + 0x215040;

/// The `AUXENB` register from page 9 of the BCM2837 documentation.
const AUX_ENABLES: *mut Reg<u8> = (IO_BASE + 0x215004) as *mut Reg<u8>;

/// Baud divider for ~115200 baud off the 250MHz core clock.
const BAUD_DIVIDER: u16 = 270;

/// Enum representing bit fields of the `AUX_MU_LSR_REG` register.
#[repr(u8)]
enum LsrStatus {
    DataReady = 1,
    TxAvailable = 1 << 5,
    TxIdle = 1 << 6,
}

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    IO: Reg<u8>,
    __r0: [u8; 3],
    IER: Reg<u8>,
    __r1: [u8; 3],
    IIR: Reg<u8>,
    __r2: [u8; 3],
    LCR: Reg<u8>,
    __r3: [u8; 3],
    MCR: Reg<u8>,
    __r4: [u8; 3],
    LSR: Reg<u8>,
    __r5: [u8; 3],
    MSR: Reg<u8>,
    __r6: [u8; 3],
    SCRATCH: Reg<u8>,
    __r7: [u8; 3],
    CNTL: Reg<u8>,
    __r8: [u8; 3],
    STAT: Reg<u32>,
    BAUD: Reg<u16>,
}

const _: () = assert!(core::mem::size_of::<Registers>() == 0x7E21506C - 0x7E215040);

/// The Raspberry Pi's "mini UART".
pub struct MiniUart {
    registers: &'static mut Registers,
}

impl MiniUart {
    /// Initializes the mini UART by enabling it as an auxiliary peripheral,
    /// setting the data size to 8 bits, setting the BAUD rate to ~115200 (baud
    /// divider of 270), setting GPIO pins 14 and 15 to alternative function 5
    /// (TXD1/RDXD1), and finally enabling the UART transmitter and receiver.
    ///
    /// Reads never time out.
    pub fn new() -> MiniUart {
        let registers = unsafe {
            (*AUX_ENABLES).or_mask(1);
            &mut *(MU_REG_BASE as *mut Registers)
        };
        registers.LCR.or_mask(0b11);
        registers.BAUD.write(BAUD_DIVIDER);
        Gpio::new(14).into_alt(Function::Alt5);
        Gpio::new(15).into_alt(Function::Alt5);
        registers.CNTL.or_mask(0b11);
        MiniUart { registers }
    }

    /// Write the byte `byte`. This method blocks until there is space available
    /// in the output FIFO.
    pub fn write_byte(&mut self, byte: u8) {
        while !self.registers.LSR.has_mask(LsrStatus::TxAvailable as u8) {
            core::hint::spin_loop();
        }
        self.registers.IO.write(byte);
    }

    /// Returns `true` if there is at least one byte ready to be read. If this
    /// method returns `true`, a subsequent call to `read_byte` is guaranteed to
    /// return immediately. This method does not block.
    pub fn has_byte(&self) -> bool {
        self.registers.LSR.has_mask(LsrStatus::DataReady as u8)
    }

    /// Reads a byte. Blocks indefinitely until a byte is ready to be read.
    pub fn read_byte(&mut self) -> u8 {
        while !self.has_byte() {
            core::hint::spin_loop();
        }
        self.registers.IO.read()
    }

    /// Blocks until the transmitter has shifted out every queued byte.
    pub fn flush(&mut self) {
        while !self.registers.LSR.has_mask(LsrStatus::TxIdle as u8) {
            core::hint::spin_loop();
        }
    }
}

impl fmt::Write for MiniUart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}
