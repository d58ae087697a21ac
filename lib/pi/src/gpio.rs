use core::marker::PhantomData;

use crate::common::{Reg, IO_BASE};

/// An alternative GPIO function.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

#[repr(C)]
#[allow(non_snake_case)]
struct Registers {
    FSEL: [Reg<u32>; 6],
    __r0: u32,
    SET: [Reg<u32>; 2],
    __r1: u32,
    CLR: [Reg<u32>; 2],
    __r2: u32,
    LEV: [Reg<u32>; 2],
}

const GPIO_BASE: usize = IO_BASE + 0x200000;

/// Possible states for a GPIO pin.
pub mod states {
    pub enum Uninitialized {}
    pub enum Output {}
    pub enum Alt {}
}

use self::states::*;

/// A GPIO pin in state `State`.
///
/// The `State` parameter is only used for type checking; transitions consume
/// the pin.
pub struct Gpio<State> {
    pin: u8,
    registers: &'static mut Registers,
    _state: PhantomData<State>,
}

impl<T> Gpio<T> {
    #[inline(always)]
    fn transition<S>(self) -> Gpio<S> {
        Gpio {
            pin: self.pin,
            registers: self.registers,
            _state: PhantomData,
        }
    }

    fn bank(&self) -> (usize, u32) {
        ((self.pin / 32) as usize, 1 << (self.pin % 32))
    }
}

impl Gpio<Uninitialized> {
    /// Returns a new `GPIO` structure for pin number `pin`.
    ///
    /// # Panics
    ///
    /// Panics if `pin` > `53`.
    pub fn new(pin: u8) -> Gpio<Uninitialized> {
        if pin > 53 {
            panic!("Gpio::new(): pin {} exceeds maximum of 53", pin);
        }

        Gpio {
            registers: unsafe { &mut *(GPIO_BASE as *mut Registers) },
            pin,
            _state: PhantomData,
        }
    }

    /// Enables the alternative function `function` for `self`.
    pub fn into_alt(self, function: Function) -> Gpio<Alt> {
        let reg = (self.pin / 10) as usize;
        let shift = (self.pin % 10) * 3;
        let value = self.registers.FSEL[reg].read();
        self.registers.FSEL[reg].write((value & !(0b111 << shift)) | ((function as u32) << shift));
        self.transition()
    }

    /// Sets this pin to be an output pin.
    pub fn into_output(self) -> Gpio<Output> {
        self.into_alt(Function::Output).transition()
    }
}

impl Gpio<Output> {
    /// Sets (turns on) the pin.
    pub fn set(&mut self) {
        let (bank, bit) = self.bank();
        self.registers.SET[bank].write(bit);
    }

    /// Clears (turns off) the pin.
    pub fn clear(&mut self) {
        let (bank, bit) = self.bank();
        self.registers.CLR[bank].write(bit);
    }

    /// Drives the pin high when `on`, low otherwise.
    pub fn drive(&mut self, on: bool) {
        if on {
            self.set()
        } else {
            self.clear()
        }
    }
}
