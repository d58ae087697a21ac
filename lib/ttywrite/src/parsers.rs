use std::num::ParseIntError;

use serial::core::{BaudRate, CharSize, FlowControl, StopBits};

pub fn parse_width(s: &str) -> Result<CharSize, &'static str> {
    match s {
        "5" => Ok(CharSize::Bits5),
        "6" => Ok(CharSize::Bits6),
        "7" => Ok(CharSize::Bits7),
        "8" => Ok(CharSize::Bits8),
        _ => Err("width must be 5, 6, 7, or 8"),
    }
}

pub fn parse_stop_bits(s: &str) -> Result<StopBits, &'static str> {
    match s {
        "1" => Ok(StopBits::Stop1),
        "2" => Ok(StopBits::Stop2),
        _ => Err("stop bits must be '1' or '2'"),
    }
}

pub fn parse_flow_control(s: &str) -> Result<FlowControl, &'static str> {
    match s {
        "none" => Ok(FlowControl::FlowNone),
        "software" => Ok(FlowControl::FlowSoftware),
        "hardware" => Ok(FlowControl::FlowHardware),
        _ => Err("flow control must be 'none', 'software', or 'hardware'"),
    }
}

pub fn parse_baud_rate(s: &str) -> Result<BaudRate, &'static str> {
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err("baud rate must be a positive integer"),
        Ok(speed) => Ok(BaudRate::from_speed(speed)),
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal 32-bit address.
pub fn parse_address(s: &str) -> Result<u32, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    }
}
