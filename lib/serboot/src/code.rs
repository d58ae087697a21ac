use core::fmt;

/// Framing control codes.
///
/// On the wire each code is one little-endian word, so `Start` is sent as
/// `73 73 01 00`. Recognition is exact equality against the whole word.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    /// Begins a segment: an address word followed by data bytes.
    Start = 0x0001_7373,
    /// Ends the transfer: one entry point word follows.
    End = 0x0002_7373,
    /// Begins a zero-section descriptor: start and size words follow.
    Zero = 0x0003_7373,
}

impl ControlCode {
    /// Returns the code `word` encodes, if any.
    pub fn recognize(word: u32) -> Option<ControlCode> {
        use ControlCode::*;
        match word {
            w if w == Start as u32 => Some(Start),
            w if w == End as u32 => Some(End),
            w if w == Zero as u32 => Some(Zero),
            _ => None,
        }
    }

    /// The 32-bit value of this code.
    #[inline]
    pub fn word(self) -> u32 {
        self as u32
    }

    /// The bytes of this code in transmission order.
    #[inline]
    pub fn to_wire(self) -> [u8; 4] {
        self.word().to_le_bytes()
    }
}

impl TryFrom<u32> for ControlCode {
    type Error = u32;

    fn try_from(word: u32) -> Result<ControlCode, u32> {
        ControlCode::recognize(word).ok_or(word)
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ControlCode::Start => "START",
            ControlCode::End => "END",
            ControlCode::Zero => "ZERO",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_each_code() {
        assert_eq!(ControlCode::recognize(0x0001_7373), Some(ControlCode::Start));
        assert_eq!(ControlCode::recognize(0x0002_7373), Some(ControlCode::End));
        assert_eq!(ControlCode::recognize(0x0003_7373), Some(ControlCode::Zero));
    }

    #[test]
    fn near_misses_are_data() {
        for word in [0, 0x7373, 0x0004_7373, 0x0001_7372, 0x0101_7373, 0x7373_0100, u32::MAX] {
            assert_eq!(ControlCode::recognize(word), None, "{:#010x}", word);
        }
    }

    #[test]
    fn wire_bytes_are_low_byte_first() {
        assert_eq!(ControlCode::Start.to_wire(), [0x73, 0x73, 0x01, 0x00]);
        assert_eq!(ControlCode::End.to_wire(), [0x73, 0x73, 0x02, 0x00]);
        assert_eq!(ControlCode::Zero.to_wire(), [0x73, 0x73, 0x03, 0x00]);
    }

    #[test]
    fn try_from_returns_the_rejected_word() {
        assert_eq!(ControlCode::try_from(0x0002_7373), Ok(ControlCode::End));
        assert_eq!(ControlCode::try_from(0xdead_beef), Err(0xdead_beef));
    }
}
