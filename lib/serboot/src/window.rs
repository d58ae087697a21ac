use crate::code::ControlCode;
use crate::word::WORD_BYTES;

/// The last four bytes received from the link.
///
/// Bytes enter at the back. Once the window is full, every push retires the
/// oldest byte and hands it back to the caller. The window is read as a
/// little-endian word with the oldest byte in the low eight bits, which is
/// the order control codes are transmitted in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Window {
    bytes: [u8; WORD_BYTES],
    head: usize,
    valid: usize,
}

impl Window {
    pub const fn new() -> Window {
        Window {
            bytes: [0; WORD_BYTES],
            head: 0,
            valid: 0,
        }
    }

    /// Number of bytes currently held.
    pub fn len(&self) -> usize {
        self.valid
    }

    pub fn is_empty(&self) -> bool {
        self.valid == 0
    }

    pub fn is_full(&self) -> bool {
        self.valid == WORD_BYTES
    }

    /// Appends `byte`. Returns the byte that left the window, if it was full.
    pub fn push(&mut self, byte: u8) -> Option<u8> {
        if self.is_full() {
            let retired = self.bytes[self.head];
            self.bytes[self.head] = byte;
            self.head = (self.head + 1) % WORD_BYTES;
            Some(retired)
        } else {
            self.bytes[(self.head + self.valid) % WORD_BYTES] = byte;
            self.valid += 1;
            None
        }
    }

    /// The window as a word, or `None` while fewer than four bytes are held.
    pub fn word(&self) -> Option<u32> {
        if !self.is_full() {
            return None;
        }

        let mut word = 0u32;
        for i in 0..WORD_BYTES {
            word |= (self.bytes[(self.head + i) % WORD_BYTES] as u32) << (8 * i);
        }
        Some(word)
    }

    /// The control code the window currently spells, if any.
    pub fn code(&self) -> Option<ControlCode> {
        self.word().and_then(ControlCode::recognize)
    }

    pub fn clear(&mut self) {
        *self = Window::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_before_retiring() {
        let mut window = Window::new();
        assert!(window.is_empty());
        assert_eq!(window.push(1), None);
        assert_eq!(window.push(2), None);
        assert_eq!(window.push(3), None);
        assert_eq!(window.word(), None);
        assert_eq!(window.push(4), None);
        assert!(window.is_full());
        assert_eq!(window.word(), Some(0x0403_0201));
    }

    #[test]
    fn retires_oldest_byte_first() {
        let mut window = Window::new();
        for byte in 1..=4 {
            window.push(byte);
        }
        assert_eq!(window.push(5), Some(1));
        assert_eq!(window.push(6), Some(2));
        assert_eq!(window.word(), Some(0x0605_0403));
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn matches_shift_register_formulation() {
        // Rolling the word right and inserting at the top must agree with
        // the ring buffer for any byte sequence.
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let mut window = Window::new();
        let mut rolling = 0u32;
        for i in 0..1024 {
            let byte: u8 = rng.gen();
            window.push(byte);
            rolling = ((byte as u32) << 24) | (rolling >> 8);
            if i >= 3 {
                assert_eq!(window.word(), Some(rolling));
            }
        }
    }

    #[test]
    fn spots_codes_only_when_aligned_in_window() {
        let mut window = Window::new();
        for &byte in &[0x73, 0x73, 0x73, 0x01] {
            window.push(byte);
        }
        assert_eq!(window.code(), None);
        window.push(0x00);
        assert_eq!(window.code(), Some(ControlCode::Start));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut window = Window::new();
        for &byte in &ControlCode::End.to_wire() {
            window.push(byte);
        }
        assert_eq!(window.code(), Some(ControlCode::End));
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.code(), None);
    }
}
