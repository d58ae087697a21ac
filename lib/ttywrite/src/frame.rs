use std::io::{self, Write};

use serboot::ControlCode;

/// Writes frames to `W`.
pub struct Encoder<W> {
    inner: W,
    written: usize,
}

impl<W: Write> Encoder<W> {
    pub fn new(inner: W) -> Encoder<W> {
        Encoder { inner, written: 0 }
    }

    /// Total bytes handed to the writer so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn word(&mut self, word: u32) -> io::Result<()> {
        self.raw(&word.to_le_bytes())
    }

    fn code(&mut self, code: ControlCode) -> io::Result<()> {
        self.raw(&code.to_wire())
    }

    /// `START`, the load address, then `data` verbatim.
    pub fn segment(&mut self, addr: u32, data: &[u8]) -> io::Result<()> {
        self.code(ControlCode::Start)?;
        self.word(addr)?;
        self.raw(data)
    }

    /// `ZERO`, the start address and the size.
    pub fn zero(&mut self, start: u32, size: u32) -> io::Result<()> {
        self.code(ControlCode::Zero)?;
        self.word(start)?;
        self.word(size)
    }

    /// `END` and the entry point. Flushes the writer.
    pub fn end(&mut self, entry: u32) -> io::Result<()> {
        self.code(ControlCode::End)?;
        self.word(entry)?;
        self.inner.flush()
    }
}

/// Finds the first place in `data` where the loader would see a control
/// code instead of payload.
///
/// Only the payload itself can produce one: a code starts with `73 73` and
/// ends with `00`, so no mix of payload tail and following code matches.
pub fn find_code(data: &[u8]) -> Option<(usize, ControlCode)> {
    data.windows(4).enumerate().find_map(|(offset, window)| {
        let word = u32::from_le_bytes([window[0], window[1], window[2], window[3]]);
        ControlCode::recognize(word).map(|code| (offset, code))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_match_wire_format() {
        let mut encoder = Encoder::new(Vec::new());
        encoder.segment(0x1000, &[0xaa, 0xbb]).unwrap();
        encoder.zero(0x4000, 16).unwrap();
        encoder.end(0x1000).unwrap();
        assert_eq!(encoder.written(), 10 + 12 + 8);
        assert_eq!(
            encoder.into_inner(),
            [
                0x73, 0x73, 0x01, 0x00, 0x00, 0x10, 0x00, 0x00, 0xaa, 0xbb,
                0x73, 0x73, 0x03, 0x00, 0x00, 0x40, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00,
                0x73, 0x73, 0x02, 0x00, 0x00, 0x10, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn finds_embedded_codes() {
        assert_eq!(find_code(&[1, 2, 3, 4, 5]), None);
        assert_eq!(find_code(&[0x73, 0x73, 0x73, 0x00]), None);
        assert_eq!(find_code(&[9, 9, 0x73, 0x73, 0x02, 0x00, 9]), Some((2, ControlCode::End)));
        assert_eq!(find_code(&[0x73, 0x73, 0x03]), None);
    }
}
