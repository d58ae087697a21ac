use log::trace;

use crate::code::ControlCode;
use crate::memory::AddressSpace;
use crate::window::Window;
use crate::ByteSource;

/// A segment that has been written to memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub len: usize,
}

impl Segment {
    /// One past the last byte written.
    pub fn end(&self) -> usize {
        self.start.wrapping_add(self.len)
    }
}

/// Writes data bytes from `source` into `memory` starting at `start` until
/// the sliding window spells a control code.
///
/// A byte is only written once it falls out of the window without the
/// window matching, so the code that ends the segment is never written.
/// Payloads that happen to contain a code pattern are cut short there; the
/// protocol has no escaping.
pub fn receive_segment<S, M>(source: &mut S, memory: &mut M, start: usize) -> (ControlCode, Segment)
where
    S: ByteSource + ?Sized,
    M: AddressSpace + ?Sized,
{
    let mut window = Window::new();
    let mut cursor = start;

    loop {
        if let Some(code) = window.code() {
            let segment = Segment {
                start,
                len: cursor.wrapping_sub(start),
            };
            return (code, segment);
        }

        if let Some(byte) = window.push(source.read_byte()) {
            memory.write_u8(cursor, byte);
            cursor = cursor.wrapping_add(1);
        }
    }
}

/// Discards bytes from `source` until the sliding window spells a control
/// code that `accept` takes.
///
/// Returns the code and how many bytes were thrown away before it.
pub fn scan_until<S, F>(source: &mut S, accept: F) -> (ControlCode, usize)
where
    S: ByteSource + ?Sized,
    F: Fn(ControlCode) -> bool,
{
    let mut window = Window::new();
    let mut skipped = 0;

    loop {
        if let Some(code) = window.code() {
            if accept(code) {
                return (code, skipped);
            }
            trace!("ignoring {} while scanning", code);
        }

        if window.push(source.read_byte()).is_some() {
            skipped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockMemory, Stream};

    #[test]
    fn writes_until_next_code() {
        let stream = Stream::new().bytes(&[0xaa, 0xbb]).code(ControlCode::End);
        let mut link = stream.link();
        let mut memory = MockMemory::new();

        let (code, segment) = receive_segment(&mut link, &mut memory, 0x1000);
        assert_eq!(code, ControlCode::End);
        assert_eq!(segment, Segment { start: 0x1000, len: 2 });
        assert_eq!(memory.bytes(0x1000, 3), vec![Some(0xaa), Some(0xbb), None]);
        assert!(link.is_drained());
    }

    #[test]
    fn empty_segment_writes_nothing() {
        let mut link = Stream::new().code(ControlCode::Start).link();
        let mut memory = MockMemory::new();

        let (code, segment) = receive_segment(&mut link, &mut memory, 0x2000);
        assert_eq!(code, ControlCode::Start);
        assert_eq!(segment.len, 0);
        assert_eq!(memory.touched(), 0);
    }

    #[test]
    fn leaves_bytes_after_the_code_unread() {
        let mut link = Stream::new()
            .bytes(&[1, 2, 3, 4, 5])
            .code(ControlCode::Zero)
            .word(0x4000)
            .link();
        let mut memory = MockMemory::new();

        let (code, segment) = receive_segment(&mut link, &mut memory, 0x10);
        assert_eq!(code, ControlCode::Zero);
        assert_eq!(segment.end(), 0x15);
        assert_eq!(link.remaining(), 4);
    }

    #[test]
    fn code_bytes_inside_data_split_the_segment() {
        // 73 73 at the tail of the data plus 01 00 spells START one
        // byte early; this is the unescaped protocol's known limitation.
        let mut link = Stream::new().bytes(&[0x11, 0x73, 0x73, 0x01, 0x00, 0x22]).link();
        let mut memory = MockMemory::new();

        let (code, segment) = receive_segment(&mut link, &mut memory, 0);
        assert_eq!(code, ControlCode::Start);
        assert_eq!(segment.len, 1);
        assert_eq!(link.remaining(), 1);
    }

    #[test]
    fn random_payloads_land_verbatim() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let len = rng.gen_range(0, 512);
            // 0x73 never appears, so no window can spell a code.
            let data: Vec<u8> = (0..len)
                .map(|_| loop {
                    let byte: u8 = rng.gen();
                    if byte != 0x73 {
                        break byte;
                    }
                })
                .collect();

            let mut link = Stream::new().bytes(&data).code(ControlCode::End).link();
            let mut memory = MockMemory::new();
            let (code, segment) = receive_segment(&mut link, &mut memory, 0x8_0000);

            assert_eq!(code, ControlCode::End);
            assert_eq!(segment.len, data.len());
            let written: Vec<Option<u8>> = data.iter().map(|&b| Some(b)).collect();
            assert_eq!(memory.bytes(0x8_0000, data.len()), written);
            assert_eq!(memory.touched(), data.len());
        }
    }

    #[test]
    fn scan_skips_noise_and_unwanted_codes() {
        let mut link = Stream::new()
            .bytes(&[0x00, 0xff, 0x73])
            .code(ControlCode::End)
            .bytes(&[0x73])
            .code(ControlCode::Start)
            .link();

        let (code, skipped) = scan_until(&mut link, |c| c == ControlCode::Start);
        assert_eq!(code, ControlCode::Start);
        assert_eq!(skipped, 8);
        assert!(link.is_drained());
    }

    #[test]
    fn scan_accepts_immediately_aligned_code() {
        let mut link = Stream::new().code(ControlCode::Zero).word(7).link();
        let (code, skipped) = scan_until(&mut link, |_| true);
        assert_eq!(code, ControlCode::Zero);
        assert_eq!(skipped, 0);
        assert_eq!(link.remaining(), 4);
    }
}
