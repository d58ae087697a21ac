use crate::ByteSource;

/// Number of bytes in one wire word.
pub const WORD_BYTES: usize = 4;

/// Reads the next four bytes from `source` as one little-endian word.
///
/// The first byte received ends up in the least-significant position.
pub fn next_word<S: ByteSource + ?Sized>(source: &mut S) -> u32 {
    let mut bytes = [0u8; WORD_BYTES];
    for byte in bytes.iter_mut() {
        *byte = source.read_byte();
    }
    u32::from_le_bytes(bytes)
}

/// Reads the next word and zero-extends it to a target address.
#[inline]
pub fn next_address<S: ByteSource + ?Sized>(source: &mut S) -> usize {
    next_word(source) as usize
}
