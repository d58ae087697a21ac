//! Test doubles for the loader's collaborators.

use std::collections::{BTreeMap, VecDeque};
use std::vec::Vec;

use crate::memory::AddressSpace;
use crate::{ByteSource, ControlCode, StatusIndicator};

/// A link that replays a fixed byte stream.
pub struct MockLink {
    bytes: VecDeque<u8>,
}

impl MockLink {
    pub fn new(bytes: &[u8]) -> MockLink {
        MockLink {
            bytes: bytes.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_drained(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl ByteSource for MockLink {
    fn read_byte(&mut self) -> u8 {
        self.bytes
            .pop_front()
            .expect("loader read past the end of the stream")
    }
}

/// Builds a wire stream the way the sender would.
#[derive(Default)]
pub struct Stream {
    bytes: Vec<u8>,
}

impl Stream {
    pub fn new() -> Stream {
        Stream::default()
    }

    pub fn code(mut self, code: ControlCode) -> Stream {
        self.bytes.extend_from_slice(&code.to_wire());
        self
    }

    pub fn word(mut self, word: u32) -> Stream {
        self.bytes.extend_from_slice(&word.to_le_bytes());
        self
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Stream {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn segment(self, addr: u32, data: &[u8]) -> Stream {
        self.code(ControlCode::Start).word(addr).bytes(data)
    }

    pub fn zero(self, start: u32, size: u32) -> Stream {
        self.code(ControlCode::Zero).word(start).word(size)
    }

    pub fn end(self, entry: u32) -> Stream {
        self.code(ControlCode::End).word(entry)
    }

    pub fn link(&self) -> MockLink {
        MockLink::new(&self.bytes)
    }
}

/// A sparse byte-addressed memory that counts the stores it sees.
#[derive(Default)]
pub struct MockMemory {
    cells: BTreeMap<usize, u8>,
    byte_writes: usize,
    wide_writes: usize,
    syncs: usize,
}

impl MockMemory {
    pub fn new() -> MockMemory {
        MockMemory::default()
    }

    /// Memory with `[base, base + len)` preset to `value`.
    pub fn filled(base: usize, len: usize, value: u8) -> MockMemory {
        let mut memory = MockMemory::new();
        for addr in base..base + len {
            memory.cells.insert(addr, value);
        }
        memory
    }

    pub fn read(&self, addr: usize) -> Option<u8> {
        self.cells.get(&addr).copied()
    }

    pub fn bytes(&self, start: usize, len: usize) -> Vec<Option<u8>> {
        (start..start + len).map(|addr| self.read(addr)).collect()
    }

    pub fn all(&self, start: usize, len: usize, value: u8) -> bool {
        (start..start + len).all(|addr| self.read(addr) == Some(value))
    }

    /// Number of distinct addresses ever written or preset.
    pub fn touched(&self) -> usize {
        self.cells.len()
    }

    pub fn byte_writes(&self) -> usize {
        self.byte_writes
    }

    pub fn wide_writes(&self) -> usize {
        self.wide_writes
    }

    pub fn syncs(&self) -> usize {
        self.syncs
    }
}

impl AddressSpace for MockMemory {
    fn write_u8(&mut self, addr: usize, value: u8) {
        self.byte_writes += 1;
        self.cells.insert(addr, value);
    }

    fn write_u64(&mut self, addr: usize, value: u64) {
        assert_eq!(addr % 8, 0, "unaligned wide store at {:#x}", addr);
        self.wide_writes += 1;
        for (i, byte) in value.to_le_bytes().iter().enumerate() {
            self.cells.insert(addr + i, *byte);
        }
    }

    fn sync(&mut self) {
        self.syncs += 1;
    }
}

/// Records every pattern shown.
#[derive(Default)]
pub struct MockStatus {
    pub history: Vec<u8>,
}

impl StatusIndicator for MockStatus {
    fn show(&mut self, bits: u8) {
        self.history.push(bits);
    }
}
