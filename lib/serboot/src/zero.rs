use core::fmt;

use heapless::Vec;
use log::debug;

use crate::memory::AddressSpace;

/// Number of zero sections one transfer may describe.
pub const MAX_ZERO_SECTIONS: usize = 32;

/// A range the sender wants cleared once every segment has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroSection {
    pub start: usize,
    pub size: usize,
}

impl ZeroSection {
    pub fn end(&self) -> usize {
        self.start.wrapping_add(self.size)
    }
}

/// Returned when a descriptor arrives after the registry is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFull(pub ZeroSection);

impl fmt::Display for RegistryFull {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "zero-section registry full ({} entries), dropping {:#x}..{:#x}",
            MAX_ZERO_SECTIONS,
            self.0.start,
            self.0.end()
        )
    }
}

/// Deferred zero-fill requests, kept in the order they were received.
#[derive(Debug, Default)]
pub struct ZeroSections {
    sections: Vec<ZeroSection, MAX_ZERO_SECTIONS>,
    dropped: usize,
}

impl ZeroSections {
    pub const fn new() -> ZeroSections {
        ZeroSections {
            sections: Vec::new(),
            dropped: 0,
        }
    }

    /// Appends a section. A full registry rejects the new section and keeps
    /// every section already recorded.
    pub fn record(&mut self, start: usize, size: usize) -> Result<(), RegistryFull> {
        let section = ZeroSection { start, size };
        self.sections.push(section).map_err(|section| {
            self.dropped += 1;
            RegistryFull(section)
        })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections rejected because the registry was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Recorded sections, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ZeroSection> {
        self.sections.iter()
    }

    /// Zeroes every recorded section, most recent first, and empties the
    /// registry. Returns the total number of bytes zeroed.
    pub fn apply_all<M: AddressSpace + ?Sized>(&mut self, memory: &mut M) -> usize {
        let mut zeroed: usize = 0;
        while let Some(section) = self.sections.pop() {
            debug!("zeroing {:#x}..{:#x}", section.start, section.end());
            memory.fill_zero(section.start, section.size);
            zeroed = zeroed.saturating_add(section.size);
        }
        zeroed
    }
}
