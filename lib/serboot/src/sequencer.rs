use core::convert::Infallible;

use log::{debug, info, trace, warn};

use crate::code::ControlCode;
use crate::memory::AddressSpace;
use crate::segment::{receive_segment, scan_until};
use crate::word::next_address;
use crate::zero::ZeroSections;
use crate::{ByteSource, StatusIndicator, STATUS_IDLE, STATUS_RECEIVING};

/// Where the loader is in a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Scanning the link for the first `START`.
    AwaitStart,
    /// The last code seen; the frame it opens is handled next.
    Receiving(ControlCode),
    /// The image is in place and `entry` is where to go.
    Done { entry: usize },
}

/// Counters for one transfer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub segments: usize,
    pub bytes_written: usize,
    pub zero_sections: usize,
    pub bytes_zeroed: usize,
    pub dropped_zero_sections: usize,
    pub skipped_bytes: usize,
    /// Bytes between a zero-section descriptor and the next code.
    pub stray_bytes: usize,
}

/// A received image, ready to be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    pub entry: usize,
    pub stats: Stats,
}

/// The receive state machine.
///
/// `AwaitStart` → `Receiving(code)`* → `Done`. Each call to [`Loader::step`]
/// handles one transition. [`Loader::boot`] runs to `Done` and then jumps.
pub struct Loader<S, M, I> {
    source: S,
    memory: M,
    status: I,
    zero: ZeroSections,
    state: State,
    stats: Stats,
}

impl<S: ByteSource, M: AddressSpace, I: StatusIndicator> Loader<S, M, I> {
    pub fn new(source: S, memory: M, status: I) -> Loader<S, M, I> {
        Loader {
            source,
            memory,
            status,
            zero: ZeroSections::new(),
            state: State::AwaitStart,
            stats: Stats::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Handles the current state and returns the next one.
    ///
    /// Stepping a `Done` loader does nothing.
    pub fn step(&mut self) -> State {
        self.state = match self.state {
            State::AwaitStart => {
                self.status.show(STATUS_RECEIVING);
                let (code, skipped) = scan_until(&mut self.source, |c| c == ControlCode::Start);
                if skipped > 0 {
                    trace!("skipped {} bytes before {}", skipped, code);
                }
                self.stats.skipped_bytes += skipped;
                State::Receiving(code)
            }
            State::Receiving(ControlCode::Start) => {
                let start = next_address(&mut self.source);
                let (code, segment) = receive_segment(&mut self.source, &mut self.memory, start);
                debug!("segment {:#x}..{:#x} ({} bytes)", segment.start, segment.end(), segment.len);
                self.stats.segments += 1;
                self.stats.bytes_written += segment.len;
                State::Receiving(code)
            }
            State::Receiving(ControlCode::Zero) => {
                let start = next_address(&mut self.source);
                let size = next_address(&mut self.source);
                // Warnings wait for END; the receive FIFO is 8 bytes deep.
                match self.zero.record(start, size) {
                    Ok(()) => debug!("zero section {:#x}..{:#x}", start, start.wrapping_add(size)),
                    Err(e) => debug!("{}", e),
                }

                let (code, skipped) = scan_until(&mut self.source, |_| true);
                self.stats.stray_bytes += skipped;
                self.stats.skipped_bytes += skipped;
                State::Receiving(code)
            }
            State::Receiving(ControlCode::End) => {
                let entry = next_address(&mut self.source);
                self.stats.zero_sections = self.zero.len();
                self.stats.dropped_zero_sections = self.zero.dropped();
                self.stats.bytes_zeroed = self.zero.apply_all(&mut self.memory);
                self.memory.sync();
                info!(
                    "loaded {} segments ({} bytes), zeroed {} sections ({} bytes), entry {:#x}",
                    self.stats.segments,
                    self.stats.bytes_written,
                    self.stats.zero_sections,
                    self.stats.bytes_zeroed,
                    entry
                );
                if self.stats.dropped_zero_sections > 0 {
                    warn!(
                        "zero-section registry full, dropped {} sections",
                        self.stats.dropped_zero_sections
                    );
                }
                if self.stats.stray_bytes > 0 {
                    warn!("{} stray bytes after zero sections", self.stats.stray_bytes);
                }
                self.status.show(STATUS_IDLE);
                State::Done { entry }
            }
            done @ State::Done { .. } => done,
        };
        self.state
    }

    /// Runs the transfer to completion.
    ///
    /// Blocks for as long as the link withholds bytes.
    pub fn receive(mut self) -> Image {
        loop {
            if let State::Done { entry } = self.step() {
                return Image {
                    entry,
                    stats: self.stats,
                };
            }
        }
    }

    /// Receives an image and transfers control to its entry point through
    /// `jump`. Never returns.
    ///
    /// `jump` cannot produce an `Infallible`, so it has to diverge.
    pub fn boot<J: FnOnce(usize) -> Infallible>(self, jump: J) -> ! {
        let image = self.receive();
        info!("jumping to {:#x}", image.entry);
        match jump(image.entry) {}
    }
}
