use std::fmt;
use std::io::{self, Write};
use std::ops::Range;

use goblin::elf::section_header::{SHT_NOBITS, SHT_NULL, SHT_PROGBITS, SHT_STRTAB, SHT_SYMTAB};
use goblin::elf::Elf;

use crate::frame::Encoder;

/// Ways turning a file into a plan can fail.
#[derive(Debug)]
pub enum Error {
    /// The file looked like an ELF but goblin could not parse it.
    Elf(goblin::error::Error),
    /// An address, size or entry point does not fit in a 32-bit wire field.
    TooWide { what: String, value: u64 },
    /// A section's contents run past the end of the file.
    Truncated { name: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Elf(e) => write!(f, "malformed ELF: {}", e),
            Error::TooWide { what, value } => {
                write!(f, "{} {:#x} does not fit in a 32-bit field", what, value)
            }
            Error::Truncated { name } => write!(f, "section {} runs past the end of the file", name),
        }
    }
}

impl std::error::Error for Error {}

impl From<goblin::error::Error> for Error {
    fn from(e: goblin::error::Error) -> Error {
        Error::Elf(e)
    }
}

/// ELF file class, from the identification bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

/// Returns the class of `bytes` if it starts with a little-endian,
/// version 1, System V ELF identification.
pub fn elf_class(bytes: &[u8]) -> Option<Class> {
    let ident = bytes.get(..16)?;
    if ident[..4] != *b"\x7fELF" || ident[5..8] != [1, 1, 0] || ident[8..].iter().any(|&b| b != 0) {
        return None;
    }

    match ident[4] {
        1 => Some(Class::Elf32),
        2 => Some(Class::Elf64),
        _ => None,
    }
}

/// One frame to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Segment { name: String, addr: u32, data: Vec<u8> },
    Zero { name: String, start: u32, size: u32 },
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::Segment { name, addr, data } => write!(
                f,
                "Writing segment: {} at addresses {:#010x}-{:#010x}",
                name,
                addr,
                *addr as u64 + data.len() as u64
            ),
            Op::Zero { name, start, size } => write!(
                f,
                "Zeroing segment: {} at addresses {:#010x}-{:#010x}",
                name,
                start,
                *start as u64 + *size as u64
            ),
        }
    }
}

/// The section fields the planner looks at.
#[derive(Debug, Clone)]
pub struct SectionInfo {
    pub name: String,
    pub kind: u32,
    pub addr: u64,
    pub offset: u64,
    pub size: u64,
}

/// Everything that will go over the wire, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub ops: Vec<Op>,
    pub entry: u32,
    /// Sections that were neither loaded nor zeroed, as `name(0xTYPE)`.
    pub skipped: Vec<String>,
}

fn file_range(section: &SectionInfo, file_len: usize) -> Option<Range<usize>> {
    let start = usize::try_from(section.offset).ok()?;
    let end = start.checked_add(usize::try_from(section.size).ok()?)?;
    if end <= file_len {
        Some(start..end)
    } else {
        None
    }
}

fn narrow(what: impl Into<String>, value: u64) -> Result<u32, Error> {
    u32::try_from(value).map_err(|_| Error::TooWide {
        what: what.into(),
        value,
    })
}

impl Plan {
    /// Plans an ELF file, or falls back to a raw image at `raw_addr`.
    pub fn from_bytes(bytes: &[u8], raw_addr: u32) -> Result<Plan, Error> {
        match elf_class(bytes) {
            Some(class) => Plan::from_elf(bytes, class),
            None => Ok(Plan::raw(bytes, raw_addr)),
        }
    }

    /// The whole file as one segment at `addr`, entered at `addr`.
    pub fn raw(bytes: &[u8], addr: u32) -> Plan {
        Plan {
            ops: vec![Op::Segment {
                name: "binary".to_string(),
                addr,
                data: bytes.to_vec(),
            }],
            entry: addr,
            skipped: Vec::new(),
        }
    }

    pub fn from_elf(bytes: &[u8], class: Class) -> Result<Plan, Error> {
        let elf = Elf::parse(bytes)?;
        let sections: Vec<SectionInfo> = elf
            .section_headers
            .iter()
            .map(|sh| SectionInfo {
                name: elf.shdr_strtab.get_at(sh.sh_name).unwrap_or("").to_string(),
                kind: sh.sh_type,
                addr: sh.sh_addr,
                offset: sh.sh_offset,
                size: sh.sh_size,
            })
            .collect();

        let mut plan = Plan::from_sections(&sections, bytes, class)?;
        plan.entry = narrow("entry point", elf.header.e_entry)?;
        Ok(plan)
    }

    /// Loads `PROGBITS` sections other than comments and debug info, zeroes
    /// `NOBITS` sections, and reports everything but the null section and
    /// the symbol and string tables as skipped. ELF32 payloads are padded
    /// to a multiple of four bytes. The entry point is left at zero.
    pub fn from_sections(sections: &[SectionInfo], bytes: &[u8], class: Class) -> Result<Plan, Error> {
        let mut ops = Vec::new();
        let mut skipped = Vec::new();

        for section in sections {
            let name = &section.name;
            match section.kind {
                SHT_PROGBITS if !name.contains(".comment") && !name.contains(".debug") => {
                    let addr = narrow(format!("{} address", name), section.addr)?;
                    let range = file_range(section, bytes.len())
                        .ok_or_else(|| Error::Truncated { name: name.clone() })?;

                    let mut data = bytes[range].to_vec();
                    narrow(format!("{} size", name), data.len() as u64)?;
                    if class == Class::Elf32 {
                        data.resize((data.len() + 3) / 4 * 4, 0);
                    }
                    ops.push(Op::Segment { name: name.clone(), addr, data });
                }
                SHT_NOBITS => ops.push(Op::Zero {
                    name: name.clone(),
                    start: narrow(format!("{} address", name), section.addr)?,
                    size: narrow(format!("{} size", name), section.size)?,
                }),
                SHT_NULL | SHT_SYMTAB | SHT_STRTAB => {}
                kind => skipped.push(format!("{}({:#X})", name, kind)),
            }
        }

        Ok(Plan { ops, entry: 0, skipped })
    }

    /// Sends every frame followed by `END`, calling `progress` before each
    /// frame.
    pub fn transmit<W, F>(&self, encoder: &mut Encoder<W>, mut progress: F) -> io::Result<()>
    where
        W: Write,
        F: FnMut(&Op),
    {
        for op in &self.ops {
            progress(op);
            match op {
                Op::Segment { addr, data, .. } => encoder.segment(*addr, data)?,
                Op::Zero { start, size, .. } => encoder.zero(*start, *size)?,
            }
        }
        encoder.end(self.entry)
    }

    /// Number of bytes `transmit` will write.
    pub fn wire_len(&self) -> usize {
        let frames: usize = self
            .ops
            .iter()
            .map(|op| match op {
                Op::Segment { data, .. } => 8 + data.len(),
                Op::Zero { .. } => 12,
            })
            .sum();
        frames + 8
    }
}
