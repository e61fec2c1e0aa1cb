//! Firmware container formats.
//!
//! Two layouts are in use. Blobs starting with a zero word carry a `FwInfo` header with a version
//! string, the location of the actions, and a checksum byte that makes all bytes of the blob sum
//! to zero. Any other blob is a bare array of actions whose version is the firmware name.

use bytemuck::{Pod, Zeroable};

use crate::{Error, Result};
use crate::action::{Action, ACTION_SIZE};

/// Size of the version buffer, including the terminating NUL.
pub const RTL_VER_SIZE: usize = 32;

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct FwInfo {
    magic: u32,                  // __le32, zero
    version: [u8; RTL_VER_SIZE],
    fw_start: u32,               // __le32, byte offset of the first action
    fw_len: u32,                 // __le32, number of actions
    chksum: u8,
}

const HEADER_SIZE: usize = core::mem::size_of::<FwInfo>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Header,
    Raw,
}

/// Where the actions of a validated blob are, and what version it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub format: Format,
    pub version: String,
    start: usize,
    len: usize,
}

impl Program {
    /// Number of actions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Decode the actions out of the blob this program was parsed from.
    pub(crate) fn actions<'a>(&self, data: &'a [u8]) -> impl Iterator<Item = Action> + 'a {
        data[self.start..self.start + self.len * ACTION_SIZE]
            .chunks_exact(ACTION_SIZE)
            .map(|word| Action::from_le_bytes([word[0], word[1], word[2], word[3]]))
    }
}

fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

fn truncate_version(version: &str) -> String {
    let mut end = version.len().min(RTL_VER_SIZE - 1);
    while !version.is_char_boundary(end) {
        end -= 1;
    }
    version[..end].to_owned()
}

/// Check the container format of `data` and locate its actions.
pub fn parse(name: &str, data: &[u8]) -> Result<Program> {
    if data.len() < ACTION_SIZE {
        return Err(Error::InvalidFormat("shorter than one action"))
    }

    let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if magic == 0 {
        if checksum(data) != 0 {
            return Err(Error::InvalidFormat("checksum mismatch"))
        }
        if data.len() < HEADER_SIZE {
            return Err(Error::InvalidFormat("truncated header"))
        }
        let info: FwInfo = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);

        let start = u32::from_le(info.fw_start) as usize;
        if start > data.len() {
            return Err(Error::InvalidFormat("actions start past the end"))
        }
        let len = u32::from_le(info.fw_len) as usize;
        if len > (data.len() - start) / ACTION_SIZE {
            return Err(Error::InvalidFormat("actions extend past the end"))
        }

        let version = info.version;
        let end = version.iter().position(|&b| b == 0)
            .unwrap_or(RTL_VER_SIZE)
            .min(RTL_VER_SIZE - 1);
        let version = String::from_utf8_lossy(&version[..end]).into_owned();
        log::debug!("{}: header format, version {:?}, {} actions at {:#x}",
                    name, version, len, start);
        Ok(Program { format: Format::Header, version, start, len })
    } else {
        if data.len() % ACTION_SIZE != 0 {
            return Err(Error::InvalidFormat("size is not a multiple of the action size"))
        }
        let len = data.len() / ACTION_SIZE;
        log::debug!("{}: raw format, {} actions", name, len);
        Ok(Program { format: Format::Raw, version: truncate_version(name), start: 0, len })
    }
}
