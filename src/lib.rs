mod sys;
mod regs;
mod config;
mod action;
mod image;
mod verify;
mod device;
mod loader;
mod names;

use std::io;

#[derive(Debug)]
pub enum Error {
    NotFound,
    NotLoaded,
    InvalidFormat(&'static str),
    InvalidAction { index: usize, action: u32 },
    OutOfRange { index: usize, action: u32 },
    StepLimit(usize),
    Unsupported(&'static str),
    Io(io::Error),
    Other(Box<dyn std::error::Error + Sync + Send + 'static>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotFound =>
                write!(f, "firmware not found"),
            Self::NotLoaded =>
                write!(f, "no firmware loaded"),
            Self::InvalidFormat(reason) =>
                write!(f, "invalid firmware format: {}", reason),
            Self::InvalidAction { index, action } =>
                write!(f, "invalid action 0x{:08x} at index {}", action, index),
            Self::OutOfRange { index, action } =>
                write!(f, "action 0x{:08x} at index {} is out of range of firmware", action, index),
            Self::StepLimit(steps) =>
                write!(f, "firmware did not terminate within {} steps", steps),
            Self::Unsupported(what) =>
                write!(f, "unsupported: {}", what),
            Self::Io(io_error) =>
                write!(f, "I/O error: {}", io_error),
            Self::Other(error) =>
                write!(f, "{}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            &Self::Io(ref io_error) => Some(io_error),
            _ => None
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        match error.downcast::<Self>() {
            Ok(error) => error,
            Err(error) => Error::Io(error),
        }
    }
}

pub type Result<T> =
    core::result::Result<T, Error>;

pub use config::LoaderConfig;

pub use action::{
    OpCode,
    Action,
};

pub use image::{
    Format,
    RTL_VER_SIZE,
};

pub use sys::Driver;

pub use device::{
    Bus,
    Device,
};

pub use loader::{
    Firmware,
    RtlFw,
};

pub use names::{
    KnownFirmware,
    KNOWN_FIRMWARE,
    lookup_chip,
};

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub type MdioDevice =
    device::Device<crate::sys::imp::MdioDriverImpl>;
