use std::collections::{HashMap, VecDeque};

use crate::{Error, Result};
use crate::device::Bus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(Bus, u16, u16),
    Write(Bus, u16, u16),
    Delay(u16),
}

/// Register file that records every access. Reads return scripted values first, then whatever
/// was last written.
#[derive(Debug, Default)]
pub struct MockDriver {
    pub regs: HashMap<(Bus, u16), u16>,
    pub scripted: VecDeque<u16>,
    pub log: Vec<Access>,
    pub fail_writes: bool,
}

impl MockDriver {
    fn read(&mut self, bus: Bus, reg: u16) -> Result<u16> {
        let value = match self.scripted.pop_front() {
            Some(value) => value,
            None => self.regs.get(&(bus, reg)).copied().unwrap_or(0),
        };
        self.log.push(Access::Read(bus, reg, value));
        Ok(value)
    }

    fn write(&mut self, bus: Bus, reg: u16, value: u16) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Unsupported("writes disabled"))
        }
        self.regs.insert((bus, reg), value);
        self.log.push(Access::Write(bus, reg, value));
        Ok(())
    }

    pub fn writes(&self) -> Vec<(Bus, u16, u16)> {
        self.log.iter().filter_map(|access| match *access {
            Access::Write(bus, reg, value) => Some((bus, reg, value)),
            _ => None
        }).collect()
    }
}

impl super::Driver for MockDriver {
    fn phy_read(&mut self, reg: u16) -> Result<u16> {
        self.read(Bus::Phy, reg)
    }

    fn phy_write(&mut self, reg: u16, value: u16) -> Result<()> {
        self.write(Bus::Phy, reg, value)
    }

    fn mac_mcu_read(&mut self, reg: u16) -> Result<u16> {
        self.read(Bus::MacMcu, reg)
    }

    fn mac_mcu_write(&mut self, reg: u16, value: u16) -> Result<()> {
        self.write(Bus::MacMcu, reg, value)
    }

    fn delay_ms(&mut self, ms: u16) {
        self.log.push(Access::Delay(ms));
    }
}
