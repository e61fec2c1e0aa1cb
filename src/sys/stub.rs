#![allow(dead_code)]

use crate::{Error, Result};

#[derive(Debug)]
pub struct MdioDriverImpl;

impl MdioDriverImpl {
    pub fn new(_interface: &str) -> Result<MdioDriverImpl> {
        Err(Error::Unsupported("MDIO access on this platform"))
    }
}

impl super::Driver for MdioDriverImpl {
    fn phy_read(&mut self, _reg: u16) -> Result<u16> {
        Err(Error::Unsupported("MDIO access on this platform"))
    }

    fn phy_write(&mut self, _reg: u16, _value: u16) -> Result<()> {
        Err(Error::Unsupported("MDIO access on this platform"))
    }

    fn mac_mcu_read(&mut self, _reg: u16) -> Result<u16> {
        Err(Error::Unsupported("MAC MCU access on this platform"))
    }

    fn mac_mcu_write(&mut self, _reg: u16, _value: u16) -> Result<()> {
        Err(Error::Unsupported("MAC MCU access on this platform"))
    }
}
