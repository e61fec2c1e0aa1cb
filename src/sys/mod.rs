use std::time::Duration;
use std::thread::sleep;

use crate::Error;

/// Register access used by the firmware interpreter.
///
/// `phy_*` address the PHY through MDIO; `mac_mcu_*` address the MAC microcontroller (OCP)
/// register space. Register numbers are the 12-bit `regno` field of an action.
pub trait Driver {
    fn phy_read(&mut self, reg: u16) -> Result<u16, Error>;
    fn phy_write(&mut self, reg: u16, value: u16) -> Result<(), Error>;

    fn mac_mcu_read(&mut self, reg: u16) -> Result<u16, Error>;
    fn mac_mcu_write(&mut self, reg: u16, value: u16) -> Result<(), Error>;

    fn delay_ms(&mut self, ms: u16) {
        sleep(Duration::from_millis(ms as u64))
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
#[path = "linux.rs"]
pub mod imp;

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
#[path = "stub.rs"]
pub mod imp;

#[cfg(test)]
pub(crate) mod mock;
