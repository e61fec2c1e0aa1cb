use std::io;
use libc::{c_int, c_void};

use crate::{Error, Result};
use crate::regs::mii::{self, MiiIfreq};

#[derive(Debug)]
struct Fd(c_int);

impl Fd {
    fn socket() -> io::Result<Fd> {
        unsafe {
            let fd = libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0);
            if fd == -1 {
                Err(io::Error::last_os_error())
            } else {
                Ok(Fd(fd))
            }
        }
    }

    fn ioctl(&self, request: u32, ifr: &mut MiiIfreq) -> io::Result<()> {
        unsafe {
            if libc::ioctl(self.0, request as _, ifr as *mut MiiIfreq as *mut c_void) == -1 {
                Err(io::Error::last_os_error())
            } else {
                Ok(())
            }
        }
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        unsafe {
            if libc::close(self.0) == -1 {
                panic!("error closing fd: {}", io::Error::last_os_error())
            }
        }
    }
}

/// PHY access through the MII ioctls of a network interface.
///
/// The MAC MCU lives behind the NIC's OCP window, which the kernel does not expose to user space.
#[derive(Debug)]
pub struct MdioDriverImpl {
    fd: Fd,
    ifr: MiiIfreq,
}

impl MdioDriverImpl {
    pub fn new(interface: &str) -> Result<MdioDriverImpl> {
        let mut ifr = MiiIfreq::new(interface)
            .ok_or_else(|| Error::Other(format!("invalid interface name {:?}", interface).into()))?;
        let fd = Fd::socket()?;
        fd.ioctl(mii::SIOCGMIIPHY, &mut ifr).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => Error::NotFound,
            _ => Error::Io(error),
        })?;
        log::debug!("{}: PHY at address {}", interface, ifr.data.phy_id);
        Ok(MdioDriverImpl { fd, ifr })
    }

    fn check_reg(reg: u16) -> Result<()> {
        if reg > mii::MAX_PHY_REG {
            return Err(Error::Unsupported("PHY register outside of clause 22 range"))
        }
        Ok(())
    }
}

impl super::Driver for MdioDriverImpl {
    fn phy_read(&mut self, reg: u16) -> Result<u16> {
        Self::check_reg(reg)?;
        self.ifr.data.reg_num = reg;
        self.fd.ioctl(mii::SIOCGMIIREG, &mut self.ifr)?;
        Ok(self.ifr.data.val_out)
    }

    fn phy_write(&mut self, reg: u16, value: u16) -> Result<()> {
        Self::check_reg(reg)?;
        self.ifr.data.reg_num = reg;
        self.ifr.data.val_in = value;
        Ok(self.fd.ioctl(mii::SIOCSMIIREG, &mut self.ifr)?)
    }

    fn mac_mcu_read(&mut self, _reg: u16) -> Result<u16> {
        Err(Error::Unsupported("MAC MCU access from user space"))
    }

    fn mac_mcu_write(&mut self, _reg: u16, _value: u16) -> Result<()> {
        Err(Error::Unsupported("MAC MCU access from user space"))
    }
}
