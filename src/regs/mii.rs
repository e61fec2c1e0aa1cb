//! MII management interface as exposed by the Linux networking stack.

#![allow(dead_code)]

/// Get the address of the PHY in use (`struct mii_ioctl_data`).
pub const SIOCGMIIPHY: u32 = 0x8947;

/// Read a PHY register.
pub const SIOCGMIIREG: u32 = 0x8948;

/// Write a PHY register.
pub const SIOCSMIIREG: u32 = 0x8949;

/// Clause 22 MDIO register addresses are 5 bits wide.
pub const MAX_PHY_REG: u16 = 0x1f;

/// Realtek PHYs use the last clause 22 register to select the register page.
pub const ADDR_PAGE_SELECT: u16 = 0x1f;

/// Matches `IFNAMSIZ` in `<net/if.h>`.
pub const IFNAMSIZ: usize = 16;

/// Size of the `ifr_ifru` union; its largest member is `struct ifmap`.
pub const IFRU_SIZE: usize = 2 * core::mem::size_of::<libc::c_ulong>() + 8;

const MII_DATA_SIZE: usize = core::mem::size_of::<MiiIoctlData>();

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct MiiIoctlData {
    pub phy_id: u16,
    pub reg_num: u16,
    pub val_in: u16,
    pub val_out: u16,
}

/// `struct ifreq` with `ifr_data` interpreted as `struct mii_ioctl_data`, the way `mii-tool` does.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MiiIfreq {
    pub ifr_name: [u8; IFNAMSIZ],
    pub data: MiiIoctlData,
    _pad: [u8; IFRU_SIZE - MII_DATA_SIZE],
}

impl MiiIfreq {
    pub fn new(interface: &str) -> Option<MiiIfreq> {
        let bytes = interface.as_bytes();
        if bytes.is_empty() || bytes.len() >= IFNAMSIZ || bytes.contains(&0) {
            return None
        }
        let mut ifr_name = [0u8; IFNAMSIZ];
        ifr_name[..bytes.len()].copy_from_slice(bytes);
        Some(MiiIfreq {
            ifr_name,
            data: MiiIoctlData::default(),
            _pad: [0; IFRU_SIZE - MII_DATA_SIZE],
        })
    }
}
