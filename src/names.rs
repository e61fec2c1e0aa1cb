//! Firmware files shipped in `linux-firmware` for the r8169 family.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownFirmware {
    /// Chip and firmware revision, e.g. `8168g-2`.
    pub chip: &'static str,
    /// Name relative to the firmware search paths.
    pub name: &'static str,
}

macro_rules! known_firmware {
    ( $( $chip:literal ),+ $(,)? ) => {
        &[ $( KnownFirmware { chip: $chip, name: concat!("rtl_nic/rtl", $chip, ".fw") }, )+ ]
    };
}

pub const KNOWN_FIRMWARE: &[KnownFirmware] = known_firmware![
    "8168d-1", "8168d-2",
    "8168e-1", "8168e-2", "8168e-3",
    "8168f-1", "8168f-2",
    "8105e-1",
    "8402-1",
    "8411-1", "8411-2",
    "8106e-1", "8106e-2",
    "8168g-2", "8168g-3",
    "8168h-2",
    "8168fp-3",
    "8107e-2",
    "8125a-3", "8125b-2",
    "8126a-2", "8126a-3",
];

/// All firmware files for a chip, given as `8168g`, `RTL8168G`, or `rtl8168g-2`.
pub fn lookup_chip(chip: &str) -> Vec<&'static KnownFirmware> {
    let chip = chip.to_ascii_lowercase();
    let chip = chip.strip_prefix("rtl").unwrap_or(&chip);
    KNOWN_FIRMWARE.iter()
        .filter(|known| {
            known.chip == chip ||
                known.chip.split_once('-').is_some_and(|(family, _)| family == chip)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(KNOWN_FIRMWARE[0].name, "rtl_nic/rtl8168d-1.fw");
        assert!(KNOWN_FIRMWARE.iter().all(|known| known.name.ends_with(".fw")));
    }

    #[test]
    fn test_lookup_family() {
        let found = lookup_chip("RTL8168G");
        assert_eq!(found.iter().map(|known| known.chip).collect::<Vec<_>>(), ["8168g-2", "8168g-3"]);
    }

    #[test]
    fn test_lookup_exact() {
        let found = lookup_chip("rtl8125b-2");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "rtl_nic/rtl8125b-2.fw");
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup_chip("8139").is_empty());
        assert!(lookup_chip("8168").is_empty());
    }
}
