//! Firmware lifetime: request a blob by name, keep it while it is valid, release it.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};
use crate::config::LoaderConfig;
use crate::action::Action;
use crate::image::{self, Format, Program};
use crate::verify::verify;
use crate::device::Device;
use crate::sys::Driver;

/// Contents of a firmware file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Firmware {
    path: Option<PathBuf>,
    data: Vec<u8>,
}

impl Firmware {
    /// Look `name` up in the search paths of `config`; the first readable file wins.
    pub fn request(name: &str, config: &LoaderConfig) -> Result<Firmware> {
        let relative = Path::new(name);
        if name.is_empty() ||
                !relative.components().all(|component| matches!(component, Component::Normal(_))) {
            return Err(Error::Other(format!("invalid firmware name {:?}", name).into()))
        }
        Self::search(relative, &config.search_paths())
    }

    fn search(relative: &Path, dirs: &[PathBuf]) -> Result<Firmware> {
        for dir in dirs {
            let path = dir.join(relative);
            match fs::read(&path) {
                Ok(data) => {
                    log::debug!("loaded {} ({} bytes)", path.display(), data.len());
                    return Ok(Firmware { path: Some(path), data })
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound =>
                    log::trace!("{}: not found", path.display()),
                Err(error) =>
                    log::warn!("{}: {}", path.display(), error),
            }
        }
        Err(Error::NotFound)
    }

    pub fn from_bytes(data: Vec<u8>) -> Firmware {
        Firmware { path: None, data }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug)]
struct Loaded {
    firmware: Firmware,
    program: Program,
}

/// Firmware state of one NIC.
///
/// A blob is held only once it has passed both the format and the action checks, so anything
/// reachable through a loaded `RtlFw` is safe to execute.
#[derive(Debug)]
pub struct RtlFw {
    name: String,
    config: LoaderConfig,
    loaded: Option<Loaded>,
}

impl RtlFw {
    pub fn new(name: impl Into<String>, config: LoaderConfig) -> RtlFw {
        RtlFw { name: name.into(), config, loaded: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn firmware(&self) -> Option<&Firmware> {
        self.loaded.as_ref().map(|loaded| &loaded.firmware)
    }

    pub fn version(&self) -> Option<&str> {
        self.loaded.as_ref().map(|loaded| loaded.program.version.as_str())
    }

    pub fn format(&self) -> Option<Format> {
        self.loaded.as_ref().map(|loaded| loaded.program.format)
    }

    /// Actions of the held program; empty if nothing is held.
    pub fn actions(&self) -> Vec<Action> {
        match &self.loaded {
            Some(loaded) => loaded.program.actions(loaded.firmware.data()).collect(),
            None => Vec::new(),
        }
    }

    /// Load the firmware from the search paths and validate it.
    ///
    /// On failure nothing is held, even if a blob was held before.
    pub fn request(&mut self) -> Result<()> {
        self.release();
        let result = Firmware::request(&self.name, &self.config)
            .and_then(|firmware| self.install(firmware));
        self.report(result)
    }

    /// Like [`request`](Self::request), for a blob that is already in memory.
    pub fn request_from_bytes(&mut self, data: Vec<u8>) -> Result<()> {
        self.release();
        let result = self.install(Firmware::from_bytes(data));
        self.report(result)
    }

    fn install(&mut self, firmware: Firmware) -> Result<()> {
        let program = image::parse(&self.name, firmware.data())?;
        verify(program.actions(firmware.data()), program.len())?;
        self.loaded = Some(Loaded { firmware, program });
        Ok(())
    }

    fn report(&self, result: Result<()>) -> Result<()> {
        if let Err(error) = &result {
            log::warn!("Unable to load firmware {} ({})", self.name, error);
        }
        result
    }

    /// Drop the held blob. Does nothing if none is held.
    pub fn release(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            log::debug!("released {} ({} bytes)", self.name, loaded.firmware.size());
        }
    }

    /// Execute the held program on `device`.
    pub fn write_firmware<D: Driver>(&self, device: &mut Device<D>) -> Result<()> {
        let Some(loaded) = &self.loaded else {
            return Err(Error::NotLoaded)
        };
        let actions = loaded.program.actions(loaded.firmware.data()).collect::<Vec<_>>();
        log::debug!("writing {} version {:?}, {} actions",
                    self.name, loaded.program.version, actions.len());
        device.write_firmware(&actions, self.config.max_steps)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::OpCode::*;
    use crate::device::Bus;
    use crate::image::fixtures::*;
    use crate::sys::mock::MockDriver;

    const NAME: &str = "rtl_nic/rtl8168g-2.fw";

    fn actions() -> Vec<Action> {
        vec![
            Action::new(PhyWrite, 0x1f, 0x0a43),
            Action::new(PhyWrite, 0x13, 0x8011),
            Action::new(PhyWrite, 0x1f, 0x0000),
        ]
    }

    fn config(dir: &Path) -> LoaderConfig {
        LoaderConfig {
            custom_path: Some(dir.to_owned()),
            system_paths: false,
            ..Default::default()
        }
    }

    fn install(dir: &Path, name: &str, data: &[u8]) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    #[test]
    fn test_release_empty() {
        let mut rtl_fw = RtlFw::new(NAME, LoaderConfig::default());
        assert!(!rtl_fw.is_loaded());
        rtl_fw.release();
        rtl_fw.release();
        assert!(!rtl_fw.is_loaded());
    }

    #[test]
    fn test_request_release() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), NAME, &header_image("rtl8168g-2_0.0.1", &actions()));

        let mut rtl_fw = RtlFw::new(NAME, config(dir.path()));
        rtl_fw.request().unwrap();
        assert!(rtl_fw.is_loaded());
        assert_eq!(rtl_fw.version(), Some("rtl8168g-2_0.0.1"));
        assert_eq!(rtl_fw.format(), Some(Format::Header));
        assert_eq!(rtl_fw.actions(), actions());
        assert_eq!(rtl_fw.firmware().unwrap().path(), Some(dir.path().join(NAME).as_path()));

        rtl_fw.release();
        assert!(!rtl_fw.is_loaded());
        assert_eq!(rtl_fw.version(), None);
        assert!(rtl_fw.actions().is_empty());
        rtl_fw.release();
    }

    #[test]
    fn test_request_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut rtl_fw = RtlFw::new(NAME, config(dir.path()));
        assert!(matches!(rtl_fw.request(), Err(Error::NotFound)));
        assert!(!rtl_fw.is_loaded());
    }

    #[test]
    fn test_request_first_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        install(first.path(), NAME, &[1, 0, 0, 0]);
        install(second.path(), NAME, &[2, 0, 0, 0]);
        let dirs = [first.path().to_owned(), second.path().to_owned()];
        let firmware = Firmware::search(Path::new(NAME), &dirs).unwrap();
        assert_eq!(firmware.data(), [1, 0, 0, 0]);
        assert_eq!(firmware.path(), Some(first.path().join(NAME).as_path()));
    }

    #[test]
    fn test_request_falls_through() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        install(second.path(), NAME, &[2, 0, 0, 0]);
        let dirs = [first.path().to_owned(), second.path().to_owned()];
        let firmware = Firmware::search(Path::new(NAME), &dirs).unwrap();
        assert_eq!(firmware.data(), [2, 0, 0, 0]);
    }

    #[test]
    fn test_request_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(NAME)).unwrap();
        assert!(matches!(Firmware::request(NAME, &config(dir.path())), Err(Error::NotFound)));
    }

    #[test]
    fn test_request_invalid_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["", "../etc/passwd", "/etc/passwd", "rtl_nic/../../x"] {
            assert!(matches!(Firmware::request(name, &config(dir.path())), Err(Error::Other(_))),
                    "{:?} accepted", name);
        }
    }

    #[test]
    fn test_failed_request_releases() {
        let mut rtl_fw = RtlFw::new(NAME, LoaderConfig::default());
        rtl_fw.request_from_bytes(raw_image(&actions())).unwrap();
        assert!(rtl_fw.is_loaded());
        assert_eq!(rtl_fw.version(), Some(NAME));

        let mut bad = header_image("v", &actions());
        *bad.last_mut().unwrap() ^= 0xff;
        assert!(matches!(rtl_fw.request_from_bytes(bad), Err(Error::InvalidFormat(_))));
        assert!(!rtl_fw.is_loaded());
    }

    #[test]
    fn test_request_rejects_bad_actions() {
        let mut rtl_fw = RtlFw::new(NAME, LoaderConfig::default());
        let data = raw_image(&[Action::new(PhyWrite, 0, 0), Action::new(PhySkipn, 1, 0)]);
        assert!(matches!(rtl_fw.request_from_bytes(data), Err(Error::OutOfRange { index: 1, .. })));
        assert!(!rtl_fw.is_loaded());
    }

    #[test]
    fn test_write_firmware() {
        let mut rtl_fw = RtlFw::new(NAME, LoaderConfig::default());
        let mut device = Device::with_driver(MockDriver::default());
        assert!(matches!(rtl_fw.write_firmware(&mut device), Err(Error::NotLoaded)));

        rtl_fw.request_from_bytes(header_image("v", &actions())).unwrap();
        rtl_fw.write_firmware(&mut device).unwrap();
        assert_eq!(device.into_driver().writes(), [
            (Bus::Phy, 0x1f, 0x0a43),
            (Bus::Phy, 0x13, 0x8011),
            (Bus::Phy, 0x1f, 0x0000),
        ]);
    }

    #[test]
    fn test_write_firmware_step_limit() {
        let config = LoaderConfig { max_steps: 10, ..Default::default() };
        let mut rtl_fw = RtlFw::new(NAME, config);
        rtl_fw.request_from_bytes(raw_image(&[
            Action::new(PhyWrite, 0x1f, 0),
            Action::new(PhyBjmpn, 0, 0),
        ])).unwrap();
        let mut device = Device::with_driver(MockDriver::default());
        assert!(matches!(rtl_fw.write_firmware(&mut device), Err(Error::StepLimit(10))));
    }
}
