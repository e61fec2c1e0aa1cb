//! Where firmware is looked up, and how long it may run.

use std::path::PathBuf;

/// Overrides the first search directory, like the kernel's `firmware_class.path` parameter.
pub const ENV_FIRMWARE_PATH: &str = "RTLFW_FIRMWARE_PATH";

const FIRMWARE_ROOT: &str = "/lib/firmware";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Searched before the standard directories.
    pub custom_path: Option<PathBuf>,
    /// Kernel release used for the versioned directories; `None` queries the running kernel.
    pub kernel_release: Option<String>,
    /// Number of actions the interpreter may execute before giving up.
    pub max_steps: usize,
    /// Search the standard `/lib/firmware` directories at all.
    pub system_paths: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            custom_path: None,
            kernel_release: None,
            max_steps: 1 << 20,
            system_paths: true,
        }
    }
}

impl LoaderConfig {
    pub fn from_env() -> Self {
        Self {
            custom_path: std::env::var_os(ENV_FIRMWARE_PATH)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            ..Default::default()
        }
    }

    /// Directories to search, in order.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(custom_path) = &self.custom_path {
            paths.push(custom_path.clone());
        }
        if self.system_paths {
            let release = self.kernel_release.clone().or_else(running_kernel_release);
            let root = PathBuf::from(FIRMWARE_ROOT);
            if let Some(release) = &release {
                paths.push(root.join("updates").join(release));
            }
            paths.push(root.join("updates"));
            if let Some(release) = &release {
                paths.push(root.join(release));
            }
            paths.push(root);
        }
        paths
    }
}

#[cfg(unix)]
fn running_kernel_release() -> Option<String> {
    let mut uts: libc::utsname = unsafe { core::mem::zeroed() };
    // SAFETY: `uts` is a valid, writable `utsname`.
    if unsafe { libc::uname(&mut uts) } != 0 {
        return None
    }
    // SAFETY: `uname` NUL-terminates every field it fills in.
    let release = unsafe { std::ffi::CStr::from_ptr(uts.release.as_ptr()) };
    release.to_str().ok().map(str::to_owned)
}

#[cfg(not(unix))]
fn running_kernel_release() -> Option<String> {
    None
}
