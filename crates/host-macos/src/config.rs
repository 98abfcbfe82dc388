use std::path::PathBuf;

pub const IOREG_ENV: &str = "MBEDLS_IOREG";
pub const SYSTEM_PROFILER_ENV: &str = "MBEDLS_SYSTEM_PROFILER";
pub const DISKUTIL_ENV: &str = "MBEDLS_DISKUTIL";

/// Locations of the host tools queried during detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub ioreg: PathBuf,
    pub system_profiler: PathBuf,
    pub diskutil: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ioreg: PathBuf::from("ioreg"),
            system_profiler: PathBuf::from("system_profiler"),
            diskutil: PathBuf::from("diskutil"),
        }
    }
}

impl ToolConfig {
    /// Defaults, with each tool overridable through its environment variable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ioreg: env_path(IOREG_ENV).unwrap_or(defaults.ioreg),
            system_profiler: env_path(SYSTEM_PROFILER_ENV).unwrap_or(defaults.system_profiler),
            diskutil: env_path(DISKUTIL_ENV).unwrap_or(defaults.diskutil),
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
