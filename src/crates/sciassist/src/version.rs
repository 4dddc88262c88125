// Version constants for the sciassist crate

/// Version string for the sciassist crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// `name version` line used by the CLI and the notebook version report
pub fn version_line() -> String {
    format!("{} {}", PKG_NAME, VERSION)
}
