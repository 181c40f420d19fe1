//! Logging setup for applications embedding quadedit.
//!
//! The library itself only emits through the `log` facade. These helpers
//! install `env_logger` as the backend; calling them more than once is
//! harmless.

/// Installs `env_logger`, configured from `RUST_LOG`.
///
/// Returns `false` if a logger was already installed.
pub fn init_logging() -> bool {
    let installed = env_logger::try_init().is_ok();
    if installed {
        log::debug!("quadedit logging initialized");
    }
    installed
}

/// Installs `env_logger` with an explicit filter such as `"quadedit=debug"`.
///
/// Returns `false` if a logger was already installed.
///
/// # Example
///
/// ```no_run
/// quadedit::init_logging_with_filter("quadedit=debug,quadedit_core=debug");
/// ```
pub fn init_logging_with_filter(filters: &str) -> bool {
    env_logger::Builder::new()
        .parse_filters(filters)
        .try_init()
        .is_ok()
}
