//! Build-time resolver configuration for the browser.
//!
//! A wasm binary has no process environment at runtime, so `API_URL` is
//! captured when the crate is compiled.

use imageshare_resolve::ResolverConfig;

/// Default avatar shown when a user has no photo or it fails to load.
///
/// Inlined so it cannot fail to load itself.
pub const DEFAULT_AVATAR: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='64' height='64' viewBox='0 0 64 64'%3E%3Ccircle cx='32' cy='32' r='32' fill='%23d0d0d0'/%3E%3Ccircle cx='32' cy='25' r='11' fill='%23f5f5f5'/%3E%3Cpath d='M12 54c3-11 11-16 20-16s17 5 20 16' fill='%23f5f5f5'/%3E%3C/svg%3E";

/// Build the resolver configuration from the compile-time `API_URL`.
///
/// Falls back to the resolver's default API URL when the variable was
/// unset or invalid at build time.
#[must_use]
pub fn build_config() -> ResolverConfig {
    ResolverConfig::from_env_value(option_env!("API_URL"))
}
