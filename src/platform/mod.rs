//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Wall clock
//! - Seeding
//! - Default storage (LocalStorage on web, JSON files natively)

use crate::persistence::{MemoryStore, Store};

/// Install the logger for this target
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    // Ignore repeat initialization (tests, embedding)
    let _ = env_logger::try_init();
}

/// High-resolution timestamp in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Fresh run seed from the OS RNG
pub fn random_seed() -> u64 {
    rand::random()
}

/// Store for high scores and settings on this target.
/// Falls back to memory if nothing persistent is available.
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn Store> {
    match crate::persistence::LocalStorageStore::new() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("{err}; scores will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn Store> {
    match std::env::var_os("CPU_OVERLOAD_DATA") {
        Some(dir) => Box::new(crate::persistence::FileStore::new(dir)),
        None => Box::new(crate::persistence::FileStore::new(".cpu-overload")),
    }
}

/// Store that forgets everything, for demos and tests
pub fn ephemeral_store() -> Box<dyn Store> {
    Box::new(MemoryStore::new())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
