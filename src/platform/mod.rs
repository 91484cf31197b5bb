//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall clock (session seeds, frame timestamps)
//! - Touch capability (input mode selection)

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new session
pub fn session_seed() -> u64 {
    now_ms() as u64
}

/// Whether the host reports a touch screen
#[cfg(target_arch = "wasm32")]
pub fn touch_capable() -> bool {
    web_sys::window()
        .map(|w| w.navigator().max_touch_points() > 0)
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn touch_capable() -> bool {
    false
}
