//! Measurement task spawning.
//!
//! The measurement task owns the sample buffer (up to 12 KB inline), far
//! more than the ESP-IDF main task stack.  It therefore runs on its own
//! pthread with an explicit stack size, pinned to the APP core.
//!
//! On ESP-IDF, `esp_pthread_set_cfg()` sets the core, priority, and stack
//! for the *next* `pthread_create()` from the calling thread, so the
//! config→spawn pair must not be interleaved with other thread creation.

use std::io;
use std::thread::{Builder, JoinHandle};

/// Stack for the measurement task: the sample buffer plus headroom for
/// the sort, formatting, and the I2C/RMT drivers.
pub const MEASUREMENT_STACK_KB: usize = 32;
/// FreeRTOS priority of the measurement task.
pub const MEASUREMENT_PRIORITY: u8 = 5;

/// Spawn `f` with `stack_kb` of stack.  `name` must be NUL-terminated
/// (e.g. `"meter\0"`).
#[cfg(target_os = "espidf")]
pub fn spawn_measurement_task<T: Send + 'static>(
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() -> T + Send + 'static,
) -> io::Result<JoinHandle<T>> {
    use esp_idf_svc::sys::{ESP_OK, esp_create_default_pthread_config, esp_pthread_set_cfg};

    // SAFETY: FFI config setters; `name` is 'static and NUL-terminated.
    let ret = unsafe {
        let mut cfg = esp_create_default_pthread_config();
        cfg.pin_to_core = 1;
        cfg.prio = i32::from(MEASUREMENT_PRIORITY);
        cfg.stack_size = (stack_kb * 1024) as _;
        cfg.thread_name = name.as_ptr().cast();
        esp_pthread_set_cfg(&cfg)
    };
    if ret != ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on APP core (pri={}, stack={}KB)",
        display_name,
        MEASUREMENT_PRIORITY,
        stack_kb
    );
    Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
}

/// Simulation fallback — no core pinning or priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_measurement_task<T: Send + 'static>(
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() -> T + Send + 'static,
) -> io::Result<JoinHandle<T>> {
    let display_name = name.trim_end_matches('\0');
    log::info!("Spawning '{}' (sim, stack={}KB)", display_name, stack_kb);
    Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
}
