//! Centralized constants for the module host.

/// Size of one WebAssembly linear memory page.
pub const WASM_PAGE_SIZE: usize = 64 * 1024;

/// Default cap on module linear memory (64MB).
///
/// The page loader grows memory by 100 pages right after
/// instantiation, so the limit leaves plenty of headroom above that.
pub const DEFAULT_RAM_LIMIT: usize = 64 * 1024 * 1024;

/// Minimum interval accepted for module timers, in milliseconds.
pub const MIN_TIMER_INTERVAL_MS: u64 = 1;

/// Number of diagnostic lines the host retains by default.
pub const DEFAULT_DIAGNOSTIC_HISTORY: usize = 256;
