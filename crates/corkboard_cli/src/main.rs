//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `corkboard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from any future server or UI runtime.
    println!("corkboard_core version={}", corkboard_core::core_version());
}
