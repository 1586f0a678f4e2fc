// Shared helpers for the integration suites.
#![allow(dead_code)]

use std::sync::Once;

static INIT: Once = Once::new();

/// Route the crate's `log` output through env_logger (respects RUST_LOG).
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .filter_module("symtable", log::LevelFilter::Debug)
            .try_init();
    });
}

/// Distinct identifier-like keys: "sym_0", "sym_1", ...
pub fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("sym_{i}")).collect()
}
