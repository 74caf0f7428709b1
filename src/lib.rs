// The binary entry point is main.rs; the game core lives here so that
// integration tests and criterion benchmarks can drive it headlessly.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod logging;
pub mod store;
pub mod ui;
