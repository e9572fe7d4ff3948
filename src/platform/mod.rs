// TraceSweep - platform/mod.rs
//
// Platform abstraction layer: real and in-memory filesystems, config
// directory resolution and config.toml loading.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
