// TraceSweep - core/mod.rs
//
// Core business logic layer: pattern expansion, exclusion rules, checks.
// Must NOT depend on: platform or app. The filesystem is reached only
// through the `fs::FileSystem` trait.

pub mod cancel;
pub mod check;
pub mod export;
pub mod filter;
pub mod finder;
pub mod fs;
pub mod model;
pub mod pattern;
