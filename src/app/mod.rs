// TraceSweep - app/mod.rs
//
// Application layer: scan orchestration over the core finder.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod scan;
