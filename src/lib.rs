// THEORY:
// This file is the main entry point for the `mirror_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like a 3D scene renderer).
//
// The primary goal is to export the `GesturePipeline`, the `SceneController`
// and their associated data structures (`PipelineConfig`, `HandData`,
// `SceneSignal`, etc.) as the clean, high-level interface for the entire
// gesture engine. All the complex internal modules (`core_modules`) are
// encapsulated and hidden from the end-user, providing a clean separation of
// concerns.

pub mod controller;
pub mod core_modules;
pub mod pipeline;
