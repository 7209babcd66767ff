//! Detector adapter boundary.
//!
//! The core never talks to an inference engine directly; it consumes
//! `Vec<Detection>` produced by whatever backend is registered. Real model
//! backends plug in through [`DetectorBackend`]; [`StubBackend`] covers
//! tests and demos.

mod backend;
mod backends;
mod registry;

pub use backend::DetectorBackend;
pub use backends::{StubBackend, StubOutcome};
pub use registry::BackendRegistry;
