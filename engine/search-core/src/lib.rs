//! Core traits and types for implicit-graph path search
//!
//! This crate provides the abstractions shared by every search algorithm:
//! - `GraphGenerator`: root, successor function and goal test of an implicit graph
//! - `SearchPath`: immutable root-to-head path with the actions between states
//! - `CancellationToken`: cooperative cancellation, deadlines and raw interrupts
//! - `SearchEvent` / `EventSink`: fire-and-forget visualization notifications

pub mod cancel;
pub mod events;
pub mod generator;
pub mod path;

// Re-export main types for convenience
pub use cancel::{CancellationToken, Interruption};
pub use events::{EventSink, NodeState, RecordingSink, SearchEvent, TracingSink};
pub use generator::{GenerationError, GraphGenerator, Successor};
pub use path::{EvaluatedPath, PathError, SearchPath};
