//! Run state machine
//!
//! The monitor is either stopped, running without a time base, or running
//! with one. Transitions are explicit and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::Phase;
