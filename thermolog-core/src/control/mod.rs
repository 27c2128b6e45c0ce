//! Start/stop control handling

pub mod debounce;

pub use debounce::{Debouncer, Edge};
