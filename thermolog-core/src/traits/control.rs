//! Start/stop control input

/// Raw start/stop control level
///
/// Implementations report the electrical state only; debouncing and edge
/// detection live in [`crate::control::Debouncer`].
pub trait ControlInput {
    /// True while the control is held
    fn is_pressed(&mut self) -> bool;
}
