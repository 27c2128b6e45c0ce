//! Analog sample filtering

pub mod window;

pub use window::SampleWindow;
