//! Monitor configuration compiled from monitor.toml
//!
//! Edit monitor.toml and rebuild to customize.

#[allow(unused_imports)]
use thermolog_core::config::{MonitorConfig, ReportSync, TemperatureRange};
#[allow(unused_imports)]
use thermolog_protocol::{FixedLayout, Framing};

include!(concat!(env!("OUT_DIR"), "/monitor_config.rs"));
