//! Deadline-driven monitor
//!
//! Owns the analog window, the deadlines and the time base. Each call to
//! [`Monitor::poll`] handles, independently of each other:
//!
//! - the start/stop control (debounced, edge-triggered)
//! - the heartbeat indicator
//! - time base synchronization on the first reading of a run
//! - one analog sample when the sample deadline is due
//! - one report when the report deadline is due
//!
//! The report timestamp is `report deadline - time base`, so printed times
//! step by exactly one report period regardless of poll jitter.

use crate::config::{MonitorConfig, ReportSync, DEFAULT_WINDOW_LEN};
use crate::control::{Debouncer, Edge};
use crate::filter::SampleWindow;
use crate::register::{Reading, TemperatureRegister};
use crate::report::Report;
use crate::state::{Event, Phase};
use crate::traits::{AnalogError, MonitorIo, ReportSink};

use super::deadline::Deadline;

/// Sent once after power-on by [`Monitor::announce`]
pub const READY_BANNER: &str = "[System Ready] Waiting for first temperature frame";

/// Sent when the control starts a run
pub const START_LINE: &str = "-> START";

/// Sent when the control stops a run
pub const STOP_LINE: &str = "-> STOP";

/// What a single poll did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollEvents {
    /// Phase entered through the control input
    pub toggled: Option<Phase>,
    /// Time base established during this poll
    pub synced_at: Option<u32>,
    /// Result of the analog read, if one was due
    pub sampled: Option<Result<u16, AnalogError>>,
    /// Report emitted, if one was due
    pub report: Option<Report>,
    /// Heartbeat indicator toggled
    pub heartbeat: bool,
    /// A deadline fell more than one period behind and was restarted
    pub resynced: bool,
}

impl PollEvents {
    /// Check if nothing happened
    pub fn is_quiet(&self) -> bool {
        *self == Self::default()
    }
}

/// Monitor scheduler state
pub struct Monitor<'r, const N: usize = DEFAULT_WINDOW_LEN> {
    config: MonitorConfig,
    register: &'r TemperatureRegister,
    phase: Phase,
    window: SampleWindow<N>,
    control: Debouncer,
    sample: Deadline,
    report: Deadline,
    heartbeat: Deadline,
    /// Tick at which elapsed time is zero; `None` until synced
    time_base: Option<u32>,
    /// Register sequence when the run started; only newer readings sync
    baseline_seq: u16,
    sink_errors: u32,
}

impl<'r, const N: usize> Monitor<'r, N> {
    /// Create a monitor at tick `now`
    ///
    /// Starts a run immediately when `config.start_running` is set.
    pub fn new(config: MonitorConfig, register: &'r TemperatureRegister, now: u32) -> Self {
        let mut monitor = Self {
            config,
            register,
            phase: Phase::Stopped,
            window: SampleWindow::new(),
            control: Debouncer::new(config.debounce_ms),
            sample: Deadline::new(now, config.sample_period_ms),
            report: Deadline::new(now, config.report_period_ms),
            heartbeat: Deadline::new(
                now.wrapping_add(config.heartbeat_period_ms),
                config.heartbeat_period_ms,
            ),
            time_base: None,
            baseline_seq: 0,
            sink_errors: 0,
        };
        if config.start_running {
            monitor.start(now);
        }
        monitor
    }

    /// Send the power-on banner
    pub fn announce<S: ReportSink>(&mut self, sink: &mut S) {
        self.send(sink, READY_BANNER);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_base(&self) -> Option<u32> {
        self.time_base
    }

    pub fn window(&self) -> &SampleWindow<N> {
        &self.window
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Next report tick, meaningful once synced
    pub fn next_report_at(&self) -> u32 {
        self.report.at()
    }

    /// Lines the sink refused
    pub fn sink_errors(&self) -> u32 {
        self.sink_errors
    }

    /// Run everything that is due at tick `now`
    pub fn poll<IO: MonitorIo>(&mut self, now: u32, io: &mut IO) -> PollEvents {
        let mut events = PollEvents::default();

        if let Some(Edge::Pressed) = self.control.update(io.is_pressed(), now) {
            events.toggled = Some(self.toggle(now, io));
        }

        if self.heartbeat.is_due(now) {
            io.toggle();
            events.heartbeat = true;
            events.resynced |= self.heartbeat.advance(now);
        }

        if !self.phase.is_running() {
            return events;
        }

        if self.phase == Phase::Unsynced {
            if let Some(reading) = self.fresh_reading() {
                self.establish(reading.arrived_at);
                events.synced_at = self.time_base;
            }
        }

        if self.sampling_enabled() && self.sample.is_due(now) {
            let result = io.read_raw();
            // A failed conversion leaves the window as it was
            if let Ok(raw) = result {
                self.window.push(raw);
            }
            events.sampled = Some(result);
            events.resynced |= self.sample.advance(now);
        }

        if let Some(base) = self.time_base {
            if self.phase.reports_allowed() && self.report.is_due(now) {
                let report = Report {
                    elapsed_ms: self.report.at().wrapping_sub(base),
                    temperature: self.register.latest().map(|r| r.sample),
                    adc: self.window.median(),
                };
                self.send(io, &report.to_line());
                events.report = Some(report);
                events.resynced |= self.report.advance(now);
            }
        }

        events
    }

    fn toggle<S: ReportSink>(&mut self, now: u32, sink: &mut S) -> Phase {
        if self.phase.is_running() {
            self.phase = self.phase.transition(Event::Toggle);
            self.send(sink, STOP_LINE);
        } else {
            self.start(now);
            self.send(sink, START_LINE);
        }
        self.phase
    }

    /// Begin a fresh run: no time base, empty window, stale readings ignored
    fn start(&mut self, now: u32) {
        self.phase = self.phase.transition(Event::Toggle);
        self.time_base = None;
        self.window.clear();
        self.baseline_seq = self.register.sequence();
        self.sample.rearm(now);

        if self.config.sync == ReportSync::FreeRunning {
            self.establish(now);
        }
    }

    /// Fix the time base one report period after `origin`
    ///
    /// Sampling that already runs keeps its cadence; otherwise it starts at
    /// `origin`.
    fn establish(&mut self, origin: u32) {
        let base = origin.wrapping_add(self.config.report_period_ms);
        self.time_base = Some(base);
        self.report.rearm(base);
        if !self.sampling_enabled() {
            self.sample.rearm(origin);
        }
        self.phase = self.phase.transition(Event::TimeBaseEstablished);
    }

    /// Latest reading if it was published after the run started
    fn fresh_reading(&self) -> Option<Reading> {
        self.register
            .latest()
            .filter(|reading| reading.seq != self.baseline_seq)
    }

    fn sampling_enabled(&self) -> bool {
        match self.phase {
            Phase::Synced => true,
            Phase::Unsynced => self.config.sample_while_unsynced,
            Phase::Stopped => false,
        }
    }

    /// Fire-and-forget line output
    fn send<S: ReportSink>(&mut self, sink: &mut S, line: &str) {
        if sink.send_line(line).is_err() {
            self.sink_errors = self.sink_errors.wrapping_add(1);
        }
    }
}
