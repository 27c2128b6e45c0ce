//! Build script for thermolog-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates monitor.toml and compiles it into a `MonitorConfig` constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Monitor settings extracted from monitor.toml
struct Settings {
    sample_period_ms: i64,
    report_period_ms: i64,
    heartbeat_period_ms: i64,
    debounce_ms: i64,
    min_x10: i64,
    max_x10: i64,
    framing: &'static str,
    sync: &'static str,
    sample_while_unsynced: bool,
    start_running: bool,
    window_len: i64,
}

/// Validate monitor.toml and write `monitor_config.rs` into OUT_DIR
fn generate_config() {
    println!("cargo:rerun-if-changed=monitor.toml");

    let config_path = Path::new("monitor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: monitor.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a monitor.toml configuration file.        ║\n\
            ║  Please create one in the thermolog-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read monitor.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in monitor.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let settings = match read_settings(&config) {
        Ok(settings) => settings,
        Err(errors) => report_errors(&errors),
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("monitor_config.rs"), render(&settings)).unwrap();

    println!("cargo:warning=monitor.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report_errors(errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid monitor configuration                            ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Integer field in `[section]`, checked against an inclusive range
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: (i64, i64),
    errors: &mut Vec<String>,
) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(v)) if (range.0..=range.1).contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section, key, range.0, range.1
            ));
            0
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0
        }
    }
}

fn boolean(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> bool {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Boolean(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            false
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            false
        }
    }
}

/// String field restricted to `choices`, mapped to the matching Rust expression
fn choice(
    config: &toml::Value,
    section: &str,
    key: &str,
    choices: &[(&str, &'static str)],
    errors: &mut Vec<String>,
) -> &'static str {
    let names = || {
        choices
            .iter()
            .map(|(name, _)| format!("'{}'", name))
            .collect::<Vec<_>>()
            .join(" or ")
    };

    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::String(v)) => match choices.iter().find(|(name, _)| *name == v.as_str()) {
            Some((_, expr)) => *expr,
            None => {
                errors.push(format!("[{}] {} must be {}", section, key, names()));
                ""
            }
        },
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            ""
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            ""
        }
    }
}

fn read_settings(config: &toml::Value) -> Result<Settings, Vec<String>> {
    let mut errors = Vec::new();
    let period = (1, 3_600_000);

    let mode = choice(
        config,
        "framing",
        "mode",
        &[("checksummed", "checksummed"), ("fixed", "fixed")],
        &mut errors,
    );
    let framing = if mode == "fixed" {
        choice(
            config,
            "framing",
            "lead",
            &[
                ("upload", "Framing::FixedOffset(FixedLayout::UPLOAD_PREFIX)"),
                ("skip", "Framing::FixedOffset(FixedLayout::SKIP_THREE)"),
            ],
            &mut errors,
        )
    } else {
        "Framing::Checksummed"
    };

    let settings = Settings {
        sample_period_ms: integer(config, "timing", "sample_period_ms", period, &mut errors),
        report_period_ms: integer(config, "timing", "report_period_ms", period, &mut errors),
        heartbeat_period_ms: integer(config, "timing", "heartbeat_period_ms", period, &mut errors),
        debounce_ms: integer(config, "timing", "debounce_ms", (1, 1000), &mut errors),
        min_x10: integer(config, "range", "min_x10", (0, u16::MAX as i64), &mut errors),
        max_x10: integer(config, "range", "max_x10", (0, u16::MAX as i64), &mut errors),
        framing,
        sync: choice(
            config,
            "report",
            "sync",
            &[
                ("first_frame", "ReportSync::FirstFrame"),
                ("free_running", "ReportSync::FreeRunning"),
            ],
            &mut errors,
        ),
        sample_while_unsynced: boolean(config, "report", "sample_while_unsynced", &mut errors),
        start_running: boolean(config, "report", "start_running", &mut errors),
        window_len: integer(config, "filter", "window_len", (1, 64), &mut errors),
    };

    if settings.min_x10 > settings.max_x10 {
        errors.push("[range] min_x10 must not exceed max_x10".to_string());
    }
    if settings.sample_period_ms > settings.report_period_ms {
        errors.push("[timing] sample_period_ms must not exceed report_period_ms".to_string());
    }

    if errors.is_empty() {
        Ok(settings)
    } else {
        Err(errors)
    }
}

fn render(s: &Settings) -> String {
    format!(
        "// Generated by build.rs from monitor.toml\n\
         \n\
         /// Median window length\n\
         pub const WINDOW_LEN: usize = {window_len};\n\
         \n\
         /// Monitor configuration compiled from monitor.toml\n\
         pub const MONITOR_CONFIG: MonitorConfig = MonitorConfig {{\n\
         \x20   sample_period_ms: {sample},\n\
         \x20   report_period_ms: {report},\n\
         \x20   heartbeat_period_ms: {heartbeat},\n\
         \x20   debounce_ms: {debounce},\n\
         \x20   range: TemperatureRange {{\n\
         \x20       min_x10: {min},\n\
         \x20       max_x10: {max},\n\
         \x20   }},\n\
         \x20   framing: {framing},\n\
         \x20   sync: {sync},\n\
         \x20   sample_while_unsynced: {unsynced},\n\
         \x20   start_running: {start},\n\
         }};\n",
        window_len = s.window_len,
        sample = s.sample_period_ms,
        report = s.report_period_ms,
        heartbeat = s.heartbeat_period_ms,
        debounce = s.debounce_ms,
        min = s.min_x10,
        max = s.max_x10,
        framing = s.framing,
        sync = s.sync,
        unsynced = s.sample_while_unsynced,
        start = s.start_running,
    )
}
