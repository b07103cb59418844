use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use g16_pipeline::{RunReport, StageTiming};
use indicatif::{ProgressBar, ProgressStyle};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

pub fn success(msg: &str) {
    if !is_json() {
        eprintln!("{}", msg.green());
    }
}

pub fn warn(msg: &str) {
    if !is_json() {
        eprintln!("{}", msg.yellow());
    }
}

pub fn info(msg: &str) {
    if !is_json() {
        eprintln!("{}", msg);
    }
}

pub fn label(key: &str, val: &str) {
    if !is_json() {
        eprintln!("{} {}", format!("{}:", key).bold(), val);
    }
}

fn millis(timing: &StageTiming) -> String {
    format!("{:.1} ms", timing.elapsed().as_secs_f64() * 1000.0)
}

/// Human summary of a verified run: backend, shape, instance and per-stage
/// timings in pipeline order.
pub fn run_report(report: &RunReport) {
    if is_json() {
        return;
    }
    label("backend", &report.backend);
    label("circuit", &report.circuit);
    label("constraints", &report.num_constraints.to_string());
    label("public inputs", &report.public_inputs.join(", "));
    label("circuit digest", &report.digest);
    for timing in &report.timings {
        eprintln!("  {:<8} {}", timing.stage.as_str().dimmed(), millis(timing));
    }
    label("total", &format!("{:.1} ms", report.total().as_secs_f64() * 1000.0));
}

pub fn json_output(value: serde_json::Value) {
    match serde_json::to_string_pretty(&value) {
        Ok(pretty) => println!("{pretty}"),
        Err(_) => println!("{value}"),
    }
}

pub fn spinner(msg: &str) -> ProgressBar {
    if is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub fn fail_with_hint(error: &str, hint: &str) -> anyhow::Error {
    anyhow::anyhow!("{}\n{} {}", error.red(), "hint:".bold(), hint)
}
