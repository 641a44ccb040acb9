use std::io::{self, IsTerminal, Write};

use armtelem_proto::{axis_in_alert, Analyzer, Frame, Statistics};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct AxisReport {
    axis: usize,
    position_deg: f32,
    velocity_deg_s: f32,
    current_a: f32,
    alert: bool,
}

#[derive(Serialize)]
struct FrameReport {
    record: &'static str,
    sequence: u8,
    has_alert: bool,
    axes: Vec<AxisReport>,
}

#[derive(Serialize)]
struct SummaryReport {
    record: &'static str,
    threshold_amperes: f32,
    bytes_total: u64,
    noise_bytes: u64,
    valid_frames: u64,
    alert_frames: u64,
    sequence_min: Option<u8>,
    sequence_max: Option<u8>,
    estimated_lost_frames: u64,
}

fn axis_reports(frame: &Frame, threshold: f32) -> Vec<AxisReport> {
    frame
        .axes
        .iter()
        .enumerate()
        .map(|(i, axis)| AxisReport {
            axis: i + 1,
            position_deg: axis.position_degrees(),
            velocity_deg_s: axis.velocity_degrees_per_second(),
            current_a: axis.current_amperes(),
            alert: axis_in_alert(axis, threshold),
        })
        .collect()
}

/// One-time report preamble; only the human-readable format carries one.
pub fn write_report_header(
    w: &mut dyn Write,
    threshold: f32,
    format: OutputFormat,
) -> io::Result<()> {
    if let OutputFormat::Pretty = format {
        writeln!(w, "telemetry analysis - alert threshold: {threshold} A")?;
        writeln!(w, "========================================")?;
        writeln!(w)?;
    }
    Ok(())
}

/// One report entry per decoded frame: axis-by-axis physical values with
/// alert markers.
pub fn write_frame_report(
    w: &mut dyn Write,
    frame: &Frame,
    threshold: f32,
    has_alert: bool,
    format: OutputFormat,
) -> io::Result<()> {
    let axes = axis_reports(frame, threshold);
    match format {
        OutputFormat::Json => {
            let report = FrameReport {
                record: "frame",
                sequence: frame.sequence,
                has_alert,
                axes,
            };
            let line = serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string());
            writeln!(w, "{line}")
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["AXIS", "POSITION (deg)", "VELOCITY (deg/s)", "CURRENT (A)", "ALERT"]);
            for axis in &axes {
                table.add_row(vec![
                    axis.axis.to_string(),
                    format!("{:.2}", axis.position_deg),
                    format!("{:.1}", axis.velocity_deg_s),
                    format!("{:.3}", axis.current_a),
                    if axis.alert { "!".to_string() } else { String::new() },
                ]);
            }
            writeln!(w, "frame {:03}", frame.sequence)?;
            writeln!(w, "{table}")
        }
        OutputFormat::Pretty => {
            writeln!(w, "frame {:03}", frame.sequence)?;
            for axis in &axes {
                writeln!(
                    w,
                    "  axis {}: {:>8.2} deg | {:>7.1} deg/s | {:>6.3} A{}",
                    axis.axis,
                    axis.position_deg,
                    axis.velocity_deg_s,
                    axis.current_a,
                    if axis.alert { "  [ALERT]" } else { "" },
                )?;
            }
            writeln!(w)
        }
    }
}

/// Final counters for the whole pass.
pub fn write_summary(
    w: &mut dyn Write,
    analyzer: &Analyzer,
    format: OutputFormat,
) -> io::Result<()> {
    let stats = analyzer.stats();
    let observed_sequences = stats.valid_frames > 0;
    match format {
        OutputFormat::Json => {
            let report = SummaryReport {
                record: "summary",
                threshold_amperes: analyzer.threshold_amperes(),
                bytes_total: stats.bytes_total,
                noise_bytes: stats.noise_bytes,
                valid_frames: stats.valid_frames,
                alert_frames: stats.alert_frames,
                sequence_min: observed_sequences.then_some(stats.sequence_min),
                sequence_max: observed_sequences.then_some(stats.sequence_max),
                estimated_lost_frames: analyzer.estimated_lost_frames(),
            };
            let line = serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string());
            writeln!(w, "{line}")
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COUNTER", "VALUE"]);
            for (name, value) in summary_rows(&stats, analyzer.estimated_lost_frames()) {
                table.add_row(vec![name.to_string(), value]);
            }
            writeln!(w, "{table}")
        }
        OutputFormat::Pretty => {
            writeln!(w, "========================================")?;
            writeln!(w, "STATISTICS")?;
            writeln!(w, "========================================")?;
            for (name, value) in summary_rows(&stats, analyzer.estimated_lost_frames()) {
                writeln!(w, "{name:<20}: {value}")?;
            }
            writeln!(w, "========================================")
        }
    }
}

fn summary_rows(stats: &Statistics, lost: u64) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("bytes read", stats.bytes_total.to_string()),
        ("noise bytes", stats.noise_bytes.to_string()),
        ("valid frames", stats.valid_frames.to_string()),
        ("alert frames", stats.alert_frames.to_string()),
    ];
    if stats.valid_frames > 0 {
        rows.push(("sequence min", stats.sequence_min.to_string()));
        rows.push(("sequence max", stats.sequence_max.to_string()));
        rows.push(("est. lost frames", lost.to_string()));
    }
    rows
}
