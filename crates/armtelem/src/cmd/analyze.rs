use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use armtelem_proto::{Analyzer, FrameScanner};

use crate::cmd::AnalyzeArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{self, OutputFormat};

pub fn run(args: AnalyzeArgs, format: OutputFormat) -> CliResult<i32> {
    validate_threshold(args.threshold)?;

    let data = read_source(&args.input)?;
    if data.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!("no data read from {}", args.input.display()),
        ));
    }
    tracing::debug!(bytes = data.len(), "byte source drained");

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|err| {
            io_error(&format!("failed creating {}", path.display()), err)
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    let report = |err| io_error("failed writing report", err);

    output::write_report_header(&mut sink, args.threshold, format).map_err(report)?;

    let mut analyzer = Analyzer::new(args.threshold);
    let mut scanner = FrameScanner::new(&data);
    for scanned in scanner.by_ref() {
        analyzer.record_noise(scanned.noise_skipped as u64);
        let has_alert = analyzer.analyze(&scanned.frame);
        output::write_frame_report(&mut sink, &scanned.frame, args.threshold, has_alert, format)
            .map_err(report)?;
    }
    analyzer.record_noise(scanner.trailing_noise() as u64);

    let stats = analyzer.stats();
    tracing::info!(
        valid_frames = stats.valid_frames,
        alert_frames = stats.alert_frames,
        noise_bytes = stats.noise_bytes,
        "analysis complete"
    );

    output::write_summary(&mut sink, &analyzer, format).map_err(report)?;
    sink.flush().map_err(report)?;

    Ok(SUCCESS)
}

fn validate_threshold(threshold: f32) -> CliResult<()> {
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(CliError::usage(format!(
            "threshold must be a non-negative current in amperes, got {threshold}"
        )));
    }
    Ok(())
}

/// Drain the byte source: a named file, or stdin for "-". Both end up as
/// one exhausted in-memory buffer before scanning starts.
fn read_source(input: &Path) -> CliResult<Vec<u8>> {
    let mut data = Vec::new();
    if input.as_os_str() == "-" {
        io::stdin()
            .lock()
            .read_to_end(&mut data)
            .map_err(|err| io_error("failed reading stdin", err))?;
    } else {
        File::open(input)
            .map_err(|err| io_error(&format!("failed opening {}", input.display()), err))?
            .read_to_end(&mut data)
            .map_err(|err| io_error(&format!("failed reading {}", input.display()), err))?;
    }
    Ok(data)
}
