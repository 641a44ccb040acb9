use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use armtelem_sim::{Simulator, SimulatorConfig};

use crate::cmd::SimulateArgs;
use crate::exit::{io_error, CliError, CliResult, SUCCESS};

pub fn run(args: SimulateArgs) -> CliResult<i32> {
    validate(&args)?;

    let config = SimulatorConfig {
        rate_hz: args.rate,
        noise_probability: args.noise_probability,
        alert_probability: args.alert_probability,
        seed: args.seed,
    };
    let mut sim = Simulator::new(&config);

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|err| {
            io_error(&format!("failed creating {}", path.display()), err)
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let period = sim.tick_period();
    let mut produced = 0u64;

    while running.load(Ordering::SeqCst) && (args.count == 0 || produced < args.count) {
        let tick_start = Instant::now();

        if let Some(burst) = sim.noise_burst() {
            if !write_all(sink.as_mut(), &burst)? {
                break;
            }
        }

        let frame = sim.next_frame();
        if !write_all(sink.as_mut(), &frame.to_bytes())? {
            break;
        }
        match sink.flush() {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::BrokenPipe => break,
            Err(err) => return Err(io_error("failed flushing frame stream", err)),
        }
        produced += 1;

        if args.realtime {
            std::thread::sleep(period.saturating_sub(tick_start.elapsed()));
        }
    }

    tracing::debug!(frames = produced, "simulation finished");
    Ok(SUCCESS)
}

/// Write the whole buffer; a closed downstream pipe ends the run cleanly
/// rather than failing it.
fn write_all(sink: &mut dyn Write, bytes: &[u8]) -> CliResult<bool> {
    match sink.write_all(bytes) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(false),
        Err(err) => Err(io_error("failed writing frame stream", err)),
    }
}

fn validate(args: &SimulateArgs) -> CliResult<()> {
    if !(args.rate.is_finite() && args.rate > 0.0) {
        return Err(CliError::usage(format!(
            "rate must be a positive frequency in Hz, got {}",
            args.rate
        )));
    }
    for (name, value) in [
        ("noise-probability", args.noise_probability),
        ("alert-probability", args.alert_probability),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(CliError::usage(format!(
                "{name} must lie in [0.0, 1.0], got {value}"
            )));
        }
    }
    Ok(())
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> SimulateArgs {
        SimulateArgs {
            count: 1,
            rate: 100.0,
            noise_probability: 0.05,
            alert_probability: 0.02,
            realtime: false,
            seed: None,
            output: None,
        }
    }

    #[test]
    fn accepts_sane_defaults() {
        assert!(validate(&base_args()).is_ok());
    }

    #[test]
    fn rejects_non_positive_rate() {
        for rate in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let args = SimulateArgs {
                rate,
                ..base_args()
            };
            let err = validate(&args).unwrap_err();
            assert_eq!(err.code, crate::exit::USAGE, "rate {rate}");
        }
    }

    #[test]
    fn rejects_out_of_range_probabilities() {
        let args = SimulateArgs {
            noise_probability: 1.5,
            ..base_args()
        };
        assert_eq!(validate(&args).unwrap_err().code, crate::exit::USAGE);

        let args = SimulateArgs {
            alert_probability: -0.1,
            ..base_args()
        };
        assert_eq!(validate(&args).unwrap_err().code, crate::exit::USAGE);
    }

    #[test]
    fn probability_bounds_are_inclusive() {
        let args = SimulateArgs {
            noise_probability: 0.0,
            alert_probability: 1.0,
            ..base_args()
        };
        assert!(validate(&args).is_ok());
    }
}
