use std::env;
use std::process::ExitCode;

use bouncebox::prelude::*;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

fn print_usage(program: &str) {
    eprintln!("Usage: {} [scene.json] [--headless] [--realtime]", program);
    eprintln!();
    eprintln!("  scene.json   scene configuration; omitted fields use defaults");
    eprintln!("  --headless   simulate without a window and log each bounce");
    eprintln!("  --realtime   with --headless, pace ticks at the configured tick rate");
}

#[derive(Debug, PartialEq)]
struct Args {
    config_path: Option<String>,
    headless: bool,
    realtime: bool,
}

/// Parse the arguments after the program name. `Ok(None)` means help was asked for.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Args>, String> {
    let mut parsed = Args {
        config_path: None,
        headless: false,
        realtime: false,
    };

    for arg in args {
        match arg.as_str() {
            "--headless" => parsed.headless = true,
            "--realtime" => parsed.realtime = true,
            "-h" | "--help" => return Ok(None),
            flag if flag.starts_with('-') => return Err(format!("unknown option `{}`", flag)),
            path if parsed.config_path.is_none() => parsed.config_path = Some(path.to_string()),
            extra => return Err(format!("unexpected argument `{}`", extra)),
        }
    }

    if parsed.realtime && !parsed.headless {
        return Err("`--realtime` only applies with `--headless`".into());
    }
    Ok(Some(parsed))
}

/// Log filter from `RUST_LOG`-style directives, `info` when none are given.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn run_headless(config: &SceneConfig, realtime: bool) -> Result<(), SimulationError> {
    let mut sim = Simulation::new(config)?;
    let mut limiter = RateLimiter::new(config.tick_rate);

    tracing::info!(
        position = ?sim.ball().position,
        velocity = ?sim.ball().velocity,
        duration = ?config.duration,
        "headless run started"
    );

    let summary = sim.run_headless(|sim, report| {
        for wall in report.reflections.iter() {
            tracing::info!(
                tick = report.tick,
                t = report.elapsed,
                wall = wall.name(),
                position = ?sim.ball().position,
                "bounce"
            );
        }
        if realtime {
            limiter.wait_next();
        }
    })?;

    tracing::info!(
        ticks = summary.ticks,
        elapsed = summary.elapsed,
        bounces = summary.bounces,
        position = ?summary.final_position,
        velocity = ?summary.final_velocity,
        "headless run finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let directives = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .init();

    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "bouncebox".into());
    let args = match parse_args(argv) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage(&program);
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            print_usage(&program);
            tracing::error!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config_path {
        Some(path) => match SceneConfig::load(path) {
            Ok(config) => {
                tracing::info!(path = %path, "loaded scene");
                config
            }
            Err(e) => {
                tracing::error!(path = %path, "{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SceneConfig::default(),
    };

    let result = if args.headless {
        run_headless(&config, args.realtime)
    } else {
        bouncebox::run(config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, String> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_scene_and_flags() {
        let args = parse(&["scene.json", "--headless", "--realtime"]).unwrap().unwrap();
        assert_eq!(
            args,
            Args {
                config_path: Some("scene.json".into()),
                headless: true,
                realtime: true,
            }
        );
    }

    #[test]
    fn test_realtime_needs_headless() {
        assert!(parse(&["--realtime"]).is_err());
        assert!(parse(&["--realtime", "--headless"]).is_ok());
    }

    #[test]
    fn test_parse_rejects_unknown_and_extra() {
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert_eq!(parse(&["--help"]), Ok(None));
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter("").max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_honours_directives() {
        assert_eq!(log_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter("bouncebox=trace").max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
