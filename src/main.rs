//! Command-line inspector for documents laid out by the linepad core.

mod report;

use clap::{Parser, Subcommand};
use linepad::{Config, Renderer, Viewport};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "linepad", about = "Inspect line layout of text documents", version)]
struct Cli {
    /// Lines per layout cache window. Overrides `LINEPAD_WINDOW_SIZE`.
    #[arg(long, global = true)]
    window_size: Option<usize>,

    /// Maximum number of populated cache windows. Overrides
    /// `LINEPAD_MAX_LOADED_WINDOWS`.
    #[arg(long, global = true)]
    max_loaded_windows: Option<usize>,

    /// Wrap width in pixels; omit to disable wrapping.
    #[arg(long, global = true)]
    width: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print line, row and cache statistics.
    Stats { file: PathBuf },
    /// Print the rows visible in a viewport.
    View {
        file: PathBuf,
        /// Scroll offset of the viewport in pixels.
        #[arg(long, default_value_t = 0.0)]
        top: f32,
        /// Viewport height in pixels.
        #[arg(long, default_value_t = 400.0)]
        height: f32,
        /// Lines rendered beyond each viewport edge.
        #[arg(long, default_value_t = 0)]
        overscan: usize,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linepad=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Environment configuration with command-line flags applied on top.
///
/// # Arguments
/// - `cli`: Parsed command line.
///
/// # Returns
/// The [`Config`] used to build the session.
fn config_for(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    if let Some(window_size) = cli.window_size {
        config.cache.window_size = window_size;
    }
    if let Some(max_loaded) = cli.max_loaded_windows {
        config.cache.maximum_loaded_windows = max_loaded;
    }
    config
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config_for(&cli);
    match cli.command {
        Commands::Stats { ref file } => {
            let mut session = report::load_session(file, &config, cli.width)?;
            println!("{}", report::stats(&mut session)?);
        }
        Commands::View {
            ref file,
            top,
            height,
            overscan,
        } => {
            let mut session = report::load_session(file, &config, cli.width)?;
            let frame = session.frame(
                &Renderer::with_overscan(overscan),
                Viewport::new(top, height),
            )?;
            tracing::debug!(visible = ?frame.visible, "rendering viewport");
            print!("{}", report::render_frame(session.buffer(), &frame)?);
        }
    }
    Ok(())
}

fn main() {
    init_tracing();
    let exit_code = run_and_report(|| run(Cli::parse()));
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run_and_report<F, E>(runner: F) -> i32
where
    F: FnOnce() -> Result<(), E>,
    E: std::fmt::Display,
{
    match runner() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("linepad error: {:#}", err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linepad::constants::{DEFAULT_WINDOW_SIZE, ENV_MAX_LOADED_WINDOWS, ENV_WINDOW_SIZE};
    use linepad::env::ScopedEnv;

    #[test]
    fn run_and_report_returns_zero_on_success() {
        let exit_code = run_and_report(|| Ok::<(), &str>(()));
        assert_eq!(exit_code, 0);
    }

    #[test]
    fn run_and_report_returns_non_zero_on_failure() {
        let exit_code = run_and_report(|| Err::<(), &str>("boom"));
        assert_eq!(exit_code, 1);
    }

    #[test]
    fn flags_override_environment() {
        let mut env = ScopedEnv::lock();
        env.set(ENV_WINDOW_SIZE, "32").remove(ENV_MAX_LOADED_WINDOWS);

        let cli = Cli::try_parse_from(["linepad", "stats", "doc.txt", "--max-loaded-windows", "2"])
            .expect("parse");
        let config = config_for(&cli);
        assert_eq!(config.cache.window_size, 32);
        assert_eq!(config.cache.maximum_loaded_windows, 2);
    }

    #[test]
    fn view_defaults() {
        let mut env = ScopedEnv::lock();
        env.remove(ENV_WINDOW_SIZE);
        let cli = Cli::try_parse_from(["linepad", "view", "doc.txt"]).expect("parse");
        assert!(cli.width.is_none());
        match cli.command {
            Commands::View { top, height, overscan, .. } => {
                assert_eq!((top, height, overscan), (0.0, 400.0, 0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bad_environment_values_fall_back_instead_of_failing_parse() {
        let mut env = ScopedEnv::lock();
        for raw in ["0", "abc"] {
            env.set(ENV_WINDOW_SIZE, raw);
            let cli = Cli::try_parse_from(["linepad", "stats", "doc.txt"]).expect("parse");
            assert!(cli.window_size.is_none());
            let config = config_for(&cli);
            assert_eq!(config.cache.window_size, DEFAULT_WINDOW_SIZE, "value {raw:?}");
            assert!(config.cache.validate().is_ok());
        }
    }
}
