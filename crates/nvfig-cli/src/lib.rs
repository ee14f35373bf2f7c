//! NV Figures command-line programs.
//!
//! Every binary under `src/bin` renders one figure. With no arguments it
//! uses the built-in defaults from [`figures`]; `--config` swaps in a JSON
//! document of the same shape.

pub mod figures;

use std::path::PathBuf;

use clap::Parser;
use nvfig_types::config::{load_json, to_json};
use nvfig_types::error::FigureResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize logging with a default filter.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Flags shared by every figure binary.
#[derive(Parser, Debug, Default)]
#[command(about = "Render one NV figure")]
pub struct FigureArgs {
    /// JSON configuration replacing the built-in defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file; the extension picks the format
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

/// A figure configuration that knows how to render itself.
pub trait FigureProgram: Serialize + DeserializeOwned {
    fn output_mut(&mut self) -> &mut String;

    fn render(&self) -> FigureResult<()>;
}

/// Resolve defaults, `--config` and `--output` into the effective configuration.
pub fn resolve<P: FigureProgram>(args: &FigureArgs, defaults: P) -> FigureResult<P> {
    let mut program = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            load_json(path)?
        }
        None => defaults,
    };
    if let Some(output) = &args.output {
        *program.output_mut() = output.display().to_string();
    }
    Ok(program)
}

/// Resolve the configuration, then print it or render it.
pub fn execute<P: FigureProgram>(args: &FigureArgs, defaults: P) -> FigureResult<()> {
    let program = resolve(args, defaults)?;
    if args.print_config {
        println!("{}", to_json(&program)?);
        return Ok(());
    }
    program.render()
}
