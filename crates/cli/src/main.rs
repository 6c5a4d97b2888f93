use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;
use wktkit::{Destination, Format};

mod commands;
mod summary;

use commands::{EngineArgs, SampleArgs};

#[derive(Parser)]
#[command(name = "wktkit", version = wktkit::VERSION)]
#[command(about = "Convert, inspect and generate WKT/WKB geometries")]
struct Cmd {
    /// Debug-level logging (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Convex hull of the input geometry
    Hull {
        /// Format for both input and output
        #[arg(short, long, default_value_t = Format::Text)]
        format: Format,
        #[command(flatten)]
        engine: EngineArgs,
        input: PathBuf,
        /// Output file; `-` or absent for stdout
        output: Option<String>,
    },
    /// Random points in a rectangle, written as one geometry collection
    Rand {
        #[command(flatten)]
        sample: SampleArgs,
        #[arg(long, default_value_t = Format::Text)]
        to: Format,
        #[command(flatten)]
        engine: EngineArgs,
        /// Output file; `-` or absent for stdout
        output: Option<String>,
    },
    /// Print `xmin xmax ymin ymax`
    Bounds {
        #[arg(long, default_value_t = Format::Text)]
        from: Format,
        input: PathBuf,
    },
    /// Re-encode the input in another format
    Convert {
        #[arg(long, default_value_t = Format::Text)]
        from: Format,
        #[arg(long, default_value_t = Format::Text)]
        to: Format,
        #[command(flatten)]
        engine: EngineArgs,
        input: PathBuf,
        /// Output file; `-` or absent for stdout
        output: Option<String>,
    },
    /// Print member types, vertex counts and bounds as JSON
    Info {
        #[arg(long, default_value_t = Format::Text)]
        from: Format,
        input: PathBuf,
    },
    /// Print the coordinate stream, one `x y` line per vertex
    Dump {
        #[arg(long, default_value_t = Format::Text)]
        from: Format,
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    init_tracing(cmd.verbose);
    match cmd.action {
        Action::Hull {
            format,
            engine,
            input,
            output,
        } => commands::hull(
            format,
            engine,
            &input,
            &Destination::from_arg(output.as_deref()),
        ),
        Action::Rand {
            sample,
            to,
            engine,
            output,
        } => commands::rand_points(
            &sample,
            to,
            engine,
            &Destination::from_arg(output.as_deref()),
        )
        .map(|_| ()),
        Action::Bounds { from, input } => {
            commands::bounds(from, &input, &mut io::stdout().lock()).map(|_| ())
        }
        Action::Convert {
            from,
            to,
            engine,
            input,
            output,
        } => commands::convert(
            from,
            to,
            engine,
            &input,
            &Destination::from_arg(output.as_deref()),
        ),
        Action::Info { from, input } => {
            commands::info(from, &input, &mut io::stdout().lock()).map(|_| ())
        }
        Action::Dump { from, input } => commands::dump(from, &input, &mut io::stdout().lock()),
    }
}
