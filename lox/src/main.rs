use clap::{Parser, Subcommand};
use console::style;
use lox::RunOptions;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for the Lox language.
#[derive(Parser, Debug)]
#[command(name = "lox", version, long_about = None)]
struct Cli {
    /// Starts the REPL when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the Lox interpreter on a source file
    Run {
        /// Lox source file
        src: PathBuf,
        /// Tokenise the source file only, emitting the stream of tokens
        #[arg(long)]
        tokenise: bool,
        /// Emit debug information
        #[arg(long)]
        debug: bool,
        /// Emit performance information
        #[arg(long)]
        timings: bool,
    },
    /// Start an interactive REPL for Lox
    Repl {
        /// Emit debug information
        #[arg(long)]
        debug: bool,
    },
}

/// Logs go to stderr. `RUST_LOG` picks what is logged, unless `debug` asks for the parse trace and
/// evaluated statements.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("lox_parser=trace,lox_interp=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Run {
            src,
            tokenise,
            timings,
            ..
        } => lox::run_file(
            &src,
            RunOptions { tokenise, timings },
            io::stdout().lock(),
            io::stderr().lock(),
        ),
        Command::Repl { .. } => {
            lox::run_repl(io::stdin().lock(), io::stdout().lock(), io::stderr().lock())?;
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Repl { debug: false });
    let debug = match &command {
        Command::Run { debug, .. } | Command::Repl { debug } => *debug,
    };
    init_tracing(debug);

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold().for_stderr(), err);
            ExitCode::FAILURE
        }
    }
}
