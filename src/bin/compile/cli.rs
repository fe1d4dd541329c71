//! CLI argument parsing: `Cli { command, verbosity }`, a `LogLevel` enum
//! with numeric aliases, and `From<&LogLevel> for log::Level`.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Specify the log level of the compiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline over a source file (or stdin) and print the
    /// emitted assembly.
    Interpret(InterpretArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InterpretArgs {
    /// The source file to compile. Reads standard input if omitted.
    #[arg(index = 1)]
    pub input_file: Option<PathBuf>,

    /// Where to write the emitted assembly. Prints to stdout if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Log level of the compiler: a `ValueEnum` with numeric aliases so `-v 2`
/// and `-v info` are interchangeable.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also log warnings.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the compiler's general progress.
    #[value(alias("2"))]
    Info,

    /// Log internal details of each pipeline stage.
    #[value(alias("3"))]
    Debug,

    /// Log everything, including per-token tracing from the tokenizer.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
