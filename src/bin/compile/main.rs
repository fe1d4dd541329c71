//! The `compile` binary: a thin CLI dispatcher onto the `exprc` library.
mod cli;

use std::io::Read;
use std::{fs, io};

use cli::{Cli, Commands};
use log::error;

fn main() {
    let args = Cli::init();
    simple_logger::init_with_level((&args.verbosity).into()).expect("logger already initialized");

    let Commands::Interpret(interpret_args) = args.command;

    let (source, file_name) = match &interpret_args.input_file {
        Some(path) => match fs::read_to_string(path) {
            Ok(source) => (source, path.display().to_string()),
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => {
            let mut source = String::new();
            if let Err(err) = io::stdin().read_to_string(&mut source) {
                error!("failed to read stdin: {err}");
                std::process::exit(1);
            }
            (source, "<stdin>".to_owned())
        }
    };

    let output = match exprc::compile(&source, &file_name) {
        Ok(output) => output,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    match interpret_args.output {
        Some(path) => {
            if let Err(err) = fs::write(&path, &output.asm) {
                error!("failed to write {}: {err}", path.display());
                std::process::exit(1);
            }
        }
        None => println!("{}", output.asm),
    }
}
