use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{
    doctor::{self, DoctorArgs},
    run::{self, RunArgs},
};
use env_logger::Env;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "gap", about = "Genome assembly dispatch pipeline", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble every selected sample with the enabled engines.
    Run(RunArgs),
    /// Check that the engine and quality tools are installed.
    Doctor(DoctorArgs),
}

/// Short kmer flags accepted in addition to their long forms.
const KMER_SHORT_FLAGS: [(&str, &str); 5] = [
    ("-ka", "--kmer-abyss"),
    ("-ks", "--kmer-spades"),
    ("-km", "--kmer-masurca"),
    ("-ku", "--kmer-unicycler"),
    ("-kv", "--kmer-velvet"),
];

fn expand_kmer_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (short, long) in KMER_SHORT_FLAGS {
                if text == short {
                    return OsString::from(long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|rest| rest.strip_prefix('=')) {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(expand_kmer_flags(env::args_os()));
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let result = match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Doctor(args) => doctor::run(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: &[&str]) -> Vec<String> {
        expand_kmer_flags(args.iter().map(OsString::from))
            .into_iter()
            .map(|arg| arg.into_string().expect("utf8"))
            .collect()
    }

    #[test]
    fn short_kmer_flags_expand_to_long_forms() {
        assert_eq!(
            expand(&["gap", "run", "-ks", "55", "-kv=61", "-k"]),
            vec!["gap", "run", "--kmer-spades", "55", "--kmer-velvet=61", "-k"]
        );
    }

    #[test]
    fn other_flags_are_left_alone() {
        assert_eq!(expand(&["gap", "-kam", "-k", "-v"]), vec!["gap", "-kam", "-k", "-v"]);
    }
}
