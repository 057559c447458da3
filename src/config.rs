use std::path::PathBuf;

use crate::error::Error;

pub const USAGE: &str = "\
Segmented virtual memory simulator with demand paging

Usage: segmented-vm [OPTIONS] <init_file> <input_file> [output_file]

Arguments:
  init_file    Segment table and page table initialization (two lines of triples)
  input_file   Commands: TA <va>, RP <pa>, NL
  output_file  Where results are written (default: standard output)

Options:
  -v, --verbose  Log every translation and a summary (RUST_LOG still applies)
  -h, --help     Print this help message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub init_file: PathBuf,
    pub input_file: PathBuf,
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    Run(Config),
}

impl Config {
    /// Parse arguments, not including the program name.
    pub fn from_args<I>(args: I) -> Result<Action, Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut verbose = false;
        let mut positional: Vec<String> = Vec::new();

        for arg in args.into_iter().map(Into::into) {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Action::Help),
                "-v" | "--verbose" => verbose = true,
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    return Err(Error::Usage(format!("Unknown option: {}", arg)));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        match (
            positional.next(),
            positional.next(),
            positional.next(),
            positional.next(),
        ) {
            (Some(init_file), Some(input_file), output_file, None) => Ok(Action::Run(Config {
                init_file: init_file.into(),
                input_file: input_file.into(),
                output_file: output_file.map(PathBuf::from),
                verbose,
            })),
            _ => Err(Error::Usage(
                "Expected <init_file> <input_file> [output_file]".to_string(),
            )),
        }
    }
}
