use std::{env, process::ExitCode};

use log::error;
use segmented_vm::{config::USAGE, run, Action, Config, Error};

fn main() -> ExitCode {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(Action::Run(config)) => config,
        Ok(Action::Help) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(1);
        }
    };

    let default_filter = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e @ Error::FramesExhausted(_)) => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}
