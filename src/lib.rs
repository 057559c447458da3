use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
};

use log::info;
use mmu::{Mmu, Stats};

pub mod command;
pub mod config;
pub mod error;
pub mod init_file;
pub mod processor;

pub use command::{parse_commands, Command};
pub use config::{Action, Config};
pub use error::Error;
pub use init_file::InitData;
pub use processor::Processor;

/// Initialize a fresh MMU from `config.init_file`, then run the commands in
/// `config.input_file`, writing results to `config.output_file` or stdout.
pub fn run(config: &Config) -> Result<Stats, Error> {
    let init = InitData::from_file(&config.init_file)?;
    info!(
        "{} segment entries, {} page entries, demand paging {}",
        init.segments.len(),
        init.pages.len(),
        if init.needs_demand_paging() { "on" } else { "off" }
    );

    let mut mmu = Mmu::new();
    init.apply(&mut mmu);

    let input = fs::read_to_string(&config.input_file).map_err(|source| Error::Read {
        path: config.input_file.clone(),
        source,
    })?;
    let commands = parse_commands(&input);

    let out: Box<dyn Write> = match &config.output_file {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    Processor::new(mmu, BufWriter::new(out))
        .verbose(config.verbose)
        .run(&commands)
}
