use std::io::Write;

use log::{debug, error, info};
use mmu::{Mmu, Stats, TranslationError, VirtualAddress, INVALID_ADDRESS};

use crate::command::Command;
use crate::error::Error;

/// Feeds commands to an [`Mmu`] in order and writes one token per `TA`/`RP`
/// (followed by a space) and a newline per `NL`.
pub struct Processor<W: Write> {
    mmu: Mmu,
    out: W,
    verbose: bool,
}

impl<W: Write> Processor<W> {
    pub fn new(mmu: Mmu, out: W) -> Self {
        Processor {
            mmu,
            out,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn into_inner(self) -> (Mmu, W) {
        (self.mmu, self.out)
    }

    /// Run all commands. Stops at the first translation that runs out of
    /// frames; everything produced up to that point is flushed first.
    pub fn run(&mut self, commands: &[Command]) -> Result<Stats, Error> {
        for command in commands {
            if let Err(e) = self.execute(*command) {
                self.out.flush()?;
                return Err(e);
            }
        }
        self.out.flush()?;

        let stats = self.mmu.stats();
        if self.verbose {
            info!(
                "{} translations: {} resolved, {} invalid; {} page table faults, {} page faults; {} frames free",
                stats.translations,
                stats.resolved,
                stats.invalid,
                stats.page_table_faults,
                stats.page_faults,
                self.mmu.free_frames()
            );
        }
        Ok(stats)
    }

    pub fn execute(&mut self, command: Command) -> Result<(), Error> {
        match command {
            Command::Translate(va) => {
                let Ok(va) = i32::try_from(va) else {
                    debug!("TA {} -> not a virtual address", va);
                    write!(self.out, "{} ", INVALID_ADDRESS)?;
                    return Ok(());
                };
                let translation = self.mmu.translate_traced(VirtualAddress::from(va));
                if self.verbose {
                    info!("TA {}", translation);
                }
                let word = match translation.result {
                    Ok(pa) => pa as i64,
                    Err(TranslationError::InvalidAddress(_)) => INVALID_ADDRESS as i64,
                    Err(TranslationError::FramesExhausted) => {
                        error!("Aborting: no free frames for {}", translation.address);
                        return Err(Error::FramesExhausted(va));
                    }
                };
                write!(self.out, "{} ", word)?;
            }
            Command::ReadPhysical(pa) => {
                let word = self.mmu.read_physical(pa).unwrap_or(INVALID_ADDRESS);
                debug!("RP {} -> {}", pa, word);
                write!(self.out, "{} ", word)?;
            }
            Command::NewLine => writeln!(self.out)?,
        }
        Ok(())
    }
}
