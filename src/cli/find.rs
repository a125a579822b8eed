use std::io;

use impound::{Store, domain::now, storage::Loaded};
use tracing::instrument;

use crate::cli::render;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The plate number to look up (exact match)
    pub plate: String,
}

impl Command {
    #[instrument(skip(store))]
    pub fn run(self, store: &Store<Loaded>) -> anyhow::Result<()> {
        render::found(
            &mut io::stdout().lock(),
            store.find_by_plate(&self.plate),
            now(),
        )?;
        Ok(())
    }
}
