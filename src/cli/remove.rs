use std::io;

use impound::{Store, storage::Loaded};
use tracing::instrument;

use crate::cli::render;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The plate number of the vehicle to release
    pub plate: String,
}

impl Command {
    #[instrument(skip(store))]
    pub fn run(self, store: &mut Store<Loaded>) -> anyhow::Result<()> {
        let removed = store.remove(&self.plate)?;
        render::removed(&mut io::stdout().lock(), removed.as_ref())?;
        Ok(())
    }
}
