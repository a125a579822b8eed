use std::io;

use impound::{Store, domain::now, storage::Loaded};
use tracing::instrument;

use crate::cli::render;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The impound reason to search for
    pub reason: String,
}

impl Command {
    #[instrument(skip(store))]
    pub fn run(self, store: &Store<Loaded>) -> anyhow::Result<()> {
        render::listing(
            &mut io::stdout().lock(),
            "Vehicles with Reason:",
            &format!("No vehicles found with reason '{}'.", self.reason),
            store.find_by_reason(&self.reason),
            now(),
        )?;
        Ok(())
    }
}
