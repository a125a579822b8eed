use std::io;

use impound::{Store, domain::now, storage::Loaded};
use tracing::instrument;

use crate::cli::render;

#[instrument(skip(store))]
pub fn run(store: &Store<Loaded>) -> anyhow::Result<()> {
    render::listing(
        &mut io::stdout().lock(),
        "List of Vehicles in the Impound System:",
        "No vehicles in the impound system.",
        store.vehicles(),
        now(),
    )?;
    Ok(())
}
