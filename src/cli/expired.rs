use std::io;

use impound::{Store, domain::now, storage::Loaded};
use tracing::instrument;

use crate::cli::render;

#[instrument(skip(store))]
pub fn run(store: &Store<Loaded>) -> anyhow::Result<()> {
    let now = now();
    render::listing(
        &mut io::stdout().lock(),
        "Expired Vehicles:",
        "No vehicles have expired.",
        store.expired_at(now),
        now,
    )?;
    Ok(())
}
