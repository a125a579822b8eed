use std::io;

use impound::{Store, domain::now, storage::Loaded};
use tracing::instrument;

use crate::cli::render;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The kind of vehicle, e.g. "car" or "motorcycle"
    #[arg(long = "type", short = 't')]
    pub vehicle_type: String,

    /// The plate number
    #[arg(long, short)]
    pub plate: String,

    /// Why the vehicle is impounded
    #[arg(long)]
    pub reason: String,

    /// How long the vehicle is held, e.g. "3 days", "1 week", "2 months"
    #[arg(long, short)]
    pub duration: String,
}

impl Command {
    #[instrument(skip(store))]
    pub fn run(self, store: &mut Store<Loaded>) -> anyhow::Result<()> {
        let vehicle = store.add(self.vehicle_type, self.plate, self.reason, self.duration)?;
        render::added(&mut io::stdout().lock(), vehicle, now())?;
        Ok(())
    }
}
