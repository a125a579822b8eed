pub mod store;
/// JSON snapshot format of the vehicle store.
pub mod snapshot;

pub use snapshot::{Snapshot, TIMESTAMP_FORMAT, VehicleEntry};
pub use store::{AddError, LoadError, Loaded, Store, Unloaded};
