//! A file backed store of impounded vehicles
//!
//! The [`Store`] holds every record in memory, in insertion order, and writes
//! the whole collection back to its snapshot file after each change.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;

use crate::{
    domain::{Vehicle, duration, now},
    storage::snapshot::Snapshot,
};

/// The collection of records held by a loaded [`Store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    vehicles: Vec<Vehicle>,
}

/// Marker for a [`Store`] whose snapshot has not been read yet.
#[derive(Debug, PartialEq, Eq)]
pub struct Unloaded;

/// A file backed store of vehicle records.
#[derive(Debug)]
pub struct Store<S> {
    /// The snapshot file.
    path: PathBuf,
    state: S,
}

impl<S> Store<S> {
    /// The path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store<Unloaded> {
    /// Opens a store backed by the snapshot file at the given path.
    ///
    /// Nothing is read until [`Store::load`] is called.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Unloaded,
        }
    }

    /// Read every record from the snapshot file.
    ///
    /// A missing file is not an error; the store starts empty.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the file exists but cannot be read
    /// - the file is not a valid snapshot
    /// - a stored duration can no longer be converted into an expiry
    pub fn load(self) -> Result<Store<Loaded>, LoadError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    "No store found at {}, starting with no vehicles",
                    self.path.display()
                );
                return Ok(self.with_vehicles(Vec::new()));
            }
            Err(e) => return Err(LoadError::Io(e)),
        };

        let snapshot = Snapshot::parse(&content).map_err(|source| LoadError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let vehicles = snapshot
            .vehicles
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                Vehicle::try_from(entry).map_err(|source| LoadError::InvalidRecord {
                    path: self.path.clone(),
                    index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Loaded {} vehicles from {}",
            vehicles.len(),
            self.path.display()
        );

        Ok(self.with_vehicles(vehicles))
    }

    /// Read every record from the snapshot file, starting empty if the file
    /// is corrupt.
    ///
    /// The corrupt file is left in place until the next save overwrites it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but cannot be read.
    pub fn load_or_empty(self) -> Result<Store<Loaded>, LoadError> {
        let path = self.path.clone();
        match self.load() {
            Err(e) if e.is_corrupt() => {
                tracing::warn!("{e}; starting with no vehicles");
                Ok(Store {
                    path,
                    state: Loaded {
                        vehicles: Vec::new(),
                    },
                })
            }
            result => result,
        }
    }

    fn with_vehicles(self, vehicles: Vec<Vehicle>) -> Store<Loaded> {
        Store {
            path: self.path,
            state: Loaded { vehicles },
        }
    }
}

impl Store<Loaded> {
    /// Write the whole collection to the snapshot file.
    ///
    /// The snapshot is written to a temporary file beside the target and then
    /// renamed over it, so the file is never observed half written.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = temp_path(&self.path);
        let mut content = Vec::new();
        Snapshot::of(&self.state.vehicles).write(&mut content)?;
        fs::write(&temp, content)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp) {
                tracing::debug!("Failed to remove {}: {cleanup}", temp.display());
            }
            return Err(e);
        }

        tracing::debug!(
            "Saved {} vehicles to {}",
            self.state.vehicles.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Add a vehicle impounded now.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the impound duration is malformed
    /// - the store cannot be saved
    pub fn add(
        &mut self,
        vehicle_type: String,
        plate_number: String,
        reason: String,
        impound_duration: String,
    ) -> Result<&Vehicle, AddError> {
        self.add_at(vehicle_type, plate_number, reason, impound_duration, now())
    }

    /// Add a vehicle impounded at the given instant.
    ///
    /// Nothing is added if the duration is malformed or the store cannot be
    /// saved.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the impound duration is malformed
    /// - the store cannot be saved
    pub fn add_at(
        &mut self,
        vehicle_type: String,
        plate_number: String,
        reason: String,
        impound_duration: String,
        intake: NaiveDateTime,
    ) -> Result<&Vehicle, AddError> {
        let vehicle =
            Vehicle::with_intake(vehicle_type, plate_number, reason, impound_duration, intake)?;

        self.state.vehicles.push(vehicle);
        if let Err(e) = self.save() {
            self.state.vehicles.pop();
            return Err(e.into());
        }

        let vehicle = &self.state.vehicles[self.state.vehicles.len() - 1];
        tracing::info!("Added vehicle: {}", vehicle.plate_number());
        Ok(vehicle)
    }

    /// Remove the first vehicle with the given plate number.
    ///
    /// Returns the removed record, or `None` if no vehicle matched. The store
    /// is saved in either case, and the record is kept if saving fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be saved.
    pub fn remove(&mut self, plate_number: &str) -> io::Result<Option<Vehicle>> {
        let position = self
            .state
            .vehicles
            .iter()
            .position(|v| v.plate_number() == plate_number);
        let removed = position.map(|index| (index, self.state.vehicles.remove(index)));

        if let Err(e) = self.save() {
            if let Some((index, vehicle)) = removed {
                self.state.vehicles.insert(index, vehicle);
            }
            return Err(e);
        }

        match &removed {
            Some((_, vehicle)) => tracing::info!("Removed vehicle: {}", vehicle.plate_number()),
            None => tracing::debug!("No vehicle with plate {plate_number} to remove"),
        }
        Ok(removed.map(|(_, vehicle)| vehicle))
    }

    /// The first vehicle with the given plate number.
    #[must_use]
    pub fn find_by_plate(&self, plate_number: &str) -> Option<&Vehicle> {
        self.state
            .vehicles
            .iter()
            .find(|v| v.plate_number() == plate_number)
    }

    /// Every vehicle impounded for the given reason, ignoring case.
    #[must_use]
    pub fn find_by_reason(&self, reason: &str) -> Vec<&Vehicle> {
        self.state
            .vehicles
            .iter()
            .filter(|v| v.reason_matches(reason))
            .collect()
    }

    /// Every vehicle, in stored order.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.state.vehicles
    }

    /// Every vehicle whose impound has ended, evaluated against the current
    /// time.
    #[must_use]
    pub fn expired(&self) -> Vec<&Vehicle> {
        self.expired_at(now())
    }

    /// Every vehicle whose impound has ended at `now`.
    ///
    /// Vehicles without an expiry are skipped.
    #[must_use]
    pub fn expired_at(&self, now: NaiveDateTime) -> Vec<&Vehicle> {
        self.state
            .vehicles
            .iter()
            .filter(|v| match v.is_expired_at(now) {
                Ok(expired) => expired,
                Err(e) => {
                    tracing::warn!("Skipping vehicle {}: {e}", v.plate_number());
                    false
                }
            })
            .collect()
    }

    /// The number of vehicles in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.vehicles.len()
    }

    /// Whether the store holds no vehicles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.vehicles.is_empty()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Errors that can occur while loading a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The snapshot file exists but could not be read.
    #[error("Failed to read vehicle store: {0}")]
    Io(#[from] io::Error),

    /// The snapshot file is not valid.
    #[error("Vehicle store {} is corrupt: {source}", path.display())]
    Corrupt {
        /// The snapshot file.
        path: PathBuf,
        /// The parse failure.
        source: serde_json::Error,
    },

    /// A stored record has a duration that cannot be turned into an expiry.
    #[error("Vehicle store {} is corrupt: record {index}: {source}", path.display())]
    InvalidRecord {
        /// The snapshot file.
        path: PathBuf,
        /// Position of the record in the file.
        index: usize,
        /// The duration failure.
        source: duration::Error,
    },
}

impl LoadError {
    /// Whether the snapshot file was read but its content is invalid.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. } | Self::InvalidRecord { .. })
    }
}

/// Errors that can occur when adding a vehicle.
#[derive(Debug, thiserror::Error)]
pub enum AddError {
    /// The impound duration is malformed.
    #[error(transparent)]
    Duration(#[from] duration::Error),

    /// The store could not be saved.
    #[error("Failed to save vehicle store: {0}")]
    Save(#[from] io::Error),
}
