// On-disk representation of the vehicle store.
//
// The snapshot is a JSON object with a single `vehicles` array. Timestamps are
// stored as `YYYY-MM-DD HH:MM:SS` strings in local time.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Vehicle, duration};

/// The timestamp format used in the snapshot file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The whole persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Vehicle records in stored order.
    pub vehicles: Vec<VehicleEntry>,
}

/// A single vehicle as stored on disk.
///
/// `expiry_date` is written for readers of the file, but is ignored on load;
/// the expiry is always derived again from the intake and duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleEntry {
    /// The kind of vehicle.
    pub vehicle_type: String,
    /// The plate number.
    pub plate_number: String,
    /// Why the vehicle was impounded.
    pub reason: String,
    /// The duration as entered.
    pub impound_duration: String,
    /// The intake timestamp.
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    /// The expiry at the time of writing.
    #[serde(default, with = "optional_timestamp")]
    pub expiry_date: Option<NaiveDateTime>,
}

impl From<&Vehicle> for VehicleEntry {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_type: vehicle.vehicle_type().to_string(),
            plate_number: vehicle.plate_number().to_string(),
            reason: vehicle.reason().to_string(),
            impound_duration: vehicle.impound_duration().to_string(),
            timestamp: vehicle.intake(),
            expiry_date: vehicle.expiry(),
        }
    }
}

impl TryFrom<VehicleEntry> for Vehicle {
    type Error = duration::Error;

    fn try_from(entry: VehicleEntry) -> Result<Self, Self::Error> {
        Self::with_intake(
            entry.vehicle_type,
            entry.plate_number,
            entry.reason,
            entry.impound_duration,
            entry.timestamp,
        )
    }
}

impl Snapshot {
    /// Builds a snapshot of the given vehicles.
    #[must_use]
    pub fn of(vehicles: &[Vehicle]) -> Self {
        Self {
            vehicles: vehicles.iter().map(VehicleEntry::from).collect(),
        }
    }

    /// Parses a snapshot from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not UTF-8 or not a valid snapshot.
    pub fn parse(content: impl AsRef<[u8]>) -> serde_json::Result<Self> {
        serde_json::from_slice(content.as_ref())
    }

    /// Writes the snapshot as JSON indented by four spaces.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        self.serialize(&mut serializer).map_err(io::Error::from)?;
        writer.write_all(b"\n")
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }
}

mod optional_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIMESTAMP_FORMAT;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(&value.format(TIMESTAMP_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT))
            .transpose()
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const SAMPLE: &str = r#"{
    "vehicles": [
        {
            "vehicle_type": "car",
            "plate_number": "ABC123",
            "reason": "unpaid fine",
            "impound_duration": "3 days",
            "timestamp": "2024-01-01 10:00:00",
            "expiry_date": "2024-01-04 10:00:00"
        },
        {
            "vehicle_type": "van",
            "plate_number": "VAN1",
            "reason": "abandoned",
            "impound_duration": "10",
            "timestamp": "2024-02-01 08:30:00",
            "expiry_date": null
        }
    ]
}
"#;

    #[test]
    fn parses_stored_timestamps() {
        let snapshot = Snapshot::parse(SAMPLE).unwrap();
        let entry = &snapshot.vehicles[0];

        assert_eq!(
            entry.timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert_eq!(snapshot.vehicles[1].expiry_date, None);
    }

    #[test]
    fn writes_the_same_text_it_reads() {
        let snapshot = Snapshot::parse(SAMPLE).unwrap();
        let mut out = Vec::new();
        snapshot.write(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), SAMPLE);
    }

    #[test]
    fn expiry_date_may_be_omitted() {
        let content = r#"{"vehicles": [{
            "vehicle_type": "car",
            "plate_number": "ABC123",
            "reason": "unpaid fine",
            "impound_duration": "3 days",
            "timestamp": "2024-01-01 10:00:00"
        }]}"#;

        let snapshot = Snapshot::parse(content).unwrap();
        assert_eq!(snapshot.vehicles[0].expiry_date, None);
    }

    #[test]
    fn required_fields_are_enforced() {
        let content = r#"{"vehicles": [{
            "vehicle_type": "car",
            "plate_number": "ABC123",
            "impound_duration": "3 days",
            "timestamp": "2024-01-01 10:00:00"
        }]}"#;

        let error = Snapshot::parse(content).unwrap_err();
        assert!(error.to_string().contains("reason"));
    }

    #[test]
    fn unknown_record_fields_are_rejected() {
        let content = r#"{"vehicles": [{
            "vehicle_type": "car",
            "plate_number": "ABC123",
            "reason": "unpaid fine",
            "impound_duration": "3 days",
            "timestamp": "2024-01-01 10:00:00",
            "owner": "Bob"
        }]}"#;

        let error = Snapshot::parse(content).unwrap_err();
        assert!(error.to_string().contains("owner"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(Snapshot::parse(b"{\"vehicles\": [\xff\xfe]}").is_err());
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let content = r#"{"vehicles": [{
            "vehicle_type": "car",
            "plate_number": "ABC123",
            "reason": "unpaid fine",
            "impound_duration": "3 days",
            "timestamp": "01/01/2024"
        }]}"#;

        assert!(Snapshot::parse(content).is_err());
    }

    #[test]
    fn stored_expiry_is_recomputed_on_conversion() {
        let mut snapshot = Snapshot::parse(SAMPLE).unwrap();
        let mut entry = snapshot.vehicles.remove(0);
        entry.expiry_date = None;

        let vehicle = Vehicle::try_from(entry).unwrap();
        assert_eq!(
            vehicle.expiry(),
            NaiveDate::from_ymd_opt(2024, 1, 4)
                .unwrap()
                .and_hms_opt(10, 0, 0)
        );
    }
}
