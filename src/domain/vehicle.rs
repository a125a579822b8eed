use chrono::{Local, NaiveDateTime};

use crate::domain::duration::{self, MissingExpiry, compute_expiry, truncate_to_seconds};

/// An impounded vehicle.
///
/// Records are immutable once created. The expiry timestamp is derived from
/// the intake timestamp and the impound duration when the record is
/// constructed, and is never stored independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    vehicle_type: String,
    plate_number: String,
    reason: String,
    impound_duration: String,
    intake: NaiveDateTime,
    expiry: Option<NaiveDateTime>,
}

impl Vehicle {
    /// Creates a record for a vehicle impounded now.
    ///
    /// # Errors
    ///
    /// Returns an error if the impound duration names a unit but does not
    /// start with an integer count.
    pub fn new(
        vehicle_type: String,
        plate_number: String,
        reason: String,
        impound_duration: String,
    ) -> Result<Self, duration::Error> {
        Self::with_intake(vehicle_type, plate_number, reason, impound_duration, now())
    }

    /// Creates a record for a vehicle impounded at the given instant.
    ///
    /// The intake timestamp is truncated to whole seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the impound duration names a unit but does not
    /// start with an integer count.
    pub fn with_intake(
        vehicle_type: String,
        plate_number: String,
        reason: String,
        impound_duration: String,
        intake: NaiveDateTime,
    ) -> Result<Self, duration::Error> {
        let intake = truncate_to_seconds(intake);
        let expiry = compute_expiry(intake, &impound_duration)?;
        Ok(Self {
            vehicle_type,
            plate_number,
            reason,
            impound_duration,
            intake,
            expiry,
        })
    }

    /// The kind of vehicle, e.g. "car".
    #[must_use]
    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }

    /// The plate number.
    ///
    /// Plate numbers are not unique.
    #[must_use]
    pub fn plate_number(&self) -> &str {
        &self.plate_number
    }

    /// Why the vehicle was impounded.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The impound duration as entered, e.g. "3 days".
    #[must_use]
    pub fn impound_duration(&self) -> &str {
        &self.impound_duration
    }

    /// When the vehicle was impounded.
    #[must_use]
    pub const fn intake(&self) -> NaiveDateTime {
        self.intake
    }

    /// When the impound ends, if the duration has a recognised unit.
    #[must_use]
    pub const fn expiry(&self) -> Option<NaiveDateTime> {
        self.expiry
    }

    /// Whether the impound has ended at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`MissingExpiry`] if the record has no expiry.
    pub fn is_expired_at(&self, now: NaiveDateTime) -> Result<bool, MissingExpiry> {
        duration::is_expired(self.expiry, now)
    }

    /// Whether the impound has ended, evaluated against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`MissingExpiry`] if the record has no expiry.
    pub fn is_expired(&self) -> Result<bool, MissingExpiry> {
        self.is_expired_at(now())
    }

    /// Whether the reason matches, ignoring case.
    #[must_use]
    pub fn reason_matches(&self, reason: &str) -> bool {
        self.reason.to_lowercase() == reason.to_lowercase()
    }
}

/// The current local time, truncated to whole seconds.
#[must_use]
pub fn now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    fn intake() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn car(duration: &str) -> Result<Vehicle, duration::Error> {
        Vehicle::with_intake(
            "car".to_string(),
            "ABC123".to_string(),
            "unpaid fine".to_string(),
            duration.to_string(),
            intake(),
        )
    }

    #[test]
    fn expiry_is_derived_on_construction() {
        let vehicle = car("3 days").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 4)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert_eq!(vehicle.intake(), intake());
        assert_eq!(vehicle.expiry(), Some(expected));
    }

    #[test]
    fn expired_only_after_expiry() {
        let vehicle = car("3 days").unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(vehicle.is_expired_at(intake()), Ok(false));
        assert_eq!(vehicle.is_expired_at(later), Ok(true));
    }

    #[test]
    fn record_without_unit_reports_missing_expiry() {
        let vehicle = car("10").unwrap();
        assert_eq!(vehicle.expiry(), None);
        assert_eq!(vehicle.is_expired_at(intake()), Err(MissingExpiry));
    }

    #[test]
    fn invalid_duration_is_rejected() {
        assert!(matches!(
            car("several days"),
            Err(duration::Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn new_records_use_current_time() {
        let before = now();
        let vehicle = Vehicle::new(
            "motorcycle".to_string(),
            "M1".to_string(),
            "parking".to_string(),
            "1 week".to_string(),
        )
        .unwrap();
        let after = now();

        assert!(vehicle.intake() >= before && vehicle.intake() <= after);
        assert_eq!(vehicle.intake().nanosecond(), 0);
        assert_eq!(vehicle.is_expired(), Ok(false));
    }

    #[test]
    fn reason_comparison_ignores_case() {
        let vehicle = car("3 days").unwrap();
        assert!(vehicle.reason_matches("Unpaid Fine"));
        assert!(vehicle.reason_matches("UNPAID FINE"));
        assert!(!vehicle.reason_matches("unpaid"));
    }
}
