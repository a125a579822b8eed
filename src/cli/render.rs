//! Human-readable output for vehicle records.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use impound::{Vehicle, storage::TIMESTAMP_FORMAT};

use crate::cli::terminal::{Colorize, separator};

/// Writes a labelled block describing one vehicle.
pub fn vehicle<W: Write>(out: &mut W, vehicle: &Vehicle, now: NaiveDateTime) -> io::Result<()> {
    let expiry = vehicle.expiry().map_or_else(
        || "None".to_string(),
        |expiry| expiry.format(TIMESTAMP_FORMAT).to_string(),
    );
    let expired = match vehicle.is_expired_at(now) {
        Ok(true) => "Yes".warning(),
        Ok(false) => "No".to_string(),
        Err(_) => "Unknown".to_string(),
    };

    writeln!(out)?;
    writeln!(out, "Vehicle Type    : {}", vehicle.vehicle_type())?;
    writeln!(out, "Plate Number    : {}", vehicle.plate_number())?;
    writeln!(out, "Reason          : {}", vehicle.reason())?;
    writeln!(out, "Impound Duration: {}", vehicle.impound_duration())?;
    writeln!(
        out,
        "Timestamp       : {}",
        vehicle.intake().format(TIMESTAMP_FORMAT)
    )?;
    writeln!(out, "Expiry Date     : {expiry}")?;
    writeln!(out, "Expired         : {expired}")?;
    writeln!(out, "{}", separator())
}

/// Writes every vehicle under a heading, or a message if there are none.
pub fn listing<'a, W, I>(
    out: &mut W,
    heading: &str,
    empty: &str,
    vehicles: I,
    now: NaiveDateTime,
) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Vehicle>,
{
    let mut vehicles = vehicles.into_iter().peekable();
    if vehicles.peek().is_none() {
        writeln!(out, "\n{empty}")?;
        return Ok(());
    }

    writeln!(out, "\n{}", heading.info())?;
    for v in vehicles {
        vehicle(out, v, now)?;
    }
    Ok(())
}

/// Writes the outcome of a plate number lookup.
pub fn found<W: Write>(out: &mut W, found: Option<&Vehicle>, now: NaiveDateTime) -> io::Result<()> {
    match found {
        Some(v) => {
            writeln!(out, "\n{}", "Found Vehicle:".info())?;
            vehicle(out, v, now)
        }
        None => writeln!(out, "\nVehicle not found in the impound system."),
    }
}

/// Writes the outcome of a removal.
pub fn removed<W: Write>(out: &mut W, removed: Option<&Vehicle>) -> io::Result<()> {
    match removed {
        Some(_) => writeln!(
            out,
            "\n{}",
            "Vehicle removed from the impound system.".success()
        ),
        None => writeln!(out, "\nVehicle not found in the impound system."),
    }
}

/// Writes a newly added vehicle.
pub fn added<W: Write>(out: &mut W, added: &Vehicle, now: NaiveDateTime) -> io::Result<()> {
    writeln!(
        out,
        "\n{}",
        "Vehicle added to the impound system:".success()
    )?;
    vehicle(out, added, now)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn car(duration: &str) -> Vehicle {
        Vehicle::with_intake(
            "car".to_string(),
            "ABC123".to_string(),
            "unpaid fine".to_string(),
            duration.to_string(),
            at(1),
        )
        .unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn vehicle_block_lists_every_field() {
        let output = render(|out| vehicle(out, &car("3 days"), at(2)));

        assert!(output.contains("Vehicle Type    : car\n"));
        assert!(output.contains("Plate Number    : ABC123\n"));
        assert!(output.contains("Reason          : unpaid fine\n"));
        assert!(output.contains("Impound Duration: 3 days\n"));
        assert!(output.contains("Timestamp       : 2024-01-01 10:00:00\n"));
        assert!(output.contains("Expiry Date     : 2024-01-04 10:00:00\n"));
        assert!(output.contains("Expired         : No\n"));
    }

    #[test]
    fn expired_vehicle_is_flagged() {
        let output = render(|out| vehicle(out, &car("3 days"), at(5)));
        assert!(output.contains("Yes"));
    }

    #[test]
    fn vehicle_without_expiry_is_unknown() {
        let output = render(|out| vehicle(out, &car("10"), at(5)));

        assert!(output.contains("Expiry Date     : None\n"));
        assert!(output.contains("Expired         : Unknown\n"));
    }

    #[test]
    fn empty_listing_shows_message() {
        let none: Vec<&Vehicle> = Vec::new();
        let output = render(|out| {
            listing(out, "Expired Vehicles:", "No vehicles have expired.", none, at(1))
        });
        assert_eq!(output, "\nNo vehicles have expired.\n");
    }

    #[test]
    fn listing_shows_heading_and_vehicles() {
        let vehicles = [car("1 day"), car("2 days")];
        let output =
            render(|out| listing(out, "Expired Vehicles:", "none", &vehicles, at(9)));

        assert!(output.contains("Expired Vehicles:"));
        assert_eq!(output.matches("Plate Number").count(), 2);
    }

    #[test]
    fn missing_plate_is_reported() {
        assert_eq!(
            render(|out| found(out, None, at(1))),
            "\nVehicle not found in the impound system.\n"
        );
        assert_eq!(
            render(|out| removed(out, None)),
            "\nVehicle not found in the impound system.\n"
        );
    }
}
