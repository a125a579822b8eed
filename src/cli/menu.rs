//! The interactive impound menu.

use std::{fmt, str::FromStr};

use dialoguer::Input;
use impound::{Store, storage::Loaded};
use tracing::instrument;

use crate::cli::{add, expired, find, list, remove, search, terminal::Colorize};

/// An entry in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    List,
    Add,
    Remove,
    FindByPlate,
    SearchByReason,
    Expired,
    Exit,
}

impl Choice {
    const ALL: [Self; 7] = [
        Self::List,
        Self::Add,
        Self::Remove,
        Self::FindByPlate,
        Self::SearchByReason,
        Self::Expired,
        Self::Exit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::List => "List Vehicles",
            Self::Add => "Add Vehicle",
            Self::Remove => "Remove Vehicle",
            Self::FindByPlate => "Search Vehicle by Plate Number",
            Self::SearchByReason => "Search Vehicle by Reason",
            Self::Expired => "Check Expired Vehicles",
            Self::Exit => "Exit",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct InvalidChoice;

impl FromStr for Choice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::List),
            "2" => Ok(Self::Add),
            "3" => Ok(Self::Remove),
            "4" => Ok(Self::FindByPlate),
            "5" => Ok(Self::SearchByReason),
            "6" => Ok(Self::Expired),
            "7" => Ok(Self::Exit),
            _ => Err(InvalidChoice),
        }
    }
}

/// The numbered menu shown before each prompt.
struct Menu;

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nImpound System Menu")?;
        for (number, choice) in (1..).zip(Choice::ALL) {
            writeln!(f, "{number}. {}", choice.label())?;
        }
        Ok(())
    }
}

fn prompt(text: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()?)
}

/// Runs the menu until the user chooses to exit.
///
/// A failed action is reported and the menu shown again.
#[instrument(skip(store))]
pub fn run(store: &mut Store<Loaded>) -> anyhow::Result<()> {
    loop {
        print!("{Menu}");
        let Ok(choice) = prompt("Enter your choice")?.parse::<Choice>() else {
            println!("\n{}", "Invalid choice, please try again.".warning());
            continue;
        };

        if choice == Choice::Exit {
            println!("\nExiting the system. Goodbye!");
            return Ok(());
        }

        if let Err(e) = perform(choice, store) {
            tracing::debug!("{choice:?} failed: {e:?}");
            println!("\n{}", format!("Error: {e}").warning());
        }
    }
}

fn perform(choice: Choice, store: &mut Store<Loaded>) -> anyhow::Result<()> {
    if matches!(
        choice,
        Choice::Add | Choice::Remove | Choice::FindByPlate | Choice::SearchByReason
    ) {
        println!();
    }

    match choice {
        Choice::List => list::run(store),
        Choice::Add => add::Command {
            vehicle_type: prompt("Enter vehicle type")?,
            plate: prompt("Enter plate number")?,
            reason: prompt("Enter reason for impound")?,
            duration: prompt("Enter impound duration (e.g., 3 days, 1 week, 2 months)")?,
        }
        .run(store),
        Choice::Remove => remove::Command {
            plate: prompt("Enter plate number to remove")?,
        }
        .run(store),
        Choice::FindByPlate => find::Command {
            plate: prompt("Enter plate number to search")?,
        }
        .run(store),
        Choice::SearchByReason => search::Command {
            reason: prompt("Enter reason to search")?,
        }
        .run(store),
        Choice::Expired => expired::run(store),
        Choice::Exit => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("1", Choice::List; "list")]
    #[test_case("2", Choice::Add; "add")]
    #[test_case("3", Choice::Remove; "remove")]
    #[test_case("4", Choice::FindByPlate; "find by plate")]
    #[test_case("5", Choice::SearchByReason; "search by reason")]
    #[test_case("6", Choice::Expired; "expired")]
    #[test_case("7", Choice::Exit; "exit")]
    fn numbered_choices(input: &str, expected: Choice) {
        assert_eq!(input.parse::<Choice>(), Ok(expected));
    }

    #[test_case(""; "empty")]
    #[test_case("0"; "zero")]
    #[test_case("8"; "out of range")]
    #[test_case("-1"; "negative")]
    #[test_case("list"; "word")]
    #[test_case(" 7 "; "surrounding whitespace")]
    #[test_case("+7"; "explicit sign")]
    #[test_case("07"; "leading zero")]
    fn invalid_choices(input: &str) {
        assert_eq!(input.parse::<Choice>(), Err(InvalidChoice));
    }

    #[test]
    fn menu_lists_actions_in_order() {
        let menu = Menu.to_string();
        assert!(menu.starts_with("\nImpound System Menu\n1. List Vehicles\n"));
        assert!(menu.ends_with("6. Check Expired Vehicles\n7. Exit\n"));
    }
}
