//! Upcoming event roster
//!
//! The roster is entered as a static list of confirmed drivers with their
//! qualifying lap. The built-in tables cover the 2025 Belgian Grand Prix.

use std::collections::HashSet;

use crate::data::identity::IdentityMap;
use crate::error::{validate_lap_seconds, PredictError, Result};
use crate::models::UpcomingEntrantRow;

/// Confirmed entrants in roster input order
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<UpcomingEntrantRow>,
}

impl Roster {
    /// Build a roster from (full name, qualifying seconds) pairs
    ///
    /// Names must be unique and qualifying times positive.
    pub fn new<I, N>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for (name, qualifying_time) in entries {
            let driver: String = name.into();
            if driver.trim().is_empty() {
                return Err(PredictError::InvalidRoster(
                    "Driver name must not be empty".to_string(),
                ));
            }
            validate_lap_seconds(&driver, qualifying_time)?;
            if !seen.insert(driver.clone()) {
                return Err(PredictError::DuplicateEntrant(driver));
            }
            rows.push(UpcomingEntrantRow {
                driver,
                qualifying_time,
                code: None,
            });
        }

        Ok(Self { entries: rows })
    }

    pub fn entries(&self) -> &[UpcomingEntrantRow] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<UpcomingEntrantRow> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 2025 Belgian GP qualifying results (seconds)
const BELGIAN_GP_2025_QUALIFYING: [(&str, f64); 20] = [
    ("Lando Norris", 100.562),
    ("Oscar Piastri", 100.647),
    ("Charles Leclerc", 100.900),
    ("Max Verstappen", 100.903),
    ("Alexander Albon", 101.201),
    ("George Russell", 101.260),
    ("Yuki Tsunoda", 101.284),
    ("Isack Hadjar", 101.310),
    ("Liam Lawson", 101.328),
    ("Gabriel Bortoleto", 102.387),
    ("Esteban Ocon", 101.525),
    ("Oliver Bearman", 101.617),
    ("Pierre Gasly", 101.633),
    ("Nico Hulkenberg", 101.707),
    ("Carlos Sainz", 101.758),
    ("Lewis Hamilton", 101.939),
    ("Franco Colapinto", 102.022),
    ("Kimi Antonelli", 102.139),
    ("Fernando Alonso", 102.385),
    ("Lance Stroll", 102.502),
];

/// Full name -> timing code for the 2025 grid
const DRIVER_CODES_2025: [(&str, &str); 21] = [
    ("Oscar Piastri", "PIA"),
    ("George Russell", "RUS"),
    ("Lando Norris", "NOR"),
    ("Max Verstappen", "VER"),
    ("Lewis Hamilton", "HAM"),
    ("Charles Leclerc", "LEC"),
    ("Isack Hadjar", "HAD"),
    ("Kimi Antonelli", "ANT"),
    ("Yuki Tsunoda", "TSU"),
    ("Alexander Albon", "ALB"),
    ("Esteban Ocon", "OCO"),
    ("Nico Hulkenberg", "HUL"),
    ("Fernando Alonso", "ALO"),
    ("Lance Stroll", "STR"),
    ("Carlos Sainz", "SAI"),
    ("Pierre Gasly", "GAS"),
    ("Oliver Bearman", "BEA"),
    ("Jack Doohan", "DOO"),
    ("Gabriel Bortoleto", "BOR"),
    ("Liam Lawson", "LAW"),
    ("Franco Colapinto", "COL"),
];

/// Built-in 2025 Belgian GP roster
pub fn belgian_gp_2025_roster() -> Roster {
    Roster {
        entries: BELGIAN_GP_2025_QUALIFYING
            .iter()
            .map(|&(driver, qualifying_time)| UpcomingEntrantRow {
                driver: driver.to_string(),
                qualifying_time,
                code: None,
            })
            .collect(),
    }
}

/// Built-in 2025 driver code table
pub fn driver_codes_2025() -> IdentityMap {
    DRIVER_CODES_2025.iter().copied().collect()
}
