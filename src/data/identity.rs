//! Driver identity reconciliation
//!
//! Historical timing data names drivers by three-letter code ("VER"), the
//! upcoming event roster by full name ("Max Verstappen"). The map is exact
//! match only; a name without an entry reconciles to `None`.

use std::collections::{BTreeSet, HashMap};

use crate::models::UpcomingEntrantRow;

/// Full name -> short code lookup
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    by_name: HashMap<String, String>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping, returning the code it replaced for the same name
    pub fn insert(&mut self, name: impl Into<String>, code: impl Into<String>) -> Option<String> {
        self.by_name.insert(name.into(), code.into())
    }

    /// Short code for a full name
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Full names mapped to a short code, sorted
    pub fn names_for(&self, code: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .by_name
            .iter()
            .filter(|(_, c)| c.as_str() == code)
            .map(|(n, _)| n.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// All short codes reachable from some full name
    pub fn codes(&self) -> BTreeSet<&str> {
        self.by_name.values().map(String::as_str).collect()
    }

    /// Fill in `code` on every roster row, returning names left unmapped
    pub fn reconcile(&self, roster: &mut [UpcomingEntrantRow]) -> Vec<String> {
        let mut unmapped = Vec::new();
        for entry in roster.iter_mut() {
            entry.code = self.code_for(&entry.driver).map(str::to_string);
            if entry.code.is_none() {
                unmapped.push(entry.driver.clone());
            }
        }
        unmapped
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<N, C> FromIterator<(N, C)> for IdentityMap
where
    N: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, code) in iter {
            map.insert(name, code);
        }
        map
    }
}
