//! Data loading, identity reconciliation, feature extraction and alignment

pub mod aligner;
pub mod csv_loader;
pub mod features;
pub mod identity;
pub mod roster;
pub mod source;

// Re-export commonly used types
pub use aligner::{align, AlignedDataset};
pub use csv_loader::{load_mapping_csv, load_roster_csv, CsvLapSource};
pub use features::HistoricalFeatures;
pub use identity::IdentityMap;
pub use roster::{belgian_gp_2025_roster, driver_codes_2025, Roster};
pub use source::{InMemoryLapSource, LapSource};
