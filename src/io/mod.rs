/// CSV export of step records.
pub mod export;
/// Hourly weather tables.
pub mod weather;
