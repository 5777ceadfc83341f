pub mod day_summary;
pub mod direction;
pub mod scan;
