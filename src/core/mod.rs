pub mod debounce;
pub mod direction;
pub mod event_log;
pub mod log;
pub mod scan;
pub mod summary;
