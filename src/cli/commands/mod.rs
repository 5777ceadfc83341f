pub mod config;
pub mod db;
pub mod init;
pub mod kiosk;
pub mod list;
pub mod log;
pub mod scan;
pub mod summary;
pub mod sync;
