pub mod config;
pub mod connection;
pub mod transaction;
pub mod transport;
