//! Storage layer
//!
//! A single SQLite file holds all persisted state. Nothing is cached in
//! memory between requests.

pub mod db;

pub use db::Database;
