//! HTTP handlers

pub mod health;
pub mod subscribers;
pub mod votes;

pub use health::health;
