//! Legacy condenser_api object layer for a hive-style blockchain indexer.
//!
//! Turns normalized cache rows into the exact JSON shapes pre-appbase clients
//! expect: legacy amount strings, raw-equivalent reputations, and post objects
//! rebuilt from flattened cache rows plus their embedded chain JSON.

pub mod config;
pub mod db;
pub mod errors;
pub mod legacy;
pub mod models;
pub mod normalize;

pub use errors::CondenserError;
