//! Grid-connection application registry.
//!
//! Links a plant address, the subscriber, the operator, a certified installer, and the
//! compliance attachments of a small generation installation into one application record, and
//! reconstructs the relational picture for display.

pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;
