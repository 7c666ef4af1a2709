//! Repository layer: domain-facing persistence functions.

pub mod drinks;
