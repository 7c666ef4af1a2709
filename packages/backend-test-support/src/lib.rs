//! Backend test support utilities
//!
//! This crate provides utilities specifically for backend testing: unified
//! logging initialization and RSA/JWKS fixtures for minting bearer tokens the
//! way the identity provider would.

pub mod jwt;
pub mod logging;
