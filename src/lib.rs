//! EventHub authentication core
//!
//! This library implements the token and credential subsystem of the
//! EventHub backend:
//! - PBKDF2-based password hashing and verification
//! - Access/refresh JWT issuance and validation with per-class secrets
//! - An in-memory revocation registry supporting single-session and
//!   all-session logout
//! - An authentication service composing the above for route middleware
//!
//! Persistence and HTTP routing live outside this crate; the core is a
//! pure computation over caller-supplied claims and stored hashes.

pub mod auth;
pub mod config;
pub mod error;
pub mod state;
