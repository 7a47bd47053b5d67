//! Core types and trait definitions for the organizer backend.
//!
//! This crate is deliberately free of HTTP, crypto, and database
//! dependencies. Every other crate depends on it.

pub mod error;
pub mod note;
pub mod patch;
pub mod store;
pub mod user;

pub use error::{Error, Result};
