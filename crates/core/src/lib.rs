//! Core business logic for fedigram.

pub mod services;

pub use services::*;
