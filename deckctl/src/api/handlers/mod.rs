//! HTTP request handlers.
//!
//! - [`powerpoint`]: spreadsheet upload for slide generation
//!
//! # Error Handling
//!
//! Handlers and extractors return [`crate::errors::Error`], which converts to the appropriate
//! HTTP status code and a JSON `detail` body.

pub mod powerpoint;
