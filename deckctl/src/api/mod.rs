//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Form extractors and response bodies
//!
//! # API Structure
//!
//! - **Upload** (`POST /powerpoint`): receives a spreadsheet and a chart message
//! - **Health** (`GET /healthz`): liveness check
//! - **Docs** (`GET /openapi.json`, `GET /docs`): generated API documentation

pub mod handlers;
pub mod models;
