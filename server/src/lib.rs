//! Gala Server
//!
//! Backend for a collaborative wedding photo/video gallery: guests upload
//! media straight to object storage, metadata lands in `PostgreSQL`, and
//! everyone browses a timeline-grouped gallery with emoji reactions.

pub mod api;
pub mod config;
pub mod db;
pub mod gallery;
