//! WordPress REST client.
//!
//! This crate is the single source of truth for the remote wire contract:
//! Basic auth, per-entity endpoints, list / create / update, and how HTTP
//! failures are classified.
//!
//! Blocking, one request at a time. No retries.

mod auth;
mod client;
mod entity;

pub use auth::Credentials;
pub use client::{ClientError, Collection, WpClient, REQUEST_TIMEOUT};
pub use entity::{EntityKind, RemoteEntity, WriteAck};
