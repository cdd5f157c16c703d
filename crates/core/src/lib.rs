//! PetHaven Core - Shared types library.
//!
//! This crate provides common types used across all PetHaven components:
//! - `site` - Public marketplace site (browsing, adopter accounts, vendor dashboard)
//! - `admin` - Internal moderation panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no sessions. Everything persistent lives behind the adoption
//! backend; this crate models the documents that backend returns and the
//! client-side contracts the frontends share.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, email, statuses, and entity documents
//! - [`envelope`] - The backend's `{success, message, ...}` response envelope
//! - [`collection`] - Client-side list filtering and optimistic mutation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collection;
pub mod envelope;
pub mod types;

pub use collection::{Collection, Keyed, Snapshot};
pub use envelope::{Ack, Envelope, Rejection};
pub use types::*;
