//! Core types for PetHaven.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the entity documents served by the adoption backend.

pub mod adoption;
pub mod blog;
pub mod email;
pub mod id;
pub mod pet;
pub mod price;
pub mod status;
pub mod user;
pub mod vendor;

pub use adoption::AdoptionRequest;
pub use blog::BlogPost;
pub use email::{Email, EmailError};
pub use id::*;
pub use pet::Pet;
pub use price::Price;
pub use status::*;
pub use user::{BanInfo, User};
pub use vendor::VendorApplication;
