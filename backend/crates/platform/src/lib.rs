//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, URL-safe Base64)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Flash messages carried across redirects
//! - Form bodies decoded from urlencoded or JSON input
//! - The HTML page shell every view is rendered into

pub mod cookie;
pub mod crypto;
pub mod flash;
pub mod form;
pub mod password;
pub mod view;
