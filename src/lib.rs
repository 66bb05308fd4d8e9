//! Folio: portfolio site server.
//!
//! ARCHITECTURE
//! ============
//! Static site plus a small JSON API. The only stateful piece is the contact
//! form's rate-limit guard, which keeps one counter row per (client, action,
//! window) in a hosted table and fails open when that table is unreachable.

pub mod backend;
pub mod config;
pub mod contact;
pub mod content;
pub mod fingerprint;
pub mod rate_limit;
pub mod routes;
pub mod sanitize;
pub mod state;
