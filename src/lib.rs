//! Business-registry lookup client.
//!
//! Resolves a variable-schema card from the zachestnyibiznes Monitoring API
//! into a fixed set of company attributes (name, ИНН, ОГРН, КПП, status,
//! address, ОКВЭД).
//!
//! # Modules
//!
//! - `tree`: decoded response tree and its flattener.
//! - `resolver`: ranked synonym resolution over the flattened tree.
//! - `renderer`: display strings for resolved values, person-name assembly.
//! - `services`: Monitoring API client (add-id, card) and envelope checks.
//! - `lookup`: the lookup workflow and card normalization.
//! - `cache`: file-backed response cache.
//! - `cache_validator`: checksummed cache entries.
//! - `config`: configuration and URL templates.
//! - `errors`: error types.
//! - `handlers`: HTTP handlers and router.
//! - `models`: normalized record and canonical fields.

pub mod cache;
pub mod cache_validator;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lookup;
pub mod models;
pub mod renderer;
pub mod resolver;
pub mod services;
pub mod tree;
