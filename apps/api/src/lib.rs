//! Résumé optimizer: forwards résumé text to DeepSeek with a fixed prompt
//! and returns the rewritten text.
//!
//! Two deployment shapes share `optimize::OptimizeService`: the axum server
//! in `routes` (used by the `resume-optimizer` binary) and the
//! framework-neutral edge adapter in `edge`.

pub mod config;
pub mod cors;
pub mod edge;
pub mod errors;
pub mod llm_client;
pub mod optimize;
pub mod routes;
pub mod state;
