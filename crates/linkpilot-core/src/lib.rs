//! # LinkPilot Core
//!
//! The analysis engine behind LinkPilot: keyword and phrase extraction,
//! relevance scoring for internal-link suggestions, and corpus-wide
//! link-graph construction for orphan detection.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. All corpus
//! access goes through the [`store::DocumentStore`] trait, so the engine
//! can run against SQLite, an in-memory fixture, or any other backend.
//!
//! ## Pipeline
//!
//! ```text
//! content ──▶ tokenize ──▶ terms ──▶ score ──▶ suggestions
//!
//! corpus  ──▶ links ──▶ graph ──▶ orphans (paginated)
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`tokenize`] | Markup stripping, normalization, stop-word filtering |
//! | [`terms`] | Ranked keywords and bigram phrases |
//! | [`links`] | Anchor extraction and internal-link classification |
//! | [`signals`] | Pluggable "excluded from indexing" checks |
//! | [`score`] | Weighted relevance scoring of candidate documents |
//! | [`graph`] | Inbound link graph, orphan detection, link stats |
//! | [`engine`] | Per-request facade over the operations above |
//! | [`store`] | Document store trait and in-memory implementation |

pub mod engine;
pub mod error;
pub mod graph;
pub mod links;
pub mod models;
pub mod score;
pub mod signals;
pub mod store;
pub mod terms;
pub mod tokenize;

pub use engine::{Engine, EngineSettings};
pub use error::EngineError;
