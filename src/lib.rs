//! # LinkPilot
//!
//! Internal-link suggestions and orphaned-content detection for a content
//! corpus stored in SQLite.
//!
//! The analysis itself (tokenizing, term extraction, scoring, and the link
//! graph) lives in [`linkpilot_core`]. This crate adds persistence, import,
//! a CLI, and an HTTP server around it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌───────────────┐
//! │ JSON export │──▶│    import    │──▶│    SQLite     │
//! │   files     │   │ walk + glob  │   │ documents+meta│
//! └─────────────┘   └──────────────┘   └───────┬───────┘
//!                                              │ SqliteStore
//!                                              ▼
//!                                      ┌───────────────┐
//!                                      │ linkpilot-core│
//!                                      │    Engine     │
//!                                      └───┬───────┬───┘
//!                                          ▼       ▼
//!                                     ┌───────┐ ┌───────┐
//!                                     │  CLI  │ │ HTTP  │
//!                                     └───────┘ └───────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! linkpilot init                  # create database
//! linkpilot import                # load JSON exports
//! linkpilot analyze 42            # suggest links for document 42
//! linkpilot orphans --page 2      # documents nothing links to
//! linkpilot serve                 # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite document store |
//! | [`import`] | JSON corpus import |
//! | [`analyze`] | Keyword and suggestion command |
//! | [`orphans`] | Orphan listing command |
//! | [`stats`] | Per-document link stats command |
//! | [`server`] | HTTP server |

pub mod analyze;
pub mod config;
pub mod db;
pub mod import;
pub mod migrate;
pub mod orphans;
pub mod server;
pub mod sqlite_store;
pub mod stats;
