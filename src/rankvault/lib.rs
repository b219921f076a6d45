//! # Rankvault Architecture
//!
//! Rankvault keeps game account credentials grouped by server and enriches
//! them with ranks scraped from a public ranking site. Like any shell-agnostic
//! library, it is a library first; the `rankvault` binary is one client.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Owns the session file and the exit code                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Holds the rank mapping and config, emits ShellEvents     │
//! │  - Drives rank refresh batches                              │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                              │
//!                  ▼                              ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │  Command Layer (commands/)   │  │  Fetch Layer (fetch/)        │
//! │  - Server and account logic  │  │  - URL plan, HTTP, scraping  │
//! │  - Returns CmdResult         │  │  - One background worker     │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!                  │                              │
//!                  ▼                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - AccountStore trait, whole-tree persist after each change │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes plain arguments and returns
//! `Result<CmdResult>`. It never prints and never exits the process. The
//! only I/O below the CLI is the store file, the config and session files,
//! the rank mapping file, HTTP requests made by the refresh worker, and the
//! clipboard helper.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction and implementations
//! - [`fetch`]: Rank refresh pipeline
//! - [`model`]: Core data types (`Root`, `Account`, `Ranks`)
//! - [`ranking`]: Tier ordering values and display names
//! - [`session`]: Current server selection
//! - [`events`]: Notifications to the shell
//! - [`config`]: Configuration management
//! - [`init`]: Data directory resolution and startup
//! - [`clipboard`]: Cross-platform clipboard support
//! - [`error`]: Error types
//! - `cli`: Argument parsing and rendering for the binary (not part of the lib API)

pub mod api;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod init;
pub mod model;
pub mod ranking;
pub mod session;
pub mod store;
