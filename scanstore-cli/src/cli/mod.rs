// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for Scanstore
//!
//! Inspects a catalog and performs the few edits an operator needs
//! without writing code: creating and dropping tables and finding orphans.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_create_table, handle_describe, handle_drop_table, handle_init, handle_jobs,
    handle_orphans, handle_tables, handle_version,
};
