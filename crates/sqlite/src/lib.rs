// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

//! Transactional row store backing the catalog tables.

mod config;
mod error;
mod query;
mod store;
mod txn;

pub use config::{DbPath, JournalMode, OpenFlags, SqliteConfig, SynchronousMode, TempStore};
pub use error::store_error;
pub use query::{Queryable, Row, RowSet};
pub use rusqlite::{ToSql, params, types::Value};
pub use store::RowStore;
pub use txn::StoreTxn;
