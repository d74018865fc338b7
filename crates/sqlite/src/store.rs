// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::{Path, PathBuf};

use anacat_type::Result;
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{debug, instrument};

use crate::{
	DbPath, OpenFlags, SqliteConfig,
	error::store_error,
	query::Queryable,
	txn::StoreTxn,
};

/// A single SQLite connection. Statements outside a [`StoreTxn`] auto-commit.
///
/// The connection mutex is held for the whole life of a `StoreTxn`, so the
/// store must not be used directly from a thread that has a transaction open.
pub struct RowStore {
	conn: Mutex<Connection>,
	path: Option<PathBuf>,
}

impl RowStore {
	#[instrument(name = "store::sqlite::open", level = "info", skip(config), fields(
		db_path = ?config.path,
		journal_mode = %config.journal_mode.as_str()
	))]
	pub fn open(config: SqliteConfig) -> Result<Self> {
		let flags = convert_flags(&config.flags);

		let (conn, path) = match &config.path {
			DbPath::File(path) => {
				(Connection::open_with_flags(path, flags).map_err(store_error)?, Some(path.clone()))
			}
			DbPath::Memory => (Connection::open_in_memory_with_flags(flags).map_err(store_error)?, None),
		};

		conn.pragma_update(None, "journal_mode", config.journal_mode.as_str()).map_err(store_error)?;
		conn.pragma_update(None, "synchronous", config.synchronous_mode.as_str()).map_err(store_error)?;
		conn.pragma_update(None, "temp_store", config.temp_store.as_str()).map_err(store_error)?;
		conn.busy_timeout(config.busy_timeout).map_err(store_error)?;
		// bundled SQLite is built with foreign keys on by default
		conn.pragma_update(None, "foreign_keys", if config.foreign_keys {
			"ON"
		} else {
			"OFF"
		})
		.map_err(store_error)?;

		Ok(Self {
			conn: Mutex::new(conn),
			path,
		})
	}

	pub fn in_memory() -> Result<Self> {
		Self::open(SqliteConfig::in_memory())
	}

	/// Backing file; `None` for in-memory stores.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Starts a transaction, blocking while another one is open.
	pub fn begin(&self) -> Result<StoreTxn<'_>> {
		let conn = self.conn.lock();
		debug!("BEGIN TRANSACTION");
		StoreTxn::begin(conn)
	}
}

impl Queryable for RowStore {
	fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
		let conn = self.conn.lock();
		f(&conn)
	}
}

fn convert_flags(flags: &OpenFlags) -> rusqlite::OpenFlags {
	let mut result = rusqlite::OpenFlags::empty();

	if flags.read_write {
		result |= rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE;
	}

	if flags.create {
		result |= rusqlite::OpenFlags::SQLITE_OPEN_CREATE;
	}

	if flags.full_mutex {
		result |= rusqlite::OpenFlags::SQLITE_OPEN_FULL_MUTEX;
	}

	if flags.no_mutex {
		result |= rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX;
	}

	if flags.shared_cache {
		result |= rusqlite::OpenFlags::SQLITE_OPEN_SHARED_CACHE;
	}

	if flags.private_cache {
		result |= rusqlite::OpenFlags::SQLITE_OPEN_PRIVATE_CACHE;
	}

	if flags.uri {
		result |= rusqlite::OpenFlags::SQLITE_OPEN_URI;
	}

	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_auto_commit_statements() {
		let store = RowStore::in_memory().unwrap();
		store.execute_batch("CREATE TABLE t (id integer primary key, name text)").unwrap();
		store.execute("INSERT INTO t (name) VALUES (?1)", &[&"a"]).unwrap();
		assert_eq!(store.last_insert_id().unwrap(), 1);

		let rows = store.query("SELECT id, name FROM t", &[]).unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows.first().unwrap().get_string(1), "a");
	}

	#[test]
	fn test_table_introspection() {
		let store = RowStore::in_memory().unwrap();
		assert!(!store.table_exists("t").unwrap());
		store.execute_batch("CREATE TABLE t (a integer, b text)").unwrap();
		assert!(store.table_exists("t").unwrap());
		assert_eq!(store.table_columns("t").unwrap(), vec!["a".to_string(), "b".to_string()]);
		assert!(store.has_column("t", "B").unwrap());
	}

	const PARENT_CHILD: &str = "CREATE TABLE parent (id integer primary key); \
		CREATE TABLE child (parent integer references parent)";

	#[test]
	fn test_references_not_enforced_by_default() {
		let store = RowStore::in_memory().unwrap();
		store.execute_batch(PARENT_CHILD).unwrap();
		assert_eq!(store.execute("INSERT INTO child VALUES (42)", &[]).unwrap(), 1);
	}

	#[test]
	fn test_references_enforced_when_enabled() {
		let store = RowStore::open(SqliteConfig::in_memory().foreign_keys(true)).unwrap();
		store.execute_batch(PARENT_CHILD).unwrap();
		assert_eq!(store.execute("INSERT INTO child VALUES (42)", &[]).unwrap_err().code, "STORE_001");
	}

	#[test]
	fn test_bad_statement_is_store_failure() {
		let store = RowStore::in_memory().unwrap();
		let err = store.execute("INSERT INTO missing VALUES (1)", &[]).unwrap_err();
		assert_eq!(err.code, "STORE_001");
		assert_eq!(err.statement.as_deref(), Some("INSERT INTO missing VALUES (1)"));
	}
}
