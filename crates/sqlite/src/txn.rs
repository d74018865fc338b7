// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::Result;
use parking_lot::MutexGuard;
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::{error::store_error, query::Queryable};

/// An open transaction holding the store's connection exclusively.
///
/// Dropping it without [`commit`](StoreTxn::commit) rolls back.
pub struct StoreTxn<'a> {
	conn: MutexGuard<'a, Connection>,
	done: bool,
}

impl<'a> StoreTxn<'a> {
	pub(crate) fn begin(conn: MutexGuard<'a, Connection>) -> Result<Self> {
		conn.execute_batch("BEGIN TRANSACTION").map_err(store_error)?;
		Ok(Self {
			conn,
			done: false,
		})
	}

	pub fn commit(mut self) -> Result<()> {
		self.done = true;
		match self.conn.execute_batch("END TRANSACTION") {
			Ok(()) => {
				debug!("END TRANSACTION");
				Ok(())
			}
			Err(err) => {
				// a failed COMMIT can leave the transaction open
				if !self.conn.is_autocommit() {
					let _ = self.conn.execute_batch("ROLLBACK TRANSACTION");
				}
				Err(store_error(err))
			}
		}
	}

	pub fn rollback(mut self) -> Result<()> {
		self.done = true;
		debug!("ROLLBACK TRANSACTION");
		self.conn.execute_batch("ROLLBACK TRANSACTION").map_err(store_error)
	}
}

impl Queryable for StoreTxn<'_> {
	fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
		f(&self.conn)
	}
}

impl Drop for StoreTxn<'_> {
	fn drop(&mut self) {
		if self.done {
			return;
		}
		warn!("transaction dropped without commit, rolling back");
		if let Err(err) = self.conn.execute_batch("ROLLBACK TRANSACTION") {
			warn!("rollback failed: {}", err);
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::{Queryable, RowStore};

	fn store() -> RowStore {
		let store = RowStore::in_memory().unwrap();
		store.execute_batch("CREATE TABLE t (v integer)").unwrap();
		store
	}

	#[test]
	fn test_commit_persists() {
		let store = store();
		let txn = store.begin().unwrap();
		txn.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
		txn.commit().unwrap();
		assert_eq!(store.query("SELECT v FROM t", &[]).unwrap().len(), 1);
	}

	#[test]
	fn test_rollback_discards() {
		let store = store();
		let txn = store.begin().unwrap();
		txn.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
		txn.rollback().unwrap();
		assert!(store.query("SELECT v FROM t", &[]).unwrap().is_empty());
	}

	#[test]
	fn test_drop_rolls_back() {
		let store = store();
		{
			let txn = store.begin().unwrap();
			txn.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
		}
		assert!(store.query("SELECT v FROM t", &[]).unwrap().is_empty());
	}
}
