// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use anacat_sqlite::{RowStore, StoreTxn};

use crate::Result;

/// Transactions on the system store and on a database store, opened in that
/// order. The default database lives in the system file, so both sides are
/// then the same transaction.
pub(crate) struct DualTxn<'a> {
	sys: StoreTxn<'a>,
	db: Option<StoreTxn<'a>>,
}

impl<'a> DualTxn<'a> {
	pub(crate) fn begin(system: &'a Arc<RowStore>, database: &'a Arc<RowStore>) -> Result<Self> {
		let sys = system.begin()?;
		let db = if Arc::ptr_eq(system, database) {
			None
		} else {
			Some(database.begin()?)
		};
		Ok(Self {
			sys,
			db,
		})
	}

	pub(crate) fn sys(&self) -> &StoreTxn<'a> {
		&self.sys
	}

	pub(crate) fn db(&self) -> &StoreTxn<'a> {
		self.db.as_ref().unwrap_or(&self.sys)
	}

	/// Commits the database side first; a failure there rolls back both.
	/// A failure on the system side after that leaves the database side
	/// committed and the system side rolled back.
	pub(crate) fn commit(self) -> Result<()> {
		if let Some(db) = self.db {
			db.commit()?;
		}
		self.sys.commit()
	}
}
