// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Schema upgrades applied at startup.
//!
//! Steps run in a fixed order, each in its own transaction and each guarded
//! by a check of the schema it produces, so running them again is a no-op.
//! A failing step rolls back on its own and aborts startup.

use anacat_sqlite::{Queryable, RowStore, StoreTxn};
use tracing::{debug, info};

use crate::Result;

mod database;
mod system;

pub(crate) use database::migrate_database;
pub(crate) use system::migrate_system;

/// Present once object ownership has been recorded in the role tables.
pub(crate) const RECORD_OWNERSHIP_MARKER: &str = "mapd_record_ownership_marker";

/// Root user id written into legacy rows that have no owner.
const ROOT_USER_ID: i32 = 0;

/// Marks a freshly created database store as needing no migration.
pub(crate) fn mark_database_current(tx: &impl Queryable) -> Result<()> {
	tx.execute(&format!("CREATE TABLE IF NOT EXISTS {} (dummy integer)", RECORD_OWNERSHIP_MARKER), &[])?;
	Ok(())
}

/// One migration step. `run` returns whether it changed anything.
pub(crate) struct Step<C> {
	pub name: &'static str,
	pub run: fn(&StoreTxn<'_>, &C) -> Result<bool>,
}

fn run_steps<C>(store: &RowStore, steps: &[Step<C>], context: &C) -> Result<usize> {
	let mut applied = 0;
	for step in steps {
		let txn = store.begin()?;
		let changed = (step.run)(&txn, context)?;
		txn.commit()?;

		if changed {
			info!(step = step.name, "migration applied");
			applied += 1;
		} else {
			debug!(step = step.name, "migration already applied");
		}
	}
	Ok(applied)
}

/// Adds `column` to `table` unless it is there already.
fn add_column(tx: &impl Queryable, table: &str, column: &str, definition: &str) -> Result<bool> {
	if tx.has_column(table, column)? {
		return Ok(false);
	}
	tx.execute(&format!("ALTER TABLE {} ADD {} {}", table, column, definition), &[])?;
	Ok(true)
}

#[cfg(test)]
mod tests {
	use anacat_sqlite::{Queryable, RowStore};

	use super::{Step, add_column, run_steps};

	fn create_t(tx: &anacat_sqlite::StoreTxn<'_>, _: &()) -> crate::Result<bool> {
		if tx.table_exists("t")? {
			return Ok(false);
		}
		tx.execute("CREATE TABLE t (a integer)", &[])?;
		Ok(true)
	}

	fn add_b(tx: &anacat_sqlite::StoreTxn<'_>, _: &()) -> crate::Result<bool> {
		add_column(tx, "t", "b", "integer DEFAULT 1")
	}

	fn fail(tx: &anacat_sqlite::StoreTxn<'_>, _: &()) -> crate::Result<bool> {
		tx.execute("CREATE TABLE half (a integer)", &[])?;
		tx.execute("INSERT INTO missing VALUES (1)", &[])?;
		Ok(true)
	}

	const STEPS: &[Step<()>] = &[
		Step {
			name: "create_t",
			run: create_t,
		},
		Step {
			name: "add_b",
			run: add_b,
		},
	];

	#[test]
	fn test_steps_run_once() {
		let store = RowStore::in_memory().unwrap();
		assert_eq!(run_steps(&store, STEPS, &()).unwrap(), 2);
		assert_eq!(run_steps(&store, STEPS, &()).unwrap(), 0);
		assert_eq!(store.table_columns("t").unwrap(), vec!["a", "b"]);
	}

	#[test]
	fn test_failing_step_rolls_back() {
		let store = RowStore::in_memory().unwrap();
		let steps = [Step {
			name: "fail",
			run: fail,
		}];
		assert!(run_steps(&store, &steps, &()).is_err());
		assert!(!store.table_exists("half").unwrap());
	}
}
