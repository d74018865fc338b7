// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::DatabaseDef;
use anacat_sqlite::{Queryable, Row};
use anacat_type::{DatabaseId, UserId};

use crate::{CatalogStore, Result};

fn database_from_row(row: &Row) -> DatabaseDef {
	DatabaseDef {
		id: DatabaseId(row.get_i32(0)),
		name: row.get_string(1),
		owner: UserId(row.get_i32(2)),
	}
}

impl CatalogStore {
	pub(crate) fn create_database(tx: &impl Queryable, name: &str, owner: UserId) -> Result<DatabaseDef> {
		tx.execute("INSERT INTO mapd_databases (name, owner) VALUES (?1, ?2)", &[&name, &*owner])?;
		Ok(DatabaseDef {
			id: DatabaseId(tx.last_insert_id()? as i32),
			name: name.to_string(),
			owner,
		})
	}

	/// Database names compare case-insensitively; the stored spelling is kept.
	pub(crate) fn find_database_by_name(rx: &impl Queryable, name: &str) -> Result<Option<DatabaseDef>> {
		let rows = rx.query("SELECT dbid, name, owner FROM mapd_databases WHERE upper(name) = upper(?1)", &[&name])?;
		Ok(rows.first().map(database_from_row))
	}

	pub(crate) fn find_database(rx: &impl Queryable, id: DatabaseId) -> Result<Option<DatabaseDef>> {
		let rows = rx.query("SELECT dbid, name, owner FROM mapd_databases WHERE dbid = ?1", &[&*id])?;
		Ok(rows.first().map(database_from_row))
	}

	pub(crate) fn list_databases(rx: &impl Queryable) -> Result<Vec<DatabaseDef>> {
		let rows = rx.query("SELECT dbid, name, owner FROM mapd_databases ORDER BY dbid", &[])?;
		Ok(rows.iter().map(database_from_row).collect())
	}

	pub(crate) fn delete_database(tx: &impl Queryable, id: DatabaseId) -> Result<()> {
		tx.execute("DELETE FROM mapd_databases WHERE dbid = ?1", &[&*id])?;
		Ok(())
	}
}
