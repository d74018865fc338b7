// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_sqlite::Queryable;
use anacat_type::TableId;

use crate::{CatalogStore, Result};

impl CatalogStore {
	pub(crate) fn create_physical_table_link(tx: &impl Queryable, logical: TableId, physical: TableId) -> Result<()> {
		tx.execute(
			"INSERT INTO mapd_logical_to_physical (logical_table_id, physical_table_id) VALUES (?1, ?2)",
			&[&*logical, &*physical],
		)?;
		Ok(())
	}

	pub(crate) fn delete_physical_table_links(tx: &impl Queryable, logical: TableId) -> Result<()> {
		tx.execute("DELETE FROM mapd_logical_to_physical WHERE logical_table_id = ?1", &[&*logical])?;
		Ok(())
	}

	/// `(logical, physical)` pairs in insertion order.
	pub(crate) fn list_physical_table_links(rx: &impl Queryable) -> Result<Vec<(TableId, TableId)>> {
		let rows = rx.query(
			"SELECT logical_table_id, physical_table_id FROM mapd_logical_to_physical ORDER BY rowid",
			&[],
		)?;
		Ok(rows.iter().map(|row| (TableId(row.get_i32(0)), TableId(row.get_i32(1)))).collect())
	}
}
