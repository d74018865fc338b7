// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_sqlite::Queryable;
use anacat_type::TableId;

use crate::{CatalogStore, Result};

impl CatalogStore {
	pub(crate) fn create_view(tx: &impl Queryable, table: TableId, sql: &str) -> Result<()> {
		tx.execute("INSERT INTO mapd_views (tableid, sql) VALUES (?1, ?2)", &[&*table, &sql])?;
		Ok(())
	}

	pub(crate) fn delete_view(tx: &impl Queryable, table: TableId) -> Result<()> {
		tx.execute("DELETE FROM mapd_views WHERE tableid = ?1", &[&*table])?;
		Ok(())
	}

	pub(crate) fn list_views(rx: &impl Queryable) -> Result<Vec<(TableId, String)>> {
		let rows = rx.query("SELECT tableid, sql FROM mapd_views", &[])?;
		Ok(rows.iter().map(|row| (TableId(row.get_i32(0)), row.get_string(1))).collect())
	}
}
