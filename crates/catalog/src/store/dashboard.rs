// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::{DashboardDef, DashboardToCreate};
use anacat_sqlite::{Queryable, Row};
use anacat_type::{DashboardId, UserId};

use crate::{CatalogStore, Result};

const SELECT: &str = "SELECT id, name, userid, state, image_hash, update_time, metadata FROM mapd_dashboards";

fn dashboard_from_row(row: &Row) -> DashboardDef {
	DashboardDef {
		id: DashboardId(row.get_i32(0)),
		name: row.get_string(1),
		user: UserId(row.get_i32(2)),
		state: row.get_string(3),
		image_hash: row.get_string(4),
		update_time: row.get_string(5),
		metadata: row.get_string(6),
	}
}

impl CatalogStore {
	/// Inserts or overwrites the dashboard keyed by (user, name). Returns the
	/// stored row and whether it was newly inserted.
	pub(crate) fn upsert_dashboard(tx: &impl Queryable, dashboard: &DashboardToCreate) -> Result<(DashboardDef, bool)> {
		let existing = Self::find_dashboard_by_name(tx, dashboard.user, &dashboard.name)?;

		if existing.is_some() {
			tx.execute(
				"UPDATE mapd_dashboards SET state = ?1, image_hash = ?2, metadata = ?3, \
				 update_time = datetime('now') WHERE userid = ?4 AND name = ?5",
				&[&dashboard.state, &dashboard.image_hash, &dashboard.metadata, &*dashboard.user, &dashboard.name],
			)?;
		} else {
			tx.execute(
				"INSERT INTO mapd_dashboards (name, state, image_hash, update_time, userid, metadata) \
				 VALUES (?1, ?2, ?3, datetime('now'), ?4, ?5)",
				&[&dashboard.name, &dashboard.state, &dashboard.image_hash, &*dashboard.user, &dashboard.metadata],
			)?;
		}

		match Self::find_dashboard_by_name(tx, dashboard.user, &dashboard.name)? {
			Some(stored) => Ok((stored, existing.is_none())),
			None => anacat_type::internal_err!("dashboard `{}` vanished after upsert", dashboard.name),
		}
	}

	pub(crate) fn replace_dashboard(tx: &impl Queryable, dashboard: &DashboardDef) -> Result<Option<DashboardDef>> {
		tx.execute(
			"UPDATE mapd_dashboards SET name = ?1, userid = ?2, state = ?3, image_hash = ?4, \
			 update_time = datetime('now'), metadata = ?5 WHERE id = ?6",
			&[
				&dashboard.name,
				&*dashboard.user,
				&dashboard.state,
				&dashboard.image_hash,
				&dashboard.metadata,
				&*dashboard.id,
			],
		)?;
		Self::find_dashboard(tx, dashboard.id)
	}

	pub(crate) fn find_dashboard(rx: &impl Queryable, id: DashboardId) -> Result<Option<DashboardDef>> {
		let rows = rx.query(&format!("{} WHERE id = ?1", SELECT), &[&*id])?;
		Ok(rows.first().map(dashboard_from_row))
	}

	pub(crate) fn find_dashboard_by_name(
		rx: &impl Queryable,
		user: UserId,
		name: &str,
	) -> Result<Option<DashboardDef>> {
		let rows = rx.query(&format!("{} WHERE userid = ?1 AND name = ?2", SELECT), &[&*user, &name])?;
		Ok(rows.first().map(dashboard_from_row))
	}

	pub(crate) fn delete_dashboard(tx: &impl Queryable, id: DashboardId) -> Result<()> {
		tx.execute("DELETE FROM mapd_dashboards WHERE id = ?1", &[&*id])?;
		Ok(())
	}

	pub(crate) fn list_dashboards(rx: &impl Queryable) -> Result<Vec<DashboardDef>> {
		let rows = rx.query(&format!("{} ORDER BY id", SELECT), &[])?;
		Ok(rows.iter().map(dashboard_from_row).collect())
	}
}
