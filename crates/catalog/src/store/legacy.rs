// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_sqlite::Queryable;
use anacat_type::{DatabaseId, UserId};

use crate::{CatalogStore, Result};

/// A row of the legacy per database ACL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LegacyPrivilege {
	pub user: UserId,
	pub db: DatabaseId,
	pub select: bool,
	pub insert: bool,
}

impl CatalogStore {
	pub(crate) fn upsert_legacy_privileges(tx: &impl Queryable, privilege: &LegacyPrivilege) -> Result<()> {
		tx.execute(
			"INSERT OR REPLACE INTO mapd_privileges (userid, dbid, select_priv, insert_priv) VALUES (?1, ?2, ?3, ?4)",
			&[&*privilege.user, &*privilege.db, &privilege.select, &privilege.insert],
		)?;
		Ok(())
	}

	pub(crate) fn find_legacy_privileges(
		rx: &impl Queryable,
		user: UserId,
		db: DatabaseId,
	) -> Result<Option<LegacyPrivilege>> {
		let rows = rx.query(
			"SELECT select_priv, insert_priv FROM mapd_privileges WHERE userid = ?1 AND dbid = ?2",
			&[&*user, &*db],
		)?;
		Ok(rows.first().map(|row| LegacyPrivilege {
			user,
			db,
			select: row.get_bool(0),
			insert: row.get_bool(1),
		}))
	}

	pub(crate) fn list_legacy_privileges(rx: &impl Queryable) -> Result<Vec<LegacyPrivilege>> {
		let rows = rx.query("SELECT userid, dbid, select_priv, insert_priv FROM mapd_privileges", &[])?;
		Ok(rows
			.iter()
			.map(|row| LegacyPrivilege {
				user: UserId(row.get_i32(0)),
				db: DatabaseId(row.get_i32(1)),
				select: row.get_bool(2),
				insert: row.get_bool(3),
			})
			.collect())
	}

	pub(crate) fn delete_legacy_privileges_for_user(tx: &impl Queryable, user: UserId) -> Result<()> {
		tx.execute("DELETE FROM mapd_privileges WHERE userid = ?1", &[&*user])?;
		Ok(())
	}

	pub(crate) fn delete_legacy_privileges_for_database(tx: &impl Queryable, db: DatabaseId) -> Result<()> {
		tx.execute("DELETE FROM mapd_privileges WHERE dbid = ?1", &[&*db])?;
		Ok(())
	}
}
