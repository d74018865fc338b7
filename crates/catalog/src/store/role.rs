// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::DbObject;
use anacat_sqlite::Queryable;
use anacat_type::{AccessPrivileges, DatabaseId, DbObjectKey, DbObjectType, UserId};

use crate::{CatalogStore, Result};

/// A row of `mapd_object_permissions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ObjectPermission {
	pub role: String,
	pub is_private: bool,
	pub object: DbObject,
}

impl CatalogStore {
	pub(crate) fn insert_user_role(tx: &impl Queryable, role: &str, user_name: &str) -> Result<()> {
		tx.execute("INSERT INTO mapd_roles (roleName, userName) VALUES (?1, ?2)", &[&role, &user_name])?;
		Ok(())
	}

	pub(crate) fn delete_user_role(tx: &impl Queryable, role: &str, user_name: &str) -> Result<()> {
		tx.execute("DELETE FROM mapd_roles WHERE roleName = ?1 AND userName = ?2", &[&role, &user_name])?;
		Ok(())
	}

	pub(crate) fn delete_user_roles_of_user(tx: &impl Queryable, user_name: &str) -> Result<()> {
		tx.execute("DELETE FROM mapd_roles WHERE userName = ?1", &[&user_name])?;
		Ok(())
	}

	pub(crate) fn delete_role(tx: &impl Queryable, role: &str) -> Result<()> {
		tx.execute("DELETE FROM mapd_roles WHERE roleName = ?1", &[&role])?;
		tx.execute("DELETE FROM mapd_object_permissions WHERE roleName = ?1", &[&role])?;
		Ok(())
	}

	/// `(role, user name)` membership pairs.
	pub(crate) fn list_user_roles(rx: &impl Queryable) -> Result<Vec<(String, String)>> {
		let rows = rx.query("SELECT roleName, userName FROM mapd_roles", &[])?;
		Ok(rows.iter().map(|row| (row.get_string(0), row.get_string(1))).collect())
	}

	pub(crate) fn upsert_object_permission(
		tx: &impl Queryable,
		role: &str,
		is_private: bool,
		object: &DbObject,
	) -> Result<()> {
		tx.execute(
			"INSERT OR REPLACE INTO mapd_object_permissions \
			 (roleName, roleType, objectPermissionsType, dbId, objectId, objectPermissions, objectOwnerId, objectName) \
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
			&[
				&role,
				&is_private,
				&object.key.object_type.code(),
				&*object.key.db_id,
				&object.key.object_id,
				&object.privileges.as_i64(),
				&*object.owner,
				&object.name,
			],
		)?;
		Ok(())
	}

	pub(crate) fn delete_object_permission(tx: &impl Queryable, role: &str, key: &DbObjectKey) -> Result<()> {
		tx.execute(
			"DELETE FROM mapd_object_permissions WHERE roleName = ?1 AND objectPermissionsType = ?2 \
			 AND dbId = ?3 AND objectId = ?4",
			&[&role, &key.object_type.code(), &*key.db_id, &key.object_id],
		)?;
		Ok(())
	}

	pub(crate) fn list_object_permissions(rx: &impl Queryable) -> Result<Vec<ObjectPermission>> {
		let rows = rx.query(
			"SELECT roleName, roleType, objectPermissionsType, dbId, objectId, objectPermissions, \
			 objectOwnerId, objectName FROM mapd_object_permissions",
			&[],
		)?;

		let mut result = Vec::with_capacity(rows.len());
		for row in &rows {
			let key = DbObjectKey::new(
				DbObjectType::from_code(row.get_i32(2))?,
				DatabaseId(row.get_i32(3)),
				row.get_i32(4),
			);
			result.push(ObjectPermission {
				role: row.get_string(0),
				is_private: row.get_bool(1),
				object: DbObject {
					key,
					privileges: AccessPrivileges::from_i64(row.get_i64(5)),
					owner: UserId(row.get_i32(6)),
					name: row.get_string(7),
				},
			});
		}
		Ok(result)
	}

	/// Names of non-private roles holding any record in `db`.
	pub(crate) fn list_roles_for_database(rx: &impl Queryable, db: DatabaseId) -> Result<Vec<String>> {
		let rows = rx.query(
			"SELECT DISTINCT roleName FROM mapd_object_permissions WHERE roleType = 0 AND dbId = ?1 \
			 ORDER BY roleName",
			&[&*db],
		)?;
		Ok(rows.iter().map(|row| row.get_string(0)).collect())
	}
}
