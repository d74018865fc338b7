// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::{DbObject, SYSTEM_DATABASE_NAME, UserDef};
use anacat_sqlite::{Queryable, RowStore, StoreTxn};
use anacat_type::{DashboardId, DbObjectKey, DbObjectType, TableId};
use tracing::{debug, instrument};

use super::{SystemCatalog, require_user};
use crate::{
	CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
	layout,
};

impl SystemCatalog {
	/// Adds `object.privileges` to the role's record on `object.key`.
	#[instrument(name = "catalog::system::grant_privileges", level = "debug", skip(self, object), fields(key = %object.key))]
	pub fn grant_db_object_privileges(&self, role: &str, object: &DbObject) -> Result<()> {
		self.require_privileges()?;
		self.mutate_roles(|roles, tx| {
			self.require_object(tx, &object.key)?;
			roles.grant_object(tx, role, object)
		})
	}

	#[instrument(name = "catalog::system::revoke_privileges", level = "debug", skip(self, object), fields(key = %object.key))]
	pub fn revoke_db_object_privileges(&self, role: &str, object: &DbObject) -> Result<()> {
		self.require_privileges()?;
		self.mutate_roles(|roles, tx| {
			self.require_object(tx, &object.key)?;
			roles.revoke_object(tx, role, object)
		})
	}

	/// Forgets `key` in every role. Returns how many records were removed.
	pub fn revoke_db_object_privileges_from_all_roles(&self, key: &DbObjectKey) -> Result<usize> {
		self.require_privileges()?;
		let removed = self.mutate_roles(|roles, tx| roles.revoke_from_all(tx, key))?;
		debug!(key = %key, removed, "privileges revoked from all roles");
		Ok(removed)
	}

	/// Records `owner` as the owner of a new object with every privilege on
	/// it. No record is written for superusers.
	pub fn create_db_object(&self, owner: &UserDef, key: DbObjectKey, name: &str) -> Result<()> {
		self.require_privileges()?;
		self.mutate_roles(|roles, tx| self.grant_ownership(roles, tx, owner, key, name))
	}

	/// True when the user holds every wanted privilege of every object,
	/// directly on its key or on the type-wide key of its database.
	pub fn check_privileges(&self, user: &UserDef, objects: &[DbObject]) -> Result<bool> {
		self.require_privileges()?;
		if user.is_super {
			return Ok(true);
		}
		Ok(self.read_roles(|roles| roles.check_privileges(user.id, objects)))
	}

	/// True when the user holds at least one wanted privilege of every object.
	pub fn has_any_privileges(&self, user: &UserDef, objects: &[DbObject]) -> Result<bool> {
		self.require_privileges()?;
		if user.is_super {
			return Ok(true);
		}
		Ok(self.read_roles(|roles| roles.has_any_privileges(user.id, objects)))
	}

	pub fn check_privileges_for_user_name(&self, user_name: &str, objects: &[DbObject]) -> Result<bool> {
		let user = require_user(self.store.as_ref(), user_name)?;
		self.check_privileges(&user, objects)
	}

	/// True when one of the user's roles holds `key` with the user recorded
	/// as owner.
	pub fn verify_db_object_ownership(&self, user: &UserDef, key: &DbObjectKey) -> Result<bool> {
		self.require_privileges()?;
		Ok(self.read_roles(|roles| roles.owns(user.id, key)))
	}

	/// Fails unless the database of `key` exists and, for a single table,
	/// view or dashboard, the object exists in that database. Runs with the
	/// writer held, so no drop can race it.
	fn require_object(&self, tx: &StoreTxn<'_>, key: &DbObjectKey) -> Result<()> {
		let Some(db) = CatalogStore::find_database(tx, key.db_id)? else {
			return Err(CatalogError::NotFound {
				kind: CatalogObjectKind::Database,
				name: key.db_id.to_string(),
			}
			.into());
		};
		if key.object_id == DbObjectKey::WILDCARD {
			return Ok(());
		}

		let exists = if db.name == SYSTEM_DATABASE_NAME {
			object_exists(tx, key)?
		} else {
			let path = layout::catalog_file(&self.config.base_path, &db.name);
			if !path.exists() {
				return Err(CatalogError::Inconsistent {
					message: format!("catalog file {} of database `{}` is missing", path.display(), db.name),
				}
				.into());
			}
			object_exists(&RowStore::open(self.config.sqlite.with_path(&path))?, key)?
		};

		if !exists {
			let kind = match key.object_type {
				DbObjectType::View => CatalogObjectKind::View,
				DbObjectType::Dashboard => CatalogObjectKind::Dashboard,
				_ => CatalogObjectKind::Table,
			};
			return Err(CatalogError::NotFound {
				kind,
				name: key.to_string(),
			}
			.into());
		}
		Ok(())
	}
}

fn object_exists(rx: &impl Queryable, key: &DbObjectKey) -> Result<bool> {
	Ok(match key.object_type {
		DbObjectType::Table => CatalogStore::table_is_view(rx, TableId(key.object_id))? == Some(false),
		DbObjectType::View => CatalogStore::table_is_view(rx, TableId(key.object_id))? == Some(true),
		DbObjectType::Dashboard => CatalogStore::find_dashboard(rx, DashboardId(key.object_id))?.is_some(),
		DbObjectType::Database | DbObjectType::Abstract => true,
	})
}
