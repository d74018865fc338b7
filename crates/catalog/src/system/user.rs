// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::{DbObject, SYSTEM_DATABASE_NAME, UserDef};
use anacat_type::{AccessPrivileges, DatabaseId, DbObjectKey, UserId};
use tracing::{info, instrument};

use super::{SystemCatalog, require_user};
use crate::{
	CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
};

impl SystemCatalog {
	/// Creates a user. With privileges enabled the user also gets a private
	/// role of the same name, an empty grant on the default database and
	/// membership in that role.
	#[instrument(name = "catalog::system::create_user", level = "info", skip(self, password))]
	pub fn create_user(&self, name: &str, password: &str, is_super: bool) -> Result<UserDef> {
		let _writer = self.lock_writer();
		let txn = self.store.begin()?;

		if CatalogStore::find_user_by_name(&txn, name)?.is_some() {
			return Err(CatalogError::AlreadyExists {
				kind: CatalogObjectKind::User,
				name: name.to_string(),
			}
			.into());
		}

		let mut roles = self.working_roles();
		if self.privileges_enabled() && roles.group(name).is_some() {
			return Err(CatalogError::AlreadyExists {
				kind: CatalogObjectKind::Role,
				name: name.to_string(),
			}
			.into());
		}

		let user = CatalogStore::create_user(&txn, name, password, is_super)?;

		if self.privileges_enabled() {
			let default_db = CatalogStore::find_database_by_name(&txn, SYSTEM_DATABASE_NAME)?
				.map(|db| db.id)
				.unwrap_or(DatabaseId(0));

			roles.create_role(&txn, name, true)?;
			roles.grant_object(
				&txn,
				name,
				&DbObject::new(DbObjectKey::database(default_db), AccessPrivileges::NONE, SYSTEM_DATABASE_NAME),
			)?;
			roles.grant_role(&txn, name, &user)?;
		}

		txn.commit()?;
		self.publish_roles(roles);

		info!(user = *user.id, "user created");
		Ok(user)
	}

	/// Removes a user with its private role, its memberships and its legacy
	/// ACL rows. Grants the user's private role held are gone with the role.
	#[instrument(name = "catalog::system::drop_user", level = "info", skip(self))]
	pub fn drop_user(&self, name: &str) -> Result<()> {
		let _writer = self.lock_writer();
		let txn = self.store.begin()?;

		let user = require_user(&txn, name)?;
		if user.id == UserId::ROOT {
			return Err(CatalogError::PermissionDenied {
				message: format!("user `{}` cannot be dropped", name),
			}
			.into());
		}

		let mut roles = self.working_roles();
		if self.privileges_enabled() {
			if roles.group(name).is_some() {
				roles.drop_role(&txn, name)?;
			}
			roles.drop_user_role(&txn, &user)?;
		}

		CatalogStore::delete_user(&txn, user.id)?;
		CatalogStore::delete_legacy_privileges_for_user(&txn, user.id)?;

		txn.commit()?;
		self.publish_roles(roles);

		info!(user = *user.id, "user dropped");
		Ok(())
	}

	/// Changes the password and/or the superuser flag. `None` keeps the
	/// current value.
	#[instrument(name = "catalog::system::alter_user", level = "info", skip(self, password))]
	pub fn alter_user(&self, name: &str, password: Option<&str>, is_super: Option<bool>) -> Result<UserDef> {
		let _writer = self.lock_writer();
		let txn = self.store.begin()?;

		let mut user = require_user(&txn, name)?;
		if let Some(password) = password {
			CatalogStore::update_user_password(&txn, user.id, password)?;
			user.password = password.to_string();
		}
		if let Some(is_super) = is_super {
			CatalogStore::update_user_super(&txn, user.id, is_super)?;
			user.is_super = is_super;
		}

		txn.commit()?;
		Ok(user)
	}

	/// True when `password` matches. An unknown user is an error rather than
	/// a mismatch.
	pub fn check_password(&self, name: &str, password: &str) -> Result<bool> {
		let user = require_user(self.store.as_ref(), name)?;
		Ok(user.password == password)
	}

	pub fn user(&self, name: &str) -> Result<Option<UserDef>> {
		CatalogStore::find_user_by_name(self.store.as_ref(), name)
	}

	pub fn user_by_id(&self, id: UserId) -> Result<Option<UserDef>> {
		CatalogStore::find_user(self.store.as_ref(), id)
	}

	pub fn all_users(&self) -> Result<Vec<UserDef>> {
		CatalogStore::list_users(self.store.as_ref())
	}

	/// Users whose private role holds any record in `db`.
	pub fn users_for_database(&self, db: DatabaseId) -> Result<Vec<UserDef>> {
		self.require_privileges()?;
		CatalogStore::list_users_for_database(self.store.as_ref(), *db)
	}
}
