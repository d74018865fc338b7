// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::DbObject;
use anacat_type::{DatabaseId, DbObjectKey, UserId};
use tracing::{info, instrument};

use super::{SystemCatalog, require_user};
use crate::{
	CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
	role::{Role, RoleKey, UserRole, role_key},
};

impl SystemCatalog {
	#[instrument(name = "catalog::system::create_role", level = "info", skip(self))]
	pub fn create_role(&self, name: &str) -> Result<()> {
		self.require_privileges()?;
		self.mutate_roles(|roles, tx| {
			if CatalogStore::find_user_by_name(tx, name)?.is_some() {
				return Err(CatalogError::AlreadyExists {
					kind: CatalogObjectKind::User,
					name: name.to_string(),
				}
				.into());
			}
			roles.create_role(tx, name, false)
		})?;
		info!(role = name, "role created");
		Ok(())
	}

	/// Drops a shared role. Private roles go away with their user only.
	#[instrument(name = "catalog::system::drop_role", level = "info", skip(self))]
	pub fn drop_role(&self, name: &str) -> Result<()> {
		self.require_privileges()?;
		self.mutate_roles(|roles, tx| {
			let Some(group) = roles.group(name) else {
				return Err(CatalogError::NotFound {
					kind: CatalogObjectKind::Role,
					name: name.to_string(),
				}
				.into());
			};
			if group.is_private {
				return Err(CatalogError::PrivateRole {
					role: name.to_string(),
				}
				.into());
			}
			roles.drop_role(tx, name)?;
			Ok(())
		})?;
		info!(role = name, "role dropped");
		Ok(())
	}

	#[instrument(name = "catalog::system::grant_role", level = "debug", skip(self))]
	pub fn grant_role(&self, role: &str, user_name: &str) -> Result<()> {
		self.require_privileges()?;
		self.mutate_roles(|roles, tx| {
			let user = require_user(tx, user_name)?;
			roles.grant_role(tx, role, &user)
		})
	}

	/// Removes a membership. A user's own private role cannot be revoked.
	#[instrument(name = "catalog::system::revoke_role", level = "debug", skip(self))]
	pub fn revoke_role(&self, role: &str, user_name: &str) -> Result<()> {
		self.require_privileges()?;
		self.mutate_roles(|roles, tx| {
			let user = require_user(tx, user_name)?;
			if let Some(group) = roles.group(role) {
				if group.is_private && role_key(&group.name) == role_key(&user.name) {
					return Err(CatalogError::PrivateRole {
						role: role.to_string(),
					}
					.into());
				}
			}
			roles.revoke_role(tx, role, &user)
		})
	}

	pub fn role(&self, name: &str) -> Option<Role> {
		self.read_roles(|roles| roles.role(&RoleKey::Group(role_key(name))))
	}

	pub fn user_role(&self, user: UserId) -> Option<UserRole> {
		self.read_roles(|roles| roles.user(user).cloned())
	}

	/// True when a role named `name` exists and is private exactly when
	/// `private` is set.
	pub fn has_role(&self, name: &str, private: bool) -> bool {
		self.read_roles(|roles| roles.group(name).map(|group| group.is_private == private).unwrap_or(false))
	}

	pub fn is_role_granted_to_user(&self, user_name: &str, role: &str) -> Result<bool> {
		let Some(user) = CatalogStore::find_user_by_name(self.store.as_ref(), user_name)? else {
			return Ok(false);
		};
		Ok(self.read_roles(|roles| roles.is_granted(user.id, role)))
	}

	/// Role names visible to a user: every role for superusers, the user's
	/// own memberships otherwise.
	pub fn roles(&self, include_private: bool, is_super: bool, user: UserId) -> Vec<String> {
		self.read_roles(|roles| roles.role_names(include_private, is_super, user))
	}

	/// Shared roles holding any record in `db`.
	pub fn roles_for_database(&self, db: DatabaseId) -> Result<Vec<String>> {
		self.require_privileges()?;
		CatalogStore::list_roles_for_database(self.store.as_ref(), db)
	}

	pub fn user_roles(&self, user: UserId) -> Vec<String> {
		self.read_roles(|roles| roles.user_role_names(user))
	}

	/// The record a role holds on exactly `key`.
	pub fn db_object_privileges(&self, role: &str, key: &DbObjectKey) -> Option<DbObject> {
		self.read_roles(|roles| roles.group(role).and_then(|group| group.find_object(key)).cloned())
	}
}
