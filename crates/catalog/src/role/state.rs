// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Role mutations. Each one writes its rows through the caller's transaction
//! and updates `self`; the caller publishes `self` only after commit.

use anacat_core::interface::{DbObject, ROOT_USER_NAME, UserDef};
use anacat_sqlite::Queryable;
use anacat_type::{AccessPrivileges, DatabaseId, DbObjectKey, UserId};

use super::{GroupRole, RoleState, UserRole, role_key};
use crate::{
	CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
};

fn role_not_found(name: &str) -> crate::Error {
	CatalogError::NotFound {
		kind: CatalogObjectKind::Role,
		name: name.to_string(),
	}
	.into()
}

fn reject_root(role: &str, action: &str) -> Result<()> {
	if role == ROOT_USER_NAME {
		return Err(CatalogError::PermissionDenied {
			message: format!("cannot {} privileges for `{}`, it holds every privilege", action, role),
		}
		.into());
	}
	Ok(())
}

impl RoleState {
	/// Registers a role and persists its marker record, an empty grant on
	/// database 0.
	pub(crate) fn create_role(&mut self, tx: &impl Queryable, name: &str, is_private: bool) -> Result<()> {
		let key = role_key(name);
		if self.groups.contains_key(&key) {
			return Err(CatalogError::AlreadyExists {
				kind: CatalogObjectKind::Role,
				name: name.to_string(),
			}
			.into());
		}

		let marker = DbObject::new(DbObjectKey::database(DatabaseId(0)), AccessPrivileges::NONE, "");
		CatalogStore::upsert_object_permission(tx, name, is_private, &marker)?;

		let mut group = GroupRole::new(name, is_private);
		group.objects.insert(marker.key, marker);
		self.groups.insert(key, group);
		Ok(())
	}

	/// Removes a role with every membership and grant row naming it.
	pub(crate) fn drop_role(&mut self, tx: &impl Queryable, name: &str) -> Result<GroupRole> {
		let key = role_key(name);
		let Some(group) = self.groups.remove(&key) else {
			return Err(role_not_found(name));
		};

		CatalogStore::delete_role(tx, &group.name)?;

		for user in self.users.values_mut() {
			user.groups.remove(&key);
		}
		self.users.retain(|_, user| !user.groups.is_empty());
		Ok(group)
	}

	/// Makes `user` a member of `role`. Granting twice is a no-op.
	pub(crate) fn grant_role(&mut self, tx: &impl Queryable, role: &str, user: &UserDef) -> Result<()> {
		let key = role_key(role);
		let Some(group) = self.groups.get(&key) else {
			return Err(role_not_found(role));
		};

		let member = self.users.entry(user.id).or_insert_with(|| UserRole::new(user.id, &user.name));
		if member.groups.contains(&key) {
			return Ok(());
		}

		CatalogStore::insert_user_role(tx, &group.name, &user.name)?;
		member.groups.insert(key);
		Ok(())
	}

	pub(crate) fn revoke_role(&mut self, tx: &impl Queryable, role: &str, user: &UserDef) -> Result<()> {
		let key = role_key(role);
		let Some(group) = self.groups.get(&key) else {
			return Err(role_not_found(role));
		};

		let granted = self.users.get(&user.id).map(|u| u.groups.contains(&key)).unwrap_or(false);
		if !granted {
			return Err(CatalogError::RoleNotGranted {
				role: role.to_string(),
				user: user.name.clone(),
			}
			.into());
		}

		CatalogStore::delete_user_role(tx, &group.name, &user.name)?;

		if let Some(member) = self.users.get_mut(&user.id) {
			member.groups.remove(&key);
			if member.groups.is_empty() {
				self.users.remove(&user.id);
			}
		}
		Ok(())
	}

	/// Forgets every membership of a user that is being dropped.
	pub(crate) fn drop_user_role(&mut self, tx: &impl Queryable, user: &UserDef) -> Result<()> {
		CatalogStore::delete_user_roles_of_user(tx, &user.name)?;
		self.users.remove(&user.id);
		Ok(())
	}

	/// Adds privileges to a role's record for `object.key`, creating it when
	/// missing. An existing owner is kept unless it is root.
	pub(crate) fn grant_object(&mut self, tx: &impl Queryable, role: &str, object: &DbObject) -> Result<()> {
		reject_root(role, "grant")?;
		let Some(group) = self.groups.get_mut(&role_key(role)) else {
			return Err(role_not_found(role));
		};

		let merged = match group.objects.get(&object.key) {
			Some(existing) => {
				let mut merged = existing.clone();
				merged.privileges |= object.privileges;
				if merged.owner == UserId::ROOT {
					merged.owner = object.owner;
				}
				if merged.name.is_empty() {
					merged.name = object.name.clone();
				}
				merged
			}
			None => object.clone(),
		};

		CatalogStore::upsert_object_permission(tx, &group.name, group.is_private, &merged)?;
		group.objects.insert(merged.key, merged);
		Ok(())
	}

	/// Removes privileges from a role's record. The record disappears once no
	/// privilege is left; revoking from a missing record is a no-op.
	pub(crate) fn revoke_object(&mut self, tx: &impl Queryable, role: &str, object: &DbObject) -> Result<()> {
		reject_root(role, "revoke")?;
		let Some(group) = self.groups.get_mut(&role_key(role)) else {
			return Err(role_not_found(role));
		};

		let Some(existing) = group.objects.get_mut(&object.key) else {
			return Ok(());
		};

		existing.privileges.remove(object.privileges);
		if existing.privileges.is_empty() {
			CatalogStore::delete_object_permission(tx, &group.name, &object.key)?;
			group.objects.remove(&object.key);
		} else {
			CatalogStore::upsert_object_permission(tx, &group.name, group.is_private, existing)?;
		}
		Ok(())
	}

	/// Deletes every role's record for `key`. Returns how many were removed.
	pub(crate) fn revoke_from_all(&mut self, tx: &impl Queryable, key: &DbObjectKey) -> Result<usize> {
		let mut names: Vec<String> =
			self.groups.values().filter(|g| g.objects.contains_key(key)).map(|g| role_key(&g.name)).collect();
		names.sort();

		for name in &names {
			if let Some(group) = self.groups.get_mut(name) {
				CatalogStore::delete_object_permission(tx, &group.name, key)?;
				group.objects.remove(key);
			}
		}
		Ok(names.len())
	}
}
