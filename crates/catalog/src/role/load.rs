// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_sqlite::Queryable;
use tracing::debug;

use super::{GroupRole, RoleState, UserRole, role_key};
use crate::{CatalogStore, Result, error::CatalogError};

impl RoleState {
	/// Rebuilds roles from `mapd_object_permissions` and memberships from
	/// `mapd_roles`. A membership naming an unknown role or user is
	/// inconsistent state.
	pub(crate) fn load(rx: &impl Queryable) -> Result<RoleState> {
		let mut state = RoleState::default();

		for permission in CatalogStore::list_object_permissions(rx)? {
			let group = state
				.groups
				.entry(role_key(&permission.role))
				.or_insert_with(|| GroupRole::new(&permission.role, permission.is_private));
			group.objects.insert(permission.object.key, permission.object);
		}

		for (role, user_name) in CatalogStore::list_user_roles(rx)? {
			let key = role_key(&role);
			if !state.groups.contains_key(&key) {
				return Err(CatalogError::Inconsistent {
					message: format!("membership of user `{}` names unknown role `{}`", user_name, role),
				}
				.into());
			}

			let Some(user) = CatalogStore::find_user_by_name(rx, &user_name)? else {
				return Err(CatalogError::Inconsistent {
					message: format!("role `{}` is granted to unknown user `{}`", role, user_name),
				}
				.into());
			};

			state.users.entry(user.id).or_insert_with(|| UserRole::new(user.id, &user.name)).groups.insert(key);
		}

		debug!(roles = state.groups.len(), users = state.users.len(), "roles loaded");
		Ok(state)
	}
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::DbObject;
	use anacat_sqlite::{Queryable, RowStore};
	use anacat_type::{AccessPrivileges, DatabaseId, DbObjectKey, DbObjectType};

	use crate::{CatalogStore, role::RoleState};

	#[test]
	fn test_load_round_trip() {
		let store = RowStore::in_memory().unwrap();
		CatalogStore::create_system_schema(&store, true).unwrap();
		let bob = CatalogStore::create_user(&store, "bob", "pw", false).unwrap();

		let mut state = RoleState::default();
		state.create_role(&store, "bob", true).unwrap();
		state.grant_role(&store, "bob", &bob).unwrap();
		let key = DbObjectKey::new(DbObjectType::View, DatabaseId(1), 4);
		state.grant_object(&store, "bob", &DbObject::new(key, AccessPrivileges::ALL_VIEW, "v").with_owner(bob.id))
			.unwrap();

		let loaded = RoleState::load(&store).unwrap();
		let group = loaded.group("BOB").unwrap();
		assert!(group.is_private);
		assert_eq!(group.objects.len(), 2);
		assert!(loaded.owns(bob.id, &key));
		assert!(loaded.is_granted(bob.id, "bob"));
	}

	#[test]
	fn test_membership_of_unknown_role_is_inconsistent() {
		let store = RowStore::in_memory().unwrap();
		CatalogStore::create_system_schema(&store, true).unwrap();
		CatalogStore::create_user(&store, "bob", "pw", false).unwrap();
		store.execute("INSERT INTO mapd_roles (roleName, userName) VALUES ('ghost', 'bob')", &[]).unwrap();

		let err = RoleState::load(&store).unwrap_err();
		assert_eq!(err.code, "CA_005");
	}
}
