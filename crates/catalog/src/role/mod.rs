// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Role model: group roles hold grants, user roles hold memberships.
//!
//! Every user created with privileges enabled gets a private group role named
//! after them. A user's effective privileges are the union of the grants held
//! by every group role they are a member of.

use std::collections::{BTreeSet, HashMap};

use anacat_core::interface::DbObject;
use anacat_type::{AccessPrivileges, DbObjectKey, UserId};

mod load;
mod state;

/// A named bundle of object grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRole {
	pub name: String,
	/// Set for the role created alongside a user.
	pub is_private: bool,
	pub objects: HashMap<DbObjectKey, DbObject>,
}

impl GroupRole {
	pub fn new(name: impl Into<String>, is_private: bool) -> Self {
		Self {
			name: name.into(),
			is_private,
			objects: HashMap::new(),
		}
	}

	pub fn find_object(&self, key: &DbObjectKey) -> Option<&DbObject> {
		self.objects.get(key)
	}

	/// Privileges held on `key`, including the type-wide grant of its database.
	pub fn privileges_on(&self, key: &DbObjectKey) -> AccessPrivileges {
		let mut result = AccessPrivileges::NONE;
		if let Some(object) = self.objects.get(key) {
			result |= object.privileges;
		}
		if !key.is_type_wide() {
			if let Some(object) = self.objects.get(&key.type_wide()) {
				result |= object.privileges;
			}
		}
		result
	}
}

/// The group roles a user is a member of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRole {
	pub user_id: UserId,
	pub user_name: String,
	/// Upper-cased group role names.
	pub groups: BTreeSet<String>,
}

impl UserRole {
	pub fn new(user_id: UserId, user_name: impl Into<String>) -> Self {
		Self {
			user_id,
			user_name: user_name.into(),
			groups: BTreeSet::new(),
		}
	}

	pub fn has_group(&self, role: &str) -> bool {
		self.groups.contains(&role_key(role))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
	Group(GroupRole),
	User(UserRole),
}

impl Role {
	pub fn key(&self) -> RoleKey {
		match self {
			Role::Group(group) => RoleKey::Group(role_key(&group.name)),
			Role::User(user) => RoleKey::User(user.user_id),
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Role::Group(group) => &group.name,
			Role::User(user) => &user.user_name,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleKey {
	/// Upper-cased role name.
	Group(String),
	User(UserId),
}

/// Role names are matched case-insensitively.
pub(crate) fn role_key(name: &str) -> String {
	name.to_uppercase()
}

/// Group and user roles of an installation.
///
/// Mutations run against a clone so that the published state only ever
/// reflects committed rows; see [`crate::SystemCatalog`].
#[derive(Debug, Clone, Default)]
pub(crate) struct RoleState {
	groups: HashMap<String, GroupRole>,
	users: HashMap<UserId, UserRole>,
}

impl RoleState {
	pub(crate) fn group(&self, name: &str) -> Option<&GroupRole> {
		self.groups.get(&role_key(name))
	}

	pub(crate) fn user(&self, id: UserId) -> Option<&UserRole> {
		self.users.get(&id)
	}

	pub(crate) fn role(&self, key: &RoleKey) -> Option<Role> {
		match key {
			RoleKey::Group(name) => self.group(name).cloned().map(Role::Group),
			RoleKey::User(id) => self.user(*id).cloned().map(Role::User),
		}
	}

	pub(crate) fn is_granted(&self, user: UserId, role: &str) -> bool {
		self.users.get(&user).map(|u| u.has_group(role)).unwrap_or(false)
	}

	fn member_groups(&self, user: UserId) -> impl Iterator<Item = &GroupRole> {
		self.users
			.get(&user)
			.into_iter()
			.flat_map(|u| u.groups.iter())
			.filter_map(|name| self.groups.get(name))
	}

	/// Union of the grants the user holds on `key` through any of their roles.
	pub(crate) fn effective_privileges(&self, user: UserId, key: &DbObjectKey) -> AccessPrivileges {
		self.member_groups(user).fold(AccessPrivileges::NONE, |acc, group| acc | group.privileges_on(key))
	}

	pub(crate) fn check_privileges(&self, user: UserId, objects: &[DbObject]) -> bool {
		if !self.users.contains_key(&user) {
			return false;
		}
		objects.iter().all(|object| self.effective_privileges(user, &object.key).contains(object.privileges))
	}

	pub(crate) fn has_any_privileges(&self, user: UserId, objects: &[DbObject]) -> bool {
		if !self.users.contains_key(&user) {
			return false;
		}
		objects.iter().all(|object| self.effective_privileges(user, &object.key).has_any(object.privileges))
	}

	/// True when one of the user's roles holds `key` recorded with the user as owner.
	pub(crate) fn owns(&self, user: UserId, key: &DbObjectKey) -> bool {
		self.member_groups(user).any(|group| group.find_object(key).map(|o| o.owner == user).unwrap_or(false))
	}

	/// Role names sorted case-insensitively.
	pub(crate) fn role_names(&self, include_private: bool, is_super: bool, user: UserId) -> Vec<String> {
		let mut result: Vec<String> = self
			.groups
			.values()
			.filter(|group| include_private || !group.is_private)
			.filter(|group| is_super || self.is_granted(user, &group.name))
			.map(|group| group.name.clone())
			.collect();
		result.sort_by_key(|name| role_key(name));
		result
	}

	pub(crate) fn user_role_names(&self, user: UserId) -> Vec<String> {
		self.member_groups(user).map(|group| group.name.clone()).collect()
	}
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::DbObject;
	use anacat_type::{AccessPrivileges, DatabaseId, DbObjectKey, DbObjectType, UserId};

	use super::*;

	fn table_key(id: i32) -> DbObjectKey {
		DbObjectKey::new(DbObjectType::Table, DatabaseId(1), id)
	}

	fn state_with(group: GroupRole, user: UserId) -> RoleState {
		let mut state = RoleState::default();
		let mut member = UserRole::new(user, "bob");
		member.groups.insert(role_key(&group.name));
		state.groups.insert(role_key(&group.name), group);
		state.users.insert(user, member);
		state
	}

	#[test]
	fn test_type_wide_grant_covers_every_table() {
		let mut group = GroupRole::new("analysts", false);
		let wide = table_key(-1);
		group.objects.insert(wide, DbObject::new(wide, AccessPrivileges::SELECT_FROM_TABLE, ""));
		let state = state_with(group, UserId(3));

		let wanted = DbObject::new(table_key(42), AccessPrivileges::SELECT_FROM_TABLE, "t");
		assert!(state.check_privileges(UserId(3), &[wanted]));

		let too_much = DbObject::new(table_key(42), AccessPrivileges::DROP_TABLE, "t");
		assert!(!state.check_privileges(UserId(3), &[too_much.clone()]));
		assert!(!state.has_any_privileges(UserId(3), &[too_much]));
	}

	#[test]
	fn test_wide_grant_does_not_leak_across_databases() {
		let mut group = GroupRole::new("analysts", false);
		let wide = table_key(-1);
		group.objects.insert(wide, DbObject::new(wide, AccessPrivileges::ALL_TABLE, ""));
		let state = state_with(group, UserId(3));

		let other_db = DbObject::new(
			DbObjectKey::new(DbObjectType::Table, DatabaseId(2), 42),
			AccessPrivileges::SELECT_FROM_TABLE,
			"t",
		);
		assert!(!state.check_privileges(UserId(3), &[other_db]));
	}

	#[test]
	fn test_user_without_roles_is_denied() {
		let state = RoleState::default();
		let wanted = DbObject::new(table_key(1), AccessPrivileges::NONE, "t");
		assert!(!state.check_privileges(UserId(9), &[wanted]));
	}

	#[test]
	fn test_ownership_requires_recorded_owner() {
		let mut group = GroupRole::new("bob", true);
		group.objects.insert(
			table_key(1),
			DbObject::new(table_key(1), AccessPrivileges::ALL_TABLE, "mine").with_owner(UserId(3)),
		);
		group.objects.insert(table_key(2), DbObject::new(table_key(2), AccessPrivileges::ALL_TABLE, "granted"));
		let state = state_with(group, UserId(3));

		assert!(state.owns(UserId(3), &table_key(1)));
		assert!(!state.owns(UserId(3), &table_key(2)));
	}

	#[test]
	fn test_role_names_filtering() {
		let mut state = state_with(GroupRole::new("bob", true), UserId(3));
		state.groups.insert(role_key("auditors"), GroupRole::new("auditors", false));

		assert_eq!(state.role_names(true, true, UserId::ROOT), vec!["auditors", "bob"]);
		assert_eq!(state.role_names(false, true, UserId::ROOT), vec!["auditors"]);
		assert_eq!(state.role_names(true, false, UserId(3)), vec!["bob"]);
	}
}
