// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{AccessPrivileges, DbObjectKey, DbObjectType, UserId};
use serde::{Deserialize, Serialize};

/// A grant target together with the privileges held or requested on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbObject {
	pub key: DbObjectKey,
	pub privileges: AccessPrivileges,
	pub owner: UserId,
	pub name: String,
}

impl DbObject {
	pub fn new(key: DbObjectKey, privileges: AccessPrivileges, name: impl Into<String>) -> Self {
		Self {
			key,
			privileges,
			owner: UserId::ROOT,
			name: name.into(),
		}
	}

	pub fn with_owner(mut self, owner: UserId) -> Self {
		self.owner = owner;
		self
	}

	pub fn object_type(&self) -> DbObjectType {
		self.key.object_type
	}
}
