// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{BitOr, BitOrAssign},
};

use serde::{Deserialize, Serialize};

use crate::{error::TypeError, id::DatabaseId};

/// Kind of grantable object. Discriminants are persisted as `objectPermissionsType`.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DbObjectType {
	Abstract = 0,
	Database = 1,
	Table = 2,
	Dashboard = 3,
	View = 4,
}

impl DbObjectType {
	pub fn code(&self) -> i32 {
		*self as i32
	}

	pub fn from_code(code: i32) -> Result<Self, TypeError> {
		Ok(match code {
			0 => DbObjectType::Abstract,
			1 => DbObjectType::Database,
			2 => DbObjectType::Table,
			3 => DbObjectType::Dashboard,
			4 => DbObjectType::View,
			code => {
				return Err(TypeError::UnknownObjectType {
					code,
				});
			}
		})
	}
}

impl Display for DbObjectType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			DbObjectType::Abstract => "abstract",
			DbObjectType::Database => "database",
			DbObjectType::Table => "table",
			DbObjectType::Dashboard => "dashboard",
			DbObjectType::View => "view",
		})
	}
}

/// Identifies a grant target. `object_id == -1` addresses every object of
/// `object_type` within the database.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DbObjectKey {
	pub object_type: DbObjectType,
	pub db_id: DatabaseId,
	pub object_id: i32,
}

impl DbObjectKey {
	pub const WILDCARD: i32 = -1;

	pub fn new(object_type: DbObjectType, db_id: DatabaseId, object_id: i32) -> Self {
		Self {
			object_type,
			db_id,
			object_id,
		}
	}

	pub fn database(db_id: DatabaseId) -> Self {
		Self::new(DbObjectType::Database, db_id, Self::WILDCARD)
	}

	/// The type-wide key covering this object.
	pub fn type_wide(&self) -> Self {
		Self::new(self.object_type, self.db_id, Self::WILDCARD)
	}

	pub fn is_type_wide(&self) -> bool {
		self.object_id == Self::WILDCARD
	}
}

impl Display for DbObjectKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}:{}", self.object_type, self.db_id, self.object_id)
	}
}

/// Privilege bitmask. Bit meaning depends on the object type of the key it is
/// granted on.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessPrivileges(pub u64);

impl AccessPrivileges {
	pub const NONE: AccessPrivileges = AccessPrivileges(0);

	// database
	pub const CREATE_DATABASE: AccessPrivileges = AccessPrivileges(1 << 0);
	pub const DROP_DATABASE: AccessPrivileges = AccessPrivileges(1 << 1);
	pub const VIEW_SQL_EDITOR: AccessPrivileges = AccessPrivileges(1 << 2);
	pub const ACCESS: AccessPrivileges = AccessPrivileges(1 << 3);
	pub const ALL_DATABASE: AccessPrivileges = AccessPrivileges(0xF);

	// table
	pub const CREATE_TABLE: AccessPrivileges = AccessPrivileges(1 << 0);
	pub const DROP_TABLE: AccessPrivileges = AccessPrivileges(1 << 1);
	pub const SELECT_FROM_TABLE: AccessPrivileges = AccessPrivileges(1 << 2);
	pub const INSERT_INTO_TABLE: AccessPrivileges = AccessPrivileges(1 << 3);
	pub const UPDATE_IN_TABLE: AccessPrivileges = AccessPrivileges(1 << 4);
	pub const DELETE_FROM_TABLE: AccessPrivileges = AccessPrivileges(1 << 5);
	pub const TRUNCATE_TABLE: AccessPrivileges = AccessPrivileges(1 << 6);
	pub const ALTER_TABLE: AccessPrivileges = AccessPrivileges(1 << 7);
	pub const ALL_TABLE: AccessPrivileges = AccessPrivileges(0xFF);
	/// What legacy select+insert grants translate to; excludes ALTER.
	pub const ALL_TABLE_MIGRATE: AccessPrivileges = AccessPrivileges(0x7F);

	// dashboard
	pub const CREATE_DASHBOARD: AccessPrivileges = AccessPrivileges(1 << 0);
	pub const DELETE_DASHBOARD: AccessPrivileges = AccessPrivileges(1 << 1);
	pub const VIEW_DASHBOARD: AccessPrivileges = AccessPrivileges(1 << 2);
	pub const EDIT_DASHBOARD: AccessPrivileges = AccessPrivileges(1 << 3);
	pub const ALL_DASHBOARD: AccessPrivileges = AccessPrivileges(0xF);
	pub const ALL_DASHBOARD_MIGRATE: AccessPrivileges = AccessPrivileges(0xF);

	// view
	pub const CREATE_VIEW: AccessPrivileges = AccessPrivileges(1 << 0);
	pub const DROP_VIEW: AccessPrivileges = AccessPrivileges(1 << 1);
	pub const SELECT_FROM_VIEW: AccessPrivileges = AccessPrivileges(1 << 2);
	pub const INSERT_INTO_VIEW: AccessPrivileges = AccessPrivileges(1 << 3);
	pub const UPDATE_IN_VIEW: AccessPrivileges = AccessPrivileges(1 << 4);
	pub const DELETE_FROM_VIEW: AccessPrivileges = AccessPrivileges(1 << 5);
	pub const ALL_VIEW: AccessPrivileges = AccessPrivileges(0x3F);
	pub const ALL_VIEW_MIGRATE: AccessPrivileges = AccessPrivileges(0x3F);

	pub fn all_for(object_type: DbObjectType) -> Self {
		match object_type {
			DbObjectType::Database => Self::ALL_DATABASE,
			DbObjectType::Table => Self::ALL_TABLE,
			DbObjectType::Dashboard => Self::ALL_DASHBOARD,
			DbObjectType::View => Self::ALL_VIEW,
			DbObjectType::Abstract => Self::NONE,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	/// True when every bit of `wanted` is present.
	pub fn contains(&self, wanted: AccessPrivileges) -> bool {
		self.0 & wanted.0 == wanted.0
	}

	pub fn has_any(&self, wanted: AccessPrivileges) -> bool {
		self.0 & wanted.0 != 0
	}

	pub fn add(&mut self, other: AccessPrivileges) {
		self.0 |= other.0;
	}

	pub fn remove(&mut self, other: AccessPrivileges) {
		self.0 &= !other.0;
	}

	/// Persisted as a signed 64-bit integer.
	pub fn as_i64(&self) -> i64 {
		self.0 as i64
	}

	pub fn from_i64(value: i64) -> Self {
		Self(value as u64)
	}
}

impl BitOr for AccessPrivileges {
	type Output = AccessPrivileges;

	fn bitor(self, rhs: Self) -> Self::Output {
		AccessPrivileges(self.0 | rhs.0)
	}
}

impl BitOrAssign for AccessPrivileges {
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_contains_requires_every_bit() {
		let granted = AccessPrivileges::SELECT_FROM_TABLE | AccessPrivileges::INSERT_INTO_TABLE;
		assert!(granted.contains(AccessPrivileges::SELECT_FROM_TABLE));
		assert!(!granted.contains(AccessPrivileges::SELECT_FROM_TABLE | AccessPrivileges::DROP_TABLE));
		assert!(granted.has_any(AccessPrivileges::SELECT_FROM_TABLE | AccessPrivileges::DROP_TABLE));
	}

	#[test]
	fn test_remove_to_empty() {
		let mut granted = AccessPrivileges::ALL_VIEW;
		granted.remove(AccessPrivileges::ALL_VIEW);
		assert!(granted.is_empty());
	}

	#[test]
	fn test_migrate_variant_excludes_alter() {
		assert!(!AccessPrivileges::ALL_TABLE_MIGRATE.contains(AccessPrivileges::ALTER_TABLE));
		assert!(AccessPrivileges::ALL_TABLE.contains(AccessPrivileges::ALL_TABLE_MIGRATE));
	}

	#[test]
	fn test_type_wide_key() {
		let key = DbObjectKey::new(DbObjectType::Table, DatabaseId(1), 9);
		assert_eq!(key.type_wide(), DbObjectKey::new(DbObjectType::Table, DatabaseId(1), -1));
		assert!(key.type_wide().is_type_wide());
	}
}
