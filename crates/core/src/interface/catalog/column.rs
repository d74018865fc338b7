// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{ColumnId, TableId, TypeInfo};
use serde::{Deserialize, Serialize};

pub const ROWID_COLUMN_NAME: &str = "rowid";
pub const DELETED_COLUMN_NAME: &str = "$deleted$";
pub const ROWID_EXPRESSION: &str = "MAPD_FRAG_ID * MAPD_ROWS_PER_FRAG + MAPD_FRAG_ROW_ID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
	pub table: TableId,
	pub id: ColumnId,
	pub name: String,
	pub ty: TypeInfo,
	pub is_system: bool,
	pub is_virtual: bool,
	pub virtual_expr: String,
	pub is_deleted: bool,
}

impl ColumnDef {
	/// Whether the column occupies chunk storage.
	pub fn has_storage(&self) -> bool {
		!self.is_virtual
	}
}

/// Which hidden columns a column listing keeps. User columns are always
/// listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFilter {
	pub fetch_system: bool,
	pub fetch_virtual: bool,
	/// Hidden columns backing a geometry column.
	pub fetch_physical: bool,
}

impl ColumnFilter {
	pub const ALL: Self = Self {
		fetch_system: true,
		fetch_virtual: true,
		fetch_physical: true,
	};

	pub const USER: Self = Self {
		fetch_system: false,
		fetch_virtual: false,
		fetch_physical: false,
	};
}

/// A user declared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToCreate {
	pub name: String,
	pub ty: TypeInfo,
}

impl ColumnToCreate {
	pub fn new(name: impl Into<String>, ty: TypeInfo) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}
