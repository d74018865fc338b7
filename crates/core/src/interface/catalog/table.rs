// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_type::{ColumnId, TableId, UserId};
use serde::{Deserialize, Serialize};

use super::{ColumnToCreate, SharedDictionaryDef};

/// Separator between a logical table name and a shard index.
pub const SHARD_TAG: &str = "_shard_#";

pub const DEFAULT_MAX_FRAGMENT_ROWS: i32 = 32_000_000;
pub const DEFAULT_MAX_CHUNK_SIZE: i64 = 1_073_741_824;
pub const DEFAULT_PAGE_SIZE: i32 = 1_048_576;
pub const DEFAULT_MAX_ROWS: i64 = 1 << 62;

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FragmenterKind {
	InsertOrder = 0,
}

impl FragmenterKind {
	pub fn code(&self) -> i32 {
		*self as i32
	}
}

/// Where a table's data lives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persistence {
	Disk,
	/// Session scoped; never written to the row store.
	Temporary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
	pub id: TableId,
	pub name: String,
	pub owner: UserId,
	/// Includes hidden geometry columns and system columns.
	pub column_count: i32,
	pub is_view: bool,
	pub view_sql: String,
	pub fragments: String,
	pub fragmenter: FragmenterKind,
	pub max_fragment_rows: i32,
	pub max_chunk_size: i64,
	pub page_size: i32,
	pub max_rows: i64,
	pub partitions: String,
	/// Column id the rows are hashed on; 0 when not sharded.
	pub shard_column_id: i32,
	/// Zero based shard index, -1 for anything that is not a physical shard.
	pub shard: i32,
	/// Number of shards of a logical table; 0 for ordinary tables and shards.
	pub shard_count: i32,
	pub key_metainfo: String,
	pub has_deleted_column: bool,
	pub persistence: Persistence,
}

impl TableDef {
	/// Logical tables own physical shards and hold no data themselves.
	pub fn is_logical(&self) -> bool {
		self.shard_count > 0
	}

	pub fn is_physical_shard(&self) -> bool {
		self.shard >= 0
	}

	pub fn is_temporary(&self) -> bool {
		self.persistence == Persistence::Temporary
	}

	/// Views and logical tables never get a fragmenter.
	pub fn needs_fragmenter(&self) -> bool {
		!self.is_view && !self.is_logical()
	}

	pub fn shard_column(&self) -> Option<ColumnId> {
		(self.shard_column_id > 0).then_some(ColumnId(self.shard_column_id))
	}

	/// Name of the `index`th (zero based) physical shard of a table named `logical`.
	pub fn shard_name(logical: &str, index: i32) -> String {
		format!("{}{}{}", logical, SHARD_TAG, index + 1)
	}
}

/// Request to create a table, a sharded table or a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableToCreate {
	pub name: String,
	pub owner: UserId,
	pub columns: Vec<ColumnToCreate>,
	pub shared_dictionaries: Vec<SharedDictionaryDef>,
	pub view_sql: Option<String>,
	pub persistence: Persistence,
	pub with_deleted_column: bool,
	pub max_fragment_rows: i32,
	pub max_chunk_size: i64,
	pub page_size: i32,
	pub max_rows: i64,
	pub partitions: String,
	pub shard_count: i32,
	pub shard_column_id: i32,
	pub key_metainfo: String,
}

impl TableToCreate {
	pub fn new(name: impl Into<String>, owner: UserId) -> Self {
		Self {
			name: name.into(),
			owner,
			columns: vec![],
			shared_dictionaries: vec![],
			view_sql: None,
			persistence: Persistence::Disk,
			with_deleted_column: false,
			max_fragment_rows: DEFAULT_MAX_FRAGMENT_ROWS,
			max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
			page_size: DEFAULT_PAGE_SIZE,
			max_rows: DEFAULT_MAX_ROWS,
			partitions: String::new(),
			shard_count: 0,
			shard_column_id: 0,
			key_metainfo: "[]".to_string(),
		}
	}

	pub fn with_column(mut self, column: ColumnToCreate) -> Self {
		self.columns.push(column);
		self
	}

	pub fn with_shared_dictionary(mut self, shared: SharedDictionaryDef) -> Self {
		self.shared_dictionaries.push(shared);
		self
	}

	pub fn with_deleted_column(mut self) -> Self {
		self.with_deleted_column = true;
		self
	}

	pub fn temporary(mut self) -> Self {
		self.persistence = Persistence::Temporary;
		self
	}

	pub fn sharded(mut self, shard_count: i32, shard_column_id: i32) -> Self {
		self.shard_count = shard_count;
		self.shard_column_id = shard_column_id;
		self
	}

	pub fn is_view(&self) -> bool {
		self.view_sql.is_some()
	}
}
