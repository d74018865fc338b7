// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use anacat_type::{ColumnId, DatabaseId, TableId};

use crate::interface::catalog::{ColumnDef, Persistence};

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MemoryLevel {
	Disk = 0,
	Cpu = 1,
	Gpu = 2,
}

/// Everything the storage engine needs to build a fragmenter for a table.
#[derive(Debug, Clone)]
pub struct FragmenterRequest {
	pub db: DatabaseId,
	pub table: TableId,
	/// Ordered storage bearing columns.
	pub columns: Vec<ColumnDef>,
	pub max_fragment_rows: i32,
	pub max_chunk_size: i64,
	pub page_size: i32,
	pub max_rows: i64,
	pub persistence: Persistence,
}

/// Handle over a table's fragments.
pub trait Fragmenter: Send + Sync {
	fn table(&self) -> TableId;

	fn columns(&self) -> Vec<ColumnId>;
}

/// Chunk storage. Chunk keys start with `[db, table, column, ...]`.
pub trait StorageEngine: Send + Sync {
	/// Deletes every chunk whose key starts with `prefix`. `None` means all levels.
	fn delete_chunks_with_prefix(&self, prefix: &[i32], level: Option<MemoryLevel>) -> crate::Result<()>;

	fn checkpoint(&self, db: DatabaseId, table: TableId) -> crate::Result<()>;

	fn remove_table_related_ds(&self, db: DatabaseId, table: TableId) -> crate::Result<()>;

	fn table_epoch(&self, db: DatabaseId, table: TableId) -> crate::Result<i32>;

	fn set_table_epoch(&self, db: DatabaseId, table: TableId, epoch: i32) -> crate::Result<()>;

	fn create_fragmenter(&self, request: FragmenterRequest) -> crate::Result<Arc<dyn Fragmenter>>;
}
