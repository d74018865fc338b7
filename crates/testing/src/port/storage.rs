// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, sync::Arc};

use anacat_core::interface::{Fragmenter, FragmenterRequest, MemoryLevel, StorageEngine};
use anacat_type::{ColumnId, DatabaseId, Result, TableId};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
	DeleteChunks {
		prefix: Vec<i32>,
		level: Option<MemoryLevel>,
	},
	Checkpoint {
		db: DatabaseId,
		table: TableId,
	},
	RemoveTableRelatedDs {
		db: DatabaseId,
		table: TableId,
	},
	SetEpoch {
		db: DatabaseId,
		table: TableId,
		epoch: i32,
	},
	CreateFragmenter {
		table: TableId,
		columns: Vec<ColumnId>,
	},
}

#[derive(Default)]
struct State {
	epochs: HashMap<(DatabaseId, TableId), i32>,
	calls: Vec<StorageCall>,
}

/// Chunk storage fake: remembers epochs and records every call.
#[derive(Default)]
pub struct MemoryStorageEngine {
	state: Mutex<State>,
}

impl MemoryStorageEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the epoch the engine reports for a table.
	pub fn set_epoch(&self, db: DatabaseId, table: TableId, epoch: i32) {
		self.state.lock().epochs.insert((db, table), epoch);
	}

	pub fn calls(&self) -> Vec<StorageCall> {
		self.state.lock().calls.clone()
	}

	pub fn clear_calls(&self) {
		self.state.lock().calls.clear();
	}

	pub fn fragmenters_created(&self, table: TableId) -> usize {
		self.state
			.lock()
			.calls
			.iter()
			.filter(|call| matches!(call, StorageCall::CreateFragmenter { table: t, .. } if *t == table))
			.count()
	}

	pub fn checkpoints(&self, table: TableId) -> usize {
		self.state
			.lock()
			.calls
			.iter()
			.filter(|call| matches!(call, StorageCall::Checkpoint { table: t, .. } if *t == table))
			.count()
	}

	fn record(&self, call: StorageCall) {
		self.state.lock().calls.push(call);
	}
}

impl StorageEngine for MemoryStorageEngine {
	fn delete_chunks_with_prefix(&self, prefix: &[i32], level: Option<MemoryLevel>) -> Result<()> {
		self.record(StorageCall::DeleteChunks {
			prefix: prefix.to_vec(),
			level,
		});
		Ok(())
	}

	fn checkpoint(&self, db: DatabaseId, table: TableId) -> Result<()> {
		self.record(StorageCall::Checkpoint {
			db,
			table,
		});
		Ok(())
	}

	fn remove_table_related_ds(&self, db: DatabaseId, table: TableId) -> Result<()> {
		self.record(StorageCall::RemoveTableRelatedDs {
			db,
			table,
		});
		Ok(())
	}

	fn table_epoch(&self, db: DatabaseId, table: TableId) -> Result<i32> {
		Ok(self.state.lock().epochs.get(&(db, table)).copied().unwrap_or(0))
	}

	fn set_table_epoch(&self, db: DatabaseId, table: TableId, epoch: i32) -> Result<()> {
		let mut state = self.state.lock();
		state.epochs.insert((db, table), epoch);
		state.calls.push(StorageCall::SetEpoch {
			db,
			table,
			epoch,
		});
		Ok(())
	}

	fn create_fragmenter(&self, request: FragmenterRequest) -> Result<Arc<dyn Fragmenter>> {
		let columns: Vec<ColumnId> = request.columns.iter().map(|c| c.id).collect();
		self.record(StorageCall::CreateFragmenter {
			table: request.table,
			columns: columns.clone(),
		});
		Ok(Arc::new(MemoryFragmenter {
			table: request.table,
			columns,
		}))
	}
}

#[derive(Debug)]
pub struct MemoryFragmenter {
	table: TableId,
	columns: Vec<ColumnId>,
}

impl Fragmenter for MemoryFragmenter {
	fn table(&self) -> TableId {
		self.table
	}

	fn columns(&self) -> Vec<ColumnId> {
		self.columns.clone()
	}
}
