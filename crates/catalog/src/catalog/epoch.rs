// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::{MemoryLevel, TableDef};
use anacat_type::TableId;
use tracing::{error, info, instrument};

use super::Catalog;
use crate::{
	Result,
	error::{CatalogError, CatalogObjectKind},
};

/// Returned by [`Catalog::get_table_epoch`] when the shards of a logical
/// table disagree.
pub const EPOCH_MISMATCH: i32 = -1;

impl Catalog {
	/// The storage epoch of a table. A logical table reports the epoch its
	/// shards agree on, or [`EPOCH_MISMATCH`].
	pub fn get_table_epoch(&self, table: TableId) -> Result<i32> {
		let def = self.require_table_by_id(table)?;
		let storage = &self.ports().storage;

		let shards = self.shards_of(&def);
		if shards.is_empty() {
			return storage.table_epoch(self.db.id, table);
		}

		let mut agreed: Option<i32> = None;
		for shard in &shards {
			let epoch = storage.table_epoch(self.db.id, shard.id)?;
			match agreed {
				None => agreed = Some(epoch),
				Some(previous) if previous != epoch => {
					error!(
						table = *table,
						shard = *shard.id,
						epoch,
						previous,
						"shards of a logical table have different epochs"
					);
					return Ok(EPOCH_MISMATCH);
				}
				Some(_) => {}
			}
		}
		Ok(agreed.unwrap_or(0))
	}

	/// Rolls a table and all of its shards back to `epoch`. Cached chunks
	/// and fragmenters are discarded first.
	#[instrument(name = "catalog::table::set_epoch", level = "info", skip(self), fields(db = %self.db.name))]
	pub fn set_table_epoch(&self, table: TableId, epoch: i32) -> Result<()> {
		let def = self.require_table_by_id(table)?;
		info!(table = *table, epoch, "setting table epoch");

		let storage = &self.ports().storage;
		self.remove_chunks(table)?;
		storage.set_table_epoch(self.db.id, table, epoch)?;

		for shard in self.shards_of(&def) {
			self.remove_chunks(shard.id)?;
			storage.set_table_epoch(self.db.id, shard.id, epoch)?;
		}
		Ok(())
	}

	/// Drops the fragmenter and evicts the table's chunks from CPU and GPU
	/// memory. Disk chunks stay.
	pub fn remove_chunks(&self, table: TableId) -> Result<()> {
		self.materialized.update(|r| r.reset_fragmenter(table));

		let storage = &self.ports().storage;
		let prefix = [*self.db.id, *table];
		storage.delete_chunks_with_prefix(&prefix, Some(MemoryLevel::Cpu))?;
		storage.delete_chunks_with_prefix(&prefix, Some(MemoryLevel::Gpu))?;
		Ok(())
	}

	fn require_table_by_id(&self, table: TableId) -> Result<TableDef> {
		self.materialized.find_table(table).ok_or_else(|| {
			CatalogError::NotFound {
				kind: CatalogObjectKind::Table,
				name: table.to_string(),
			}
			.into()
		})
	}
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::{ColumnToCreate, MemoryLevel, TableToCreate};
	use anacat_testing::StorageCall;
	use anacat_type::{SqlType, TableId, TypeInfo, UserId};

	use super::EPOCH_MISMATCH;
	use crate::{
		Catalog,
		test_utils::{default_catalog, with_context},
	};

	fn sharded(catalog: &Catalog) -> anacat_core::interface::TableDef {
		catalog.create_table(
			TableToCreate::new("s", UserId::ROOT)
				.with_column(ColumnToCreate::new("id", TypeInfo::new(SqlType::Int)))
				.sharded(3, 1),
		)
		.unwrap()
	}

	#[test]
	fn test_shards_agree_on_epoch() {
		with_context(true, |context, ports| {
			let catalog = default_catalog(context);
			let logical = sharded(&catalog);
			for shard in catalog.physical_tables(logical.id) {
				ports.storage.set_epoch(catalog.database().id, shard.id, 7);
			}
			assert_eq!(catalog.get_table_epoch(logical.id).unwrap(), 7);
		});
	}

	#[test]
	fn test_shard_epoch_mismatch() {
		with_context(true, |context, ports| {
			let catalog = default_catalog(context);
			let logical = sharded(&catalog);
			let shards = catalog.physical_tables(logical.id);
			ports.storage.set_epoch(catalog.database().id, shards[0].id, 4);
			ports.storage.set_epoch(catalog.database().id, shards[1].id, 4);
			ports.storage.set_epoch(catalog.database().id, shards[2].id, 5);
			assert_eq!(catalog.get_table_epoch(logical.id).unwrap(), EPOCH_MISMATCH);
		});
	}

	#[test]
	fn test_set_epoch_reaches_every_shard() {
		with_context(true, |context, ports| {
			let catalog = default_catalog(context);
			let logical = sharded(&catalog);
			ports.storage.clear_calls();

			catalog.set_table_epoch(logical.id, 3).unwrap();
			assert_eq!(catalog.get_table_epoch(logical.id).unwrap(), 3);

			let calls = ports.storage.calls();
			for shard in catalog.physical_tables(logical.id) {
				assert!(calls.contains(&StorageCall::SetEpoch {
					db: catalog.database().id,
					table: shard.id,
					epoch: 3,
				}));
				assert!(calls.contains(&StorageCall::DeleteChunks {
					prefix: vec![*catalog.database().id, *shard.id],
					level: Some(MemoryLevel::Gpu),
				}));
			}
		});
	}

	#[test]
	fn test_epoch_of_plain_table() {
		with_context(true, |context, ports| {
			let catalog = default_catalog(context);
			let table = catalog
				.create_table(
					TableToCreate::new("t", UserId::ROOT)
						.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int))),
				)
				.unwrap();
			ports.storage.set_epoch(catalog.database().id, table.id, 12);
			assert_eq!(catalog.get_table_epoch(table.id).unwrap(), 12);
			assert_eq!(catalog.get_table_epoch(TableId(999)).unwrap_err().code, "CA_002");
		});
	}
}
