// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::iter::once;

use anacat_core::interface::TableDef;
use anacat_sqlite::Queryable;
use anacat_type::DictionaryId;
use tracing::{info, instrument, warn};

use super::{Catalog, DualTxn};
use crate::{
	CatalogStore, Result,
	dictionary::{DictionaryChanges, DictionaryManager},
};

impl Catalog {
	/// Drops a table or view together with its shards, its dictionary
	/// references, its chunks and every privilege granted on it.
	#[instrument(name = "catalog::table::drop", level = "info", skip(self), fields(db = %self.db.name))]
	pub fn drop_table(&self, name: &str) -> Result<()> {
		let _writer = self.system.lock_writer();
		let _ddl = self.lock_ddl();
		let table = self.require_table(name)?;
		self.drop_locked(&table, true)
	}

	/// Drop with the writer and `ddl` already held by the caller.
	pub(super) fn drop_locked(&self, table: &TableDef, notify: bool) -> Result<()> {
		let shards = self.shards_of(table);
		let dictionaries = self.dictionaries();
		let mut changes = DictionaryChanges::new();

		if table.is_temporary() {
			// temporary dictionaries write no rows
			let txn = self.store.begin()?;
			self.delete_table_rows(&txn, &dictionaries, &mut changes, table)?;
			txn.commit()?;
		} else {
			let txn = DualTxn::begin(self.system.store(), &self.store)?;
			let mut roles = self.system.working_roles();

			for shard in &shards {
				self.delete_table_rows(txn.db(), &dictionaries, &mut changes, shard)?;
			}
			if table.is_logical() {
				CatalogStore::delete_physical_table_links(txn.db(), table.id)?;
			}
			self.delete_table_rows(txn.db(), &dictionaries, &mut changes, table)?;
			self.system.revoke_everywhere(&mut roles, txn.sys(), &self.object_key(table))?;

			txn.commit()?;
			self.system.publish_roles(roles);
		}

		dictionaries.finish(&changes);
		self.materialized.update(|r| {
			for shard in &shards {
				r.remove_table(shard.id);
			}
			r.remove_physical_tables(table.id);
			r.remove_table(table.id);
			changes.apply(r);
		});

		for dropped in shards.iter().chain(once(table)) {
			if !dropped.is_view {
				self.release_storage(dropped);
			}
			if notify {
				if let Err(err) = self.notify(&dropped.name) {
					warn!(table = %dropped.name, "plan cache notification failed: {}", err.message);
				}
			}
		}

		info!(table = *table.id, shards = shards.len(), "table dropped");
		Ok(())
	}

	/// Deletes the rows describing one table and releases the dictionaries
	/// its columns reference.
	fn delete_table_rows(
		&self,
		tx: &impl Queryable,
		dictionaries: &DictionaryManager<'_>,
		changes: &mut DictionaryChanges,
		table: &TableDef,
	) -> Result<()> {
		for column in self.materialized.list_columns(table.id) {
			if column.ty.is_dict_encoded() {
				dictionaries.release(tx, &self.materialized, changes, DictionaryId(column.ty.comp_param))?;
			}
		}
		if table.is_temporary() {
			return Ok(());
		}

		CatalogStore::delete_columns(tx, table.id)?;
		if table.is_view {
			CatalogStore::delete_view(tx, table.id)?;
		}
		CatalogStore::delete_table(tx, table.id)
	}

	/// Chunks and storage side data of a dropped table. The rows are gone
	/// already, so failures only leave garbage behind.
	fn release_storage(&self, table: &TableDef) {
		let storage = &self.ports().storage;
		if let Err(err) = storage.delete_chunks_with_prefix(&[*self.db.id, *table.id], None) {
			warn!(table = *table.id, "cannot delete chunks: {}", err.message);
		}
		if let Err(err) = storage.checkpoint(self.db.id, table.id) {
			warn!(table = *table.id, "checkpoint failed: {}", err.message);
		}
		if let Err(err) = storage.remove_table_related_ds(self.db.id, table.id) {
			warn!(table = *table.id, "cannot remove table data structures: {}", err.message);
		}
	}

	/// Shards of a logical table in index order; empty for anything else.
	pub(super) fn shards_of(&self, table: &TableDef) -> Vec<TableDef> {
		self.materialized.read(|r| {
			r.physical_tables(table.id)
				.map(|ids| ids.iter().filter_map(|id| r.find_table(*id).cloned()).collect())
				.unwrap_or_default()
		})
	}
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::{ColumnToCreate, SharedDictionaryDef, TableToCreate};
	use anacat_sqlite::Queryable;
	use anacat_testing::StorageCall;
	use anacat_type::{DbObjectKey, DbObjectType, DictionaryId, SqlType, TypeInfo, UserId};

	use crate::test_utils::{default_catalog, with_context};

	fn text(name: &str) -> ColumnToCreate {
		ColumnToCreate::new(name, TypeInfo::dict_text(32))
	}

	#[test]
	fn test_drop_releases_storage_and_dictionary() {
		with_context(true, |context, ports| {
			let catalog = default_catalog(context);
			let table = catalog.create_table(TableToCreate::new("t", UserId::ROOT).with_column(text("s"))).unwrap();
			let dict = catalog.find_dictionary(DictionaryId(catalog.list_columns(table.id)[0].ty.comp_param)).unwrap();
			ports.storage.clear_calls();

			catalog.drop_table("t").unwrap();

			assert!(catalog.find_table_by_name("t").is_none());
			assert!(catalog.list_columns(table.id).is_empty());
			assert!(catalog.find_dictionary(dict.dict_ref.dict).is_none());
			assert!(!dict.folder.exists());
			assert!(ports.storage.calls().contains(&StorageCall::DeleteChunks {
				prefix: vec![*catalog.database().id, *table.id],
				level: None,
			}));
			assert!(ports.storage.calls().contains(&StorageCall::RemoveTableRelatedDs {
				db: catalog.database().id,
				table: table.id,
			}));
		});
	}

	#[test]
	fn test_shared_dictionary_survives_until_last_reference() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let first = catalog.create_table(TableToCreate::new("a", UserId::ROOT).with_column(text("x"))).unwrap();
			catalog.create_table(
				TableToCreate::new("b", UserId::ROOT)
					.with_column(text("y"))
					.with_shared_dictionary(SharedDictionaryDef::new("y", "a", "x")),
			)
			.unwrap();
			let dict = DictionaryId(catalog.list_columns(first.id)[0].ty.comp_param);
			assert_eq!(catalog.find_dictionary(dict).unwrap().refcount, 2);

			catalog.drop_table("a").unwrap();
			let remaining = catalog.find_dictionary(dict).unwrap();
			assert_eq!(remaining.refcount, 1);
			assert!(remaining.folder.exists());

			catalog.drop_table("b").unwrap();
			assert!(catalog.find_dictionary(dict).is_none());
		});
	}

	#[test]
	fn test_drop_sharded_table_removes_shards() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			catalog.create_table(
				TableToCreate::new("s", UserId::ROOT)
					.with_column(ColumnToCreate::new("id", TypeInfo::new(SqlType::Int)))
					.with_column(text("name"))
					.sharded(2, 1),
			)
			.unwrap();
			assert_eq!(catalog.list_tables().len(), 3);

			catalog.drop_table("s").unwrap();
			assert!(catalog.list_tables().is_empty());
			assert!(catalog.materialized().list_dictionaries().is_empty());
			let links = context.system().store().query("SELECT count(*) FROM mapd_logical_to_physical", &[]).unwrap();
			assert_eq!(links.first().unwrap().get_i64(0), 0);
		});
	}

	#[test]
	fn test_drop_revokes_grants_from_every_role() {
		with_context(true, |context, _| {
			let system = context.system();
			let alice = system.create_user("alice", "pw", false).unwrap();
			system.create_role("readers").unwrap();
			let catalog = default_catalog(context);
			let table = catalog
				.create_table(
					TableToCreate::new("t", alice.id)
						.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int))),
				)
				.unwrap();
			let key = DbObjectKey::new(DbObjectType::Table, catalog.database().id, *table.id);
			assert!(system.db_object_privileges("alice", &key).is_some());

			catalog.drop_table("t").unwrap();
			assert!(system.db_object_privileges("alice", &key).is_none());
		});
	}

	#[test]
	fn test_drop_unknown_table() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			assert_eq!(catalog.drop_table("nope").unwrap_err().code, "CA_002");
		});
	}

	#[test]
	fn test_drop_with_unregistered_dictionary_fails() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let table = catalog.create_table(TableToCreate::new("t", UserId::ROOT).with_column(text("s"))).unwrap();
			let dict = DictionaryId(catalog.list_columns(table.id)[0].ty.comp_param);
			catalog.materialized().update(|r| r.remove_dictionary(dict));

			assert_eq!(catalog.drop_table("t").unwrap_err().code, "CA_005");
			assert!(catalog.find_table_by_name("t").is_some());
			let rows = catalog.store.query("SELECT count(*) FROM mapd_tables WHERE tableid = ?1", &[&*table.id]).unwrap();
			assert_eq!(rows.first().unwrap().get_i64(0), 1);
		});
	}

	#[test]
	fn test_drop_temporary_table() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			catalog.create_table(TableToCreate::new("tmp", UserId::ROOT).with_column(text("s")).temporary()).unwrap();
			catalog.drop_table("tmp").unwrap();
			assert!(catalog.find_table_by_name("tmp").is_none());
			assert!(catalog.materialized().list_dictionaries().is_empty());
		});
	}
}
