// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::iter::once;

use anacat_core::interface::{ROWID_COLUMN_NAME, TableDef};
use anacat_type::TableId;
use tracing::{info, instrument};

use super::Catalog;
use crate::{
	CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
	materialized::name_key,
};

impl Catalog {
	/// Renames a table or view. Physical shards follow the new name.
	#[instrument(name = "catalog::table::rename", level = "info", skip(self), fields(db = %self.db.name))]
	pub fn rename_table(&self, name: &str, new_name: &str) -> Result<()> {
		let _ddl = self.lock_ddl();
		let table = self.require_table(name)?;
		let renames: Vec<(TableId, String)> = self
			.shards_of(&table)
			.into_iter()
			.map(|shard| (shard.id, TableDef::shard_name(new_name, shard.shard)))
			.chain(once((table.id, new_name.to_string())))
			.collect();
		self.materialized.read(|r| r.check_renames(&renames))?;

		if !table.is_temporary() {
			let txn = self.store.begin()?;
			for (id, renamed) in &renames {
				CatalogStore::rename_table(&txn, *id, renamed)?;
			}
			txn.commit()?;
		}

		self.materialized.update(|r| r.rename_tables(&renames))?;

		self.notify(&table.name)?;
		self.notify(new_name)?;
		info!(table = *table.id, from = name, to = new_name, "table renamed");
		Ok(())
	}

	/// Renames a column. The same column of every physical shard is renamed
	/// with it.
	#[instrument(name = "catalog::column::rename", level = "info", skip(self), fields(db = %self.db.name))]
	pub fn rename_column(&self, table_name: &str, name: &str, new_name: &str) -> Result<()> {
		let _ddl = self.lock_ddl();
		let table = self.require_table(table_name)?;

		let Some(column) = self.materialized.find_column_by_name(table.id, name) else {
			return Err(CatalogError::NotFound {
				kind: CatalogObjectKind::Column,
				name: format!("{}.{}", table_name, name),
			}
			.into());
		};
		if column.is_system || name_key(new_name) == name_key(ROWID_COLUMN_NAME) {
			return Err(CatalogError::ReservedColumnName {
				table: table_name.to_string(),
				column: new_name.to_string(),
			}
			.into());
		}
		if name_key(name) != name_key(new_name) && self.materialized.find_column_by_name(table.id, new_name).is_some() {
			return Err(CatalogError::AlreadyExists {
				kind: CatalogObjectKind::Column,
				name: format!("{}.{}", table_name, new_name),
			}
			.into());
		}
		let shards = self.shards_of(&table);

		if !table.is_temporary() {
			let txn = self.store.begin()?;
			for shard in &shards {
				CatalogStore::rename_column(&txn, shard.id, column.id, new_name)?;
			}
			CatalogStore::rename_column(&txn, table.id, column.id, new_name)?;
			txn.commit()?;
		}

		self.materialized.update(|r| {
			for shard in &shards {
				r.rename_column(shard.id, column.id, new_name);
			}
			r.rename_column(table.id, column.id, new_name);
		});

		self.notify(&table.name)?;
		info!(table = *table.id, column = *column.id, to = new_name, "column renamed");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::{ColumnToCreate, TableToCreate};
	use anacat_type::{SqlType, TypeInfo, UserId};

	use crate::{
		Catalog,
		test_utils::{default_catalog, with_context},
	};

	fn two_columns(catalog: &Catalog, name: &str) {
		catalog.create_table(
			TableToCreate::new(name, UserId::ROOT)
				.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int)))
				.with_column(ColumnToCreate::new("b", TypeInfo::new(SqlType::Int))),
		)
		.unwrap();
	}

	#[test]
	fn test_rename_table() {
		with_context(true, |context, ports| {
			let catalog = default_catalog(context);
			two_columns(&catalog, "old");

			catalog.rename_table("old", "new").unwrap();
			assert!(catalog.find_table_by_name("old").is_none());
			assert_eq!(catalog.find_table_by_name("new").unwrap().name, "new");
			assert!(ports.plan_cache.was_notified("mapd", "old"));
			assert!(ports.plan_cache.was_notified("mapd", "new"));
		});
	}

	#[test]
	fn test_rename_table_onto_existing_name() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			two_columns(&catalog, "a");
			two_columns(&catalog, "b");
			assert_eq!(catalog.rename_table("a", "B").unwrap_err().code, "CA_001");
		});
	}

	#[test]
	fn test_rename_sharded_table_renames_shards() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let logical = catalog
				.create_table(
					TableToCreate::new("s", UserId::ROOT)
						.with_column(ColumnToCreate::new("id", TypeInfo::new(SqlType::Int)))
						.sharded(2, 1),
				)
				.unwrap();

			catalog.rename_table("s", "t").unwrap();
			let names: Vec<String> = catalog.physical_tables(logical.id).into_iter().map(|s| s.name).collect();
			assert_eq!(names, vec!["t_shard_#1", "t_shard_#2"]);
			assert!(catalog.find_table_by_name("s_shard_#1").is_none());
		});
	}

	#[test]
	fn test_rename_rejects_name_taken_by_new_shard_name() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			two_columns(&catalog, "X_SHARD_#1");
			let squatter = catalog.find_table_by_name("X_SHARD_#1").unwrap();
			let logical = catalog
				.create_table(
					TableToCreate::new("s", UserId::ROOT)
						.with_column(ColumnToCreate::new("id", TypeInfo::new(SqlType::Int)))
						.sharded(2, 1),
				)
				.unwrap();

			assert_eq!(catalog.rename_table("s", "x").unwrap_err().code, "CA_001");
			assert_eq!(catalog.find_table_by_name("x_shard_#1").unwrap().id, squatter.id);
			assert_eq!(catalog.find_table_by_name("s").unwrap().id, logical.id);
			assert!(catalog.find_table_by_name("s_shard_#1").is_some());

			catalog.drop_table("s").unwrap();
			assert_eq!(catalog.find_table_by_name("X_SHARD_#1").unwrap().id, squatter.id);
		});
	}

	#[test]
	fn test_rename_column() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			two_columns(&catalog, "t");
			let table = catalog.find_table_by_name("t").unwrap();

			catalog.rename_column("t", "a", "c").unwrap();
			let column = catalog.find_column_by_name(table.id, "c").unwrap();
			assert_eq!(*column.id, 1);
			assert!(catalog.find_column_by_name(table.id, "a").is_none());

			assert_eq!(catalog.rename_column("t", "c", "b").unwrap_err().code, "CA_001");
			assert_eq!(catalog.rename_column("t", "c", "rowid").unwrap_err().code, "CA_003");
			assert_eq!(catalog.rename_column("t", "zz", "y").unwrap_err().code, "CA_002");
		});
	}

	#[test]
	fn test_rename_survives_reopen() {
		with_context(true, |context, _| {
			context.create_database("db", UserId::ROOT).unwrap();
			let catalog = context.catalog("db").unwrap();
			two_columns(&catalog, "t");
			catalog.rename_table("t", "u").unwrap();
			catalog.rename_column("u", "a", "z").unwrap();

			let reopened = Catalog::open(context.system().clone(), catalog.database().clone()).unwrap();
			let table = reopened.find_table_by_name("u").unwrap();
			assert!(reopened.find_column_by_name(table.id, "z").is_some());
		});
	}
}
