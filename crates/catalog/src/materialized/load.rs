// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, path::Path};

use anacat_core::interface::{ColumnDef, DictRef, DictionaryDef};
use anacat_sqlite::Queryable;
use anacat_type::{DatabaseId, TableId};
use tracing::{debug, warn};

use crate::{CatalogStore, MaterializedCatalog, Result, layout, materialized::Registry};

/// Rebuilds a database's registry from its row store.
pub(crate) struct MaterializedCatalogLoader;

impl MaterializedCatalogLoader {
	/// Load all catalog data of `db` from storage into `catalog`. Nothing is
	/// published unless every scan succeeds.
	pub(crate) fn load_all(
		rx: &impl Queryable,
		catalog: &MaterializedCatalog,
		db: DatabaseId,
		base_path: &Path,
	) -> Result<()> {
		let mut registry = Registry::default();

		load_dictionaries(rx, &mut registry, db, base_path)?;
		load_tables(rx, &mut registry)?;
		load_dashboards(rx, &mut registry)?;
		load_links(rx, &mut registry)?;
		load_physical_tables(rx, &mut registry)?;

		debug!(
			db = *db,
			tables = registry.tables.len(),
			dictionaries = registry.dictionaries.len(),
			"catalog loaded"
		);

		catalog.update(|r| *r = registry);
		Ok(())
	}
}

fn load_dictionaries(rx: &impl Queryable, registry: &mut Registry, db: DatabaseId, base_path: &Path) -> Result<()> {
	for row in CatalogStore::list_dictionaries(rx)? {
		registry.add_dictionary(DictionaryDef {
			dict_ref: DictRef::new(db, row.id),
			name: row.name,
			nbits: row.nbits,
			is_shared: row.is_shared,
			refcount: row.refcount,
			folder: layout::dictionary_folder(base_path, db, row.id),
			is_temp: false,
		});
	}
	Ok(())
}

fn load_tables(rx: &impl Queryable, registry: &mut Registry) -> Result<()> {
	let mut views: HashMap<TableId, String> = CatalogStore::list_views(rx)?.into_iter().collect();

	let mut columns: HashMap<TableId, Vec<ColumnDef>> = HashMap::new();
	for column in CatalogStore::list_columns(rx)? {
		columns.entry(column.table).or_default().push(column);
	}

	for mut table in CatalogStore::list_tables(rx)? {
		let table_columns = columns.remove(&table.id).unwrap_or_default();

		if table.is_view {
			table.view_sql = views.remove(&table.id).unwrap_or_default();
		}
		table.has_deleted_column = table_columns.iter().any(|c| c.is_deleted);

		if table_columns.len() as i32 != table.column_count {
			warn!(
				table = %table.name,
				expected = table.column_count,
				found = table_columns.len(),
				"column count disagrees with stored columns"
			);
		}

		registry.add_table(table, table_columns);
	}

	for table in columns.keys() {
		warn!(table = **table, "columns without a table row");
	}
	Ok(())
}

fn load_dashboards(rx: &impl Queryable, registry: &mut Registry) -> Result<()> {
	for dashboard in CatalogStore::list_dashboards(rx)? {
		registry.add_dashboard(dashboard);
	}
	Ok(())
}

fn load_links(rx: &impl Queryable, registry: &mut Registry) -> Result<()> {
	for link in CatalogStore::list_links(rx)? {
		registry.add_link(link);
	}
	Ok(())
}

fn load_physical_tables(rx: &impl Queryable, registry: &mut Registry) -> Result<()> {
	let mut physical: Vec<(TableId, Vec<TableId>)> = Vec::new();
	for (logical, shard) in CatalogStore::list_physical_table_links(rx)? {
		match physical.iter_mut().find(|(id, _)| *id == logical) {
			Some((_, shards)) => shards.push(shard),
			None => physical.push((logical, vec![shard])),
		}
	}

	for (logical, shards) in physical {
		if registry.find_table(logical).is_none() {
			warn!(logical = *logical, "shard links of a missing logical table");
			continue;
		}
		registry.set_physical_tables(logical, shards);
	}
	Ok(())
}
