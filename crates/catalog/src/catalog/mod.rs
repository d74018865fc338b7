// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The catalog of one database: table, view, dashboard and link DDL over the
//! database's row store and its [`MaterializedCatalog`].
//!
//! Every mutation writes the row store first and publishes to the registry
//! only after the transaction committed. Operations that also touch roles
//! take the system writer before the catalog's own `ddl` lock.

use std::sync::{
	Arc,
	atomic::{AtomicI32, Ordering},
};

use anacat_core::interface::{CatalogPorts, DatabaseDef, SYSTEM_DATABASE_NAME, TableDef, UserDef};
use anacat_sqlite::{Queryable, RowStore};
use anacat_type::{DbObjectKey, DbObjectType, DictionaryId, TEMPORARY_ID_START, TableId, UserId};
use parking_lot::{Mutex, MutexGuard};
use tracing::{info, instrument};

use crate::{
	CatalogConfig, CatalogStore, MaterializedCatalog, Result, SystemCatalog,
	dictionary::DictionaryManager,
	error::{CatalogError, CatalogObjectKind},
	layout,
	materialized::load::MaterializedCatalogLoader,
	migration,
};

mod create;
mod dashboard;
mod drop;
mod epoch;
mod geometry;
mod link;
mod lookup;
mod rename;
mod truncate;
mod txn;

pub use epoch::EPOCH_MISMATCH;
pub(crate) use txn::DualTxn;

pub struct Catalog {
	db: DatabaseDef,
	system: Arc<SystemCatalog>,
	store: Arc<RowStore>,
	materialized: MaterializedCatalog,
	ddl: Mutex<()>,
	next_temp_table: AtomicI32,
	next_temp_dictionary: AtomicI32,
}

impl Catalog {
	/// Opens the row store of `db`, brings it to the current schema and
	/// rebuilds the registry from it. Must not be called while holding the
	/// system writer.
	#[instrument(name = "catalog::open", level = "info", skip(system), fields(db = %db.name))]
	pub(crate) fn open(system: Arc<SystemCatalog>, db: DatabaseDef) -> Result<Self> {
		let store = if db.name == SYSTEM_DATABASE_NAME {
			system.store().clone()
		} else {
			let path = layout::catalog_file(&system.config().base_path, &db.name);
			if !path.exists() {
				return Err(CatalogError::Inconsistent {
					message: format!("catalog file {} of database `{}` is missing", path.display(), db.name),
				}
				.into());
			}
			Arc::new(RowStore::open(system.config().sqlite.with_path(&path))?)
		};

		migration::migrate_database(&store, &system, &db)?;

		let materialized = MaterializedCatalog::new();
		MaterializedCatalogLoader::load_all(store.as_ref(), &materialized, db.id, &system.config().base_path)?;

		info!(db = *db.id, tables = materialized.list_tables().len(), "catalog opened");

		Ok(Self {
			db,
			system,
			store,
			materialized,
			ddl: Mutex::new(()),
			next_temp_table: AtomicI32::new(TEMPORARY_ID_START),
			next_temp_dictionary: AtomicI32::new(TEMPORARY_ID_START),
		})
	}

	pub fn database(&self) -> &DatabaseDef {
		&self.db
	}

	pub fn materialized(&self) -> &MaterializedCatalog {
		&self.materialized
	}

	pub fn system(&self) -> &Arc<SystemCatalog> {
		&self.system
	}

	/// Serializes DDL on this database.
	pub(crate) fn lock_ddl(&self) -> MutexGuard<'_, ()> {
		self.ddl.lock()
	}

	fn config(&self) -> &CatalogConfig {
		self.system.config()
	}

	fn ports(&self) -> &CatalogPorts {
		self.system.ports()
	}

	fn dictionaries(&self) -> DictionaryManager<'_> {
		DictionaryManager::new(self.db.id, self.config(), self.ports())
	}

	fn next_temp_table_id(&self) -> TableId {
		TableId(self.next_temp_table.fetch_add(1, Ordering::SeqCst))
	}

	fn next_temp_dictionary_id(&self) -> DictionaryId {
		DictionaryId(self.next_temp_dictionary.fetch_add(1, Ordering::SeqCst))
	}

	/// Tells the plan cache that `table` changed.
	fn notify(&self, table: &str) -> Result<()> {
		self.ports().plan_cache.update_metadata(&self.db.name, table)
	}

	fn require_table(&self, name: &str) -> Result<TableDef> {
		self.materialized.find_table_by_name(name).ok_or_else(|| {
			CatalogError::NotFound {
				kind: CatalogObjectKind::Table,
				name: name.to_string(),
			}
			.into()
		})
	}

	/// Grant key of a table or view of this database.
	fn object_key(&self, table: &TableDef) -> DbObjectKey {
		let object_type = if table.is_view {
			DbObjectType::View
		} else {
			DbObjectType::Table
		};
		DbObjectKey::new(object_type, self.db.id, *table.id)
	}
}

/// Owner lookup through an open system transaction.
fn require_owner(rx: &impl Queryable, id: UserId) -> Result<UserDef> {
	match CatalogStore::find_user(rx, id)? {
		Some(user) => Ok(user),
		None => Err(CatalogError::NotFound {
			kind: CatalogObjectKind::User,
			name: id.to_string(),
		}
		.into()),
	}
}
