// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fs;

use anacat_core::interface::{DatabaseDef, SYSTEM_DATABASE_NAME};
use anacat_sqlite::RowStore;
use anacat_type::{DatabaseId, DbObjectKey, DbObjectType, UserId};
use tracing::{info, instrument, warn};

use super::SystemCatalog;
use crate::{
	Catalog, CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
	layout, migration,
};

impl SystemCatalog {
	/// Registers a database, creates its catalog file with the schema tables
	/// and makes `owner` its owner.
	#[instrument(name = "catalog::system::create_database", level = "info", skip(self))]
	pub fn create_database(&self, name: &str, owner: UserId) -> Result<DatabaseDef> {
		let _writer = self.lock_writer();

		let path = layout::catalog_file(&self.config.base_path, name);
		let txn = self.store.begin()?;

		if CatalogStore::find_database_by_name(&txn, name)?.is_some() {
			return Err(CatalogError::AlreadyExists {
				kind: CatalogObjectKind::Database,
				name: name.to_string(),
			}
			.into());
		}
		let Some(owner) = CatalogStore::find_user(&txn, owner)? else {
			return Err(CatalogError::NotFound {
				kind: CatalogObjectKind::User,
				name: owner.to_string(),
			}
			.into());
		};
		if path.exists() {
			return Err(CatalogError::Inconsistent {
				message: format!("catalog file {} exists for an unregistered database", path.display()),
			}
			.into());
		}

		let db = CatalogStore::create_database(&txn, name, owner.id)?;

		let mut roles = self.working_roles();
		self.grant_ownership(&mut roles, &txn, &owner, DbObjectKey::database(db.id), name)?;

		if let Err(err) = create_database_file(self, &path) {
			let _ = fs::remove_file(&path);
			return Err(err);
		}

		if let Err(err) = txn.commit() {
			let _ = fs::remove_file(&path);
			return Err(err);
		}
		self.publish_roles(roles);

		info!(db = *db.id, "database created");
		Ok(db)
	}

	/// Removes a database. Every record naming its tables, views, dashboards
	/// or the database itself is revoked from every role in the same
	/// transaction that deletes the database row.
	#[instrument(name = "catalog::system::drop_database", level = "info", skip(self, catalog), fields(db = %catalog.database().name))]
	pub fn drop_database(&self, catalog: &Catalog) -> Result<()> {
		let db = catalog.database().clone();
		if db.name == SYSTEM_DATABASE_NAME {
			return Err(CatalogError::PermissionDenied {
				message: format!("database `{}` cannot be dropped", db.name),
			}
			.into());
		}

		let _writer = self.lock_writer();
		let _ddl = catalog.lock_ddl();
		let txn = self.store.begin()?;

		let mut roles = self.working_roles();
		for table in catalog.materialized().list_tables() {
			if table.is_physical_shard() {
				continue;
			}
			let object_type = if table.is_view {
				DbObjectType::View
			} else {
				DbObjectType::Table
			};
			self.revoke_everywhere(&mut roles, &txn, &DbObjectKey::new(object_type, db.id, *table.id))?;
		}
		for dashboard in catalog.materialized().list_dashboards() {
			self.revoke_everywhere(
				&mut roles,
				&txn,
				&DbObjectKey::new(DbObjectType::Dashboard, db.id, *dashboard.id),
			)?;
		}
		self.revoke_everywhere(&mut roles, &txn, &DbObjectKey::database(db.id))?;

		CatalogStore::delete_database(&txn, db.id)?;
		CatalogStore::delete_legacy_privileges_for_database(&txn, db.id)?;

		txn.commit()?;
		self.publish_roles(roles);

		let path = layout::catalog_file(&self.config.base_path, &db.name);
		if let Err(err) = fs::remove_file(&path) {
			warn!(path = %path.display(), "cannot remove catalog file: {}", err);
		}
		if let Err(err) = self.ports.storage.delete_chunks_with_prefix(&[*db.id], None) {
			warn!(db = *db.id, "cannot delete chunks of dropped database: {}", err.message);
		}
		if let Err(err) = self.ports.plan_cache.update_metadata(&db.name, "") {
			warn!(db = *db.id, "plan cache notification failed: {}", err.message);
		}

		info!(db = *db.id, "database dropped");
		Ok(())
	}

	pub fn database(&self, name: &str) -> Result<Option<DatabaseDef>> {
		CatalogStore::find_database_by_name(self.store.as_ref(), name)
	}

	pub fn database_by_id(&self, id: DatabaseId) -> Result<Option<DatabaseDef>> {
		CatalogStore::find_database(self.store.as_ref(), id)
	}

	pub fn all_databases(&self) -> Result<Vec<DatabaseDef>> {
		CatalogStore::list_databases(self.store.as_ref())
	}
}

fn create_database_file(system: &SystemCatalog, path: &std::path::Path) -> Result<()> {
	let store = RowStore::open(system.config.sqlite.with_path(path))?;
	let txn = store.begin()?;
	CatalogStore::create_database_schema(&txn)?;
	migration::mark_database_current(&txn)?;
	txn.commit()
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::{ColumnToCreate, DbObject, TableToCreate};
	use anacat_type::{AccessPrivileges, DbObjectKey, DbObjectType, SqlType, TypeInfo, UserId};

	use crate::{layout, test_utils::with_context};

	#[test]
	fn test_create_database_writes_file_and_owner_grant() {
		with_context(true, |context, _| {
			let system = context.system();
			let carol = system.create_user("carol", "pw", false).unwrap();
			let db = system.create_database("sales", carol.id).unwrap();

			assert!(layout::catalog_file(&system.config().base_path, "sales").exists());
			assert!(system.verify_db_object_ownership(&carol, &DbObjectKey::database(db.id)).unwrap());
			assert_eq!(system.create_database("SALES", carol.id).unwrap_err().code, "CA_001");
			assert_eq!(system.all_databases().unwrap().len(), 2);
		});
	}

	#[test]
	fn test_create_database_for_unknown_owner() {
		with_context(true, |context, _| {
			assert_eq!(context.system().create_database("sales", UserId(42)).unwrap_err().code, "CA_002");
		});
	}

	#[test]
	fn test_drop_database_cascades_grants() {
		with_context(true, |context, ports| {
			let system = context.system();
			system.create_user("bob", "pw", false).unwrap();
			system.create_role("readers").unwrap();
			let db = context.create_database("sales", UserId::ROOT).unwrap();

			let catalog = context.catalog("sales").unwrap();
			let table = catalog
				.create_table(
					TableToCreate::new("orders", UserId::ROOT)
						.with_column(ColumnToCreate::new("id", TypeInfo::new(SqlType::Int))),
				)
				.unwrap();
			let key = DbObjectKey::new(DbObjectType::Table, db.id, *table.id);
			system.grant_db_object_privileges("readers", &DbObject::new(key, AccessPrivileges::SELECT_FROM_TABLE, "orders"))
				.unwrap();
			system.grant_db_object_privileges(
				"bob",
				&DbObject::new(DbObjectKey::database(db.id), AccessPrivileges::ACCESS, "sales"),
			)
			.unwrap();
			drop(catalog);

			context.drop_database("sales").unwrap();

			assert!(system.database("sales").unwrap().is_none());
			assert!(system.db_object_privileges("readers", &key).is_none());
			assert!(system.db_object_privileges("bob", &DbObjectKey::database(db.id)).is_none());
			assert!(!layout::catalog_file(&system.config().base_path, "sales").exists());
			assert!(ports.plan_cache.was_notified("sales", ""));
			assert_eq!(context.catalog("sales").err().unwrap().code, "CA_002");
		});
	}

	#[test]
	fn test_default_database_cannot_be_dropped() {
		with_context(true, |context, _| {
			assert_eq!(context.drop_database("mapd").unwrap_err().code, "CA_004");
		});
	}
}
