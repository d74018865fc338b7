// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use anacat_core::interface::{DEFAULT_MAX_CHUNK_SIZE, DatabaseDef, DbObject};
use anacat_sqlite::{Queryable, RowStore, StoreTxn};
use anacat_type::{AccessPrivileges, DbObjectKey, DbObjectType, UserId};
use tracing::{error, info, instrument};

use super::{RECORD_OWNERSHIP_MARKER, ROOT_USER_ID, Step, add_column, run_steps};
use crate::{CatalogStore, Result, SystemCatalog, catalog::DualTxn, layout, store::schema};

/// Page size every table had before page sizes were versioned.
const LEGACY_PAGE_SIZE: i32 = 2_097_152;

const FRONTEND_VIEWS: &str = "mapd_frontend_views";

pub(crate) struct DatabaseMigration {
	db: DatabaseDef,
	base_path: PathBuf,
}

const STEPS: &[Step<DatabaseMigration>] = &[
	Step {
		name: "table_descriptor_columns",
		run: table_descriptor_columns,
	},
	Step {
		name: "dashboard_and_link_users",
		run: dashboard_and_link_users,
	},
	Step {
		name: "frontend_view_columns",
		run: frontend_view_columns,
	},
	Step {
		name: "link_schema",
		run: link_schema,
	},
	Step {
		name: "dictionary_folder_names",
		run: dictionary_folder_names,
	},
	Step {
		name: "logical_to_physical_schema",
		run: logical_to_physical_schema,
	},
	Step {
		name: "dictionary_refcount",
		run: dictionary_refcount,
	},
	Step {
		name: "page_size",
		run: page_size,
	},
	Step {
		name: "deleted_column_indicator",
		run: deleted_column_indicator,
	},
	Step {
		name: "frontend_views_to_dashboards",
		run: frontend_views_to_dashboards,
	},
];

/// Brings a database store to the current schema. Ownership recording
/// writes to the system store as well and runs last.
#[instrument(name = "catalog::migration::database", level = "info", skip(store, system), fields(db = %db.name))]
pub(crate) fn migrate_database(store: &Arc<RowStore>, system: &SystemCatalog, db: &DatabaseDef) -> Result<()> {
	let context = DatabaseMigration {
		db: db.clone(),
		base_path: system.config().base_path.clone(),
	};
	run_steps(store, STEPS, &context)?;

	if system.privileges_enabled() {
		record_ownership(store, system, db)?;
	}
	Ok(())
}

fn table_descriptor_columns(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	let mut changed = false;
	for (column, definition) in [
		("max_chunk_size", format!("BIGINT DEFAULT {}", DEFAULT_MAX_CHUNK_SIZE)),
		("shard_column_id", "BIGINT DEFAULT 0".to_string()),
		("shard", "BIGINT DEFAULT -1".to_string()),
		("num_shards", "BIGINT DEFAULT 0".to_string()),
		("key_metainfo", "TEXT DEFAULT '[]'".to_string()),
		("userid", format!("integer DEFAULT {}", ROOT_USER_ID)),
	] {
		changed |= add_column(tx, "mapd_tables", column, &definition)?;
	}
	Ok(changed)
}

/// Links and legacy frontend views without an owner belong to root.
fn dashboard_and_link_users(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	let mut updated = 0;
	for table in ["mapd_links", FRONTEND_VIEWS] {
		if tx.table_exists(table)? {
			updated += tx.execute(
				&format!("UPDATE {} SET userid = ?1 WHERE userid IS NULL", table),
				&[&ROOT_USER_ID],
			)?;
		}
	}
	Ok(updated > 0)
}

fn frontend_view_columns(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	if !tx.table_exists(FRONTEND_VIEWS)? {
		return Ok(false);
	}
	let mut changed = false;
	for (column, definition) in [("image_hash", "text"), ("update_time", "timestamp"), ("view_metadata", "text")] {
		changed |= add_column(tx, FRONTEND_VIEWS, column, definition)?;
	}
	Ok(changed)
}

fn link_schema(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	if !tx.table_exists("mapd_links")? {
		tx.execute(schema::LINKS, &[])?;
		return Ok(true);
	}
	add_column(tx, "mapd_links", "view_metadata", "text")
}

/// Dictionary folders used to be named after the database and dictionary
/// names. Folders that cannot be renamed are logged and left behind.
fn dictionary_folder_names(tx: &StoreTxn<'_>, context: &DatabaseMigration) -> Result<bool> {
	if tx.has_column("mapd_dictionaries", "version_num")? {
		return Ok(false);
	}

	let rows = tx.query("SELECT dictid, name FROM mapd_dictionaries", &[])?;
	for row in &rows {
		let id = anacat_type::DictionaryId(row.get_i32(0));
		let old = layout::legacy_dictionary_folder(&context.base_path, &context.db.name, &row.get_string(1));
		let new = layout::dictionary_folder(&context.base_path, context.db.id, id);
		rename_folder(&old, &new);
	}

	tx.execute("ALTER TABLE mapd_dictionaries ADD version_num BIGINT DEFAULT 1", &[])?;
	Ok(true)
}

fn rename_folder(old: &Path, new: &Path) {
	match fs::rename(old, new) {
		Ok(()) => info!(from = %old.display(), to = %new.display(), "dictionary folder renamed"),
		Err(err) => error!(from = %old.display(), to = %new.display(), "cannot rename dictionary folder: {}", err),
	}
}

fn logical_to_physical_schema(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	if tx.table_exists("mapd_logical_to_physical")? {
		return Ok(false);
	}
	tx.execute(schema::LOGICAL_TO_PHYSICAL, &[])?;
	Ok(true)
}

fn dictionary_refcount(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	add_column(tx, "mapd_dictionaries", "refcount", "int DEFAULT 1")
}

fn page_size(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	if tx.has_column("mapd_tables", "version_num")? {
		return Ok(false);
	}
	tx.execute("UPDATE mapd_tables SET frag_page_size = ?1", &[&LEGACY_PAGE_SIZE])?;
	tx.execute("ALTER TABLE mapd_tables ADD version_num BIGINT DEFAULT 1", &[])?;
	Ok(true)
}

fn deleted_column_indicator(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	if tx.has_column("mapd_columns", "version_num")? {
		return Ok(false);
	}
	tx.execute("ALTER TABLE mapd_columns ADD version_num BIGINT DEFAULT 1", &[])?;
	add_column(tx, "mapd_columns", "is_deletedcol", "boolean DEFAULT 0")?;
	Ok(true)
}

fn frontend_views_to_dashboards(tx: &StoreTxn<'_>, _: &DatabaseMigration) -> Result<bool> {
	if tx.table_exists("mapd_dashboards")? {
		return Ok(false);
	}
	tx.execute(schema::DASHBOARDS, &[])?;

	if tx.table_exists(FRONTEND_VIEWS)? {
		tx.execute(
			"INSERT INTO mapd_dashboards (id, name, userid, state, image_hash, update_time, metadata) \
			 SELECT viewid, name, userid, view_state, image_hash, update_time, view_metadata FROM mapd_frontend_views",
			&[],
		)?;
	}
	Ok(true)
}

/// Grants every owner's private role all privileges on the tables, views and
/// dashboards it owns, recording the owner. Guarded by a marker table in the
/// database store; the grants land in the system store in the same commit.
fn record_ownership(store: &Arc<RowStore>, system: &SystemCatalog, db: &DatabaseDef) -> Result<()> {
	let _writer = system.lock_writer();
	let txn = DualTxn::begin(system.store(), store)?;

	if txn.db().table_exists(RECORD_OWNERSHIP_MARKER)? {
		return Ok(());
	}
	txn.db().execute(&format!("CREATE TABLE {} (dummy integer)", RECORD_OWNERSHIP_MARKER), &[])?;

	let mut objects: Vec<DbObject> = Vec::new();
	for row in &txn.db().query("SELECT tableid, name, userid, isview FROM mapd_tables WHERE userid > 0", &[])? {
		let (object_type, privileges) = if row.get_bool(3) {
			(DbObjectType::View, AccessPrivileges::ALL_VIEW)
		} else {
			(DbObjectType::Table, AccessPrivileges::ALL_TABLE)
		};
		let key = DbObjectKey::new(object_type, db.id, row.get_i32(0));
		objects.push(DbObject::new(key, privileges, row.get_string(1)).with_owner(UserId(row.get_i32(2))));
	}
	for row in &txn.db().query("SELECT id, name, userid FROM mapd_dashboards WHERE userid > 0", &[])? {
		let key = DbObjectKey::new(DbObjectType::Dashboard, db.id, row.get_i32(0));
		objects.push(
			DbObject::new(key, AccessPrivileges::ALL_DASHBOARD, row.get_string(1)).with_owner(UserId(row.get_i32(2))),
		);
	}

	let mut roles = system.working_roles();
	let mut recorded = 0;
	for object in &objects {
		let Some(owner) = CatalogStore::find_user(txn.sys(), object.owner)? else {
			continue;
		};
		if roles.group(&owner.name).is_none() {
			continue;
		}
		roles.grant_object(txn.sys(), &owner.name, object)?;
		recorded += 1;
	}

	txn.commit()?;
	system.publish_roles(roles);

	info!(db = *db.id, recorded, "object ownership recorded");
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use anacat_sqlite::{Queryable, RowStore};
	use anacat_type::TableId;

	use super::{DatabaseMigration, STEPS, run_steps};
	use crate::{CatalogStore, test_utils};

	/// A database store as written by an early release.
	fn legacy_store() -> Arc<RowStore> {
		let store = RowStore::in_memory().unwrap();
		store.execute_batch(
			"CREATE TABLE mapd_tables (tableid integer primary key, name text unique, ncolumns integer, \
			 isview boolean, fragments text, frag_type integer, max_frag_rows integer, frag_page_size integer, \
			 max_rows bigint, partitions text);
			 CREATE TABLE mapd_columns (tableid integer references mapd_tables, columnid integer, name text, \
			 coltype integer, colsubtype integer, coldim integer, colscale integer, is_notnull boolean, \
			 compression integer, comp_param integer, size integer, chunks text, is_systemcol boolean, \
			 is_virtualcol boolean, virtual_expr text, primary key(tableid, columnid), unique(tableid, name));
			 CREATE TABLE mapd_views (tableid integer references mapd_tables, sql text);
			 CREATE TABLE mapd_dictionaries (dictid integer primary key, name text unique, nbits int, is_shared boolean);
			 CREATE TABLE mapd_frontend_views (viewid integer primary key, name text, userid integer, view_state text);
			 INSERT INTO mapd_tables VALUES (1, 'orders', 0, 0, '', 0, 32000000, 1048576, 4611686018427387904, '');
			 INSERT INTO mapd_frontend_views VALUES (5, 'overview', NULL, '{}');",
		)
		.unwrap();
		Arc::new(store)
	}

	fn context() -> DatabaseMigration {
		DatabaseMigration {
			db: anacat_core::interface::DatabaseDef {
				id: anacat_type::DatabaseId(2),
				name: "sales".to_string(),
				owner: anacat_type::UserId::ROOT,
			},
			base_path: std::env::temp_dir().join("anacat-missing"),
		}
	}

	#[test]
	fn test_legacy_store_reaches_current_schema() {
		let store = legacy_store();
		let applied = run_steps(&store, STEPS, &context()).unwrap();
		assert_eq!(applied, STEPS.len());

		let tables = CatalogStore::list_tables(store.as_ref()).unwrap();
		assert_eq!(tables[0].id, TableId(1));
		assert_eq!(tables[0].page_size, 2_097_152);
		assert_eq!(tables[0].shard, -1);
		assert_eq!(tables[0].key_metainfo, "[]");

		let dashboards = CatalogStore::list_dashboards(store.as_ref()).unwrap();
		assert_eq!(dashboards.len(), 1);
		assert_eq!(dashboards[0].name, "overview");
		assert_eq!(*dashboards[0].user, 0);

		assert!(store.has_column("mapd_columns", "is_deletedcol").unwrap());
		assert!(store.has_column("mapd_dictionaries", "refcount").unwrap());
		assert!(store.table_exists("mapd_logical_to_physical").unwrap());
	}

	#[test]
	fn test_second_run_changes_nothing() {
		let store = legacy_store();
		run_steps(&store, STEPS, &context()).unwrap();
		assert_eq!(run_steps(&store, STEPS, &context()).unwrap(), 0);
	}

	#[test]
	fn test_current_schema_needs_nothing() {
		let store = RowStore::in_memory().unwrap();
		CatalogStore::create_database_schema(&store).unwrap();
		assert_eq!(run_steps(&store, STEPS, &context()).unwrap(), 0);
	}

	#[test]
	fn test_ownership_recorded_once() {
		test_utils::with_context(true, |context, _| {
			let system = context.system();
			let bob = system.create_user("bob", "pw", false).unwrap();
			let db = system.database("mapd").unwrap().unwrap();
			let store = system.store().clone();

			store.execute("DROP TABLE mapd_record_ownership_marker", &[]).unwrap();
			store.execute(
				"INSERT INTO mapd_tables (tableid, name, userid, ncolumns, isview) VALUES (40, 'legacy', ?1, 0, 0)",
				&[&*bob.id],
			)
			.unwrap();

			super::record_ownership(&store, system, &db).unwrap();
			let key = anacat_type::DbObjectKey::new(anacat_type::DbObjectType::Table, db.id, 40);
			assert!(system.verify_db_object_ownership(&bob, &key).unwrap());

			system.revoke_db_object_privileges_from_all_roles(&key).unwrap();
			super::record_ownership(&store, system, &db).unwrap();
			assert!(!system.verify_db_object_ownership(&bob, &key).unwrap());
		});
	}
}
