// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_sqlite::Queryable;

use crate::{CatalogStore, Result};

pub(crate) const USERS: &str = "CREATE TABLE mapd_users (\
	userid integer primary key, name text unique, passwd text, issuper boolean)";

pub(crate) const DATABASES: &str = "CREATE TABLE mapd_databases (\
	dbid integer primary key, name text unique, owner integer references mapd_users)";

pub(crate) const ROLES: &str = "CREATE TABLE mapd_roles (\
	roleName text, userName text, UNIQUE(roleName, userName))";

pub(crate) const OBJECT_PERMISSIONS: &str = "CREATE TABLE mapd_object_permissions (\
	roleName text, roleType bool, dbId integer references mapd_databases, objectName text, \
	objectId integer, objectPermissionsType integer, objectPermissions integer, objectOwnerId integer, \
	UNIQUE(roleName, objectPermissionsType, dbId, objectId))";

pub(crate) const PRIVILEGES: &str = "CREATE TABLE mapd_privileges (\
	userid integer references mapd_users, dbid integer references mapd_databases, \
	select_priv boolean, insert_priv boolean, UNIQUE(userid, dbid))";

pub(crate) const TABLES: &str = "CREATE TABLE mapd_tables (\
	tableid integer primary key, name text unique, userid integer, ncolumns integer, isview boolean, \
	fragments text, frag_type integer, max_frag_rows integer, max_chunk_size bigint, frag_page_size integer, \
	max_rows bigint, partitions text, shard_column_id integer, shard integer, num_shards integer, \
	key_metainfo TEXT, version_num BIGINT DEFAULT 1)";

pub(crate) const COLUMNS: &str = "CREATE TABLE mapd_columns (\
	tableid integer references mapd_tables, columnid integer, name text, coltype integer, colsubtype integer, \
	coldim integer, colscale integer, is_notnull boolean, compression integer, comp_param integer, \
	size integer, chunks text, is_systemcol boolean, is_virtualcol boolean, virtual_expr text, \
	is_deletedcol boolean, version_num BIGINT, primary key(tableid, columnid), unique(tableid, name))";

pub(crate) const VIEWS: &str = "CREATE TABLE mapd_views (tableid integer references mapd_tables, sql text)";

pub(crate) const DASHBOARDS: &str = "CREATE TABLE mapd_dashboards (\
	id integer primary key autoincrement, name text, userid integer references mapd_users, state text, \
	image_hash text, update_time timestamp, metadata text, UNIQUE(userid, name))";

pub(crate) const LINKS: &str = "CREATE TABLE mapd_links (\
	linkid integer primary key, userid integer references mapd_users, link text unique, view_state text, \
	update_time timestamp, view_metadata text)";

pub(crate) const DICTIONARIES: &str = "CREATE TABLE mapd_dictionaries (\
	dictid integer primary key, name text unique, nbits int, is_shared boolean, refcount int, \
	version_num BIGINT DEFAULT 1)";

pub(crate) const LOGICAL_TO_PHYSICAL: &str =
	"CREATE TABLE mapd_logical_to_physical (logical_table_id integer, physical_table_id integer)";

impl CatalogStore {
	/// Tables of the system store. `mapd_roles` and `mapd_object_permissions`
	/// exist only with privileges enabled.
	pub(crate) fn create_system_schema(tx: &impl Queryable, privileges_enabled: bool) -> Result<()> {
		tx.execute(USERS, &[])?;
		tx.execute(DATABASES, &[])?;
		if privileges_enabled {
			tx.execute(ROLES, &[])?;
			tx.execute(OBJECT_PERMISSIONS, &[])?;
		}
		tx.execute(PRIVILEGES, &[])?;
		Ok(())
	}

	/// Tables of a database store, at the current schema version.
	pub(crate) fn create_database_schema(tx: &impl Queryable) -> Result<()> {
		for ddl in [TABLES, COLUMNS, VIEWS, DASHBOARDS, LINKS, DICTIONARIES, LOGICAL_TO_PHYSICAL] {
			tx.execute(ddl, &[])?;
		}
		Ok(())
	}
}
