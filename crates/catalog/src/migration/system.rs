// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::{BTreeMap, BTreeSet};

use anacat_core::interface::DbObject;
use anacat_sqlite::{Queryable, RowStore, StoreTxn};
use anacat_type::{AccessPrivileges, DatabaseId, DbObjectKey, DbObjectType, UserId};
use tracing::{instrument, warn};

use super::{Step, run_steps};
use crate::{CatalogConfig, CatalogStore, Result, store::schema};

const STEPS: &[Step<CatalogConfig>] = &[
	Step {
		name: "legacy_privileges_table",
		run: legacy_privileges_table,
	},
	Step {
		name: "user_roles_table",
		run: user_roles_table,
	},
	Step {
		name: "object_permissions",
		run: object_permissions,
	},
];

#[instrument(name = "catalog::migration::system", level = "info", skip_all)]
pub(crate) fn migrate_system(store: &RowStore, config: &CatalogConfig) -> Result<()> {
	run_steps(store, STEPS, config)?;
	Ok(())
}

fn legacy_privileges_table(tx: &StoreTxn<'_>, _: &CatalogConfig) -> Result<bool> {
	if tx.table_exists("mapd_privileges")? {
		return Ok(false);
	}
	tx.execute(schema::PRIVILEGES, &[])?;
	Ok(true)
}

/// Every existing user becomes a member of a private role named after them.
fn user_roles_table(tx: &StoreTxn<'_>, config: &CatalogConfig) -> Result<bool> {
	if !config.privileges_enabled || tx.table_exists("mapd_roles")? {
		return Ok(false);
	}
	tx.execute(schema::ROLES, &[])?;

	for user in CatalogStore::list_users(tx)? {
		if user.id == UserId::ROOT {
			continue;
		}
		CatalogStore::insert_user_role(tx, &user.name, &user.name)?;
	}
	Ok(true)
}

/// Translates the legacy ACL. A user holding both select and insert on a
/// database gets every table, dashboard and view privilege there; a user
/// holding no such database gets an empty grant so their private role exists.
fn object_permissions(tx: &StoreTxn<'_>, config: &CatalogConfig) -> Result<bool> {
	if !config.privileges_enabled || tx.table_exists("mapd_object_permissions")? {
		return Ok(false);
	}
	tx.execute(schema::OBJECT_PERMISSIONS, &[])?;

	let users: BTreeMap<UserId, String> =
		CatalogStore::list_users(tx)?.into_iter().map(|user| (user.id, user.name)).collect();
	let mut granted: BTreeSet<UserId> = BTreeSet::new();

	for legacy in CatalogStore::list_legacy_privileges(tx)? {
		if !(legacy.select && legacy.insert) {
			continue;
		}
		let Some(name) = users.get(&legacy.user) else {
			warn!(user = *legacy.user, db = *legacy.db, "legacy privileges of unknown user");
			continue;
		};
		granted.insert(legacy.user);

		for (object_type, privileges) in [
			(DbObjectType::Table, AccessPrivileges::ALL_TABLE_MIGRATE),
			(DbObjectType::Dashboard, AccessPrivileges::ALL_DASHBOARD_MIGRATE),
			(DbObjectType::View, AccessPrivileges::ALL_VIEW_MIGRATE),
		] {
			let key = DbObjectKey::new(object_type, legacy.db, DbObjectKey::WILDCARD);
			CatalogStore::upsert_object_permission(tx, name, true, &DbObject::new(key, privileges, ""))?;
		}
	}

	for (id, name) in &users {
		if *id == UserId::ROOT || granted.contains(id) {
			continue;
		}
		let object = DbObject::new(DbObjectKey::database(DatabaseId(0)), AccessPrivileges::NONE, "");
		CatalogStore::upsert_object_permission(tx, name, true, &object)?;
	}
	Ok(true)
}

#[cfg(test)]
mod tests {
	use anacat_sqlite::{Queryable, RowStore};
	use anacat_type::{AccessPrivileges, DatabaseId, DbObjectKey, DbObjectType, UserId};

	use super::migrate_system;
	use crate::{
		CatalogConfig, CatalogStore,
		role::RoleState,
		store::{legacy::LegacyPrivilege, schema},
	};

	/// A system store as written before roles existed.
	fn legacy_store() -> RowStore {
		let store = RowStore::in_memory().unwrap();
		store.execute(schema::USERS, &[]).unwrap();
		store.execute(schema::DATABASES, &[]).unwrap();
		store.execute(schema::PRIVILEGES, &[]).unwrap();
		store.execute("INSERT INTO mapd_users VALUES (0, 'mapd', 'pw', 1)", &[]).unwrap();
		store.execute("INSERT INTO mapd_users VALUES (1, 'alice', 'pw', 0)", &[]).unwrap();
		store.execute("INSERT INTO mapd_users VALUES (2, 'bob', 'pw', 0)", &[]).unwrap();
		store.execute("INSERT INTO mapd_databases VALUES (1, 'mapd', 0)", &[]).unwrap();
		CatalogStore::upsert_legacy_privileges(
			&store,
			&LegacyPrivilege {
				user: UserId(1),
				db: DatabaseId(1),
				select: true,
				insert: true,
			},
		)
		.unwrap();
		store
	}

	fn count(store: &RowStore, sql: &str) -> i64 {
		store.query(sql, &[]).unwrap().first().unwrap().get_i64(0)
	}

	#[test]
	fn test_legacy_acl_becomes_grants() {
		let store = legacy_store();
		migrate_system(&store, &CatalogConfig::default()).unwrap();

		assert_eq!(count(&store, "SELECT COUNT(*) FROM mapd_roles"), 2);

		let roles = RoleState::load(&store).unwrap();
		let alice = roles.group("alice").unwrap();
		let wide = DbObjectKey::new(DbObjectType::Table, DatabaseId(1), -1);
		assert_eq!(alice.find_object(&wide).unwrap().privileges, AccessPrivileges::ALL_TABLE_MIGRATE);
		assert!(alice.find_object(&DbObjectKey::database(DatabaseId(0))).is_none());

		let bob = roles.group("bob").unwrap();
		assert!(bob.is_private);
		assert_eq!(bob.objects.len(), 1);
		assert_eq!(
			bob.find_object(&DbObjectKey::database(DatabaseId(0))).unwrap().privileges,
			AccessPrivileges::NONE
		);
		assert!(roles.group("mapd").is_none());
	}

	#[test]
	fn test_migration_is_idempotent() {
		let store = legacy_store();
		migrate_system(&store, &CatalogConfig::default()).unwrap();
		let permissions = count(&store, "SELECT COUNT(*) FROM mapd_object_permissions");
		let memberships = count(&store, "SELECT COUNT(*) FROM mapd_roles");

		migrate_system(&store, &CatalogConfig::default()).unwrap();
		assert_eq!(count(&store, "SELECT COUNT(*) FROM mapd_object_permissions"), permissions);
		assert_eq!(count(&store, "SELECT COUNT(*) FROM mapd_roles"), memberships);
	}

	#[test]
	fn test_without_privileges_only_legacy_table() {
		let store = RowStore::in_memory().unwrap();
		store.execute(schema::USERS, &[]).unwrap();
		store.execute(schema::DATABASES, &[]).unwrap();

		migrate_system(&store, &CatalogConfig::default().with_privileges(false)).unwrap();
		assert!(store.table_exists("mapd_privileges").unwrap());
		assert!(!store.table_exists("mapd_roles").unwrap());
		assert!(!store.table_exists("mapd_object_permissions").unwrap());
	}
}
