// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Installation wide state: users, databases, roles and privileges.
//!
//! Role mutations follow one protocol: take the writer lock, open a
//! transaction, apply the change to a clone of the published [`RoleState`],
//! commit, then publish the clone. A failed write leaves memory untouched.

use std::{fs, sync::Arc};

use anacat_core::interface::{CatalogPorts, DbObject, ROOT_USER_NAME, SYSTEM_DATABASE_NAME, UserDef};
use anacat_sqlite::{Queryable, RowStore, StoreTxn};
use anacat_type::{AccessPrivileges, DbObjectKey, UserId};
use parking_lot::{Mutex, MutexGuard};
use tracing::{info, instrument};

use crate::{
	CatalogConfig, CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
	layout, migration,
	role::RoleState,
};

mod database;
mod legacy;
mod privilege;
mod role;
mod user;

pub use legacy::LegacyPrivileges;

/// Password of the root user of a new installation.
pub(crate) const ROOT_DEFAULT_PASSWORD: &str = "HyperInteractive";

pub struct SystemCatalog {
	config: CatalogConfig,
	store: Arc<RowStore>,
	ports: CatalogPorts,
	writer: Mutex<()>,
	roles: Mutex<RoleState>,
}

impl SystemCatalog {
	/// Opens the system store below `config.base_path`. A new installation
	/// gets the schema, the root user and the default database; an existing
	/// one is migrated.
	#[instrument(name = "catalog::system::open", level = "info", skip(config, ports), fields(
		base_path = %config.base_path.display(),
		privileges = config.privileges_enabled
	))]
	pub(crate) fn open(config: CatalogConfig, is_new: bool, ports: CatalogPorts) -> Result<Self> {
		fs::create_dir_all(layout::catalogs_dir(&config.base_path))?;
		fs::create_dir_all(layout::data_dir(&config.base_path))?;

		let path = layout::system_catalog_file(&config.base_path);
		let store = Arc::new(RowStore::open(config.sqlite.with_path(&path))?);

		if is_new {
			initialize(&store, &config)?;
		} else {
			if !store.table_exists("mapd_users")? {
				return Err(CatalogError::Inconsistent {
					message: format!("no system catalog found at {}", path.display()),
				}
				.into());
			}
			migration::migrate_system(store.as_ref(), &config)?;
		}

		let roles = if config.privileges_enabled {
			RoleState::load(store.as_ref())?
		} else {
			RoleState::default()
		};

		Ok(Self {
			config,
			store,
			ports,
			writer: Mutex::new(()),
			roles: Mutex::new(roles),
		})
	}

	pub fn config(&self) -> &CatalogConfig {
		&self.config
	}

	pub fn privileges_enabled(&self) -> bool {
		self.config.privileges_enabled
	}

	pub(crate) fn store(&self) -> &Arc<RowStore> {
		&self.store
	}

	pub(crate) fn ports(&self) -> &CatalogPorts {
		&self.ports
	}

	/// Serializes every mutation of system state. Taken before any catalog
	/// lock and before any transaction.
	pub(crate) fn lock_writer(&self) -> MutexGuard<'_, ()> {
		self.writer.lock()
	}

	/// A private copy of the published roles to mutate inside a transaction.
	pub(crate) fn working_roles(&self) -> RoleState {
		self.roles.lock().clone()
	}

	pub(crate) fn publish_roles(&self, roles: RoleState) {
		*self.roles.lock() = roles;
	}

	pub(crate) fn read_roles<R>(&self, f: impl FnOnce(&RoleState) -> R) -> R {
		let roles = self.roles.lock();
		f(&roles)
	}

	fn mutate_roles<R>(&self, f: impl FnOnce(&mut RoleState, &StoreTxn<'_>) -> Result<R>) -> Result<R> {
		let _writer = self.lock_writer();
		let txn = self.store.begin()?;
		let mut working = self.working_roles();

		let result = f(&mut working, &txn)?;

		txn.commit()?;
		self.publish_roles(working);
		Ok(result)
	}

	fn require_privileges(&self) -> Result<()> {
		if !self.config.privileges_enabled {
			return Err(CatalogError::PrivilegesDisabled.into());
		}
		Ok(())
	}

	/// Gives the owner's private role every privilege on a new object.
	/// Superusers hold everything already and get no record.
	pub(crate) fn grant_ownership(
		&self,
		roles: &mut RoleState,
		tx: &impl Queryable,
		owner: &UserDef,
		key: DbObjectKey,
		name: &str,
	) -> Result<()> {
		if !self.config.privileges_enabled || owner.is_super {
			return Ok(());
		}
		let object =
			DbObject::new(key, AccessPrivileges::all_for(key.object_type), name).with_owner(owner.id);
		roles.grant_object(tx, &owner.name, &object)
	}

	/// Removes every role's record of an object that is going away.
	pub(crate) fn revoke_everywhere(&self, roles: &mut RoleState, tx: &impl Queryable, key: &DbObjectKey) -> Result<()> {
		if !self.config.privileges_enabled {
			return Ok(());
		}
		roles.revoke_from_all(tx, key)?;
		Ok(())
	}
}

fn require_user(rx: &impl Queryable, name: &str) -> Result<UserDef> {
	match CatalogStore::find_user_by_name(rx, name)? {
		Some(user) => Ok(user),
		None => Err(CatalogError::NotFound {
			kind: CatalogObjectKind::User,
			name: name.to_string(),
		}
		.into()),
	}
}

/// Schema, root user and default database of a new installation.
fn initialize(store: &RowStore, config: &CatalogConfig) -> Result<()> {
	let txn = store.begin()?;
	CatalogStore::create_system_schema(&txn, config.privileges_enabled)?;
	CatalogStore::create_user_with_id(
		&txn,
		&UserDef {
			id: UserId::ROOT,
			name: ROOT_USER_NAME.to_string(),
			password: ROOT_DEFAULT_PASSWORD.to_string(),
			is_super: true,
		},
	)?;
	let db = CatalogStore::create_database(&txn, SYSTEM_DATABASE_NAME, UserId::ROOT)?;
	CatalogStore::create_database_schema(&txn)?;
	migration::mark_database_current(&txn)?;
	txn.commit()?;

	info!(db = *db.id, "initialized new installation");
	Ok(())
}
