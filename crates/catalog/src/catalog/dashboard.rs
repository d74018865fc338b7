// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::{DashboardDef, DashboardToCreate};
use anacat_type::{DashboardId, DbObjectKey, DbObjectType, UserId};
use tracing::{info, instrument, warn};

use super::{Catalog, DualTxn, require_owner};
use crate::{
	CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
};

impl Catalog {
	/// Saves a dashboard under (user, name), overwriting the state of an
	/// existing one. A new dashboard grants its owner every dashboard
	/// privilege.
	#[instrument(name = "catalog::dashboard::create", level = "info", skip(self, dashboard), fields(db = %self.db.name, dashboard = %dashboard.name))]
	pub fn create_dashboard(&self, dashboard: DashboardToCreate) -> Result<DashboardDef> {
		let _writer = self.system.lock_writer();
		let _ddl = self.lock_ddl();

		let txn = DualTxn::begin(self.system.store(), &self.store)?;
		let mut roles = self.system.working_roles();

		let owner = require_owner(txn.sys(), dashboard.user)?;
		let (stored, created) = CatalogStore::upsert_dashboard(txn.db(), &dashboard)?;
		if created {
			self.system.grant_ownership(&mut roles, txn.sys(), &owner, self.dashboard_key(stored.id), &stored.name)?;
		}

		txn.commit()?;
		self.system.publish_roles(roles);
		self.materialized.update(|r| r.add_dashboard(stored.clone()));

		info!(dashboard = *stored.id, created, "dashboard saved");
		Ok(stored)
	}

	/// Overwrites every field of the dashboard with the same id.
	#[instrument(name = "catalog::dashboard::replace", level = "info", skip(self, dashboard), fields(db = %self.db.name, dashboard = *dashboard.id))]
	pub fn replace_dashboard(&self, dashboard: DashboardDef) -> Result<DashboardDef> {
		let _ddl = self.lock_ddl();
		if self.materialized.find_dashboard(dashboard.id).is_none() {
			return Err(dashboard_not_found(&dashboard.id.to_string()));
		}
		if let Some(other) = self.materialized.find_dashboard_by_name(dashboard.user, &dashboard.name) {
			if other.id != dashboard.id {
				return Err(CatalogError::AlreadyExists {
					kind: CatalogObjectKind::Dashboard,
					name: dashboard.name.clone(),
				}
				.into());
			}
		}

		let txn = self.store.begin()?;
		let Some(stored) = CatalogStore::replace_dashboard(&txn, &dashboard)? else {
			return Err(dashboard_not_found(&dashboard.id.to_string()));
		};
		txn.commit()?;

		self.materialized.update(|r| r.add_dashboard(stored.clone()));
		Ok(stored)
	}

	/// Deletes `user`'s dashboard called `name`.
	pub fn delete_dashboard(&self, user: UserId, name: &str) -> Result<()> {
		let Some(dashboard) = self.materialized.find_dashboard_by_name(user, name) else {
			return Err(dashboard_not_found(name));
		};
		self.delete_dashboard_by_id(dashboard.id)
	}

	/// Deletes a dashboard and revokes every grant made on it.
	#[instrument(name = "catalog::dashboard::delete", level = "info", skip(self), fields(db = %self.db.name))]
	pub fn delete_dashboard_by_id(&self, id: DashboardId) -> Result<()> {
		let _writer = self.system.lock_writer();
		let _ddl = self.lock_ddl();
		if self.materialized.find_dashboard(id).is_none() {
			return Err(dashboard_not_found(&id.to_string()));
		}

		let txn = DualTxn::begin(self.system.store(), &self.store)?;
		let mut roles = self.system.working_roles();
		CatalogStore::delete_dashboard(txn.db(), id)?;
		self.system.revoke_everywhere(&mut roles, txn.sys(), &self.dashboard_key(id))?;
		txn.commit()?;

		self.system.publish_roles(roles);
		if self.materialized.update(|r| r.remove_dashboard(id)).is_none() {
			warn!(dashboard = *id, "deleted dashboard was not registered");
		}
		info!(dashboard = *id, "dashboard deleted");
		Ok(())
	}

	fn dashboard_key(&self, id: DashboardId) -> DbObjectKey {
		DbObjectKey::new(DbObjectType::Dashboard, self.db.id, *id)
	}
}

fn dashboard_not_found(name: &str) -> crate::Error {
	CatalogError::NotFound {
		kind: CatalogObjectKind::Dashboard,
		name: name.to_string(),
	}
	.into()
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::DashboardToCreate;
	use anacat_type::{AccessPrivileges, DashboardId, DbObjectKey, DbObjectType, UserId};

	use crate::{
		Catalog,
		test_utils::{default_catalog, with_context},
	};

	fn save(catalog: &Catalog, user: UserId, name: &str, state: &str) -> anacat_core::interface::DashboardDef {
		catalog.create_dashboard(DashboardToCreate {
			name: name.to_string(),
			user,
			state: state.to_string(),
			image_hash: "hash".to_string(),
			metadata: "{}".to_string(),
		})
		.unwrap()
	}

	#[test]
	fn test_create_dashboard_is_upsert() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let first = save(&catalog, UserId::ROOT, "sales", "v1");
			let second = save(&catalog, UserId::ROOT, "sales", "v2");

			assert_eq!(first.id, second.id);
			assert_eq!(catalog.list_dashboards().len(), 1);
			assert_eq!(catalog.find_dashboard_by_name(UserId::ROOT, "sales").unwrap().state, "v2");
		});
	}

	#[test]
	fn test_owner_gets_dashboard_privileges() {
		with_context(true, |context, _| {
			let alice = context.system().create_user("alice", "pw", false).unwrap();
			let catalog = default_catalog(context);
			let dashboard = save(&catalog, alice.id, "mine", "s");

			let key = DbObjectKey::new(DbObjectType::Dashboard, catalog.database().id, *dashboard.id);
			let granted = context.system().db_object_privileges("alice", &key).unwrap();
			assert_eq!(granted.privileges, AccessPrivileges::all_for(DbObjectType::Dashboard));
			assert_eq!(granted.owner, alice.id);

			catalog.delete_dashboard(alice.id, "mine").unwrap();
			assert!(context.system().db_object_privileges("alice", &key).is_none());
			assert!(catalog.find_dashboard(dashboard.id).is_none());
		});
	}

	#[test]
	fn test_replace_dashboard() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let mut dashboard = save(&catalog, UserId::ROOT, "a", "s");
			save(&catalog, UserId::ROOT, "b", "s");

			dashboard.name = "renamed".to_string();
			dashboard.state = "new".to_string();
			let replaced = catalog.replace_dashboard(dashboard.clone()).unwrap();
			assert_eq!(replaced.state, "new");
			assert!(catalog.find_dashboard_by_name(UserId::ROOT, "a").is_none());
			assert_eq!(catalog.find_dashboard_by_name(UserId::ROOT, "renamed").unwrap().id, dashboard.id);

			dashboard.name = "b".to_string();
			assert_eq!(catalog.replace_dashboard(dashboard).unwrap_err().code, "CA_001");
		});
	}

	#[test]
	fn test_missing_dashboard() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			assert_eq!(catalog.delete_dashboard(UserId::ROOT, "none").unwrap_err().code, "CA_002");
			assert_eq!(catalog.delete_dashboard_by_id(DashboardId(42)).unwrap_err().code, "CA_002");
		});
	}
}
