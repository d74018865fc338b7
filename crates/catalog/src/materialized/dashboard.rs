// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::DashboardDef;
use anacat_type::{DashboardId, UserId};

use super::{MaterializedCatalog, Registry};

impl Registry {
	/// Inserts or replaces a dashboard, keeping the (user, name) index in sync.
	pub(crate) fn add_dashboard(&mut self, dashboard: DashboardDef) {
		if let Some(previous) = self.dashboards.remove(&dashboard.id) {
			self.dashboards_by_name.remove(&(previous.user, previous.name));
		}
		self.dashboards_by_name.insert((dashboard.user, dashboard.name.clone()), dashboard.id);
		self.dashboards.insert(dashboard.id, dashboard);
	}

	pub(crate) fn remove_dashboard(&mut self, id: DashboardId) -> Option<DashboardDef> {
		let dashboard = self.dashboards.remove(&id)?;
		self.dashboards_by_name.remove(&(dashboard.user, dashboard.name.clone()));
		Some(dashboard)
	}

	pub(crate) fn find_dashboard(&self, id: DashboardId) -> Option<&DashboardDef> {
		self.dashboards.get(&id)
	}

	pub(crate) fn find_dashboard_by_name(&self, user: UserId, name: &str) -> Option<&DashboardDef> {
		self.dashboards_by_name.get(&(user, name.to_string())).and_then(|id| self.dashboards.get(id))
	}

	pub(crate) fn list_dashboards(&self) -> Vec<DashboardDef> {
		let mut result: Vec<DashboardDef> = self.dashboards.values().cloned().collect();
		result.sort_by_key(|d| d.id);
		result
	}
}

impl MaterializedCatalog {
	pub fn find_dashboard(&self, id: DashboardId) -> Option<DashboardDef> {
		self.read(|r| r.find_dashboard(id).cloned())
	}

	pub fn find_dashboard_by_name(&self, user: UserId, name: &str) -> Option<DashboardDef> {
		self.read(|r| r.find_dashboard_by_name(user, name).cloned())
	}

	pub fn list_dashboards(&self) -> Vec<DashboardDef> {
		self.read(|r| r.list_dashboards())
	}
}

#[cfg(test)]
mod tests {
	use anacat_type::{DashboardId, UserId};

	use crate::{MaterializedCatalog, test_utils::dashboard_def};

	#[test]
	fn test_replace_moves_name_index() {
		let catalog = MaterializedCatalog::new();
		catalog.update(|r| r.add_dashboard(dashboard_def(1, 5, "sales")));

		let mut renamed = dashboard_def(1, 5, "revenue");
		renamed.state = "{}".to_string();
		catalog.update(|r| r.add_dashboard(renamed));

		assert!(catalog.find_dashboard_by_name(UserId(5), "sales").is_none());
		assert_eq!(catalog.find_dashboard_by_name(UserId(5), "revenue").unwrap().id, DashboardId(1));
		assert_eq!(catalog.list_dashboards().len(), 1);
	}

	#[test]
	fn test_dashboard_names_are_per_user() {
		let catalog = MaterializedCatalog::new();
		catalog.update(|r| {
			r.add_dashboard(dashboard_def(1, 5, "sales"));
			r.add_dashboard(dashboard_def(2, 6, "sales"));
		});

		assert_eq!(catalog.find_dashboard_by_name(UserId(6), "sales").unwrap().id, DashboardId(2));
		let removed = catalog.update(|r| r.remove_dashboard(DashboardId(1))).unwrap();
		assert_eq!(removed.user, UserId(5));
		assert!(catalog.find_dashboard_by_name(UserId(6), "sales").is_some());
	}
}
