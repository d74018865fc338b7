// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, sync::Arc};

use anacat_core::interface::{CatalogPorts, DatabaseDef};
use anacat_type::UserId;
use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use crate::{
	Catalog, CatalogConfig, Result, SystemCatalog,
	error::{CatalogError, CatalogObjectKind},
};

/// Process wide handle: the system catalog plus the catalog of every
/// database opened so far.
pub struct CatalogContext {
	system: Arc<SystemCatalog>,
	catalogs: Mutex<HashMap<String, Arc<Catalog>>>,
}

impl CatalogContext {
	/// Opens the installation below `config.base_path`, creating it when
	/// `is_new_installation` is set and migrating it otherwise.
	#[instrument(name = "catalog::context::init", level = "info", skip_all, fields(new = is_new_installation))]
	pub fn init(config: CatalogConfig, is_new_installation: bool, ports: CatalogPorts) -> Result<Self> {
		let system = Arc::new(SystemCatalog::open(config, is_new_installation, ports)?);
		info!(base_path = %system.config().base_path.display(), "catalog context ready");
		Ok(Self {
			system,
			catalogs: Mutex::new(HashMap::new()),
		})
	}

	pub fn system(&self) -> &Arc<SystemCatalog> {
		&self.system
	}

	/// The catalog of database `name`, opened on first use.
	pub fn catalog(&self, name: &str) -> Result<Arc<Catalog>> {
		let mut catalogs = self.catalogs.lock();
		if let Some(catalog) = catalogs.get(&cache_key(name)) {
			return Ok(catalog.clone());
		}

		let Some(db) = self.system.database(name)? else {
			return Err(CatalogError::NotFound {
				kind: CatalogObjectKind::Database,
				name: name.to_string(),
			}
			.into());
		};
		let catalog = Arc::new(Catalog::open(self.system.clone(), db)?);
		debug!(db = %name, "catalog cached");
		catalogs.insert(cache_key(name), catalog.clone());
		Ok(catalog)
	}

	pub fn create_database(&self, name: &str, owner: UserId) -> Result<DatabaseDef> {
		self.system.create_database(name, owner)
	}

	/// Drops a database and forgets its cached catalog.
	pub fn drop_database(&self, name: &str) -> Result<()> {
		let catalog = self.catalog(name)?;
		self.system.drop_database(&catalog)?;
		self.catalogs.lock().remove(&cache_key(name));
		Ok(())
	}
}

fn cache_key(name: &str) -> String {
	name.to_uppercase()
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use anacat_type::UserId;

	use crate::test_utils::with_context;

	#[test]
	fn test_catalog_is_cached() {
		with_context(true, |context, _| {
			let first = context.catalog("mapd").unwrap();
			let second = context.catalog("mapd").unwrap();
			assert!(Arc::ptr_eq(&first, &second));
		});
	}

	#[test]
	fn test_database_names_ignore_case() {
		with_context(true, |context, _| {
			let sales = context.create_database("Sales", UserId::ROOT).unwrap();
			let first = context.catalog("sales").unwrap();
			let second = context.catalog("SALES").unwrap();
			assert!(Arc::ptr_eq(&first, &second));
			assert_eq!(first.database().id, sales.id);
			assert_eq!(first.database().name, "Sales");
			drop((first, second));

			context.drop_database("SALES").unwrap();
			assert_eq!(context.catalog("Sales").err().unwrap().code, "CA_002");
		});
	}

	#[test]
	fn test_unknown_database() {
		with_context(true, |context, _| {
			assert_eq!(context.catalog("nope").err().unwrap().code, "CA_002");
		});
	}

	#[test]
	fn test_drop_database_forgets_catalog() {
		with_context(true, |context, _| {
			context.create_database("db", UserId::ROOT).unwrap();
			context.catalog("db").unwrap();
			context.drop_database("db").unwrap();
			assert_eq!(context.catalog("db").err().unwrap().code, "CA_002");
		});
	}

	#[test]
	fn test_system_database_cannot_be_dropped() {
		with_context(true, |context, _| {
			assert_eq!(context.drop_database("mapd").unwrap_err().code, "CA_004");
		});
	}
}
