// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Collaborators the catalog drives but does not implement.

use std::sync::Arc;

mod dictionary;
mod plan_cache;
mod storage;

pub use dictionary::{DictionaryLocation, DictionaryService, StringDictionary};
pub use plan_cache::PlanCache;
pub use storage::{Fragmenter, FragmenterRequest, MemoryLevel, StorageEngine};

/// Bundle of the external services a catalog needs.
#[derive(Clone)]
pub struct CatalogPorts {
	pub storage: Arc<dyn StorageEngine>,
	pub dictionaries: Arc<dyn DictionaryService>,
	pub plan_cache: Arc<dyn PlanCache>,
}

impl CatalogPorts {
	pub fn new(
		storage: Arc<dyn StorageEngine>,
		dictionaries: Arc<dyn DictionaryService>,
		plan_cache: Arc<dyn PlanCache>,
	) -> Self {
		Self {
			storage,
			dictionaries,
			plan_cache,
		}
	}
}
