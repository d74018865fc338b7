// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use anacat_core::interface::CatalogPorts;

mod dictionary;
mod plan_cache;
mod storage;

pub use dictionary::{MemoryDictionaryService, MemoryStringDictionary};
pub use plan_cache::RecordingPlanCache;
pub use storage::{MemoryFragmenter, MemoryStorageEngine, StorageCall};

/// The in-memory fakes, kept typed so tests can inspect them.
#[derive(Clone, Default)]
pub struct TestPorts {
	pub storage: Arc<MemoryStorageEngine>,
	pub dictionaries: Arc<MemoryDictionaryService>,
	pub plan_cache: Arc<RecordingPlanCache>,
}

impl TestPorts {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn ports(&self) -> CatalogPorts {
		CatalogPorts::new(self.storage.clone(), self.dictionaries.clone(), self.plan_cache.clone())
	}
}
