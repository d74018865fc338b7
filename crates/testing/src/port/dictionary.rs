// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeSet, sync::Arc};

use anacat_core::interface::{DictRef, DictionaryLocation, DictionaryService, StringDictionary};
use anacat_type::Result;
use parking_lot::Mutex;

#[derive(Default)]
struct State {
	live: BTreeSet<DictRef>,
	created: Vec<DictRef>,
	dropped: Vec<DictRef>,
	opened: Vec<DictionaryLocation>,
}

/// Dictionary server fake recording create, drop and open requests.
#[derive(Default)]
pub struct MemoryDictionaryService {
	state: Mutex<State>,
}

impl MemoryDictionaryService {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_live(&self, dict_ref: DictRef) -> bool {
		self.state.lock().live.contains(&dict_ref)
	}

	pub fn created(&self) -> Vec<DictRef> {
		self.state.lock().created.clone()
	}

	pub fn dropped(&self) -> Vec<DictRef> {
		self.state.lock().dropped.clone()
	}

	pub fn opened(&self) -> Vec<DictionaryLocation> {
		self.state.lock().opened.clone()
	}
}

impl DictionaryService for MemoryDictionaryService {
	fn create(&self, dict_ref: DictRef, _is_temp: bool) -> Result<()> {
		let mut state = self.state.lock();
		state.live.insert(dict_ref);
		state.created.push(dict_ref);
		Ok(())
	}

	fn drop_dictionary(&self, dict_ref: DictRef) -> Result<()> {
		let mut state = self.state.lock();
		state.live.remove(&dict_ref);
		state.dropped.push(dict_ref);
		Ok(())
	}

	fn open(&self, location: DictionaryLocation) -> Result<Arc<dyn StringDictionary>> {
		self.state.lock().opened.push(location.clone());
		Ok(Arc::new(MemoryStringDictionary {
			location,
		}))
	}
}

#[derive(Debug)]
pub struct MemoryStringDictionary {
	location: DictionaryLocation,
}

impl StringDictionary for MemoryStringDictionary {
	fn location(&self) -> &DictionaryLocation {
		&self.location
	}

	fn entry_count(&self) -> usize {
		0
	}
}
