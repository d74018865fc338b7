// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::LinkDef;
use anacat_type::LinkId;

use super::{MaterializedCatalog, Registry};

impl Registry {
	/// A link replacing an older one with the same token evicts it.
	pub(crate) fn add_link(&mut self, link: LinkDef) {
		if let Some(previous) = self.links_by_token.remove(&link.link) {
			self.links.remove(&previous);
		}
		self.links_by_token.insert(link.link.clone(), link.id);
		self.links.insert(link.id, link);
	}

	pub(crate) fn find_link(&self, id: LinkId) -> Option<&LinkDef> {
		self.links.get(&id)
	}

	pub(crate) fn find_link_by_token(&self, token: &str) -> Option<&LinkDef> {
		self.links_by_token.get(token).and_then(|id| self.links.get(id))
	}
}

impl MaterializedCatalog {
	pub fn find_link(&self, id: LinkId) -> Option<LinkDef> {
		self.read(|r| r.find_link(id).cloned())
	}

	pub fn find_link_by_token(&self, token: &str) -> Option<LinkDef> {
		self.read(|r| r.find_link_by_token(token).cloned())
	}
}
