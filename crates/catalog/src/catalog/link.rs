// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::LinkDef;
use anacat_type::UserId;
use tracing::{debug, instrument};
use xxhash_rust::xxh3::xxh3_64;

use super::Catalog;
use crate::{CatalogStore, Result};

const TOKEN_LENGTH: usize = 8;

/// Short token naming a saved view state.
pub(crate) fn link_token(user: UserId, view_state: &str, view_metadata: &str) -> String {
	let digest = xxh3_64(format!("{}{}{}", view_state, view_metadata, user).as_bytes());
	let mut token = format!("{:016x}", digest);
	token.truncate(TOKEN_LENGTH);
	token
}

impl Catalog {
	/// Stores a view state under a short token derived from its content.
	/// Saving the same state twice refreshes the existing link.
	#[instrument(name = "catalog::link::create", level = "debug", skip(self, view_state, view_metadata), fields(db = %self.db.name))]
	pub fn create_link(&self, user: UserId, view_state: &str, view_metadata: &str) -> Result<LinkDef> {
		let token = link_token(user, view_state, view_metadata);

		let _ddl = self.lock_ddl();
		let txn = self.store.begin()?;
		let link = match CatalogStore::touch_link(&txn, user, &token)? {
			Some(existing) => existing,
			None => CatalogStore::upsert_link(&txn, user, &token, view_state, view_metadata)?,
		};
		txn.commit()?;

		self.materialized.update(|r| r.add_link(link.clone()));
		debug!(link = *link.id, token = %link.link, "link saved");
		Ok(link)
	}
}

#[cfg(test)]
mod tests {
	use anacat_type::UserId;

	use super::link_token;
	use crate::test_utils::{default_catalog, with_context};

	#[test]
	fn test_token_is_eight_hex_digits() {
		let token = link_token(UserId(3), "{\"zoom\":4}", "{}");
		assert_eq!(token.len(), 8);
		assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
		assert_eq!(token, link_token(UserId(3), "{\"zoom\":4}", "{}"));
		assert_ne!(token, link_token(UserId(4), "{\"zoom\":4}", "{}"));
	}

	#[test]
	fn test_same_state_reuses_link() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let first = catalog.create_link(UserId::ROOT, "state", "meta").unwrap();
			let second = catalog.create_link(UserId::ROOT, "state", "meta").unwrap();

			assert_eq!(first.id, second.id);
			assert_eq!(first.link, second.link);
			assert_eq!(catalog.find_link_by_token(&first.link).unwrap().view_state, "state");
		});
	}

	#[test]
	fn test_different_state_new_link() {
		with_context(true, |context, _| {
			let catalog = default_catalog(context);
			let a = catalog.create_link(UserId::ROOT, "a", "").unwrap();
			let b = catalog.create_link(UserId::ROOT, "b", "").unwrap();
			assert_ne!(a.link, b.link);
			assert_eq!(catalog.find_link(a.id).unwrap(), a);
			assert_eq!(catalog.find_link(b.id).unwrap(), b);
		});
	}
}
