// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per database select/insert ACL used when object privileges are disabled.

use anacat_core::interface::{DatabaseDef, UserDef};
use anacat_type::{DatabaseId, UserId};
use serde::{Deserialize, Serialize};

use super::SystemCatalog;
use crate::{
	CatalogStore, Result,
	error::{CatalogError, CatalogObjectKind},
	store::legacy::LegacyPrivilege,
};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPrivileges {
	pub select: bool,
	pub insert: bool,
}

impl LegacyPrivileges {
	pub fn new(select: bool, insert: bool) -> Self {
		Self {
			select,
			insert,
		}
	}
}

impl SystemCatalog {
	/// Replaces the user's ACL row for `db`.
	pub fn grant_privileges(&self, user: UserId, db: DatabaseId, privileges: LegacyPrivileges) -> Result<()> {
		let _writer = self.lock_writer();
		let txn = self.store.begin()?;

		if CatalogStore::find_user(&txn, user)?.is_none() {
			return Err(CatalogError::NotFound {
				kind: CatalogObjectKind::User,
				name: user.to_string(),
			}
			.into());
		}
		if CatalogStore::find_database(&txn, db)?.is_none() {
			return Err(CatalogError::NotFound {
				kind: CatalogObjectKind::Database,
				name: db.to_string(),
			}
			.into());
		}

		CatalogStore::upsert_legacy_privileges(
			&txn,
			&LegacyPrivilege {
				user,
				db,
				select: privileges.select,
				insert: privileges.insert,
			},
		)?;
		txn.commit()
	}

	/// Superusers and the database owner pass; everyone else needs a row
	/// holding each wanted flag.
	pub fn check_legacy_privileges(&self, user: &UserDef, db: &DatabaseDef, wants: LegacyPrivileges) -> Result<bool> {
		if user.is_super || user.id == db.owner {
			return Ok(true);
		}
		let Some(held) = CatalogStore::find_legacy_privileges(self.store.as_ref(), user.id, db.id)? else {
			return Ok(false);
		};
		Ok((!wants.select || held.select) && (!wants.insert || held.insert))
	}
}

#[cfg(test)]
mod tests {
	use super::LegacyPrivileges;
	use crate::test_utils::with_context;

	#[test]
	fn test_legacy_acl() {
		with_context(false, |context, _| {
			let system = context.system();
			let bob = system.create_user("bob", "pw", false).unwrap();
			let db = system.database("mapd").unwrap().unwrap();

			let select = LegacyPrivileges::new(true, false);
			let both = LegacyPrivileges::new(true, true);
			assert!(!system.check_legacy_privileges(&bob, &db, select).unwrap());

			system.grant_privileges(bob.id, db.id, select).unwrap();
			assert!(system.check_legacy_privileges(&bob, &db, select).unwrap());
			assert!(!system.check_legacy_privileges(&bob, &db, both).unwrap());
		});
	}

	#[test]
	fn test_owner_and_superuser_pass() {
		with_context(false, |context, _| {
			let system = context.system();
			let carol = system.create_user("carol", "pw", false).unwrap();
			let db = system.create_database("sales", carol.id).unwrap();
			let root = system.user("mapd").unwrap().unwrap();

			let both = LegacyPrivileges::new(true, true);
			assert!(system.check_legacy_privileges(&carol, &db, both).unwrap());
			assert!(system.check_legacy_privileges(&root, &db, both).unwrap());
		});
	}

	#[test]
	fn test_grant_to_unknown_user() {
		with_context(false, |context, _| {
			let system = context.system();
			let db = system.database("mapd").unwrap().unwrap();
			let err = system.grant_privileges(anacat_type::UserId(99), db.id, LegacyPrivileges::default()).unwrap_err();
			assert_eq!(err.code, "CA_002");
		});
	}
}
