// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::UserDef;
use anacat_sqlite::{Queryable, Row};
use anacat_type::UserId;

use crate::{CatalogStore, Result};

fn user_from_row(row: &Row) -> UserDef {
	UserDef {
		id: UserId(row.get_i32(0)),
		name: row.get_string(1),
		password: row.get_string(2),
		is_super: row.get_bool(3),
	}
}

impl CatalogStore {
	pub(crate) fn create_user(tx: &impl Queryable, name: &str, password: &str, is_super: bool) -> Result<UserDef> {
		tx.execute(
			"INSERT INTO mapd_users (name, passwd, issuper) VALUES (?1, ?2, ?3)",
			&[&name, &password, &is_super],
		)?;
		Ok(UserDef {
			id: UserId(tx.last_insert_id()? as i32),
			name: name.to_string(),
			password: password.to_string(),
			is_super,
		})
	}

	/// Inserts a user with a fixed id. Only used for the root user.
	pub(crate) fn create_user_with_id(tx: &impl Queryable, user: &UserDef) -> Result<()> {
		tx.execute(
			"INSERT INTO mapd_users (userid, name, passwd, issuper) VALUES (?1, ?2, ?3, ?4)",
			&[&*user.id, &user.name, &user.password, &user.is_super],
		)?;
		Ok(())
	}

	pub(crate) fn find_user_by_name(rx: &impl Queryable, name: &str) -> Result<Option<UserDef>> {
		let rows =
			rx.query("SELECT userid, name, passwd, issuper FROM mapd_users WHERE name = ?1", &[&name])?;
		Ok(rows.first().map(user_from_row))
	}

	pub(crate) fn find_user(rx: &impl Queryable, id: UserId) -> Result<Option<UserDef>> {
		let rows =
			rx.query("SELECT userid, name, passwd, issuper FROM mapd_users WHERE userid = ?1", &[&*id])?;
		Ok(rows.first().map(user_from_row))
	}

	pub(crate) fn list_users(rx: &impl Queryable) -> Result<Vec<UserDef>> {
		let rows = rx.query("SELECT userid, name, passwd, issuper FROM mapd_users ORDER BY userid", &[])?;
		Ok(rows.iter().map(user_from_row).collect())
	}

	/// Users holding a private role grant in `db`.
	pub(crate) fn list_users_for_database(rx: &impl Queryable, db: i32) -> Result<Vec<UserDef>> {
		let rows = rx.query(
			"SELECT userid, name, passwd, issuper FROM mapd_users WHERE name IN \
			 (SELECT roleName FROM mapd_object_permissions WHERE roleType = 1 AND dbId = ?1) ORDER BY userid",
			&[&db],
		)?;
		Ok(rows.iter().map(user_from_row).collect())
	}

	pub(crate) fn update_user_password(tx: &impl Queryable, id: UserId, password: &str) -> Result<()> {
		tx.execute("UPDATE mapd_users SET passwd = ?1 WHERE userid = ?2", &[&password, &*id])?;
		Ok(())
	}

	pub(crate) fn update_user_super(tx: &impl Queryable, id: UserId, is_super: bool) -> Result<()> {
		tx.execute("UPDATE mapd_users SET issuper = ?1 WHERE userid = ?2", &[&is_super, &*id])?;
		Ok(())
	}

	pub(crate) fn delete_user(tx: &impl Queryable, id: UserId) -> Result<()> {
		tx.execute("DELETE FROM mapd_users WHERE userid = ?1", &[&*id])?;
		Ok(())
	}
}
