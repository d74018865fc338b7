// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::LinkDef;
use anacat_sqlite::{Queryable, Row};
use anacat_type::{LinkId, UserId};

use crate::{CatalogStore, Result};

const SELECT: &str = "SELECT linkid, userid, link, view_state, update_time, view_metadata FROM mapd_links";

fn link_from_row(row: &Row) -> LinkDef {
	LinkDef {
		id: LinkId(row.get_i32(0)),
		user: UserId(row.get_i32(1)),
		link: row.get_string(2),
		view_state: row.get_string(3),
		update_time: row.get_string(4),
		view_metadata: row.get_string(5),
	}
}

impl CatalogStore {
	/// Inserts the link, replacing any row with the same token.
	pub(crate) fn upsert_link(
		tx: &impl Queryable,
		user: UserId,
		link: &str,
		view_state: &str,
		view_metadata: &str,
	) -> Result<LinkDef> {
		tx.execute(
			"INSERT OR REPLACE INTO mapd_links (userid, link, view_state, update_time, view_metadata) \
			 VALUES (?1, ?2, ?3, datetime('now'), ?4)",
			&[&*user, &link, &view_state, &view_metadata],
		)?;

		match Self::find_link_by_token(tx, link)? {
			Some(stored) => Ok(stored),
			None => anacat_type::internal_err!("link `{}` vanished after upsert", link),
		}
	}

	/// Refreshes the update time of `user`'s link with this token. Returns
	/// `None` when the user holds no such link.
	pub(crate) fn touch_link(tx: &impl Queryable, user: UserId, link: &str) -> Result<Option<LinkDef>> {
		tx.execute(
			"UPDATE mapd_links SET update_time = datetime('now') WHERE userid = ?1 AND link = ?2",
			&[&*user, &link],
		)?;
		Ok(Self::find_link_by_token(tx, link)?.filter(|stored| stored.user == user))
	}

	pub(crate) fn find_link_by_token(rx: &impl Queryable, link: &str) -> Result<Option<LinkDef>> {
		let rows = rx.query(&format!("{} WHERE link = ?1", SELECT), &[&link])?;
		Ok(rows.first().map(link_from_row))
	}

	pub(crate) fn list_links(rx: &impl Queryable) -> Result<Vec<LinkDef>> {
		let rows = rx.query(&format!("{} ORDER BY linkid", SELECT), &[])?;
		Ok(rows.iter().map(link_from_row).collect())
	}
}
