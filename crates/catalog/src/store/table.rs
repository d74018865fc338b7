// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::{FragmenterKind, Persistence, TableDef};
use anacat_sqlite::Queryable;
use anacat_type::{TableId, UserId};

use crate::{CatalogStore, Result};

impl CatalogStore {
	/// Inserts a table row and returns the id assigned by the store.
	pub(crate) fn create_table(tx: &impl Queryable, table: &TableDef) -> Result<TableId> {
		tx.execute(
			"INSERT INTO mapd_tables (name, userid, ncolumns, isview, fragments, frag_type, max_frag_rows, \
			 max_chunk_size, frag_page_size, max_rows, partitions, shard_column_id, shard, num_shards, \
			 key_metainfo) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
			&[
				&table.name,
				&*table.owner,
				&table.column_count,
				&table.is_view,
				&table.fragments,
				&table.fragmenter.code(),
				&table.max_fragment_rows,
				&table.max_chunk_size,
				&table.page_size,
				&table.max_rows,
				&table.partitions,
				&table.shard_column_id,
				&table.shard,
				&table.shard_count,
				&table.key_metainfo,
			],
		)?;
		Ok(TableId(tx.last_insert_id()? as i32))
	}

	pub(crate) fn rename_table(tx: &impl Queryable, id: TableId, name: &str) -> Result<()> {
		tx.execute("UPDATE mapd_tables SET name = ?1 WHERE tableid = ?2", &[&name, &*id])?;
		Ok(())
	}

	/// `Some(is_view)` when a table row with this id exists.
	pub(crate) fn table_is_view(rx: &impl Queryable, id: TableId) -> Result<Option<bool>> {
		let rows = rx.query("SELECT isview FROM mapd_tables WHERE tableid = ?1", &[&*id])?;
		Ok(rows.first().map(|row| row.get_bool(0)))
	}

	pub(crate) fn delete_table(tx: &impl Queryable, id: TableId) -> Result<()> {
		tx.execute("DELETE FROM mapd_tables WHERE tableid = ?1", &[&*id])?;
		Ok(())
	}

	/// Every table row. View SQL and the deleted column flag are filled in
	/// by the loader.
	pub(crate) fn list_tables(rx: &impl Queryable) -> Result<Vec<TableDef>> {
		let rows = rx.query(
			"SELECT tableid, name, userid, ncolumns, isview, fragments, frag_type, max_frag_rows, \
			 max_chunk_size, frag_page_size, max_rows, partitions, shard_column_id, shard, num_shards, \
			 key_metainfo FROM mapd_tables ORDER BY tableid",
			&[],
		)?;

		Ok(rows
			.iter()
			.map(|row| TableDef {
				id: TableId(row.get_i32(0)),
				name: row.get_string(1),
				owner: UserId(row.get_i32(2)),
				column_count: row.get_i32(3),
				is_view: row.get_bool(4),
				view_sql: String::new(),
				fragments: row.get_string(5),
				fragmenter: FragmenterKind::InsertOrder,
				max_fragment_rows: row.get_i32(7),
				max_chunk_size: row.get_i64(8),
				page_size: row.get_i32(9),
				max_rows: row.get_i64(10),
				partitions: row.get_string(11),
				shard_column_id: row.get_i32(12),
				shard: row.get_i32(13),
				shard_count: row.get_i32(14),
				key_metainfo: row.get_string(15),
				has_deleted_column: false,
				persistence: Persistence::Disk,
			})
			.collect())
	}
}
