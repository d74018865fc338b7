// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use anacat_core::interface::ColumnDef;
use anacat_sqlite::Queryable;
use anacat_type::{ColumnId, Encoding, SqlType, TableId, TypeInfo};

use crate::{CatalogStore, Result};

impl CatalogStore {
	pub(crate) fn create_column(tx: &impl Queryable, column: &ColumnDef) -> Result<()> {
		let ty = &column.ty;
		tx.execute(
			"INSERT INTO mapd_columns (tableid, columnid, name, coltype, colsubtype, coldim, colscale, \
			 is_notnull, compression, comp_param, size, chunks, is_systemcol, is_virtualcol, virtual_expr, \
			 is_deletedcol) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, '', ?12, ?13, ?14, ?15)",
			&[
				&*column.table,
				&*column.id,
				&column.name,
				&ty.sql_type.code(),
				&ty.subtype.code(),
				&ty.dimension,
				&ty.scale,
				&ty.not_null,
				&ty.compression.code(),
				&ty.comp_param,
				&ty.size,
				&column.is_system,
				&column.is_virtual,
				&column.virtual_expr,
				&column.is_deleted,
			],
		)?;
		Ok(())
	}

	pub(crate) fn rename_column(tx: &impl Queryable, table: TableId, column: ColumnId, name: &str) -> Result<()> {
		tx.execute(
			"UPDATE mapd_columns SET name = ?1 WHERE tableid = ?2 AND columnid = ?3",
			&[&name, &*table, &*column],
		)?;
		Ok(())
	}

	pub(crate) fn delete_columns(tx: &impl Queryable, table: TableId) -> Result<()> {
		tx.execute("DELETE FROM mapd_columns WHERE tableid = ?1", &[&*table])?;
		Ok(())
	}

	pub(crate) fn list_columns(rx: &impl Queryable) -> Result<Vec<ColumnDef>> {
		let rows = rx.query(
			"SELECT tableid, columnid, name, coltype, colsubtype, coldim, colscale, is_notnull, compression, \
			 comp_param, size, is_systemcol, is_virtualcol, virtual_expr, is_deletedcol \
			 FROM mapd_columns ORDER BY tableid, columnid",
			&[],
		)?;

		let mut result = Vec::with_capacity(rows.len());
		for row in &rows {
			result.push(ColumnDef {
				table: TableId(row.get_i32(0)),
				id: ColumnId(row.get_i32(1)),
				name: row.get_string(2),
				ty: TypeInfo {
					sql_type: SqlType::from_code(row.get_i32(3))?,
					subtype: SqlType::from_code(row.get_i32(4))?,
					dimension: row.get_i32(5),
					scale: row.get_i32(6),
					not_null: row.get_bool(7),
					compression: Encoding::from_code(row.get_i32(8))?,
					comp_param: row.get_i32(9),
					size: row.get_i32(10),
				},
				is_system: row.get_bool(11),
				is_virtual: row.get_bool(12),
				virtual_expr: row.get_string(13),
				is_deleted: row.get_bool(14),
			});
		}
		Ok(result)
	}
}
