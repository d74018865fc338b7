// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Column list of a new table: declared columns, the hidden physical columns
//! behind geometry columns, `rowid` and the optional deleted marker.

use std::collections::HashSet;

use anacat_core::interface::{
	ColumnDef, ColumnToCreate, DELETED_COLUMN_NAME, ROWID_COLUMN_NAME, ROWID_EXPRESSION, TableToCreate,
};
use anacat_type::{ColumnId, SqlType, TableId, TypeInfo};

use crate::{
	Result,
	error::{CatalogError, CatalogObjectKind},
	materialized::name_key,
};

/// Expands the declared columns of `request`. Ids and the table id are
/// assigned once the table row exists.
pub(super) fn expand_columns(request: &TableToCreate) -> Result<Vec<ColumnDef>> {
	let mut seen: HashSet<String> = HashSet::new();
	let mut columns: Vec<ColumnDef> = Vec::with_capacity(request.columns.len() + 1);

	for declared in &request.columns {
		if name_key(&declared.name) == name_key(ROWID_COLUMN_NAME) {
			return Err(CatalogError::ReservedColumnName {
				table: request.name.clone(),
				column: declared.name.clone(),
			}
			.into());
		}
		if !seen.insert(name_key(&declared.name)) {
			return Err(CatalogError::AlreadyExists {
				kind: CatalogObjectKind::Column,
				name: format!("{}.{}", request.name, declared.name),
			}
			.into());
		}

		columns.push(user_column(declared));
		if declared.ty.is_geometry() {
			columns.extend(physical_columns(declared));
		}
	}

	columns.push(system_column(ROWID_COLUMN_NAME, TypeInfo::new(SqlType::BigInt).with_not_null(true), |c| {
		c.is_virtual = true;
		c.virtual_expr = ROWID_EXPRESSION.to_string();
	}));

	if request.with_deleted_column {
		columns.push(system_column(DELETED_COLUMN_NAME, TypeInfo::new(SqlType::Boolean).with_not_null(true), |c| {
			c.is_deleted = true;
		}));
	}

	Ok(columns)
}

/// Hidden columns backing a geometry column, in storage order.
fn physical_columns(geometry: &ColumnToCreate) -> Vec<ColumnDef> {
	let coords = (format!("{}_coords", geometry.name), TypeInfo::array_of(SqlType::TinyInt));
	let ring_sizes = (format!("{}_ring_sizes", geometry.name), TypeInfo::array_of(SqlType::Int));
	let poly_rings = (format!("{}_poly_rings", geometry.name), TypeInfo::array_of(SqlType::Int));
	let render_group = (format!("{}_render_group", geometry.name), TypeInfo::new(SqlType::Int));

	let parts = match geometry.ty.sql_type {
		SqlType::Point | SqlType::LineString => vec![coords],
		SqlType::Polygon | SqlType::MultiPolygon => vec![coords, ring_sizes, poly_rings, render_group],
		_ => vec![],
	};
	debug_assert_eq!(parts.len(), geometry.ty.physical_column_count());

	parts.into_iter()
		.map(|(name, ty)| ColumnDef {
			table: TableId(0),
			id: ColumnId(0),
			name,
			ty: ty.with_not_null(true),
			is_system: false,
			is_virtual: false,
			virtual_expr: String::new(),
			is_deleted: false,
		})
		.collect()
}

fn user_column(declared: &ColumnToCreate) -> ColumnDef {
	ColumnDef {
		table: TableId(0),
		id: ColumnId(0),
		name: declared.name.clone(),
		ty: declared.ty.clone(),
		is_system: false,
		is_virtual: false,
		virtual_expr: String::new(),
		is_deleted: false,
	}
}

fn system_column(name: &str, ty: TypeInfo, f: impl FnOnce(&mut ColumnDef)) -> ColumnDef {
	let mut column = ColumnDef {
		table: TableId(0),
		id: ColumnId(0),
		name: name.to_string(),
		ty,
		is_system: true,
		is_virtual: false,
		virtual_expr: String::new(),
		is_deleted: false,
	};
	f(&mut column);
	column
}

#[cfg(test)]
mod tests {
	use anacat_core::interface::{ColumnToCreate, TableToCreate};
	use anacat_type::{SqlType, TypeInfo, UserId};

	use super::expand_columns;

	fn names(request: &TableToCreate) -> Vec<String> {
		expand_columns(request).unwrap().into_iter().map(|c| c.name).collect()
	}

	#[test]
	fn test_polygon_expands_to_four_hidden_columns() {
		let request = TableToCreate::new("shapes", UserId::ROOT)
			.with_column(ColumnToCreate::new("area", TypeInfo::new(SqlType::Polygon)));
		let columns = expand_columns(&request).unwrap();

		assert_eq!(names(&request), vec!["area", "area_coords", "area_ring_sizes", "area_poly_rings", "area_render_group", "rowid"]);
		assert_eq!(columns[1].ty.subtype, SqlType::TinyInt);
		assert_eq!(columns[2].ty.subtype, SqlType::Int);
		assert_eq!(columns[3].ty.subtype, SqlType::Int);
		assert_eq!(columns[4].ty.sql_type, SqlType::Int);
		assert!(columns[1..5].iter().all(|c| c.ty.not_null && !c.is_system));
	}

	#[test]
	fn test_point_has_coords_only() {
		let request = TableToCreate::new("p", UserId::ROOT)
			.with_column(ColumnToCreate::new("loc", TypeInfo::new(SqlType::Point)));
		assert_eq!(names(&request), vec!["loc", "loc_coords", "rowid"]);
	}

	#[test]
	fn test_rowid_then_deleted_marker_last() {
		let request = TableToCreate::new("t", UserId::ROOT)
			.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int)))
			.with_deleted_column();
		let columns = expand_columns(&request).unwrap();

		let rowid = &columns[1];
		assert!(rowid.is_system && rowid.is_virtual);
		assert_eq!(rowid.ty.sql_type, SqlType::BigInt);
		assert_eq!(rowid.virtual_expr, "MAPD_FRAG_ID * MAPD_ROWS_PER_FRAG + MAPD_FRAG_ROW_ID");

		let deleted = &columns[2];
		assert_eq!(deleted.name, "$deleted$");
		assert!(deleted.is_system && deleted.is_deleted && !deleted.is_virtual);
	}

	#[test]
	fn test_rowid_is_reserved() {
		let request = TableToCreate::new("t", UserId::ROOT)
			.with_column(ColumnToCreate::new("ROWID", TypeInfo::new(SqlType::BigInt)));
		assert_eq!(expand_columns(&request).unwrap_err().code, "CA_003");
	}

	#[test]
	fn test_duplicate_column_names() {
		let request = TableToCreate::new("t", UserId::ROOT)
			.with_column(ColumnToCreate::new("a", TypeInfo::new(SqlType::Int)))
			.with_column(ColumnToCreate::new("A", TypeInfo::new(SqlType::Text)));
		assert_eq!(expand_columns(&request).unwrap_err().code, "CA_001");
	}
}
