// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Column data type. Discriminants are the codes persisted in `mapd_columns`.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
	Null = 0,
	Boolean = 1,
	Char = 2,
	Varchar = 3,
	Numeric = 4,
	Decimal = 5,
	Int = 6,
	SmallInt = 7,
	Float = 8,
	Double = 9,
	Time = 10,
	Timestamp = 11,
	BigInt = 12,
	Text = 13,
	Date = 14,
	Array = 15,
	Point = 18,
	LineString = 19,
	Polygon = 20,
	MultiPolygon = 21,
	TinyInt = 22,
}

impl SqlType {
	pub fn code(&self) -> i32 {
		*self as i32
	}

	pub fn from_code(code: i32) -> Result<Self, TypeError> {
		Ok(match code {
			0 => SqlType::Null,
			1 => SqlType::Boolean,
			2 => SqlType::Char,
			3 => SqlType::Varchar,
			4 => SqlType::Numeric,
			5 => SqlType::Decimal,
			6 => SqlType::Int,
			7 => SqlType::SmallInt,
			8 => SqlType::Float,
			9 => SqlType::Double,
			10 => SqlType::Time,
			11 => SqlType::Timestamp,
			12 => SqlType::BigInt,
			13 => SqlType::Text,
			14 => SqlType::Date,
			15 => SqlType::Array,
			18 => SqlType::Point,
			19 => SqlType::LineString,
			20 => SqlType::Polygon,
			21 => SqlType::MultiPolygon,
			22 => SqlType::TinyInt,
			code => {
				return Err(TypeError::UnknownSqlType {
					code,
				});
			}
		})
	}

	pub fn is_geometry(&self) -> bool {
		matches!(self, SqlType::Point | SqlType::LineString | SqlType::Polygon | SqlType::MultiPolygon)
	}

	pub fn is_string(&self) -> bool {
		matches!(self, SqlType::Char | SqlType::Varchar | SqlType::Text)
	}

	/// Byte width of a fixed-size value, `-1` for variable length.
	pub fn fixed_size(&self) -> i32 {
		match self {
			SqlType::Boolean | SqlType::TinyInt => 1,
			SqlType::SmallInt => 2,
			SqlType::Int | SqlType::Float => 4,
			SqlType::BigInt
			| SqlType::Double
			| SqlType::Numeric
			| SqlType::Decimal
			| SqlType::Time
			| SqlType::Timestamp
			| SqlType::Date => 8,
			_ => -1,
		}
	}
}

impl Display for SqlType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			SqlType::Null => "NULL",
			SqlType::Boolean => "BOOLEAN",
			SqlType::Char => "CHAR",
			SqlType::Varchar => "VARCHAR",
			SqlType::Numeric => "NUMERIC",
			SqlType::Decimal => "DECIMAL",
			SqlType::Int => "INTEGER",
			SqlType::SmallInt => "SMALLINT",
			SqlType::Float => "FLOAT",
			SqlType::Double => "DOUBLE",
			SqlType::Time => "TIME",
			SqlType::Timestamp => "TIMESTAMP",
			SqlType::BigInt => "BIGINT",
			SqlType::Text => "TEXT",
			SqlType::Date => "DATE",
			SqlType::Array => "ARRAY",
			SqlType::Point => "POINT",
			SqlType::LineString => "LINESTRING",
			SqlType::Polygon => "POLYGON",
			SqlType::MultiPolygon => "MULTIPOLYGON",
			SqlType::TinyInt => "TINYINT",
		};
		f.write_str(name)
	}
}

/// Compression encoding of a column.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
	None = 0,
	Fixed = 1,
	RunLength = 2,
	Diff = 3,
	Dict = 4,
	Sparse = 5,
	GeoInt = 6,
}

impl Encoding {
	pub fn code(&self) -> i32 {
		*self as i32
	}

	pub fn from_code(code: i32) -> Result<Self, TypeError> {
		Ok(match code {
			0 => Encoding::None,
			1 => Encoding::Fixed,
			2 => Encoding::RunLength,
			3 => Encoding::Diff,
			4 => Encoding::Dict,
			5 => Encoding::Sparse,
			6 => Encoding::GeoInt,
			code => {
				return Err(TypeError::UnknownEncoding {
					code,
				});
			}
		})
	}
}

/// Full type descriptor of a column as persisted.
///
/// For dictionary encoded columns `comp_param` holds the dictionary id once
/// the table is created; before creation it holds the requested bit width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeInfo {
	pub sql_type: SqlType,
	/// Element type for arrays, the declared type for everything else.
	pub subtype: SqlType,
	pub dimension: i32,
	pub scale: i32,
	pub not_null: bool,
	pub compression: Encoding,
	pub comp_param: i32,
	pub size: i32,
}

impl TypeInfo {
	pub fn new(sql_type: SqlType) -> Self {
		Self {
			sql_type,
			subtype: SqlType::Null,
			dimension: 0,
			scale: 0,
			not_null: false,
			compression: Encoding::None,
			comp_param: 0,
			size: sql_type.fixed_size(),
		}
	}

	pub fn array_of(element: SqlType) -> Self {
		Self {
			subtype: element,
			size: -1,
			..Self::new(SqlType::Array)
		}
	}

	/// A dictionary encoded TEXT column with the given bit width.
	pub fn dict_text(bits: i32) -> Self {
		Self {
			compression: Encoding::Dict,
			comp_param: bits,
			size: bits / 8,
			..Self::new(SqlType::Text)
		}
	}

	/// A dictionary encoded array of TEXT.
	pub fn dict_text_array(bits: i32) -> Self {
		Self {
			compression: Encoding::Dict,
			comp_param: bits,
			..Self::array_of(SqlType::Text)
		}
	}

	pub fn with_not_null(mut self, not_null: bool) -> Self {
		self.not_null = not_null;
		self
	}

	pub fn with_precision(mut self, dimension: i32, scale: i32) -> Self {
		self.dimension = dimension;
		self.scale = scale;
		self
	}

	pub fn is_geometry(&self) -> bool {
		self.sql_type.is_geometry()
	}

	pub fn is_array(&self) -> bool {
		self.sql_type == SqlType::Array
	}

	pub fn is_string(&self) -> bool {
		self.sql_type.is_string()
	}

	pub fn is_string_array(&self) -> bool {
		self.is_array() && self.subtype.is_string()
	}

	pub fn is_dict_encoded(&self) -> bool {
		self.compression == Encoding::Dict && (self.is_string() || self.is_string_array())
	}

	/// Number of hidden physical columns backing a geometry column.
	pub fn physical_column_count(&self) -> usize {
		match self.sql_type {
			SqlType::Point | SqlType::LineString => 1,
			SqlType::Polygon | SqlType::MultiPolygon => 4,
			_ => 0,
		}
	}
}

impl Display for TypeInfo {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.sql_type {
			SqlType::Array => write!(f, "{}[]", self.subtype),
			SqlType::Decimal | SqlType::Numeric => write!(f, "{}({},{})", self.sql_type, self.dimension, self.scale),
			_ => write!(f, "{}", self.sql_type),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_code_round_trip_covers_gaps() {
		assert_eq!(SqlType::from_code(22).unwrap(), SqlType::TinyInt);
		assert!(SqlType::from_code(16).is_err());
		assert!(Encoding::from_code(9).is_err());
	}

	#[test]
	fn test_dict_text() {
		let ty = TypeInfo::dict_text(32);
		assert!(ty.is_dict_encoded());
		assert_eq!(ty.size, 4);
		assert_eq!(ty.comp_param, 32);
	}

	#[test]
	fn test_plain_text_is_not_dict_encoded() {
		assert!(!TypeInfo::new(SqlType::Text).is_dict_encoded());
	}

	#[test]
	fn test_physical_column_count() {
		assert_eq!(TypeInfo::new(SqlType::Point).physical_column_count(), 1);
		assert_eq!(TypeInfo::new(SqlType::Polygon).physical_column_count(), 4);
		assert_eq!(TypeInfo::new(SqlType::Int).physical_column_count(), 0);
	}

	#[test]
	fn test_display() {
		assert_eq!(TypeInfo::array_of(SqlType::Int).to_string(), "INTEGER[]");
		assert_eq!(TypeInfo::new(SqlType::Decimal).with_precision(10, 2).to_string(), "DECIMAL(10,2)");
	}
}
