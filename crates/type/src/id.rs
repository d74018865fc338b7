// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};

/// First id handed out for session-scoped temporary tables and dictionaries.
/// Persistent ids are assigned by the row store and stay below this value.
pub const TEMPORARY_ID_START: i32 = 1 << 30;

macro_rules! catalog_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[repr(transparent)]
		#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash)]
		pub struct $name(pub i32);

		impl Deref for $name {
			type Target = i32;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}

		impl PartialEq<i32> for $name {
			fn eq(&self, other: &i32) -> bool {
				self.0.eq(other)
			}
		}

		impl From<$name> for i32 {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl From<i32> for $name {
			fn from(value: i32) -> Self {
				Self(value)
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
				Display::fmt(&self.0, f)
			}
		}

		impl Serialize for $name {
			fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
			where
				S: Serializer,
			{
				serializer.serialize_i32(self.0)
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
			where
				D: Deserializer<'de>,
			{
				struct IdVisitor;

				impl Visitor<'_> for IdVisitor {
					type Value = $name;

					fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
						formatter.write_str("a signed 32-bit number")
					}

					fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
					where
						E: serde::de::Error,
					{
						i32::try_from(value)
							.map($name)
							.map_err(|_| E::custom(format!("{} out of range for {}", value, stringify!($name))))
					}

					fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
					where
						E: serde::de::Error,
					{
						i32::try_from(value)
							.map($name)
							.map_err(|_| E::custom(format!("{} out of range for {}", value, stringify!($name))))
					}
				}

				deserializer.deserialize_i32(IdVisitor)
			}
		}
	};
}

catalog_id!(DatabaseId);
catalog_id!(
	/// Identifies a table or view. Physical shards carry their own ids.
	TableId
);
catalog_id!(
	/// Column ids start at 1 and are dense within a table.
	ColumnId
);
catalog_id!(DictionaryId);
catalog_id!(UserId);
catalog_id!(DashboardId);
catalog_id!(LinkId);

impl UserId {
	pub const ROOT: UserId = UserId(0);

	pub fn is_root(&self) -> bool {
		*self == Self::ROOT
	}
}

impl TableId {
	pub const TEMPORARY_START: TableId = TableId(TEMPORARY_ID_START);

	pub fn is_temporary(&self) -> bool {
		self.0 >= TEMPORARY_ID_START
	}
}

impl DictionaryId {
	/// Placeholder used by physical shards; resolves through the logical table.
	pub const NONE: DictionaryId = DictionaryId(0);
	pub const TEMPORARY_START: DictionaryId = DictionaryId(TEMPORARY_ID_START);

	pub fn is_temporary(&self) -> bool {
		self.0 >= TEMPORARY_ID_START
	}
}

impl ColumnId {
	pub fn next(&self) -> ColumnId {
		ColumnId(self.0 + 1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_temporary_range() {
		assert!(!TableId(1).is_temporary());
		assert!(TableId(TEMPORARY_ID_START).is_temporary());
		assert!(DictionaryId(TEMPORARY_ID_START + 3).is_temporary());
		assert_eq!(TEMPORARY_ID_START, 1073741824);
	}

	#[test]
	fn test_serde_transparent() {
		let json = serde_json::to_string(&TableId(42)).unwrap();
		assert_eq!(json, "42");
		let id: UserId = serde_json::from_str("7").unwrap();
		assert_eq!(id, 7);
	}

	#[test]
	fn test_deserialize_out_of_range() {
		let result: Result<ColumnId, _> = serde_json::from_str("4294967296");
		assert!(result.is_err());
	}
}
