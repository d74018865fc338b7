// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

//! Metadata catalog: databases, tables, columns, shards, dictionaries,
//! dashboards, links, users, roles and privileges.

pub use anacat_type::{Error, Result};

mod catalog;
pub mod config;
mod context;
mod dictionary;
pub mod error;
pub mod layout;
mod materialized;
mod migration;
mod role;
mod store;
mod system;
#[cfg(test)]
pub(crate) mod test_utils;

pub use catalog::{Catalog, EPOCH_MISMATCH};
pub use config::CatalogConfig;
pub use context::CatalogContext;
pub use materialized::MaterializedCatalog;
pub use role::{GroupRole, Role, RoleKey, UserRole};
pub use system::{LegacyPrivileges, SystemCatalog};

/// Row level access to the catalog tables.
pub(crate) struct CatalogStore;
