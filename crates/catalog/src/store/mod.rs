// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub(crate) mod column;
pub(crate) mod dashboard;
pub(crate) mod database;
pub(crate) mod dictionary;
pub(crate) mod legacy;
pub(crate) mod link;
pub(crate) mod physical;
pub(crate) mod role;
pub(crate) mod schema;
pub(crate) mod table;
pub(crate) mod user;
pub(crate) mod view;
