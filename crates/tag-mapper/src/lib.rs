// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end: reads the monitored tag list and the program export, runs tag
//! resolution and writes the mapping table.

pub mod config;
pub mod error;
pub mod mapper;
pub mod report;
pub mod tag_list;
