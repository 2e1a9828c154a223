// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod error;
pub mod models;
pub mod period;
pub mod expansion;
pub mod aggregate;
pub mod insights;

pub mod cli;
pub mod db;
pub mod logging;
pub mod settings;
pub mod utils;
pub mod commands;

pub use error::{LedgerError, LedgerResult};
