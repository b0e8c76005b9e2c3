// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod adjust;
pub mod alerts;
pub mod budget;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod onboarding;
pub mod reconcile;
pub mod recorder;
pub mod recurring;
pub mod store;
pub mod summary;
pub mod utils;

pub use error::{Error, Result};
