//! tfsync - Terraform dependency version reconciler library
//!
//! This library provides the core functionality for reconciling the versions
//! declared in Terraform files with their constraint comments:
//! - Terraform itself (`required_version`)
//! - Providers (`required_providers`)
//! - Registry modules and Git modules (`?ref=`)

pub mod cli;
pub mod config;
pub mod confirm;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod terraform;
pub mod update;
pub mod version;
