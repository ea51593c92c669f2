//! Core domain models for tfsync
//!
//! This module contains the fundamental types used throughout the application:
//! - Target kinds for Terraform declarations
//! - Dependency records extracted from Terraform files
//! - Reconciliation decision results
//! - Summary and result structures

mod dependency;
mod summary;
mod target;
mod update_result;

pub use dependency::{DependencyKey, DependencyRecord};
pub use summary::{FailedUpdate, FileReconcileResult, ReconcileSummary};
pub use target::{Target, TargetKind};
pub use update_result::{Evaluation, ReconcileResult, SkipReason};
