pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::sase::SaseClient;
pub use crate::config::{settings::Settings, CliConfig};
pub use crate::core::reconciler::{ReconcileReport, Reconciler, TargetFailure};
pub use crate::domain::model::{Device, PrefixEntry, PrefixListDefinition, PrefixListHandle};
pub use crate::domain::ports::PlatformClient;
pub use crate::utils::error::{IonError, Result};
