pub mod grouper;
pub mod reconciler;

pub use crate::domain::model::{Device, PrefixEntry, PrefixListDefinition, PrefixListHandle};
pub use crate::domain::ports::PlatformClient;
pub use crate::utils::error::Result;
