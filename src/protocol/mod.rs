mod dialect;
pub mod listing;
mod permissions;

use serde::{Deserialize, Serialize};

pub use self::{dialect::Dialect, permissions::Permissions};

/// Representation type used for a single-file transfer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    Ascii,
    #[default]
    Binary,
}
