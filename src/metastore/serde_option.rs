use serde::{Deserialize, Serialize};

/// Serialization tweaks applied when writing to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SerdeOption {
    /// Single-field values are written inside an envelope object.
    WrapSingleValues,
    /// Single-field values are written as the bare field.
    UnwrapSingleValues,
}
