//! Bridge error taxonomy
//!
//! Contract violations are the module's fault (bad pointer, bad handle, bad
//! arguments). Host functions return them as `Err`, which wasmtime turns into
//! a trap that aborts the module call in progress.

use fcsim_shared::LayoutError;

/// Errors raised by the bridge
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// Memory window past the end of linear memory
    #[error(
        "memory access out of bounds: offset {offset} + length {len} exceeds memory size {size}"
    )]
    OutOfBounds { offset: u64, len: u64, size: u64 },

    /// Module has no exported linear memory
    #[error("module does not export linear memory")]
    MissingMemory,

    /// Handle that no `register` call ever returned
    #[error("handle {0} was never registered")]
    UnknownHandle(u32),

    /// Export the host needs is absent
    #[error("module does not export `{0}`")]
    MissingExport(&'static str),

    /// Import called with arguments that make no sense
    #[error("{function}: {reason}")]
    MalformedArguments {
        function: &'static str,
        reason: String,
    },

    /// Staged record failed to decode
    #[error("malformed staged record: {0}")]
    Layout(#[from] LayoutError),

    /// Design loader refused the payload
    #[error("design rejected by module (code {0})")]
    DesignRejected(i32),

    /// Frame tick requested before the module was started
    #[error("frame driver has not been started")]
    NotStarted,
}

impl BridgeError {
    pub(crate) fn malformed(function: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedArguments {
            function,
            reason: reason.into(),
        }
    }

    /// Whether the error means the module broke the ABI contract
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            BridgeError::OutOfBounds { .. }
                | BridgeError::MissingMemory
                | BridgeError::UnknownHandle(_)
                | BridgeError::MissingExport(_)
                | BridgeError::MalformedArguments { .. }
                | BridgeError::Layout(_)
        )
    }
}
