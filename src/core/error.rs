//! Failure kinds shared by the contract gateway and the backend client

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The endpoint could not be reached or the connection broke mid-request.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with an error for this call, usually a revert.
    #[error("call to {function} on {address} failed: {reason}")]
    ContractCall {
        address: String,
        function: String,
        reason: String,
    },

    /// A response arrived but could not be decoded into the expected shape.
    #[error("malformed response from {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("HTTP {status} from {endpoint}")]
    Http { endpoint: String, status: u16 },
}

impl FetchError {
    pub fn contract_call(
        address: impl ToString,
        function: &str,
        reason: impl ToString,
    ) -> Self {
        FetchError::ContractCall {
            address: address.to_string(),
            function: function.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(source_name: &str, reason: impl ToString) -> Self {
        FetchError::Malformed {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}
