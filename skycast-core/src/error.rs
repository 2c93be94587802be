use thiserror::Error;

/// Rejections produced by query validation.
///
/// These never reach the network or the store; the presentation layer
/// surfaces them directly and no fetch is started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("City name cannot be empty.")]
    EmptyQuery,

    #[error("Latitude and longitude must both be finite numbers.")]
    InvalidCoordinates,

    #[error("Enter a city name or a latitude/longitude pair.")]
    MissingInput,
}

/// Failures of a single weather fetch.
///
/// Each variant renders to the human-readable message the store receives
/// via `Action::FetchError`. The connectivity message is deliberately
/// distinct from the server-error format so users can tell "backend down"
/// apart from "backend rejected the query".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Could not connect to the weather service. Check that the backend is running and reachable.")]
    NetworkUnreachable,

    #[error("Error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Incomplete weather data received from the server.")]
    IncompleteData,

    #[error("The weather service took too long to respond.")]
    Timeout,
}
