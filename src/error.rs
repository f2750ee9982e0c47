use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    MissingCredential(&'static str),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unable to fetch json from {url}: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("non-OK HTTP status code: {0}")]
    HttpStatus(u16),

    #[error("malformed status payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unable to find any services in json, unknown or invalid --service-status?")]
    NoServices,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("unrecognized service status code {0}")]
    UnknownStatusCode(i64),

    #[error("last_check timestamp {0} is not representable in local time")]
    BadTimestamp(i64),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
