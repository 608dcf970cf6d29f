#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Reddit API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}
