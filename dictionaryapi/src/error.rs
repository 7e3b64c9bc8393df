use thiserror::Error;

/// Error.
#[derive(Debug, Error)]
pub enum Error {
    /// The document contained no entries for the requested word.
    ///
    /// The reference usually offers a list of alternate headwords instead, which may be empty.
    #[error("word not found")]
    NotFound {
        /// Suggested headwords, in the order the reference listed them.
        suggestions: Vec<String>,
    },
    #[cfg(feature = "client")]
    #[error("could not construct http client: {0}")]
    BuildClient(#[source] reqwest::Error),
    #[cfg(feature = "client")]
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[cfg(feature = "client")]
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[cfg(feature = "client")]
    #[error("missing api key for the {0} reference")]
    MissingApiKey(&'static str),
    #[cfg(feature = "client")]
    #[error("the {0} reference is not a dictionary")]
    NotADictionary(&'static str),
    #[cfg(feature = "client")]
    #[error("popularity label not found")]
    PopularityNotFound,
}

impl Error {
    /// Returns the suggested headwords if this is a [`Error::NotFound`] error.
    #[must_use]
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Error::NotFound { suggestions } => Some(suggestions),
            #[cfg(feature = "client")]
            _ => None,
        }
    }
}
