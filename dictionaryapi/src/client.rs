//! A client for querying Merriam-Webster's dictionary web service (dictionaryapi.com).
//!
//! This module provides a high-level async interface for making requests to the references and
//! parsing the results into structured data.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{ClientBuilder, redirect::Policy};
use url::Url;

use crate::{Entry, Error, Parser, ThesaurusEntry};

/// The URL of the popularity score service.
const POPULARITY_URL: &str = "https://stats.merriam-webster.com/pop-score-redesign.php";
/// The name of the query parameter used to pass the API key.
const QUERY_KEY_PARAM: &str = "key";
/// The name of the query parameter used to specify the word to score.
const QUERY_WORD_PARAM: &str = "word";
/// The default duration before a request times out.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// The `User-Agent` header to send when issuing HTTP requests.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Matches the quoted popularity label.
static POPULARITY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(.+)'").expect("invalid regex"));

/// The references served by dictionaryapi.com, each with its own API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Merriam-Webster's Collegiate® Dictionary with Audio.
    Collegiate,
    /// Merriam-Webster's Learner's Dictionary with Audio.
    Learners,
    /// Merriam-Webster's Collegiate® Thesaurus.
    Thesaurus,
}

impl Reference {
    /// Returns the base URL entries are requested from.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Reference::Collegiate => {
                "http://www.dictionaryapi.com/api/v1/references/collegiate/xml/"
            }
            Reference::Learners => "https://www.dictionaryapi.com/api/v1/references/learners/xml/",
            Reference::Thesaurus => {
                "https://www.dictionaryapi.com/api/v1/references/thesaurus/xml/"
            }
        }
    }

    /// Returns the short name of the reference.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Reference::Collegiate => "collegiate",
            Reference::Learners => "learners",
            Reference::Thesaurus => "thesaurus",
        }
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An asynchronous client for dictionaryapi.com.
///
/// This client handles the construction of HTTP requests, sending them to the service, and
/// parsing the XML responses.
#[derive(Debug)]
pub struct Client {
    /// The underlying [`reqwest::Client`] used for making HTTP requests.
    client: reqwest::Client,
    /// API keys by reference.
    keys: HashMap<Reference, String>,
    /// The parser used for responses.
    parser: Parser,
}

impl Client {
    /// Constructs a new `Client` with default settings and no API keys.
    ///
    /// Keys are added with [`Client::with_key`].
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be built. For a non-panicking version, see
    /// [`Client::try_new`].
    #[must_use]
    pub fn new() -> Client {
        Client::try_new().expect("could not construct http client")
    }

    /// Attempts to construct a new `Client` with default settings.
    ///
    /// The client is configured with gzip support, a 30-second timeout, and redirects disabled.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::BuildClient`] if the underlying `reqwest` client fails to build.
    pub fn try_new() -> Result<Client, Error> {
        Client::try_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Attempts to construct a new `Client` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::BuildClient`] if the underlying `reqwest` client fails to build.
    pub fn try_with_timeout(timeout: Duration) -> Result<Client, Error> {
        let client = ClientBuilder::new()
            .gzip(true)
            .redirect(Policy::none())
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::BuildClient)?;

        Ok(Client::with_client(client))
    }

    /// Constructs a `Client` using a pre-configured `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Client {
        Client {
            client,
            keys: HashMap::new(),
            parser: Parser::lenient(),
        }
    }

    /// Sets the API key used for `reference`.
    #[must_use]
    pub fn with_key(mut self, reference: Reference, key: impl Into<String>) -> Client {
        self.keys.insert(reference, key.into());
        self
    }

    /// Sets the parser used for responses.
    #[must_use]
    pub const fn with_parser(mut self, parser: Parser) -> Client {
        self.parser = parser;
        self
    }

    /// Returns the URL of the entries for `word` in `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] if no non-empty key is set for `reference`.
    pub fn entries_url(&self, reference: Reference, word: &str) -> Result<Url, Error> {
        let key = self
            .keys
            .get(&reference)
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey(reference.name()))?;
        let mut url = Url::parse(reference.base_url())?;

        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(word);
        url.query_pairs_mut().append_pair(QUERY_KEY_PARAM, key);

        Ok(url)
    }

    /// Looks up `word` in the Collegiate or Learner's dictionary.
    ///
    /// The popularity score is fetched at the same time and attached to the entries for `word`
    /// itself. A failed popularity lookup is not an error.
    ///
    /// # Errors
    ///
    /// - [`Error::NotADictionary`]: If `reference` is the thesaurus, which is looked up with
    ///   [`Client::lookup_thesaurus`] instead.
    /// - [`Error::MissingApiKey`]: If no key is set for `reference`. Nothing is requested in
    ///   that case.
    /// - [`Error::Request`]: If the HTTP request fails due to network issues, a timeout, or a
    ///   non-successful status code.
    /// - [`Error::NotFound`]: If the reference has no entries for `word`.
    pub async fn lookup(&self, reference: Reference, word: &str) -> Result<Vec<Entry>, Error> {
        if reference == Reference::Thesaurus {
            return Err(Error::NotADictionary(reference.name()));
        }

        let url = self.entries_url(reference, word)?;
        let (popularity, body) = tokio::join!(self.popularity(word), self.fetch(url));
        let mut entries = self.parser.parse_dictionary(&body?, word)?;
        let popularity = popularity.ok();

        for entry in entries.iter_mut().filter(|entry| entry.word == word) {
            entry.popularity.clone_from(&popularity);
        }

        Ok(entries)
    }

    /// Looks up `word` in the thesaurus.
    ///
    /// # Errors
    ///
    /// See [`Client::lookup`].
    pub async fn lookup_thesaurus(&self, word: &str) -> Result<Vec<ThesaurusEntry>, Error> {
        let url = self.entries_url(Reference::Thesaurus, word)?;
        let (popularity, body) = tokio::join!(self.popularity(word), self.fetch(url));
        let mut entries = self.parser.parse_thesaurus(&body?, word)?;
        let popularity = popularity.ok();

        for entry in entries.iter_mut().filter(|entry| entry.word == word) {
            entry.popularity.clone_from(&popularity);
        }

        Ok(entries)
    }

    /// Returns the popularity label of `word`, e.g. `Top 30% of lookups`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] if the request fails, or [`Error::PopularityNotFound`] if the
    /// response has no label.
    pub async fn popularity(&self, word: &str) -> Result<String, Error> {
        let url = Url::parse_with_params(POPULARITY_URL, &[(QUERY_WORD_PARAM, word)])?;
        let body = send(self.client.get(url)).await;

        #[cfg(feature = "log")]
        if let Err(ref err) = body {
            tracing::debug!(%word, %err, "popularity lookup failed");
        }

        parse_popularity(&body?)
    }

    /// Fetches the raw response body of an entries URL.
    async fn fetch(&self, url: Url) -> Result<String, Error> {
        #[cfg(feature = "log")]
        tracing::debug!(%url, "requesting entries");

        send(self.client.get(url)).await
    }
}

impl Default for Client {
    /// Creates a default `Client` instance.
    ///
    /// This is equivalent to calling [`Client::new`].
    fn default() -> Self {
        Self::new()
    }
}

/// Sends the request and returns the body of a successful response.
async fn send(request: reqwest::RequestBuilder) -> Result<String, Error> {
    let response = request.send().await.map_err(Error::Request)?;

    match response.error_for_status() {
        Ok(response) => response.text().await.map_err(Error::Request),
        Err(err) => Err(Error::Request(err)),
    }
}

/// Extracts the popularity label from the popularity service's response.
///
/// # Errors
///
/// Returns [`Error::PopularityNotFound`] if no line starting with `label` has a quoted value.
pub fn parse_popularity(body: &str) -> Result<String, Error> {
    body.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("label"))
        .find_map(|line| POPULARITY_LABEL.captures(line))
        .and_then(|captures| captures.get(1))
        .map(|label| label.as_str().to_string())
        .ok_or(Error::PopularityNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_client() {
        let http_client = reqwest::Client::new();
        let _ = Client::with_client(http_client);
    }

    #[test]
    fn test_entries_url() {
        let client = Client::with_client(reqwest::Client::new())
            .with_key(Reference::Collegiate, "secret");
        let url = client
            .entries_url(Reference::Collegiate, "ice cream")
            .expect("url");

        assert_eq!(
            url.as_str(),
            "http://www.dictionaryapi.com/api/v1/references/collegiate/xml/ice%20cream?key=secret"
        );
    }

    #[test]
    fn test_entries_url_requires_key() {
        let client =
            Client::with_client(reqwest::Client::new()).with_key(Reference::Learners, "");

        assert!(matches!(
            client.entries_url(Reference::Learners, "bagel"),
            Err(Error::MissingApiKey("learners"))
        ));
        assert!(matches!(
            client.entries_url(Reference::Thesaurus, "bagel"),
            Err(Error::MissingApiKey("thesaurus"))
        ));
    }

    #[tokio::test]
    async fn test_lookup_without_key_fails_before_requesting() {
        let client = Client::with_client(reqwest::Client::new());
        let result = client.lookup(Reference::Collegiate, "bagel").await;

        assert!(matches!(result, Err(Error::MissingApiKey("collegiate"))));
    }

    #[tokio::test]
    async fn test_lookup_rejects_thesaurus() {
        let client = Client::with_client(reqwest::Client::new())
            .with_key(Reference::Thesaurus, "secret");
        let result = client.lookup(Reference::Thesaurus, "free").await;

        assert!(matches!(result, Err(Error::NotADictionary("thesaurus"))));
    }

    #[test]
    fn test_parse_popularity() {
        let body = "var popularity = {\n    score: 0.71,\n    label: 'Top 30% of lookups',\n};\n";

        assert_eq!(
            parse_popularity(body).expect("popularity"),
            "Top 30% of lookups"
        );
    }

    #[test]
    fn test_parse_popularity_without_label() {
        assert!(matches!(
            parse_popularity("label: unknown\n"),
            Err(Error::PopularityNotFound)
        ));
    }
}
