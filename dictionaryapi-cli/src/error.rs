//! Error types

use dictionaryapi::Reference;
use miette::Diagnostic;
use thiserror::Error;

use crate::config::ENV_PREFIX;

/// Command-line errors.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The config file or the environment could not be read.
    #[error("could not load configuration")]
    Config(#[source] Box<figment::Error>),
    /// No API key is configured for the requested reference.
    #[error("no api key for the {reference} reference")]
    MissingApiKey {
        reference: Reference,
        #[help]
        help: String,
    },
    /// The reference has no entries for the word.
    #[error("`{word}` was not found")]
    NotFound {
        word: String,
        #[help]
        help: Option<String>,
    },
    /// The lookup failed.
    #[error("lookup failed")]
    Lookup(#[source] dictionaryapi::Error),
    /// The entries could not be written as JSON.
    #[error("could not serialize entries")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Converts an error from a lookup of `word` in `reference`.
    pub fn lookup(err: dictionaryapi::Error, reference: Reference, word: &str) -> Error {
        match err {
            dictionaryapi::Error::NotFound { suggestions } => Error::NotFound {
                word: word.to_string(),
                help: (!suggestions.is_empty())
                    .then(|| format!("did you mean: {}?", suggestions.join(", "))),
            },
            dictionaryapi::Error::MissingApiKey(_) => Error::MissingApiKey {
                reference,
                help: format!(
                    "set `keys.{reference}` in the config file or {ENV_PREFIX}KEYS__{}",
                    reference.name().to_uppercase()
                ),
            },
            err => Error::Lookup(err),
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_suggest_words_when_not_found() {
        let err = dictionaryapi::Error::NotFound {
            suggestions: vec!["bagel".to_string(), "bagels".to_string()],
        };

        match Error::lookup(err, Reference::Collegiate, "bagle") {
            Error::NotFound { word, help } => {
                assert_eq!(word, "bagle");
                assert_eq!(help.as_deref(), Some("did you mean: bagel, bagels?"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn it_should_not_suggest_without_suggestions() {
        let err = dictionaryapi::Error::NotFound {
            suggestions: vec![],
        };

        assert!(matches!(
            Error::lookup(err, Reference::Collegiate, "zzz"),
            Error::NotFound { help: None, .. }
        ));
    }

    #[test]
    fn it_should_name_the_env_variable_for_missing_keys() {
        let err = dictionaryapi::Error::MissingApiKey("thesaurus");

        match Error::lookup(err, Reference::Thesaurus, "free") {
            Error::MissingApiKey { help, .. } => assert_eq!(
                help,
                "set `keys.thesaurus` in the config file or DICTIONARYAPI_KEYS__THESAURUS"
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
