use std::path::PathBuf;

use argh::FromArgs;
use dictionaryapi::{Client, Parser, Reference};

mod config;
mod error;
mod tracing;

use config::Config;
use error::Error;

/// Look up a word in Merriam-Webster's dictionaries and print the entries as JSON
#[derive(Debug, FromArgs)]
struct Opts {
    /// the word to look up
    #[argh(positional)]
    word: String,
    /// the reference to search: collegiate, learners or thesaurus
    #[argh(
        option,
        short = 'r',
        from_str_fn(reference_from_str),
        default = "Reference::Collegiate"
    )]
    reference: Reference,
    /// path to config file
    #[argh(option, default = "PathBuf::from(config::DEFAULT_PATH)")]
    config: PathBuf,
    /// report senses that could not be placed in the outline
    #[argh(switch)]
    strict: bool,
    /// log in JSON format
    #[argh(switch)]
    json_logs: bool,
}

fn reference_from_str(value: &str) -> Result<Reference, String> {
    match value.to_ascii_lowercase().as_str() {
        "collegiate" => Ok(Reference::Collegiate),
        "learners" => Ok(Reference::Learners),
        "thesaurus" => Ok(Reference::Thesaurus),
        other => Err(format!("unknown reference `{other}`")),
    }
}

/// Looks up the word and returns the entries serialized as pretty JSON.
async fn run(opts: &Opts, config: &Config) -> Result<String, Error> {
    let reference = opts.reference;
    let parser = if opts.strict {
        Parser::strict()
    } else {
        Parser::lenient()
    };
    let mut client = Client::try_with_timeout(config.http.timeout)
        .map_err(Error::Lookup)?
        .with_parser(parser);

    if let Some(key) = config.keys.get(reference) {
        client = client.with_key(reference, key);
    }

    ::tracing::debug!(%reference, word = %opts.word, "looking up word");

    let json = if reference == Reference::Thesaurus {
        let entries = client
            .lookup_thesaurus(&opts.word)
            .await
            .map_err(|err| Error::lookup(err, reference, &opts.word))?;

        serde_json::to_string_pretty(&entries)?
    } else {
        let entries = client
            .lookup(reference, &opts.word)
            .await
            .map_err(|err| Error::lookup(err, reference, &opts.word))?;

        serde_json::to_string_pretty(&entries)?
    };

    Ok(json)
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Parse command-line arguments
    let opts: Opts = argh::from_env();

    // Initialize logging
    tracing::try_init(opts.json_logs)?;

    let config = config::load(&opts.config).map_err(Error::from)?;
    let json = run(&opts, &config).await?;

    println!("{json}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_parse_reference_names() {
        assert_eq!(reference_from_str("learners"), Ok(Reference::Learners));
        assert_eq!(reference_from_str("Thesaurus"), Ok(Reference::Thesaurus));
        assert!(reference_from_str("urban").is_err());
    }

    #[test]
    fn it_should_parse_options() {
        let opts = Opts::from_args(&["dictionaryapi"], &["--reference", "thesaurus", "free"])
            .expect("options");

        assert_eq!(opts.word, "free");
        assert_eq!(opts.reference, Reference::Thesaurus);
        assert_eq!(opts.config, PathBuf::from("dictionaryapi.toml"));
        assert!(!opts.strict);
    }
}
