//! envelope: seal and open signed envelopes from the command line.
//!
//! Values and salts are given as JSON. Logs go to stderr; set
//! `ENVELOPE_LOG` (or `RUST_LOG`) to raise the level above `warn`.

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use shared_crypto::{random_salt_hex, text};
use signed_envelope::{
    Envelope, EnvelopeCodecApi, EnvelopeConfig, FingerprintAlgorithm, FingerprintMode, Salts,
    SignedEnvelopeCodec, Value,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status for envelopes that fail to open.
const EXIT_REJECTED: u8 = 2;

/// Seal and open tamper-evident envelopes
#[derive(Parser, Debug)]
#[command(name = "envelope", version)]
#[command(about = "Seal values into signed envelopes and open them again")]
struct Cli {
    /// Fingerprint algorithm (md5, sha1, sha256, sha384, sha512, blake3)
    #[arg(short, long, global = true)]
    algorithm: Option<FingerprintAlgorithm>,

    /// How salts enter the fingerprint (salted, hmac)
    #[arg(short, long, global = true)]
    mode: Option<FingerprintMode>,

    /// Report untrusted envelopes instead of failing
    #[arg(long, global = true)]
    allow_untrusted: bool,

    /// Prefix salt as JSON
    #[arg(long, global = true, default_value = "null")]
    prefix: String,

    /// Suffix salt as JSON
    #[arg(long, global = true, default_value = "null")]
    suffix: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seal a JSON value and print the envelope
    Seal {
        /// Value to seal, as JSON
        json: String,

        /// Print the URL-friendly form
        #[arg(long)]
        url: bool,
    },

    /// Open an envelope (plain or URL-friendly) and print the value as JSON
    Open {
        envelope: String,
    },

    /// Print the text fingerprint of a string
    Fingerprint {
        text: String,

        /// Key for a keyed fingerprint
        #[arg(long)]
        key: Option<String>,
    },

    /// Convert base64 into its URL-friendly form
    UrlEncode {
        b64: String,
    },

    /// Convert the URL-friendly form back into base64
    UrlDecode {
        url: String,
    },

    /// Print a random hex salt
    Salt {
        /// Number of random bytes
        #[arg(default_value_t = 16)]
        bytes: usize,
    },
}

impl Cli {
    fn config(&self) -> EnvelopeConfig {
        let mut config = EnvelopeConfig::from_env();
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.allow_untrusted {
            config.allow_untrusted_data = true;
        }
        config
    }

    fn salts(&self) -> Result<Salts> {
        let prefix = parse_json(&self.prefix).context("invalid --prefix")?;
        let suffix = parse_json(&self.suffix).context("invalid --suffix")?;
        Ok(Salts::new(prefix, suffix))
    }
}

fn parse_json(raw: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(raw)?;
    Ok(Value::from_json(json))
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("ENVELOPE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Seal { json, url } => {
            let codec = SignedEnvelopeCodec::new(cli.config())?;
            let value = parse_json(json).context("invalid value")?;
            let envelope = codec.seal(&value, &cli.salts()?)?;
            if *url {
                println!("{}", envelope.to_url_safe());
            } else {
                println!("{envelope}");
            }
        }
        Command::Open { envelope } => {
            let codec = SignedEnvelopeCodec::new(cli.config())?;
            let envelope = if envelope.starts_with(text::URL_SAFE_PREFIX) {
                Envelope::from_url_safe(envelope)?
            } else {
                Envelope::from(envelope.as_str())
            };

            match codec.open(envelope.as_str(), &cli.salts()?) {
                Ok(opened) => {
                    let out = serde_json::json!({
                        "trusted": opened.trusted,
                        "value": opened.value.to_json()?,
                    });
                    println!("{out}");
                    if !opened.trusted {
                        return Ok(ExitCode::from(EXIT_REJECTED));
                    }
                }
                Err(e) if e.is_untrusted() || e.is_malformed() => {
                    eprintln!("error: {e}");
                    return Ok(ExitCode::from(EXIT_REJECTED));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Fingerprint { text, key } => {
            let algorithm = cli.config().algorithm;
            let fingerprint = match key {
                Some(key) => algorithm.keyed_fingerprint_text(key.as_bytes(), text.as_bytes())?,
                None => algorithm.fingerprint_text(text.as_bytes()),
            };
            println!("{fingerprint}");
        }
        Command::UrlEncode { b64 } => println!("{}", text::to_url_safe(b64)),
        Command::UrlDecode { url } => println!("{}", text::from_url_safe(url)?),
        Command::Salt { bytes } => println!("{}", random_salt_hex(*bytes)),
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    init_logging()?;

    let cli = Cli::parse();
    debug!(algorithm = ?cli.algorithm, mode = ?cli.mode, "parsed arguments");
    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "envelope", "seal", "10", "--prefix", "\"A\"", "--algorithm", "sha256",
        ]);
        assert_eq!(cli.config().algorithm, FingerprintAlgorithm::Sha256);
        assert_eq!(cli.salts().unwrap(), Salts::new("A", Value::Null));
    }

    #[test]
    fn test_invalid_salt_json() {
        let cli = Cli::parse_from(["envelope", "salt", "--suffix", "{not json"]);
        assert!(cli.salts().is_err());
    }
}
