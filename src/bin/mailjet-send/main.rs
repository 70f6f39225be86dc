#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a single message through Mailjet from the command line

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use mailjet_mail::{
    domain::mail::{errors::MailerError, OutgoingMail},
    infrastructure::email::mailjet::{MailjetConfig, MailjetMailer},
};
use serde_json::Value;
use tracing::{error, warn};

/// Exit code used when no credentials are configured
const DISABLED: u8 = 2;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(name = "mailjet-send", about = "Send an email through the Mailjet API")]
pub struct Args {
    /// The Mailjet configuration
    #[clap(flatten)]
    pub mailjet: MailjetConfig,

    /// Recipients, comma separated
    #[arg(long)]
    pub to: String,

    /// The subject line
    #[arg(long)]
    pub subject: String,

    /// The HTML body
    #[arg(long, conflicts_with = "message_file")]
    pub message: Option<String>,

    /// File holding the HTML body
    #[arg(long)]
    pub message_file: Option<PathBuf>,

    /// A `Name: Value` header line, may be repeated
    #[arg(long = "header")]
    pub headers: Vec<String>,

    /// Path of a file to attach, may be repeated
    #[arg(long = "attachment")]
    pub attachments: Vec<String>,

    /// A `Key=JSON` request body override, may be repeated
    #[arg(long = "override", value_parser = parse_override)]
    pub overrides: Vec<(String, Value)>,

    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Splits `Key=Value`, reading the value as JSON or else as a plain string
fn parse_override(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{}\"", raw))?;

    if key.is_empty() {
        return Err("override key is empty".to_string());
    }

    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    Ok((key.to_string(), value))
}

fn run(args: Args) -> Result<u8> {
    let message = match (args.message, args.message_file) {
        (Some(message), _) => message,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };

    let mut mail = OutgoingMail::new(args.to, &args.subject, &message)
        .with_headers(args.headers)
        .with_attachments(args.attachments);

    for (key, value) in args.overrides {
        mail = mail.with_override(&key, value);
    }

    let mailer = match MailjetMailer::from_config(args.mailjet) {
        Ok(mailer) => mailer,
        Err(MailerError::MissingCredentials) => {
            warn!("MAILJET_API_KEY and MAILJET_SECRET_KEY must both be set");
            return Ok(DISABLED);
        }
        Err(e) => return Err(e.into()),
    };

    if args.dry_run {
        let body = mailer.build_body(mail)?;
        println!("{}", serde_json::to_string_pretty(&body)?);

        return Ok(0);
    }

    Ok(if mailer.send(mail) { 0 } else { 1 })
}

#[mutants::skip]
fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    match run(Args::parse()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_override_value_is_read_as_json() {
        assert_eq!(
            parse_override("Recipients=[{\"Email\":\"a@x.com\"}]"),
            Ok(("Recipients".to_string(), json!([{ "Email": "a@x.com" }])))
        );
    }

    #[test]
    fn test_override_value_falls_back_to_string() {
        assert_eq!(
            parse_override("Subject=Hello there"),
            Ok(("Subject".to_string(), json!("Hello there")))
        );
    }

    #[test]
    fn test_override_requires_key() {
        assert!(parse_override("no separator").is_err());
        assert!(parse_override("=value").is_err());
    }

    #[test]
    fn test_args_accept_repeated_headers() -> TestResult {
        let args = Args::try_parse_from([
            "mailjet-send",
            "--to",
            "a@x.com,b@x.com",
            "--subject",
            "Hello",
            "--header",
            "From: Jane <jane@x.com>",
            "--header",
            "Cc: c@x.com",
            "--override",
            "Subject=Override",
        ])?;

        assert_eq!(args.headers.len(), 2);
        assert_eq!(args.overrides, vec![("Subject".to_string(), json!("Override"))]);
        assert!(!args.dry_run);

        Ok(())
    }

    #[test]
    fn test_missing_credentials_disable_sending() -> TestResult {
        let args = Args {
            mailjet: MailjetConfig {
                api_key: None,
                secret_key: None,
                base_url: "https://api.mailjet.test/v3/".to_string(),
                server_name: "example.com".to_string(),
            },
            to: "a@x.com".to_string(),
            subject: "Hello".to_string(),
            message: Some("<p>Hi</p>".to_string()),
            message_file: None,
            headers: Vec::new(),
            attachments: Vec::new(),
            overrides: Vec::new(),
            dry_run: false,
        };

        assert_eq!(run(args)?, DISABLED);

        Ok(())
    }
}
