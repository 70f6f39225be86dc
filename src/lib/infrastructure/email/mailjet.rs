//! Mailjet email service implementation

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    domain::mail::{
        errors::MailerError, merge_overrides, parse_attachments, parse_headers, parse_recipients,
        Filters, Mailer, OutgoingMail, SendRequest,
    },
    infrastructure::http::{BlockingTransport, HttpRequest, HttpResponse, HttpTransport},
};

/// The Mailjet v3 API root
pub const DEFAULT_BASE_URL: &str = "https://api.mailjet.com/v3/";

/// Path of the send endpoint, relative to the base URL
pub const SEND_PATH: &str = "send";

/// Mailjet configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct MailjetConfig {
    /// The Mailjet API key
    #[clap(long, env = "MAILJET_API_KEY")]
    pub api_key: Option<String>,

    /// The Mailjet secret key
    #[clap(long, env = "MAILJET_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// The Mailjet API base URL
    #[clap(long, env = "MAILJET_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Host name the default sender address is derived from
    #[clap(long, env = "SERVER_NAME", default_value = "localhost")]
    pub server_name: String,
}

impl MailjetConfig {
    /// Returns the API credentials if both key and secret are set
    pub fn credentials(&self) -> Option<Credentials> {
        match (self.api_key.as_deref(), self.secret_key.as_deref()) {
            (Some(api_key), Some(secret_key)) if !api_key.is_empty() && !secret_key.is_empty() => {
                Some(Credentials {
                    api_key: api_key.to_string(),
                    secret_key: secret_key.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Mailjet API key and secret
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    /// The `Authorization` header value for these credentials
    pub fn authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.api_key, self.secret_key));

        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[redacted]")
            .finish()
    }
}

/// Mailjet mailer
#[derive(Debug)]
pub struct MailjetMailer<T: HttpTransport = BlockingTransport> {
    config: MailjetConfig,
    credentials: Credentials,
    transport: T,
    filters: Filters,
}

impl MailjetMailer<BlockingTransport> {
    /// Create a new Mailjet mailer talking HTTP through reqwest
    pub fn from_config(config: MailjetConfig) -> Result<Self, MailerError> {
        let transport = BlockingTransport::new()?;

        Self::new(config, transport)
    }
}

impl<T: HttpTransport> MailjetMailer<T> {
    /// Create a new Mailjet mailer.
    ///
    /// Fails with [`MailerError::MissingCredentials`] unless `config` holds
    /// both an API key and a secret.
    pub fn new(config: MailjetConfig, transport: T) -> Result<Self, MailerError> {
        let credentials = config
            .credentials()
            .ok_or(MailerError::MissingCredentials)?;

        Ok(Self {
            config,
            credentials,
            transport,
            filters: Filters::new(),
        })
    }

    /// Replaces the filters applied while building the request body
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Builds the request body for `mail` without sending it.
    ///
    /// Recipients, headers and attachments are parsed in that order, the body
    /// filters run, then the explicit overrides of `mail` are merged on top.
    pub fn build_body(&self, mail: OutgoingMail) -> Result<Map<String, Value>, MailerError> {
        let mut request = SendRequest::new(&mail.subject, &mail.message);

        request.recipients = parse_recipients(mail.to, &self.filters);
        parse_headers(mail.headers, &self.config.server_name, &self.filters).apply_to(&mut request);
        request.attachments = parse_attachments(mail.attachments);

        let request = self.filters.body(request);

        Ok(merge_overrides(&request, &mail.overrides)?)
    }

    /// Makes one call to the Mailjet API.
    ///
    /// `headers` are applied over the default `Content-Type` and
    /// `Authorization` headers. The response is returned as is, whatever its
    /// status.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: &Map<String, Value>,
        headers: HeaderMap,
    ) -> Result<HttpResponse, MailerError> {
        let authorization = HeaderValue::from_str(&self.credentials.authorization())
            .map_err(|e| MailerError::InvalidHeader(e.to_string()))?;

        let mut request_headers = HeaderMap::new();
        request_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request_headers.insert(AUTHORIZATION, authorization);
        request_headers.extend(headers);

        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        debug!(%method, %url, "calling Mailjet API");

        self.transport.execute(HttpRequest {
            method,
            url,
            headers: request_headers,
            body: serde_json::to_string(body)?,
        })
    }

    /// Sends `mail`, reporting why it failed if it did.
    ///
    /// Only a 200 response counts as success.
    pub fn try_send(&self, mail: OutgoingMail) -> Result<(), MailerError> {
        let body = self.build_body(mail)?;
        let response = self.request(Method::POST, SEND_PATH, &body, HeaderMap::new())?;

        if response.status != 200 {
            return Err(MailerError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            });
        }

        info!("mail accepted by Mailjet");

        Ok(())
    }

    /// Sends `mail`, returning `true` only if Mailjet accepted it
    pub fn send(&self, mail: OutgoingMail) -> bool {
        match self.try_send(mail) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not send mail through Mailjet");
                false
            }
        }
    }
}

impl<T: HttpTransport> Mailer for MailjetMailer<T> {
    fn send_mail(&self, mail: OutgoingMail) -> bool {
        self.send(mail)
    }
}

/// Picks the mailer the host should use.
///
/// With credentials configured every send goes through Mailjet. Without
/// them the host's own mailer is returned untouched.
pub fn select_mailer<M>(config: MailjetConfig, filters: Filters, host: M) -> Box<dyn Mailer>
where
    M: Mailer + 'static,
{
    if config.credentials().is_none() {
        info!("Mailjet credentials not configured, keeping the host mailer");
        return Box::new(host);
    }

    match BlockingTransport::new() {
        Ok(transport) => select_mailer_with(config, filters, transport, host),
        Err(e) => {
            warn!(error = %e, "could not create HTTP client, keeping the host mailer");
            Box::new(host)
        }
    }
}

/// Like [`select_mailer`], sending through `transport` when credentials are set
pub fn select_mailer_with<T, M>(
    config: MailjetConfig,
    filters: Filters,
    transport: T,
    host: M,
) -> Box<dyn Mailer>
where
    T: HttpTransport + 'static,
    M: Mailer + 'static,
{
    match MailjetMailer::new(config, transport) {
        Ok(mailer) => Box::new(mailer.with_filters(filters)),
        Err(e) => {
            info!(reason = %e, "keeping the host mailer");
            Box::new(host)
        }
    }
}
