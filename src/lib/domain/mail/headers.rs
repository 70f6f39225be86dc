//! Header parsing

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::mail::{Filters, MailArgument, SendRequest};

/// Local part of the sender address used when no `From` header is given
pub const DEFAULT_FROM_LOCAL_PART: &str = "mailer";

/// Sender name used when no `From` header names one
pub const DEFAULT_FROM_NAME: &str = "Mailer";

/// The sender and custom headers extracted from a header block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedHeaders {
    /// The sender's display name, after filters
    pub from_name: String,

    /// The sender's address, after filters
    pub from_email: String,

    /// Every header other than `Subject`, `To` and `From`
    pub custom: BTreeMap<String, String>,
}

impl ParsedHeaders {
    /// Copies the sender and custom headers into `request`
    pub fn apply_to(self, request: &mut SendRequest) {
        request.from_name = self.from_name;
        request.from_email = self.from_email;
        request.headers.extend(self.custom);
    }
}

/// Parses a block of `Name: Value` header lines.
///
/// Lines without a `:` are skipped. `Subject` and `To` are dropped since the
/// send arguments carry them. `From` sets the sender; any other header is
/// kept, with the last occurrence of a name winning. When no sender address
/// or name is found, one is derived from `server_name`.
pub fn parse_headers(headers: MailArgument, server_name: &str, filters: &Filters) -> ParsedHeaders {
    let mut from_name = None;
    let mut from_email = None;
    let mut custom = BTreeMap::new();

    for line in headers.into_list('\n') {
        let Some((name, content)) = line.trim().split_once(':') else {
            if !line.is_empty() {
                debug!(header = %line, "skipping header line without a separator");
            }
            continue;
        };

        let name = name.trim();
        let content = content.trim();

        match name.to_lowercase().as_str() {
            "subject" | "to" => {
                debug!(header = %name, "dropping header carried by the send arguments");
            }
            "from" => {
                let (name, email) = parse_from(content);

                if name.is_some() {
                    from_name = name;
                }

                if email.is_some() {
                    from_email = email;
                }
            }
            _ => {
                custom.insert(name.to_string(), content.to_string());
            }
        }
    }

    let from_name = from_name.unwrap_or_else(|| DEFAULT_FROM_NAME.to_string());
    let from_email = from_email.unwrap_or_else(|| default_from_email(server_name));

    ParsedHeaders {
        from_name: filters.from_name(from_name),
        from_email: filters.from_email(from_email),
        custom,
    }
}

/// Splits a `From` value into an optional display name and address.
///
/// `"Jane Doe" <jane@x.com>` yields both; a bare `jane@x.com` yields only the
/// address. Empty parts yield `None`.
fn parse_from(content: &str) -> (Option<String>, Option<String>) {
    let (name, email) = match content.split_once('<') {
        Some((name, email)) => (name.replace('"', ""), email.replace('>', "")),
        None => (String::new(), content.to_string()),
    };

    (non_empty(name.trim()), non_empty(email.trim()))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn default_from_email(server_name: &str) -> String {
    let server_name = server_name.to_lowercase();
    let domain = server_name.strip_prefix("www.").unwrap_or(&server_name);

    format!("{}@{}", DEFAULT_FROM_LOCAL_PART, domain)
}
