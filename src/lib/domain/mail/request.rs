//! Send request payload

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// The structured body of a single send call.
///
/// Built fresh for every send and discarded once the HTTP call returns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SendRequest {
    /// The subject line
    #[serde(rename = "Subject")]
    pub subject: String,

    /// The HTML body
    #[serde(rename = "Html-part")]
    pub html_body: String,

    /// Recipients in the order the caller gave them
    #[serde(rename = "Recipients")]
    pub recipients: Vec<Recipient>,

    /// Custom headers, omitted from the body when empty
    #[serde(rename = "Headers", skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// The sender's display name
    #[serde(rename = "FromName")]
    pub from_name: String,

    /// The sender's address
    #[serde(rename = "FromEmail")]
    pub from_email: String,

    /// Attachments, possibly empty
    #[serde(rename = "Attachments")]
    pub attachments: Vec<Attachment>,
}

impl SendRequest {
    /// Creates the base request holding only subject and body
    pub fn new(subject: &str, html_body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            ..Default::default()
        }
    }
}

/// A single recipient
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recipient {
    /// The recipient address, exactly as given by the caller
    #[serde(rename = "Email")]
    pub email: String,
}

impl Recipient {
    /// Creates a recipient without validating or trimming the address
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
        }
    }
}

/// A file attached to the message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// MIME type of the file
    #[serde(rename = "Content-type")]
    pub content_type: String,

    /// File name without any directory components
    #[serde(rename = "Filename")]
    pub filename: String,

    /// Base64 encoded file content
    #[serde(rename = "content")]
    pub content: String,
}

/// Serializes `request` and merges `overrides` on top of it.
///
/// The merge is shallow: a top level key present in `overrides` replaces the
/// computed value for that key wholesale.
pub fn merge_overrides(
    request: &SendRequest,
    overrides: &Map<String, Value>,
) -> Result<Map<String, Value>, serde_json::Error> {
    let mut body = match serde_json::to_value(request)? {
        Value::Object(body) => body,
        _ => Map::new(),
    };

    for (key, value) in overrides {
        body.insert(key.clone(), value.clone());
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn request() -> SendRequest {
        SendRequest {
            recipients: vec![Recipient::new("a@x.com")],
            from_name: "Mailer".to_string(),
            from_email: "mailer@example.com".to_string(),
            ..SendRequest::new("Hello", "<p>Hi</p>")
        }
    }

    #[test]
    fn test_serializes_provider_field_names() -> TestResult {
        let mut request = request();
        request.attachments.push(Attachment {
            content_type: "text/plain".to_string(),
            filename: "real.txt".to_string(),
            content: "aGk=".to_string(),
        });

        let value = serde_json::to_value(&request)?;

        assert_eq!(
            value,
            json!({
                "Subject": "Hello",
                "Html-part": "<p>Hi</p>",
                "Recipients": [{ "Email": "a@x.com" }],
                "FromName": "Mailer",
                "FromEmail": "mailer@example.com",
                "Attachments": [{ "Content-type": "text/plain", "Filename": "real.txt", "content": "aGk=" }],
            })
        );

        Ok(())
    }

    #[test]
    fn test_headers_are_included_when_present() -> TestResult {
        let mut request = request();
        request
            .headers
            .insert("Reply-To".to_string(), "b@x.com".to_string());

        let value = serde_json::to_value(&request)?;

        assert_eq!(value["Headers"], json!({ "Reply-To": "b@x.com" }));
        assert_eq!(value["Attachments"], json!([]));

        Ok(())
    }

    #[test]
    fn test_override_takes_precedence() -> TestResult {
        let mut overrides = Map::new();
        overrides.insert("Subject".to_string(), json!("Override"));
        overrides.insert("Mj-campaign".to_string(), json!("weekly"));

        let body = merge_overrides(&request(), &overrides)?;

        assert_eq!(body["Subject"], json!("Override"));
        assert_eq!(body["Mj-campaign"], json!("weekly"));
        assert_eq!(body["FromEmail"], json!("mailer@example.com"));

        Ok(())
    }

    #[test]
    fn test_override_replaces_lists_wholesale() -> TestResult {
        let mut overrides = Map::new();
        overrides.insert(
            "Recipients".to_string(),
            json!([{ "Email": "z@x.com" }, { "Email": "y@x.com" }]),
        );

        let body = merge_overrides(&request(), &overrides)?;

        assert_eq!(
            body["Recipients"],
            json!([{ "Email": "z@x.com" }, { "Email": "y@x.com" }])
        );

        Ok(())
    }
}
