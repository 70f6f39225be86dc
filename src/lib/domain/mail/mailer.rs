//! Host facing mail entry point

#[cfg(test)]
use mockall::mock;
use serde_json::{Map, Value};

use crate::domain::mail::MailArgument;

/// The host application's generic "send mail" call
pub trait Mailer: Send + Sync {
    /// Sends a single message.
    ///
    /// # Arguments
    /// * `mail` - The [`OutgoingMail`] holding recipients, subject, body,
    ///   headers, attachments and any explicit request overrides.
    ///
    /// # Returns
    /// `true` if the message was accepted for delivery, `false` otherwise.
    fn send_mail(&self, mail: OutgoingMail) -> bool;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Mailer for Mailer {
        fn send_mail(&self, mail: OutgoingMail) -> bool;
    }
}

/// The arguments of one send call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutgoingMail {
    /// Recipients, as a comma separated string or a list
    pub to: MailArgument,

    /// The subject line
    pub subject: String,

    /// The HTML body
    pub message: String,

    /// Header lines, as a newline separated string or a list
    pub headers: MailArgument,

    /// Attachment paths, as a newline separated string or a list
    pub attachments: MailArgument,

    /// Explicit request body fields, merged over the computed body
    pub overrides: Map<String, Value>,
}

impl OutgoingMail {
    /// Creates a message with no headers, attachments or overrides
    pub fn new(to: impl Into<MailArgument>, subject: &str, message: &str) -> Self {
        Self {
            to: to.into(),
            subject: subject.to_string(),
            message: message.to_string(),
            ..Default::default()
        }
    }

    /// Sets the header block
    pub fn with_headers(mut self, headers: impl Into<MailArgument>) -> Self {
        self.headers = headers.into();
        self
    }

    /// Sets the attachment paths
    pub fn with_attachments(mut self, attachments: impl Into<MailArgument>) -> Self {
        self.attachments = attachments.into();
        self
    }

    /// Sets a single request body override
    pub fn with_override(mut self, key: &str, value: Value) -> Self {
        self.overrides.insert(key.to_string(), value);
        self
    }
}
