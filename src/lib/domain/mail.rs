//! Mail module: turns loosely typed mail arguments into a provider request.

mod arguments;
mod attachments;
mod filters;
mod headers;
mod mailer;
mod recipients;
mod request;

pub mod errors;

pub use arguments::MailArgument;
pub use attachments::parse_attachments;
pub use filters::{Filter, Filters};
pub use headers::{parse_headers, ParsedHeaders, DEFAULT_FROM_LOCAL_PART, DEFAULT_FROM_NAME};
pub use mailer::{Mailer, OutgoingMail};
pub use recipients::parse_recipients;
pub use request::{merge_overrides, Attachment, Recipient, SendRequest};
