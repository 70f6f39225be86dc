//! Recipient parsing

use crate::domain::mail::{Filters, MailArgument, Recipient};

/// Splits `to` into recipients.
///
/// A scalar is split on `,`. Addresses are neither trimmed nor validated and
/// duplicates are kept; the provider rejects malformed addresses itself.
pub fn parse_recipients(to: MailArgument, filters: &Filters) -> Vec<Recipient> {
    filters
        .recipients(to.into_list(','))
        .iter()
        .map(|email| Recipient::new(email))
        .collect()
}
