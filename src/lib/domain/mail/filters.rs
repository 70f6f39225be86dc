//! Host registered filters applied at fixed points of the send pipeline

use std::fmt;

use crate::domain::mail::SendRequest;

/// A transform applied to a value at one extension point
pub type Filter<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// Ordered filter chains for every extension point.
///
/// Each chain runs in registration order. An empty chain is the identity.
#[derive(Default)]
pub struct Filters {
    recipients: Vec<Filter<Vec<String>>>,
    from_name: Vec<Filter<String>>,
    from_email: Vec<Filter<String>>,
    body: Vec<Filter<SendRequest>>,
}

impl Filters {
    /// Creates an empty set of filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter over the split recipient list, before it becomes
    /// [`Recipient`](crate::domain::mail::Recipient) entries.
    pub fn on_recipients(
        mut self,
        filter: impl Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.recipients.push(Box::new(filter));
        self
    }

    /// Registers a filter over the final sender name
    pub fn on_from_name(
        mut self,
        filter: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> Self {
        self.from_name.push(Box::new(filter));
        self
    }

    /// Registers a filter over the final sender address
    pub fn on_from_email(
        mut self,
        filter: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> Self {
        self.from_email.push(Box::new(filter));
        self
    }

    /// Registers a filter over the fully assembled request, run before any
    /// explicit overrides are merged.
    pub fn on_body(
        mut self,
        filter: impl Fn(SendRequest) -> SendRequest + Send + Sync + 'static,
    ) -> Self {
        self.body.push(Box::new(filter));
        self
    }

    pub(crate) fn recipients(&self, recipients: Vec<String>) -> Vec<String> {
        apply(&self.recipients, recipients)
    }

    pub(crate) fn from_name(&self, name: String) -> String {
        apply(&self.from_name, name)
    }

    pub(crate) fn from_email(&self, email: String) -> String {
        apply(&self.from_email, email)
    }

    pub(crate) fn body(&self, request: SendRequest) -> SendRequest {
        apply(&self.body, request)
    }
}

fn apply<T>(chain: &[Filter<T>], value: T) -> T {
    chain.iter().fold(value, |value, filter| filter(value))
}

impl fmt::Debug for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filters")
            .field("recipients", &self.recipients.len())
            .field("from_name", &self.from_name.len())
            .field("from_email", &self.from_email.len())
            .field("body", &self.body.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_is_identity() {
        let filters = Filters::new();

        assert_eq!(filters.from_name("Jane".to_string()), "Jane");
        assert_eq!(filters.recipients(vec!["a@x.com".to_string()]), vec!["a@x.com"]);
    }

    #[test]
    fn test_filters_run_in_registration_order() {
        let filters = Filters::new()
            .on_from_email(|email| format!("{}.test", email))
            .on_from_email(|email| email.to_uppercase());

        assert_eq!(filters.from_email("a@x.com".to_string()), "A@X.COM.TEST");
    }

    #[test]
    fn test_debug_reports_chain_lengths() {
        let filters = Filters::new().on_from_name(|name| name);

        let debug = format!("{:?}", filters);

        assert!(debug.contains("from_name: 1"));
        assert!(debug.contains("body: 0"));
    }
}
