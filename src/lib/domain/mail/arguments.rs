//! Loosely typed mail arguments

/// A mail argument given either as a single string or as a list of strings.
///
/// Hosts pass recipients, headers and attachments in whichever shape is
/// convenient; every parser normalizes it with [`MailArgument::into_list`]
/// before doing any work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MailArgument {
    /// A single string, possibly holding several separated values
    Scalar(String),

    /// An already split list of values
    List(Vec<String>),
}

impl MailArgument {
    /// Returns the canonical list form of the argument.
    ///
    /// A scalar is split on `separator`. When splitting on newlines, CRLF line
    /// endings are normalized to LF first. Elements are never trimmed and
    /// empty elements are kept.
    pub fn into_list(self, separator: char) -> Vec<String> {
        match self {
            Self::List(values) => values,
            Self::Scalar(value) if separator == '\n' => value
                .replace("\r\n", "\n")
                .split('\n')
                .map(String::from)
                .collect(),
            Self::Scalar(value) => value.split(separator).map(String::from).collect(),
        }
    }

    /// Whether the argument carries no values at all
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
        }
    }
}

impl Default for MailArgument {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<&str> for MailArgument {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for MailArgument {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for MailArgument {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for MailArgument {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(String::from).collect())
    }
}
