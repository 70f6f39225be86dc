//! Email provider implementations

pub mod mailjet;
