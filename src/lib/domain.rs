//! Provider independent mail handling

pub mod mail;
