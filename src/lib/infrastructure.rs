//! Provider and transport implementations

pub mod email;
pub mod http;
