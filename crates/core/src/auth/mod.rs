//! Credential and secondary-login boundaries

pub(crate) mod credentials;
pub mod ports;
