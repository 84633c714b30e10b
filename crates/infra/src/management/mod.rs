//! Management API adapter

pub mod client;

pub use client::ManagementApiClient;
