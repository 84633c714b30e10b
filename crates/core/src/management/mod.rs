//! Identity provider management API boundary

pub mod ports;
