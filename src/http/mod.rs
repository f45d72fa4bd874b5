//! HTTP helpers
//!
//! Response builders shared by the routing and handler layers.

pub mod response;

pub use response::*;
