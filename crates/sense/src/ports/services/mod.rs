//! Service Ports
//!
//! Abstract interfaces for external services.

mod emotion;
mod narrator;
mod personality;
mod speech;

pub use emotion::*;
pub use narrator::*;
pub use personality::*;
pub use speech::*;
