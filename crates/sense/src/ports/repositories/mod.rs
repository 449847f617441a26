//! Repository Ports
//!
//! Abstract interfaces for local data: the frame being observed and the
//! archive of spoken narrations.

mod frame_source;
mod narration_archive;

pub use frame_source::*;
pub use narration_archive::*;
