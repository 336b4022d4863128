//! Data models for the application
//!
//! Files picked by the user, the slots holding them, the preview handles that
//! live as long as a slot does, and the request/response shapes of a submission.

mod media;
mod preview;
mod slot;
mod upload;

// Re-export all models for convenient imports
pub use media::*;
pub use preview::*;
pub use slot::*;
pub use upload::*;
