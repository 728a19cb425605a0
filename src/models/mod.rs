pub mod auth;
pub mod error;
pub mod registration;

pub use auth::*;
pub use error::*;
pub use registration::*;
