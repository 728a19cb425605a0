pub mod jwt;
pub mod oauth;

pub use jwt::*;
pub use oauth::*;
