pub mod premium;
pub mod resume;
pub mod user;
