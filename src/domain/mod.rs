pub mod attendance;
pub mod form;
pub mod health;
pub mod registration;
pub mod user;
