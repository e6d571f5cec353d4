pub mod health;
pub mod roles;
