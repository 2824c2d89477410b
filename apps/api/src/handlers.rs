pub mod audit_retention;
pub mod health;
