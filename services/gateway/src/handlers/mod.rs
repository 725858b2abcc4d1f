pub mod admin;
pub mod signal;
pub mod slave;
