pub mod cached;
pub mod error;
pub mod lazy;
pub mod memo;
