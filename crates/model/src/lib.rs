pub mod address;
pub mod error;
pub mod metadata;
pub mod network;
pub mod nft;
pub mod page;
pub mod token;
pub mod transaction;
