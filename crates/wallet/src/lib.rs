pub mod error;
pub mod info;
pub mod metadata_cache;
pub mod nft_stream;
pub mod observer;
pub mod signer;
pub mod tracker;
