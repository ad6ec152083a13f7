use crate::error::WalletError;

/// Opaque signing capability.
///
/// Key generation, derivation and signature algorithms live entirely
/// behind this seam; the SDK only moves payloads through it.
pub trait Signer: Send + Sync {
    /// Derives the signer for a child key path, e.g. `m/44'/5757'/0'/0/0`.
    fn derive(&self, path: &str) -> Result<Box<dyn Signer>, WalletError>;

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, WalletError>;

    fn public_key(&self) -> Vec<u8>;
}
