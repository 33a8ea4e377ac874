pub mod patterns;
pub mod classifier;

/// Kind of contact value that gets a dedicated demo substitute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveDataType {
    Email,
    Phone,
    WalletAddress,
    Other,
}
