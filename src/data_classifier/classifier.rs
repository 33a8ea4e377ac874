use super::{SensitiveDataType, patterns::*};

/// Returns Some(SensitiveDataType) for a non-empty value, else None.
///
/// Wallet addresses are checked before phones since a long hex string can
/// contain digit runs that look like a phone number.
pub fn classify_sensitive(value: &str) -> Option<SensitiveDataType> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else if WALLET_REGEX.is_match(value) {
        Some(SensitiveDataType::WalletAddress)
    } else if EMAIL_REGEX.is_match(value) {
        Some(SensitiveDataType::Email)
    } else if PHONE_REGEX.is_match(value) {
        Some(SensitiveDataType::Phone)
    } else {
        Some(SensitiveDataType::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_email() {
        assert_eq!(classify_sensitive("operator@gambino.gold"), Some(SensitiveDataType::Email));
    }

    #[test]
    fn test_classify_phone() {
        assert_eq!(classify_sensitive("(615) 555-0142"), Some(SensitiveDataType::Phone));
        assert_eq!(classify_sensitive("+1-615-555-0142"), Some(SensitiveDataType::Phone));
    }

    #[test]
    fn test_classify_wallet() {
        let wallet = "0x52908400098527886E0F7030069857D2E4169EE7";
        assert_eq!(classify_sensitive(wallet), Some(SensitiveDataType::WalletAddress));
    }

    #[test]
    fn test_classify_other_and_empty() {
        assert_eq!(classify_sensitive("Nimbus 1"), Some(SensitiveDataType::Other));
        assert_eq!(classify_sensitive("   "), None);
    }
}
