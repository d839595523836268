//! Input validation utilities for chat payloads and registry configuration

use anchor_lang::prelude::*;

use crate::errors::BondError;
use crate::state::MAX_PAYLOAD_LEN;

/// Validates a chat payload against the registry's configured limit.
///
/// Payloads are stored verbatim (typically client-side ciphertext), so only
/// the length is checked, never the character set.
///
/// # Errors
/// * `EmptyMessage` if the payload is empty
/// * `MessageTooLong` if the payload is longer than `max_len` bytes
pub fn validate_payload(payload: &str, max_len: u16) -> Result<()> {
    require!(!payload.is_empty(), BondError::EmptyMessage);
    require!(
        payload.len() <= max_len as usize,
        BondError::MessageTooLong
    );
    Ok(())
}

/// Validates a payload limit before it is written to the registry.
/// The limit can never exceed what a message account can store.
pub fn validate_payload_limit(max_len: u16) -> Result<()> {
    require!(
        max_len > 0 && max_len as usize <= MAX_PAYLOAD_LEN,
        BondError::InvalidPayloadLimit
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bond_err(error: BondError) -> anchor_lang::error::Error {
        error.into()
    }

    #[test]
    fn test_payload_within_limit() {
        assert!(validate_payload("This text is a placeholder of an encrypted message", 512).is_ok());
        assert!(validate_payload("x", 1).is_ok());
    }

    #[test]
    fn test_payload_at_exact_limit() {
        let payload = "a".repeat(64);
        assert!(validate_payload(&payload, 64).is_ok());
    }

    #[test]
    fn test_payload_over_limit() {
        let payload = "a".repeat(65);
        assert_eq!(
            validate_payload(&payload, 64).unwrap_err(),
            bond_err(BondError::MessageTooLong)
        );
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(
            validate_payload("", 512).unwrap_err(),
            bond_err(BondError::EmptyMessage)
        );
    }

    #[test]
    fn test_limit_counts_bytes_not_chars() {
        // 4 chars, 8 bytes
        let payload = "éééé";
        assert!(payload.len() > 4);
        assert!(validate_payload(payload, 4).is_err());
    }

    #[test]
    fn test_binary_looking_payload_accepted() {
        assert!(validate_payload("\x00\x1b[0m\n\t", 512).is_ok());
    }

    #[test]
    fn test_payload_limit_bounds() {
        assert!(validate_payload_limit(1).is_ok());
        assert!(validate_payload_limit(MAX_PAYLOAD_LEN as u16).is_ok());
        assert_eq!(
            validate_payload_limit(0).unwrap_err(),
            bond_err(BondError::InvalidPayloadLimit)
        );
        assert_eq!(
            validate_payload_limit(MAX_PAYLOAD_LEN as u16 + 1).unwrap_err(),
            bond_err(BondError::InvalidPayloadLimit)
        );
    }
}
