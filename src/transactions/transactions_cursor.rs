//! Opaque pagination cursor encoding.
//!
//! The cursor is a reversible text transform of the boundary
//! `transaction_id` and carries no other state. Callers must treat it as
//! opaque; its only contract is exact round-trip fidelity, so the encoding
//! can change without breaking the pagination protocol.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::transactions_errors::{Result, TransactionError};

/// Encodes the last returned `transaction_id` into an opaque token.
pub fn encode_cursor(transaction_id: &str) -> String {
    STANDARD.encode(transaction_id)
}

/// Decodes a cursor token back to the boundary `transaction_id`.
pub fn decode_cursor(cursor: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(cursor)
        .map_err(|e| TransactionError::InvalidCursor(format!("Malformed cursor: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| TransactionError::InvalidCursor(format!("Cursor is not valid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        for id in ["txn-000042", "0198c2f0-7d4e-7abc-8000-0123456789ab", "1"] {
            let token = encode_cursor(id);
            assert_ne!(token, id);
            assert_eq!(decode_cursor(&token).unwrap(), id);
        }
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        assert!(matches!(
            decode_cursor("not valid base64!!"),
            Err(TransactionError::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let token = STANDARD.encode([0xff, 0xfe, 0x80]);
        assert!(matches!(
            decode_cursor(&token),
            Err(TransactionError::InvalidCursor(_))
        ));
    }
}
