//! 識別子の生成

use uuid::Uuid;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, OptionId, PollId, SHORT_CODE_LEN, ShortCode},
};

// No 0/O or 1/I so codes survive being read aloud.
const SHORT_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// PollId を UUID v4 から生成
pub struct PollIdFactory;

impl PollIdFactory {
    pub fn generate() -> Result<PollId, ValueObjectError> {
        PollId::new(Uuid::new_v4().to_string())
    }
}

/// OptionId を UUID v4 から生成
pub struct OptionIdFactory;

impl OptionIdFactory {
    pub fn generate() -> Result<OptionId, ValueObjectError> {
        OptionId::new(Uuid::new_v4().to_string())
    }
}

/// ConnectionId を UUID v4 から生成
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(Uuid::new_v4().to_string())
    }
}

/// ShortCode をランダムな UUID のバイト列から生成
pub struct ShortCodeFactory;

impl ShortCodeFactory {
    pub fn generate() -> Result<ShortCode, ValueObjectError> {
        let code: String = Uuid::new_v4()
            .as_bytes()
            .iter()
            .take(SHORT_CODE_LEN)
            .map(|byte| SHORT_CODE_ALPHABET[*byte as usize % SHORT_CODE_ALPHABET.len()] as char)
            .collect();
        ShortCode::new(code)
    }
}
