//! Key types for AES-128.

/// Size in bytes of an AES-128 key.
pub const KEY_SIZE: usize = 16;

/// AES-128 master key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aes128Key(pub [u8; KEY_SIZE]);

impl From<[u8; KEY_SIZE]> for Aes128Key {
    fn from(value: [u8; KEY_SIZE]) -> Self {
        Self(value)
    }
}

impl Aes128Key {
    /// Returns the key bytes, which double as the round-0 round key.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}
