//! Structured plaintext batches and the reduced-cipher oracle.

use aes_otf::{encrypt_block, Aes128Key, Block, CipherError};
use rand::RngCore;

/// Blocks per batch: byte 0 ranges over every value exactly once.
pub const BATCH_SIZE: usize = 256;

/// Round count of the reduced cipher the attack targets.
pub const ORACLE_ROUNDS: usize = 4;

/// A batch of 256 plaintexts differing only in byte 0.
///
/// Byte 0 of block `i` is `i`; bytes 1..16 are held at constants drawn
/// freshly per batch, so that surviving-guess sets from different batches
/// are statistically independent.
#[derive(Clone)]
pub struct PlaintextBatch {
    blocks: [Block; BATCH_SIZE],
}

impl PlaintextBatch {
    /// Builds a batch around freshly drawn constant bytes.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut constants = [0u8; 16];
        rng.fill_bytes(&mut constants);
        Self::with_constants(&constants)
    }

    /// Builds a batch holding bytes 1..16 at the given values. Byte 0 of
    /// `constants` is ignored; it is the byte the batch sweeps.
    pub fn with_constants(constants: &Block) -> Self {
        let mut blocks = [*constants; BATCH_SIZE];
        for (i, block) in blocks.iter_mut().enumerate() {
            block[0] = i as u8;
        }
        Self { blocks }
    }

    /// Encrypts the whole batch through the reduced cipher (four rounds,
    /// final MixColumns omitted) under `key`.
    pub fn encrypt(&self, key: &Aes128Key) -> Result<[Block; BATCH_SIZE], CipherError> {
        let mut ciphertexts = self.blocks;
        for block in ciphertexts.iter_mut() {
            encrypt_block(block, key, ORACLE_ROUNDS, false)?;
        }
        Ok(ciphertexts)
    }

    /// Read access to the plaintext blocks.
    pub fn blocks(&self) -> &[Block; BATCH_SIZE] {
        &self.blocks
    }
}
