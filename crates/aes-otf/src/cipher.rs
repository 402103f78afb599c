//! Block-encryption driver with on-the-fly key schedule.

use crate::block::Block;
use crate::error::CipherError;
use crate::key::Aes128Key;
use crate::round::{add_round_key, encrypt_round};
use crate::schedule::next_round_key;

/// Maximum round count; the key schedule has exactly ten transitions.
pub const MAX_ROUNDS: usize = 10;

/// Encrypts one block in place over `rounds` rounds.
///
/// The state is whitened with the master key, then each round key is derived
/// one schedule step ahead of its use. MixColumns runs in every round except
/// the last, where it runs only when `final_mix_columns` is set. With
/// `rounds = 10` and `final_mix_columns = false` this is standard AES-128;
/// other configurations are reduced ciphers for cryptanalysis, such as the
/// 4-round oracle of the square attack.
///
/// # Errors
///
/// Rejects `rounds` outside `1..=10` without touching the block.
pub fn encrypt_block(
    block: &mut Block,
    key: &Aes128Key,
    rounds: usize,
    final_mix_columns: bool,
) -> Result<(), CipherError> {
    if !(1..=MAX_ROUNDS).contains(&rounds) {
        return Err(CipherError::RoundCount(rounds));
    }

    add_round_key(block, &key.0);
    let mut round_key = next_round_key(&key.0, 0)?;
    for round in 1..rounds {
        encrypt_round(block, &round_key, true);
        round_key = next_round_key(&round_key, round)?;
    }
    encrypt_round(block, &round_key, final_mix_columns);
    Ok(())
}
