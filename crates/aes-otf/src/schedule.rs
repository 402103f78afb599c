//! Word-wise round-key derivation, forward and inverse.
//!
//! The 16-byte key is treated as four 4-byte words `w0..w3`. One forward step
//! maps the round-`r` key to the round-`r + 1` key; the inverse step undoes
//! it exactly, so the chain `key[0] ↔ key[10]` can be walked in either
//! direction from any link.

use crate::error::CipherError;
use crate::sbox::{sbox, RC};

/// Derives the round-`round + 1` key from the round-`round` key.
///
/// `w0` absorbs `SubWord(RotWord(w3))` and the round constant; each later
/// word absorbs the word updated just before it. The recurrence consumes the
/// already-updated neighbour, so evaluation must run in word order 0 to 3.
///
/// # Errors
///
/// Rejects `round` outside `0..=9`.
pub fn next_round_key(key: &[u8; 16], round: usize) -> Result<[u8; 16], CipherError> {
    if round >= RC.len() {
        return Err(CipherError::RoundIndex(round));
    }

    let mut next = *key;
    next[0] ^= sbox(key[13]) ^ RC[round];
    next[1] ^= sbox(key[14]);
    next[2] ^= sbox(key[15]);
    next[3] ^= sbox(key[12]);
    for word in 1..4 {
        for byte in 0..4 {
            next[word * 4 + byte] ^= next[(word - 1) * 4 + byte];
        }
    }
    Ok(next)
}

/// Derives the round-`round` key from the round-`round + 1` key.
///
/// Inverts [`next_round_key`]: words 3 down to 1 are reverted first, each
/// XORed with its still-transformed lower neighbour, and word 0 is reverted
/// last against the now-reverted word 3.
///
/// # Errors
///
/// Rejects `round` outside `0..=9`.
pub fn prev_round_key(key: &[u8; 16], round: usize) -> Result<[u8; 16], CipherError> {
    if round >= RC.len() {
        return Err(CipherError::RoundIndex(round));
    }

    let mut prev = *key;
    for word in (1..4).rev() {
        for byte in 0..4 {
            prev[word * 4 + byte] ^= prev[(word - 1) * 4 + byte];
        }
    }
    prev[0] ^= sbox(prev[13]) ^ RC[round];
    prev[1] ^= sbox(prev[14]);
    prev[2] ^= sbox(prev[15]);
    prev[3] ^= sbox(prev[12]);
    Ok(prev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    // FIPS-197 Appendix A.1 cipher key.
    const MASTER: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];

    #[test]
    fn forward_matches_fips_expansion() {
        let k1 = next_round_key(&MASTER, 0).expect("round 0 is valid");
        assert_eq!(
            k1,
            [
                0xa0, 0xfa, 0xfe, 0x17, 0x88, 0x54, 0x2c, 0xb1, 0x23, 0xa3, 0x39, 0x39, 0x2a,
                0x6c, 0x76, 0x05,
            ]
        );

        let mut key = MASTER;
        for round in 0..10 {
            key = next_round_key(&key, round).expect("round index is valid");
        }
        assert_eq!(
            key,
            [
                0xd0, 0x14, 0xf9, 0xa8, 0xc9, 0xee, 0x25, 0x89, 0xe1, 0x3f, 0x0c, 0xc8, 0xb6,
                0x63, 0x0c, 0xa6,
            ]
        );
    }

    #[test]
    fn inverse_undoes_forward_for_random_keys() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for _ in 0..32 {
            let mut key = [0u8; 16];
            rng.fill_bytes(&mut key);
            for round in 0..10 {
                let next = next_round_key(&key, round).expect("round index is valid");
                assert_eq!(prev_round_key(&next, round).expect("round index is valid"), key);
            }
        }
    }

    #[test]
    fn walks_from_final_key_back_to_master() {
        let mut key = MASTER;
        for round in 0..10 {
            key = next_round_key(&key, round).expect("round index is valid");
        }
        for round in (0..10).rev() {
            key = prev_round_key(&key, round).expect("round index is valid");
        }
        assert_eq!(key, MASTER);
    }

    #[test]
    fn rejects_round_index_past_schedule_end() {
        assert_eq!(
            next_round_key(&MASTER, 10),
            Err(CipherError::RoundIndex(10))
        );
        assert_eq!(
            prev_round_key(&MASTER, 10),
            Err(CipherError::RoundIndex(10))
        );
    }
}
