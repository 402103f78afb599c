//! The zero-sum distinguisher and the key-recovery driver.

use aes_otf::{inv_sbox, prev_round_key, Aes128Key, Block, CipherError};
use rand::RngCore;
use thiserror::Error;

use crate::batch::{PlaintextBatch, BATCH_SIZE, ORACLE_ROUNDS};
use crate::candidates::CandidateSet;

/// Surviving-guess sets for the 16 key-byte positions.
pub type PositionCandidates = [CandidateSet; 16];

/// Errors reported by the attack driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttackError {
    /// A byte position still held several candidates (or none) after every
    /// allowed trial. Recoverable: rerun with fresh randomness.
    #[error("position {position} is inconclusive: {survivors} candidates survived")]
    Inconclusive {
        /// The ambiguous key-byte position (0..16).
        position: usize,
        /// How many candidates were left at that position.
        survivors: usize,
    },
    /// The oracle rejected its parameters.
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

/// Tunables for the attack driver.
#[derive(Clone, Copy, Debug)]
pub struct AttackConfig {
    /// Independent trials whose surviving-guess sets are always intersected.
    /// A wrong guess survives one trial with probability about 2^-8, so
    /// three trials leave the true byte alone at each position in practice.
    pub trials: usize,
    /// Extra trials allowed when some position is still ambiguous after the
    /// base trials.
    pub max_extra_trials: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            trials: 3,
            max_extra_trials: 8,
        }
    }
}

/// Chosen-plaintext attack driver parametrized by an RNG.
///
/// The RNG only feeds the per-batch constant bytes; drawing them freshly per
/// trial is what makes the trials' false positives independent.
pub struct SquareAttack<R: RngCore> {
    rng: R,
    config: AttackConfig,
}

impl<R: RngCore> SquareAttack<R> {
    /// Creates a driver with the default configuration.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            config: AttackConfig::default(),
        }
    }

    /// Creates a driver with an explicit configuration.
    pub fn with_config(rng: R, config: AttackConfig) -> Self {
        Self { rng, config }
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut AttackConfig {
        &mut self.config
    }

    /// Runs one trial: a fresh structured batch through the oracle keyed by
    /// `key`, then the zero-sum test over all positions and guesses.
    pub fn run_trial(&mut self, key: &Aes128Key) -> Result<PositionCandidates, AttackError> {
        let batch = PlaintextBatch::random(&mut self.rng);
        let ciphertexts = batch.encrypt(key)?;
        Ok(core::array::from_fn(|position| {
            surviving_guesses(&ciphertexts, position)
        }))
    }

    /// Recovers the final-round key of the reduced cipher keyed by `key`.
    ///
    /// Intersects the configured number of independent trials, then keeps
    /// folding in fresh trials while any position holds more than one
    /// candidate, up to the configured number of extra trials.
    ///
    /// # Errors
    ///
    /// [`AttackError::Inconclusive`] if a position does not settle on exactly
    /// one candidate. An empty position is reported immediately: the true
    /// byte survives every honest trial, so emptiness cannot be fixed by
    /// running more of them.
    pub fn recover_last_round_key(&mut self, key: &Aes128Key) -> Result<[u8; 16], AttackError> {
        let mut sets = self.run_trial(key)?;
        for _ in 1..self.config.trials {
            intersect_positions(&mut sets, &self.run_trial(key)?);
        }

        let mut extra = 0;
        while sets.iter().any(|set| set.len() > 1) && extra < self.config.max_extra_trials {
            intersect_positions(&mut sets, &self.run_trial(key)?);
            extra += 1;
        }

        let mut recovered = [0u8; 16];
        for (position, set) in sets.iter().enumerate() {
            match set.unique() {
                Some(byte) => recovered[position] = byte,
                None => {
                    return Err(AttackError::Inconclusive {
                        position,
                        survivors: set.len(),
                    })
                }
            }
        }
        Ok(recovered)
    }

    /// Full pipeline: recover the final-round key, then walk the key
    /// schedule backward to the master key.
    pub fn recover_master_key(&mut self, key: &Aes128Key) -> Result<Aes128Key, AttackError> {
        let last_round_key = self.recover_last_round_key(key)?;
        let master = walk_back_key_schedule(&last_round_key, ORACLE_ROUNDS)?;
        Ok(Aes128Key::from(master))
    }
}

/// Applies the zero-sum test at one ciphertext position for all 256 guesses.
///
/// The reduced cipher's final round is SubBytes/ShiftRows followed by the key
/// addition, with no mixing, so each ciphertext byte is `S[state byte] ^ key
/// byte`. Undoing a guessed key byte and the S-box re-exposes one byte of the
/// balanced third-round state; its XOR over the batch is zero whenever the
/// guess is right, and with probability about 2^-8 for a wrong one.
pub fn surviving_guesses(ciphertexts: &[Block; BATCH_SIZE], position: usize) -> CandidateSet {
    let mut survivors = CandidateSet::empty();
    for guess in 0..=255u8 {
        let mut sum = 0u8;
        for ciphertext in ciphertexts.iter() {
            sum ^= inv_sbox(ciphertext[position] ^ guess);
        }
        if sum == 0 {
            survivors.insert(guess);
        }
    }
    survivors
}

/// Walks the key schedule backward from the round-`rounds` key to the
/// master key.
///
/// # Errors
///
/// Rejects `rounds` greater than the schedule length.
pub fn walk_back_key_schedule(
    last_round_key: &[u8; 16],
    rounds: usize,
) -> Result<[u8; 16], CipherError> {
    let mut key = *last_round_key;
    for round in (0..rounds).rev() {
        key = prev_round_key(&key, round)?;
    }
    Ok(key)
}

fn intersect_positions(sets: &mut PositionCandidates, other: &PositionCandidates) {
    for (set, new_set) in sets.iter_mut().zip(other.iter()) {
        set.intersect(new_set);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_otf::{encrypt_block, next_round_key};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const MASTER: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];

    fn oracle_last_round_key(master: &[u8; 16]) -> [u8; 16] {
        let mut key = *master;
        for round in 0..ORACLE_ROUNDS {
            key = next_round_key(&key, round).expect("round index is valid");
        }
        key
    }

    #[test]
    fn three_full_rounds_balance_every_position() {
        // The structural fact the distinguisher rests on: pushing a batch
        // through rounds that all apply MixColumns leaves each byte position
        // XOR-summing to zero across the batch.
        let key = Aes128Key::from(MASTER);
        let mut rng = ChaCha20Rng::from_seed([11u8; 32]);
        let batch = PlaintextBatch::random(&mut rng);
        let mut sums = [0u8; 16];
        for plaintext in batch.blocks() {
            let mut state = *plaintext;
            encrypt_block(&mut state, &key, 3, true).expect("three rounds are valid");
            for (sum, byte) in sums.iter_mut().zip(state.iter()) {
                *sum ^= byte;
            }
        }
        assert_eq!(sums, [0u8; 16]);
    }

    #[test]
    fn true_key_byte_survives_every_trial() {
        let key = Aes128Key::from(MASTER);
        let expected = oracle_last_round_key(&MASTER);
        let mut attack = SquareAttack::new(ChaCha20Rng::from_seed([12u8; 32]));
        for _ in 0..3 {
            let sets = attack.run_trial(&key).expect("trial should run");
            for (position, set) in sets.iter().enumerate() {
                assert!(set.contains(expected[position]));
            }
        }
    }

    #[test]
    fn trials_narrow_candidates_substantially() {
        let key = Aes128Key::from(MASTER);
        let mut attack = SquareAttack::new(ChaCha20Rng::from_seed([13u8; 32]));
        let mut sets = attack.run_trial(&key).expect("trial should run");
        intersect_positions(&mut sets, &attack.run_trial(&key).expect("trial should run"));
        // Two trials leave at most a few stragglers per position.
        for set in sets.iter() {
            assert!(!set.is_empty());
            assert!(set.len() <= 4);
        }
    }

    #[test]
    fn recovers_the_oracle_last_round_key() {
        let key = Aes128Key::from(MASTER);
        let mut attack = SquareAttack::new(ChaCha20Rng::from_seed([14u8; 32]));
        let recovered = attack
            .recover_last_round_key(&key)
            .expect("attack should converge");
        assert_eq!(recovered, oracle_last_round_key(&MASTER));
    }

    #[test]
    fn recovers_the_master_key_end_to_end() {
        let key = Aes128Key::from(MASTER);
        let mut attack = SquareAttack::new(ChaCha20Rng::from_seed([15u8; 32]));
        let recovered = attack.recover_master_key(&key).expect("attack should converge");
        assert_eq!(recovered, key);
    }

    #[test]
    fn recovery_works_for_random_keys() {
        let mut rng = ChaCha20Rng::from_seed([16u8; 32]);
        for _ in 0..4 {
            let mut key_bytes = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            let key = Aes128Key::from(key_bytes);
            let mut attack = SquareAttack::new(ChaCha20Rng::from_seed([17u8; 32]));
            let recovered = attack.recover_master_key(&key).expect("attack should converge");
            assert_eq!(recovered, key);
        }
    }

    #[test]
    fn walk_back_undoes_the_forward_schedule() {
        let last = oracle_last_round_key(&MASTER);
        let master =
            walk_back_key_schedule(&last, ORACLE_ROUNDS).expect("four rounds are valid");
        assert_eq!(master, MASTER);
    }

    #[test]
    fn walk_back_rejects_overlong_chains() {
        let last = oracle_last_round_key(&MASTER);
        assert_eq!(
            walk_back_key_schedule(&last, 11),
            Err(CipherError::RoundIndex(10))
        );
    }
}
