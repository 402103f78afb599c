//! Recovers a master key from the 4-round reduced cipher with a fixed seed.

use aes_otf::Aes128Key;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use square_attack::SquareAttack;

fn main() {
    // Deterministic seed for reproducibility in the example.
    let key = Aes128Key::from([
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ]);
    let mut attack = SquareAttack::new(ChaCha20Rng::from_seed([9u8; 32]));

    let last_round_key = attack
        .recover_last_round_key(&key)
        .expect("attack should converge");
    println!("final-round key: {last_round_key:02x?}");

    let recovered = attack.recover_master_key(&key).expect("attack should converge");
    assert_eq!(recovered, key);
    println!("example succeeded; recovered master key matches the oracle key");
}
