//! Command-line interface for `square-aes-rs`.

#![forbid(unsafe_code)]

use aes_otf::{encrypt_block, Aes128Key, Block, MAX_ROUNDS};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use square_attack::{walk_back_key_schedule, AttackConfig, SquareAttack, ORACLE_ROUNDS};

/// Square-attack CLI.
#[derive(Parser)]
#[command(
    name = "sqaes",
    version,
    author,
    about = "AES-128 block encryption and the square attack on its 4-round reduction"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a single 16-byte block.
    Enc {
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Plaintext block as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        block_hex: String,
        /// Number of rounds to run (1..=10).
        #[arg(long, default_value_t = MAX_ROUNDS)]
        rounds: usize,
        /// Apply MixColumns in the final round too. Off reproduces standard
        /// AES-128 at ten rounds and the attack oracle at four.
        #[arg(long, default_value_t = false)]
        final_mix_columns: bool,
    },
    /// Recover a key through the chosen-plaintext attack on the 4-round oracle.
    Attack {
        /// The oracle's AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Independent trials to intersect before checking for a unique
        /// survivor per position.
        #[arg(long, default_value_t = 3)]
        trials: usize,
        /// Optional RNG seed for reproducible batches.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// XOR two 3-round reduced encryptions of one block under the halves of
    /// a 256-bit key.
    Combine {
        /// 256-bit key as 64 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Plaintext block as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        block_hex: String,
    },
    /// Draw a random key, attack it, and verify the recovery end to end.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc {
            key_hex,
            block_hex,
            rounds,
            final_mix_columns,
        } => cmd_enc(&key_hex, &block_hex, rounds, final_mix_columns),
        Commands::Attack {
            key_hex,
            trials,
            seed,
        } => cmd_attack(&key_hex, trials, seed),
        Commands::Combine { key_hex, block_hex } => cmd_combine(&key_hex, &block_hex),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn cmd_enc(key_hex: &str, block_hex: &str, rounds: usize, final_mix_columns: bool) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let mut block = parse_block_hex(block_hex)?;
    encrypt_block(&mut block, &key, rounds, final_mix_columns).context("encrypt block")?;
    println!("{}", hex::encode(block));
    Ok(())
}

fn cmd_attack(key_hex: &str, trials: usize, seed: Option<u64>) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let config = AttackConfig {
        trials,
        ..AttackConfig::default()
    };
    let mut attack = SquareAttack::with_config(seeded_rng(seed), config);

    let last_round_key = attack
        .recover_last_round_key(&key)
        .context("recover the final-round key")?;
    println!("recovered round-{ORACLE_ROUNDS} key:");
    print!("{}", format_block_matrix(&last_round_key));

    let master = walk_back_key_schedule(&last_round_key, ORACLE_ROUNDS)
        .context("walk the key schedule back")?;
    println!("recovered master key:");
    print!("{}", format_block_matrix(&master));

    if master != key.0 {
        bail!("recovered key does not match the oracle key");
    }
    println!("recovery verified against the oracle key");
    Ok(())
}

fn cmd_combine(key_hex: &str, block_hex: &str) -> Result<()> {
    let bytes = hex::decode(key_hex.trim()).context("decode key hex")?;
    if bytes.len() != 32 {
        bail!("combiner key must be 32 bytes (64 hex characters)");
    }
    let mut low_half = [0u8; 16];
    let mut high_half = [0u8; 16];
    low_half.copy_from_slice(&bytes[..16]);
    high_half.copy_from_slice(&bytes[16..]);

    let block = parse_block_hex(block_hex)?;
    let mut first = block;
    let mut second = block;
    encrypt_block(&mut first, &Aes128Key::from(low_half), 3, false).context("encrypt half 1")?;
    encrypt_block(&mut second, &Aes128Key::from(high_half), 3, false).context("encrypt half 2")?;

    println!("half 1: {}", hex::encode(first));
    println!("half 2: {}", hex::encode(second));
    for (a, b) in first.iter_mut().zip(second.iter()) {
        *a ^= b;
    }
    println!("combined: {}", hex::encode(first));
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let key = Aes128Key::from(key_bytes);
    println!("oracle key: {}", hex::encode(key_bytes));

    let mut attack = SquareAttack::new(rng);
    let recovered = attack.recover_master_key(&key).context("attack the oracle")?;
    println!("recovered:  {}", hex::encode(recovered.0));
    if recovered != key {
        bail!("demo recovery failed");
    }
    println!("recovery verified");
    Ok(())
}

fn parse_key_hex(hex_str: &str) -> Result<Aes128Key> {
    let block = parse_block_hex(hex_str)?;
    Ok(Aes128Key::from(block))
}

fn parse_block_hex(hex_str: &str) -> Result<Block> {
    let bytes = hex::decode(hex_str.trim()).context("decode hex")?;
    if bytes.len() != 16 {
        bail!("expected 16 bytes (32 hex characters), got {}", bytes.len());
    }
    let mut block = [0u8; 16];
    block.copy_from_slice(&bytes);
    Ok(block)
}

/// Renders a block as the 4×4 state matrix (column-major byte order).
fn format_block_matrix(block: &Block) -> String {
    let mut out = String::new();
    for row in 0..4 {
        for col in 0..4 {
            out.push_str(&format!("{:02x}", block[col * 4 + row]));
            out.push(if col == 3 { '\n' } else { ' ' });
        }
    }
    out
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
