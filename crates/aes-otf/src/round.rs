//! Round transformations on the cipher state.

use crate::block::{xor_in_place, Block};
use crate::gf::xtime;
use crate::sbox::sbox;

/// Applies SubBytes and ShiftRows in one fused pass.
///
/// Row `r` of the state rotates left by `r` positions while every byte passes
/// through the S-box; the two transformations commute, so substituting during
/// the permutation matches applying them in sequence.
#[inline]
pub fn sub_bytes_shift_rows(state: &mut Block) {
    let mut tmp = [0u8; 16];
    tmp[0] = sbox(state[0]);
    tmp[1] = sbox(state[5]);
    tmp[2] = sbox(state[10]);
    tmp[3] = sbox(state[15]);

    tmp[4] = sbox(state[4]);
    tmp[5] = sbox(state[9]);
    tmp[6] = sbox(state[14]);
    tmp[7] = sbox(state[3]);

    tmp[8] = sbox(state[8]);
    tmp[9] = sbox(state[13]);
    tmp[10] = sbox(state[2]);
    tmp[11] = sbox(state[7]);

    tmp[12] = sbox(state[12]);
    tmp[13] = sbox(state[1]);
    tmp[14] = sbox(state[6]);
    tmp[15] = sbox(state[11]);

    *state = tmp;
}

fn mix_single_column(col: &mut [u8; 4]) {
    let [a0, a1, a2, a3] = *col;
    let t = a0 ^ a1 ^ a2 ^ a3;
    col[0] = a0 ^ t ^ xtime(a0 ^ a1);
    col[1] = a1 ^ t ^ xtime(a1 ^ a2);
    col[2] = a2 ^ t ^ xtime(a2 ^ a3);
    col[3] = a3 ^ t ^ xtime(a3 ^ a0);
}

/// MixColumns over all four columns.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for col in 0..4 {
        let idx = col * 4;
        let mut column = [state[idx], state[idx + 1], state[idx + 2], state[idx + 3]];
        mix_single_column(&mut column);
        state[idx..idx + 4].copy_from_slice(&column);
    }
}

/// Adds (XORs) a round key into the state.
#[inline]
pub fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

/// Applies one encryption round to the state.
///
/// MixColumns is skipped when `mix_columns_enabled` is false; the reduced
/// cipher targeted by the square attack omits it on the final round, which
/// keeps each ciphertext byte a keyed S-box image of a single state byte.
pub fn encrypt_round(state: &mut Block, round_key: &Block, mix_columns_enabled: bool) {
    sub_bytes_shift_rows(state);
    if mix_columns_enabled {
        mix_columns(state);
    }
    add_round_key(state, round_key);
}
