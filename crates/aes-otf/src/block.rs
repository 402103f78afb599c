//! Block representation helpers.

/// Size in bytes of the cipher state and of every round key.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes, viewed as a 4×4 byte matrix in column-major order:
/// byte `i` sits in row `i % 4`, column `i / 4`.
pub type Block = [u8; BLOCK_SIZE];

/// XORs `rhs` into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}
