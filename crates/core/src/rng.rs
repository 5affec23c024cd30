//! Randomness primitives
//!
//! Everything that affects the game (role draws, room codes, ids) pulls
//! bytes from the operating system CSPRNG. Ranges are reduced by
//! rejection sampling so no value is favoured by modulo bias.

use rand::rngs::OsRng;
use rand::RngCore;

/// Characters used in room codes (no 0/O or 1/I to keep them typable)
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Characters used in short ids
const SHORT_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of ids produced by [`generate_short_id`]
const SHORT_ID_LENGTH: usize = 9;

/// Uniform integer in `[min, max)`. Returns `min` for an empty range.
pub fn random_int(min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }

    let range = (max as i128 - min as i128) as u128;

    // Smallest number of bytes whose value space covers the range
    let mut bytes = 1usize;
    while bytes < 8 && (1u128 << (8 * bytes)) < range {
        bytes += 1;
    }
    let space = 1u128 << (8 * bytes);
    let limit = space - space % range;

    let mut buf = [0u8; 8];
    loop {
        OsRng.fill_bytes(&mut buf[..bytes]);
        let value = buf[..bytes]
            .iter()
            .fold(0u128, |acc, b| (acc << 8) | u128::from(*b));
        if value < limit {
            return (min as i128 + (value % range) as i128) as i64;
        }
    }
}

/// Uniform index in `[0, len)`
pub fn random_index(len: usize) -> usize {
    random_int(0, len as i64) as usize
}

/// Fisher-Yates shuffle into a new vector
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = random_index(i + 1);
        out.swap(i, j);
    }
    out
}

/// Pick one element uniformly, or `None` for an empty slice
pub fn random_choice<T>(items: &[T]) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    items.get(random_index(items.len()))
}

/// Short lowercase alphanumeric id
pub fn generate_short_id() -> String {
    random_string(SHORT_ID_ALPHABET, SHORT_ID_LENGTH)
}

/// Human-typable room code of the given length
pub fn generate_room_code(length: usize) -> String {
    random_string(ROOM_CODE_ALPHABET, length)
}

fn random_string(alphabet: &[u8], length: usize) -> String {
    (0..length)
        .map(|_| char::from(alphabet[random_index(alphabet.len())]))
        .collect()
}
