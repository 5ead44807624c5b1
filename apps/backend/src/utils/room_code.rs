//! Join code generation for rooms.
//!
//! Six characters from Crockford's Base32 alphabet (no I, L, O, U so codes
//! survive being read aloud), drawn from the OS RNG.

use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::OsRng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const CODE_LEN: usize = 6;

pub fn generate_room_code() -> String {
    let mut rng = OsRng;
    let dist = Uniform::from(0..CROCKFORD.len());

    let mut s = String::with_capacity(CODE_LEN);
    for _ in 0..CODE_LEN {
        s.push(CROCKFORD[dist.sample(&mut rng)] as char);
    }
    s
}
