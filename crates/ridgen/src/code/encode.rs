use std::{string::String, vec::Vec};

use crate::code::CodeOptions;

/// Encodes a numeric ID into a fixed-length short code.
///
/// The ID is scaled by `n1` and shifted by `salt` (wrapping at 2^64), split
/// into `length` base-`alphabet.len()` digits starting from the least
/// significant one, and every digit is mixed with the first so that a
/// change in the low digit ripples through the whole code. The digits are
/// then read back in the order given by [`permutation`] and mapped onto the
/// alphabet.
///
/// Never fails: all parameters were validated when `options` was built.
/// Codes are not reversible and carry no cryptographic guarantee; they only
/// hide the issuance order and volume from casual observers.
///
/// ```
/// use ridgen::{CodeOptions, encode};
///
/// let options = CodeOptions::default();
/// assert_eq!(encode(123_456_789, &options), "E3ES33HS");
/// ```
pub fn encode(id: u64, options: &CodeOptions) -> String {
    let alphabet = options.alphabet();
    let base = alphabet.len() as u64;
    let length = options.length();

    let mut scaled = id.wrapping_mul(options.n1()).wrapping_add(options.salt());
    let mut digits = Vec::with_capacity(length);
    for i in 0..length {
        let digit = scaled % base;
        scaled /= base;

        let diffused = match digits.first() {
            None => digit,
            Some(&first) => {
                let spread = u128::from(i as u64 % base) * u128::from(first);
                // `base` is a u64, so the remainder always fits back
                ((u128::from(digit) + spread) % u128::from(base)) as u64
            }
        };
        digits.push(diffused);
    }

    permutation(length, options.n2())
        .map(|idx| alphabet[digits[idx] as usize])
        .collect()
}

/// Source digit index for each output position of a `length`-symbol code.
///
/// Position `i` reads digit `(i * n2) % length`. When `n2` is coprime with
/// `length` this visits every digit exactly once; otherwise some digits are
/// repeated and others never appear.
///
/// ```
/// use ridgen::permutation;
///
/// let coprime: Vec<_> = permutation(8, 5).collect();
/// assert_eq!(coprime, [0, 5, 2, 7, 4, 1, 6, 3]);
///
/// let degraded: Vec<_> = permutation(8, 4).collect();
/// assert_eq!(degraded, [0, 4, 0, 4, 0, 4, 0, 4]);
/// ```
pub fn permutation(length: usize, n2: u64) -> impl Iterator<Item = usize> {
    let len = length as u128;
    let step = if length == 0 {
        0
    } else {
        u128::from(n2) % len
    };
    // `idx < len`, so narrowing back to usize is lossless
    (0..length).map(move |i| ((i as u128 * step) % len) as usize)
}

pub(crate) const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
