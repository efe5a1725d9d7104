use std::{boxed::Box, collections::HashSet, string::String, vec::Vec};

use crate::code::{CodeError, encode, gcd};

/// Parameters of the short-code encoder.
///
/// Construct through [`CodeOptions::builder`], which starts from the
/// defaults and validates every override. Once built the options are
/// immutable and can be shared freely between threads.
///
/// # Example
///
/// ```
/// use ridgen::CodeOptions;
///
/// let options = CodeOptions::builder()
///     .alphabet("abcdefghijklmnopqrstuvwxyz1234567890")
///     .length(6)
///     .build()
///     .unwrap();
///
/// assert_eq!(options.encode(123_456_789), "g5pwwe");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeOptions {
    alphabet: Box<[char]>,
    n1: u64,
    n2: u64,
    length: usize,
    salt: u64,
}

impl CodeOptions {
    /// 30 symbols, leaving out the easily confused `0 1 I O` and the
    /// profanity-prone `U Z`.
    pub const DEFAULT_ALPHABET: &'static str = "23456789ABCDEFGHJKLMNPQRSTVWXY";
    /// Default scaling multiplier, coprime with 30 and 36.
    pub const DEFAULT_N1: u64 = 17;
    /// Default permutation multiplier, coprime with 6 and 8.
    pub const DEFAULT_N2: u64 = 5;
    /// Default number of symbols per code.
    pub const DEFAULT_LENGTH: usize = 8;
    /// Default additive constant.
    pub const DEFAULT_SALT: u64 = 123_567_369;

    /// Lowercase letters and digits, used for resource identifiers.
    pub const RESOURCE_ALPHABET: &'static str = "abcdefghijklmnopqrstuvwxyz1234567890";
    /// Code length used for resource identifiers.
    pub const RESOURCE_LENGTH: usize = 6;

    /// A builder seeded with the defaults.
    pub fn builder() -> CodeOptionsBuilder {
        CodeOptionsBuilder::default()
    }

    /// Options for resource identifiers such as `mu-g5pwwe`: the default
    /// multipliers and salt over [`Self::RESOURCE_ALPHABET`], six symbols
    /// long.
    ///
    /// ```
    /// use ridgen::CodeOptions;
    ///
    /// assert_eq!(CodeOptions::resource().encode(123_456_789), "g5pwwe");
    /// ```
    pub fn resource() -> Self {
        Self {
            alphabet: Self::RESOURCE_ALPHABET.chars().collect(),
            length: Self::RESOURCE_LENGTH,
            ..Self::default()
        }
    }

    /// A builder seeded with [`CodeOptions::resource`], for overriding
    /// individual parameters on top of the resource preset.
    pub fn resource_builder() -> CodeOptionsBuilder {
        Self::resource().to_builder()
    }

    /// A builder seeded with these options.
    ///
    /// The coprimality opt-out is not carried over; set
    /// [`CodeOptionsBuilder::allow_non_coprime`] again if needed.
    pub fn to_builder(&self) -> CodeOptionsBuilder {
        CodeOptionsBuilder {
            alphabet: self.alphabet.to_vec(),
            n1: self.n1,
            n2: self.n2,
            length: self.length,
            salt: self.salt,
            allow_non_coprime: false,
        }
    }

    /// Symbols in digit order.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Number of symbols in the alphabet.
    pub fn base(&self) -> usize {
        self.alphabet.len()
    }

    /// Scaling multiplier.
    pub const fn n1(&self) -> u64 {
        self.n1
    }

    /// Permutation multiplier.
    pub const fn n2(&self) -> u64 {
        self.n2
    }

    /// Number of symbols per code.
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Additive constant.
    pub const fn salt(&self) -> u64 {
        self.salt
    }

    /// Encodes `id` with these options. See [`encode`].
    pub fn encode(&self, id: u64) -> String {
        encode(id, self)
    }
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            alphabet: Self::DEFAULT_ALPHABET.chars().collect(),
            n1: Self::DEFAULT_N1,
            n2: Self::DEFAULT_N2,
            length: Self::DEFAULT_LENGTH,
            salt: Self::DEFAULT_SALT,
        }
    }
}

/// Builder for [`CodeOptions`].
#[derive(Clone, Debug)]
pub struct CodeOptionsBuilder {
    alphabet: Vec<char>,
    n1: u64,
    n2: u64,
    length: usize,
    salt: u64,
    allow_non_coprime: bool,
}

impl Default for CodeOptionsBuilder {
    fn default() -> Self {
        CodeOptions::default().to_builder()
    }
}

impl CodeOptionsBuilder {
    /// Symbols to encode with, in digit order.
    #[must_use]
    pub fn alphabet(mut self, alphabet: &str) -> Self {
        self.alphabet = alphabet.chars().collect();
        self
    }

    /// Scaling multiplier; must be coprime with the alphabet size.
    #[must_use]
    pub const fn n1(mut self, n1: u64) -> Self {
        self.n1 = n1;
        self
    }

    /// Permutation multiplier; must be coprime with the code length.
    #[must_use]
    pub const fn n2(mut self, n2: u64) -> Self {
        self.n2 = n2;
        self
    }

    /// Number of symbols per code.
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Additive constant. `0` is a valid salt.
    #[must_use]
    pub const fn salt(mut self, salt: u64) -> Self {
        self.salt = salt;
        self
    }

    /// Skips the coprimality checks on `n1` and `n2`.
    ///
    /// Only useful to keep producing codes that were issued with such
    /// parameters in the past: a non-coprime `n2` leaves some digits out of
    /// the code entirely, which makes collisions far more likely.
    #[must_use]
    pub const fn allow_non_coprime(mut self, allow: bool) -> Self {
        self.allow_non_coprime = allow;
        self
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`CodeError`] describing the first invalid parameter.
    pub fn build(self) -> Result<CodeOptions, CodeError> {
        let base = self.alphabet.len();
        match base {
            0 => return Err(CodeError::EmptyAlphabet),
            1 => return Err(CodeError::AlphabetTooShort { len: base }),
            _ => {}
        }

        let mut seen = HashSet::with_capacity(base);
        if let Some(&symbol) = self.alphabet.iter().find(|&&c| !seen.insert(c)) {
            return Err(CodeError::DuplicateSymbol { symbol });
        }

        if self.length == 0 {
            return Err(CodeError::ZeroLength);
        }

        if !self.allow_non_coprime {
            if gcd(self.n1, base as u64) != 1 {
                return Err(CodeError::N1NotCoprime { n1: self.n1, base });
            }
            if gcd(self.n2, self.length as u64) != 1 {
                return Err(CodeError::N2NotCoprime {
                    n2: self.n2,
                    length: self.length,
                });
            }
        }

        #[cfg(feature = "tracing")]
        if self.allow_non_coprime && gcd(self.n2, self.length as u64) != 1 {
            tracing::warn!(
                n2 = self.n2,
                length = self.length,
                "non-coprime n2 drops digits from every code"
            );
        }

        Ok(CodeOptions {
            alphabet: self.alphabet.into_boxed_slice(),
            n1: self.n1,
            n2: self.n2,
            length: self.length,
            salt: self.salt,
        })
    }
}
