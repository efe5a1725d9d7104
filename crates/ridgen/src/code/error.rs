/// Errors raised while validating [`CodeOptions`].
///
/// [`CodeOptions`]: crate::CodeOptions
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodeError {
    /// The alphabet has no symbols.
    #[error("alphabet is empty")]
    EmptyAlphabet,

    /// The alphabet has a single symbol.
    #[error("alphabet needs at least 2 symbols, got {len}")]
    AlphabetTooShort {
        /// Number of symbols supplied.
        len: usize,
    },

    /// A symbol appears more than once.
    #[error("alphabet contains {symbol:?} more than once")]
    DuplicateSymbol {
        /// The repeated symbol.
        symbol: char,
    },

    /// Codes would be empty.
    #[error("code length must be positive")]
    ZeroLength,

    /// `n1` shares a factor with the alphabet size, so distinct IDs collapse
    /// onto fewer leading digits.
    #[error("n1 ({n1}) is not coprime with the alphabet size ({base})")]
    N1NotCoprime {
        /// The rejected multiplier.
        n1: u64,
        /// Alphabet size.
        base: usize,
    },

    /// `n2` shares a factor with the code length, so the permutation
    /// repeats some digit positions and drops others.
    #[error("n2 ({n2}) is not coprime with the code length ({length})")]
    N2NotCoprime {
        /// The rejected multiplier.
        n2: u64,
        /// Code length.
        length: usize,
    },
}
