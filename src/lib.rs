#[macro_use]
extern crate derive_more;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate smallvec;
extern crate vec_map;

use huffman::Symbol;

/// Errors while building a code tree from a frequency source.
#[derive(Debug)]
pub enum BuildError {
    /// Not a single symbol in the source had a positive number of
    /// instances, so there is no tree to build.
    EmptyAlphabet,
}

/// Errors while reading a persisted codebook or rebuilding its tree.
#[derive(Debug)]
pub enum CodebookError {
    ReadError(std::io::Error),
    /// A symbol line that does not parse as a decimal identifier.
    BadSymbol { line: usize, text: String },
    /// A symbol line with no codeword line after it.
    MissingCode { symbol: Symbol },
    /// A codeword line with no characters.
    EmptyCode { symbol: Symbol },
    /// A codeword line with a character other than '0' or '1'.
    BadCodeChar { symbol: Symbol, found: char },
    /// A codeword that is a prefix or a duplicate of another codeword.
    PrefixConflict { symbol: Symbol },
    /// A codebook with no pairs at all.
    Empty,
}

impl From<std::io::Error> for CodebookError {
    fn from(err: std::io::Error) -> Self {
        CodebookError::ReadError(err)
    }
}

/// Errors while encoding a symbol sequence into bits.
#[derive(Debug)]
pub enum EncodeError {
    /// A symbol with no assigned codeword.
    UnknownSymbol(Symbol),
    WriteError(std::io::Error),
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::WriteError(err)
    }
}

/// Errors while translating a bit stream back into symbols.
#[derive(Debug)]
pub enum TranslateError {
    /// A traversal step moved into a child slot with no node behind it.
    CorruptTree,
    /// The bit source ended in the middle of a codeword, leaving `pending`
    /// bits that decode to no symbol.
    IncompleteCode { pending: usize },
    WriteError(std::io::Error),
}

impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::WriteError(err)
    }
}

/// Construction, persistence and application of prefix-free binary codes.
pub mod huffman;

/// Packed bit buffers and the framing of compressed payloads.
pub mod bits;

/// Counting symbol occurrences.
pub mod freqs;

/// Definition of the bit-level and symbol-level transport traits.
mod io;
pub use io::*;
