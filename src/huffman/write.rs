//! Writing symbol streams as bit sequences.

use huffman::{CodePath, CodeTree, Symbol};
use io::BitSink;
use ::{EncodeError};

use vec_map::VecMap;

/// The encoding side of a code tree: its leaf assignments, indexed by
/// symbol value.
#[derive(Clone, Debug)]
pub struct Encoder {
    codes: VecMap<CodePath>,
}

impl Encoder {
    /// Collect the assignments of `tree`.
    ///
    /// If a symbol appears on several leaves, the last assignment in
    /// depth-first order wins.
    pub fn from_tree(tree: &CodeTree) -> Self {
        let mut codes = VecMap::new();
        for (symbol, path) in tree.assignments() {
            codes.insert(symbol.as_u16() as usize, path);
        }
        Encoder { codes }
    }

    /// The codeword assigned to `symbol`, if any.
    pub fn code(&self, symbol: Symbol) -> Option<&CodePath> {
        self.codes.get(symbol.as_u16() as usize)
    }

    /// Write the codewords of `symbols` to `sink`, in sequence.
    ///
    /// The code is prefix-free, so the concatenation decodes back to the
    /// same symbol sequence without separators.
    pub fn encode<I, B>(&self, symbols: I, sink: &mut B) -> Result<(), EncodeError>
    where
        I: IntoIterator<Item = Symbol>,
        B: BitSink,
    {
        for symbol in symbols {
            let path = match self.code(symbol) {
                None => return Err(EncodeError::UnknownSymbol(symbol)),
                Some(path) => path,
            };
            for &bit in path.bits() {
                sink.write_bit(bit)?;
            }
        }
        Ok(())
    }
}

#[test]
fn test_encode_concatenates_codewords() {
    use bits::BitVec;
    use freqs::Instances;

    // Codewords: f=0, c=100, d=101, a=1100, b=1101, e=111.
    let tree = CodeTree::from_frequencies(vec![
        (Symbol::from(b'a'), Instances::from(5)),
        (Symbol::from(b'b'), Instances::from(9)),
        (Symbol::from(b'c'), Instances::from(12)),
        (Symbol::from(b'd'), Instances::from(13)),
        (Symbol::from(b'e'), Instances::from(16)),
        (Symbol::from(b'f'), Instances::from(45)),
    ])
    .unwrap();
    let encoder = Encoder::from_tree(&tree);

    let mut buffer = BitVec::new();
    encoder
        .encode("fcd".bytes().map(|byte| Symbol::from(byte)), &mut buffer)
        .unwrap();

    let mut bits = Vec::new();
    {
        use io::BitSource;
        let mut source = buffer.bits();
        while let Some(bit) = source.next_bit() {
            bits.push(bit);
        }
    }
    assert_eq!(bits, vec![0, 1, 0, 0, 1, 0, 1]);
}

#[test]
fn test_unknown_symbol_is_rejected() {
    use bits::BitVec;
    use freqs::Instances;

    let tree = CodeTree::from_frequencies(vec![
        (Symbol::new(1), Instances::from(1)),
        (Symbol::new(2), Instances::from(1)),
    ])
    .unwrap();
    let encoder = Encoder::from_tree(&tree);

    let mut buffer = BitVec::new();
    match encoder.encode(vec![Symbol::new(3)], &mut buffer) {
        Err(EncodeError::UnknownSymbol(symbol)) => assert_eq!(symbol, Symbol::new(3)),
        other => panic!("Expected UnknownSymbol, got {:?}", other),
    }
}
