//! Translating bit streams back into symbols.
//!
//! Decoding is a state machine whose states are tree nodes: each consumed
//! bit moves from the current node to one of its children; reaching a leaf
//! emits the leaf's symbol and resets the walk to the root.

use huffman::{CodeNode, CodeTree};
use io::{BitSource, SymbolSink};
use ::{TranslateError};

impl CodeTree {
    /// Decode `source` until it runs out of bits, writing each completed
    /// symbol to `sink`. Returns the number of symbols emitted.
    ///
    /// The bit sequence must be a concatenation of complete codewords for
    /// this tree. If the source ends mid-codeword, every completed symbol
    /// has already reached the sink by the time `IncompleteCode` is
    /// returned; symbol boundaries are independent, so a dangling tail
    /// never corrupts the symbols before it.
    ///
    /// A step into an absent child slot (possible on trees rebuilt from
    /// partial codebooks), or any step taken while the current node is a
    /// leaf (a single-leaf root), fails with `CorruptTree`.
    pub fn translate<B, S>(&self, source: &mut B, sink: &mut S) -> Result<usize, TranslateError>
    where
        B: BitSource,
        S: SymbolSink,
    {
        let mut emitted = 0;
        let mut pending = 0;
        let mut current = self.root();
        while let Some(bit) = source.next_bit() {
            pending += 1;
            let next = match current.child(bit) {
                None => return Err(TranslateError::CorruptTree),
                Some(node) => node,
            };
            match *next {
                CodeNode::Leaf(symbol) => {
                    sink.write_symbol(symbol)?;
                    emitted += 1;
                    pending = 0;
                    current = self.root();
                }
                CodeNode::Internal { .. } => current = next,
            }
        }
        if pending > 0 {
            warn!(target: "translator", "bit stream ended {} bits into a codeword", pending);
            return Err(TranslateError::IncompleteCode { pending });
        }
        Ok(emitted)
    }
}

#[cfg(test)]
fn textbook_tree() -> CodeTree {
    use freqs::Instances;
    use huffman::Symbol;

    // Codewords: f=0, c=100, d=101, a=1100, b=1101, e=111.
    CodeTree::from_frequencies(vec![
        (Symbol::from(b'a'), Instances::from(5)),
        (Symbol::from(b'b'), Instances::from(9)),
        (Symbol::from(b'c'), Instances::from(12)),
        (Symbol::from(b'd'), Instances::from(13)),
        (Symbol::from(b'e'), Instances::from(16)),
        (Symbol::from(b'f'), Instances::from(45)),
    ])
    .unwrap()
}

#[cfg(test)]
fn bit_source(bits: &[u8]) -> ::bits::BitVec {
    use io::BitSink;

    let mut buffer = ::bits::BitVec::new();
    for &bit in bits {
        buffer.write_bit(bit).unwrap();
    }
    buffer
}

#[test]
fn test_translate_complete_codewords() {
    let tree = textbook_tree();

    // "face" = 0 1100 100 111
    let buffer = bit_source(&[0, 1, 1, 0, 0, 1, 0, 0, 1, 1, 1]);
    let mut decoded = Vec::new();
    let emitted = tree.translate(&mut buffer.bits(), &mut decoded).unwrap();
    assert_eq!(emitted, 4);
    assert_eq!(decoded, b"face");
}

#[test]
fn test_translate_empty_stream() {
    let tree = textbook_tree();
    let buffer = bit_source(&[]);
    let mut decoded = Vec::new();
    let emitted = tree.translate(&mut buffer.bits(), &mut decoded).unwrap();
    assert_eq!(emitted, 0);
    assert!(decoded.is_empty());
}

#[test]
fn test_incomplete_trailing_codeword() {
    let tree = textbook_tree();

    // One complete 'f', then two bits into 'e'.
    let buffer = bit_source(&[0, 1, 1]);
    let mut decoded = Vec::new();
    match tree.translate(&mut buffer.bits(), &mut decoded) {
        Err(TranslateError::IncompleteCode { pending: 2 }) => {}
        other => panic!("Expected IncompleteCode, got {:?}", other),
    }
    // The completed symbol reached the sink before the tail was noticed.
    assert_eq!(decoded, b"f");
}

#[test]
fn test_absent_child_is_corrupt() {
    use huffman::codebook::Codebook;
    use huffman::Symbol;

    // A one-codeword book leaves the sibling slots empty.
    let mut codebook = Codebook::default();
    codebook.add_mapping(Symbol::new(5), vec![0, 0].into_iter().collect());
    let tree = codebook.to_tree().unwrap();

    let buffer = bit_source(&[0, 1]);
    let mut decoded = Vec::new();
    match tree.translate(&mut buffer.bits(), &mut decoded) {
        Err(TranslateError::CorruptTree) => {}
        other => panic!("Expected CorruptTree, got {:?}", other),
    }
}

#[test]
fn test_leaf_root_consumes_no_bits() {
    use freqs::Instances;
    use huffman::Symbol;

    let tree =
        CodeTree::from_frequencies(vec![(Symbol::new(9), Instances::from(4))]).unwrap();

    // Without bits the walk never starts.
    let empty = bit_source(&[]);
    let mut decoded = Vec::new();
    assert_eq!(tree.translate(&mut empty.bits(), &mut decoded).unwrap(), 0);

    // Any bit at all asks the leaf root for a child it does not have.
    let one_bit = bit_source(&[0]);
    match tree.translate(&mut one_bit.bits(), &mut decoded) {
        Err(TranslateError::CorruptTree) => {}
        other => panic!("Expected CorruptTree, got {:?}", other),
    }
}
