//! Persisted form of a code tree.
//!
//! A codebook is an ordered sequence of `(symbol, codeword)` pairs. The
//! text format is a sequence of line pairs: the symbol's decimal
//! identifier on one line, the '0'/'1' codeword on the next. There is no
//! header and no count; a reader consumes pairs until the input ends.

use huffman::{CodeNode, CodePath, CodeTree, Symbol};
use ::{CodebookError};

use std::io::{BufRead, Write};

/// Codebook associated to a code tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Codebook {
    /// The sequence of assignments.
    ///
    /// Order is meaningful: it is the leaf order of the depth-first save
    /// that produced the codebook.
    mappings: Vec<(Symbol, CodePath)>,
}

impl Codebook {
    /// The number of codewords in this codebook.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// The assignments, in persisted order.
    pub fn mappings(&self) -> &[(Symbol, CodePath)] {
        &self.mappings
    }

    /// Capture the assignments of `tree`, in depth-first leaf order.
    pub fn from_tree(tree: &CodeTree) -> Self {
        Codebook {
            mappings: tree.assignments(),
        }
    }

    /// Add a mapping.
    ///
    /// This method does **not** check that the resulting codebook is
    /// consistent; `to_tree` will.
    pub fn add_mapping(&mut self, symbol: Symbol, path: CodePath) {
        self.mappings.push((symbol, path));
    }

    /// Write the line-pair text format.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for &(symbol, ref path) in &self.mappings {
            writeln!(out, "{}", symbol)?;
            writeln!(out, "{}", path)?;
        }
        Ok(())
    }

    /// Read the line-pair text format until the input is exhausted.
    pub fn read<R: BufRead>(input: R) -> Result<Self, CodebookError> {
        let mut mappings = Vec::new();
        let mut lines = input.lines().enumerate();
        while let Some((line_number, symbol_line)) = lines.next() {
            let symbol_line = symbol_line?;
            let symbol = match symbol_line.parse::<u16>() {
                Ok(value) => Symbol::from(value),
                Err(_) => {
                    return Err(CodebookError::BadSymbol {
                        line: line_number + 1,
                        text: symbol_line,
                    })
                }
            };
            let code_line = match lines.next() {
                None => return Err(CodebookError::MissingCode { symbol }),
                Some((_, code_line)) => code_line?,
            };
            let mut path = CodePath::new();
            for character in code_line.chars() {
                match character {
                    '0' => path.push(0),
                    '1' => path.push(1),
                    other => {
                        return Err(CodebookError::BadCodeChar {
                            symbol,
                            found: other,
                        })
                    }
                }
            }
            if path.is_empty() {
                return Err(CodebookError::EmptyCode { symbol });
            }
            mappings.push((symbol, path));
        }
        debug!(target: "codebook_reader", "read {} codewords", mappings.len());
        Ok(Codebook { mappings })
    }

    /// Rebuild the code tree these assignments describe.
    ///
    /// Each codeword is walked from the root, materialising internal
    /// nodes on demand and a leaf at its last step. A codeword that runs
    /// through or lands on an already-placed leaf, or lands on an
    /// already-placed internal node, cannot coexist with the rest of the
    /// codebook (one codeword is a prefix or a duplicate of another) and
    /// is rejected; no partial tree is returned.
    pub fn to_tree(&self) -> Result<CodeTree, CodebookError> {
        if self.mappings.is_empty() {
            return Err(CodebookError::Empty);
        }
        let mut root = CodeNode::empty_internal();
        for &(symbol, ref path) in &self.mappings {
            if path.is_empty() {
                return Err(CodebookError::EmptyCode { symbol });
            }
            let last = path.bit_len() - 1;
            let mut current = &mut root;
            let mut bits = path.bits();
            // Descend through every step but the last, materialising
            // internal nodes on demand.
            for _ in 0..last {
                let &bit = bits.next().unwrap();
                current = match current {
                    // An earlier, shorter codeword already ends here.
                    CodeNode::Leaf(_) => {
                        return Err(CodebookError::PrefixConflict { symbol })
                    }
                    CodeNode::Internal {
                        left,
                        right,
                    } => {
                        let slot = if bit == 0 {
                            left
                        } else {
                            right
                        };
                        &mut **slot.get_or_insert_with(|| Box::new(CodeNode::empty_internal()))
                    }
                };
            }
            // Place the leaf at the final step.
            let &bit = bits.next().unwrap();
            match current {
                // An earlier, shorter codeword already ends here.
                CodeNode::Leaf(_) => {
                    return Err(CodebookError::PrefixConflict { symbol })
                }
                CodeNode::Internal {
                    left,
                    right,
                } => {
                    let slot = if bit == 0 {
                        left
                    } else {
                        right
                    };
                    // Anything already placed here makes this codeword a
                    // prefix or a duplicate of an earlier one.
                    if slot.is_some() {
                        return Err(CodebookError::PrefixConflict { symbol });
                    }
                    *slot = Some(Box::new(CodeNode::Leaf(symbol)));
                }
            }
        }
        Ok(CodeTree { root })
    }
}

impl IntoIterator for Codebook {
    type Item = (Symbol, CodePath);
    type IntoIter = std::vec::IntoIter<(Symbol, CodePath)>;
    fn into_iter(self) -> Self::IntoIter {
        self.mappings.into_iter()
    }
}

#[cfg(test)]
fn path(text: &str) -> CodePath {
    text.bytes().map(|byte| byte - b'0').collect()
}

#[test]
fn test_save_order_and_format() {
    use freqs::Instances;

    let frequencies = vec![
        (Symbol::from(b'a'), Instances::from(5)),
        (Symbol::from(b'b'), Instances::from(9)),
        (Symbol::from(b'c'), Instances::from(12)),
        (Symbol::from(b'd'), Instances::from(13)),
        (Symbol::from(b'e'), Instances::from(16)),
        (Symbol::from(b'f'), Instances::from(45)),
    ];
    let tree = CodeTree::from_frequencies(frequencies).unwrap();
    let codebook = Codebook::from_tree(&tree);

    let mut text = Vec::new();
    codebook.write(&mut text).unwrap();

    // Leaf order of the depth-first save, line pairs, nothing else.
    let expected = "102\n0\n99\n100\n100\n101\n97\n1100\n98\n1101\n101\n111\n";
    assert_eq!(String::from_utf8(text).unwrap(), expected);
}

#[test]
fn test_single_symbol_save() {
    use freqs::Instances;

    let tree =
        CodeTree::from_frequencies(vec![(Symbol::new(7), Instances::from(12))]).unwrap();

    // One pair, with an empty codeword line: the lone leaf is the root.
    let mut text = Vec::new();
    Codebook::from_tree(&tree).write(&mut text).unwrap();
    assert_eq!(String::from_utf8(text).unwrap(), "7\n\n");
}

#[test]
fn test_text_round_trip() {
    let mut codebook = Codebook::default();
    codebook.add_mapping(Symbol::new(65), path("0"));
    codebook.add_mapping(Symbol::new(66), path("10"));
    codebook.add_mapping(Symbol::new(600), path("11"));

    let mut text = Vec::new();
    codebook.write(&mut text).unwrap();
    let reloaded = Codebook::read(std::io::Cursor::new(text)).unwrap();
    assert_eq!(reloaded, codebook);

    // And the rebuilt tree maps every symbol to its original codeword.
    let tree = reloaded.to_tree().unwrap();
    assert_eq!(tree.assignments(), codebook.mappings().to_vec());
}

#[test]
fn test_malformed_text_is_rejected() {
    match Codebook::read(std::io::Cursor::new("ab\n0\n")) {
        Err(CodebookError::BadSymbol { line: 1, .. }) => {}
        other => panic!("Expected BadSymbol, got {:?}", other),
    }
    match Codebook::read(std::io::Cursor::new("5\n")) {
        Err(CodebookError::MissingCode { symbol }) => assert_eq!(symbol, Symbol::new(5)),
        other => panic!("Expected MissingCode, got {:?}", other),
    }
    match Codebook::read(std::io::Cursor::new("5\n\n")) {
        Err(CodebookError::EmptyCode { .. }) => {}
        other => panic!("Expected EmptyCode, got {:?}", other),
    }
    match Codebook::read(std::io::Cursor::new("5\n012\n")) {
        Err(CodebookError::BadCodeChar { found: '2', .. }) => {}
        other => panic!("Expected BadCodeChar, got {:?}", other),
    }
}

#[test]
fn test_prefix_conflicts_are_rejected() {
    // A codeword that is a strict prefix of an earlier one.
    let mut shorter_after = Codebook::default();
    shorter_after.add_mapping(Symbol::new(1), path("01"));
    shorter_after.add_mapping(Symbol::new(2), path("0"));
    match shorter_after.to_tree() {
        Err(CodebookError::PrefixConflict { symbol }) => assert_eq!(symbol, Symbol::new(2)),
        other => panic!("Expected PrefixConflict, got {:?}", other),
    }

    // A codeword that extends an earlier one.
    let mut longer_after = Codebook::default();
    longer_after.add_mapping(Symbol::new(1), path("0"));
    longer_after.add_mapping(Symbol::new(2), path("01"));
    match longer_after.to_tree() {
        Err(CodebookError::PrefixConflict { symbol }) => assert_eq!(symbol, Symbol::new(2)),
        other => panic!("Expected PrefixConflict, got {:?}", other),
    }

    // Two symbols on the very same codeword.
    let mut duplicate = Codebook::default();
    duplicate.add_mapping(Symbol::new(1), path("1"));
    duplicate.add_mapping(Symbol::new(2), path("1"));
    match duplicate.to_tree() {
        Err(CodebookError::PrefixConflict { .. }) => {}
        other => panic!("Expected PrefixConflict, got {:?}", other),
    }
}

#[test]
fn test_empty_codebook_has_no_tree() {
    let codebook = Codebook::read(std::io::Cursor::new("")).unwrap();
    assert!(codebook.is_empty());
    match codebook.to_tree() {
        Err(CodebookError::Empty) => {}
        other => panic!("Expected Empty, got {:?}", other),
    }
}

#[test]
fn test_duplicate_symbol_is_preserved() {
    // The same symbol under two distinct, prefix-free codewords is kept
    // as two leaves.
    let mut codebook = Codebook::default();
    codebook.add_mapping(Symbol::new(5), path("0"));
    codebook.add_mapping(Symbol::new(5), path("1"));
    let tree = codebook.to_tree().unwrap();
    assert_eq!(
        tree.assignments(),
        vec![(Symbol::new(5), path("0")), (Symbol::new(5), path("1"))]
    );
}
