//! Construction of prefix-free binary codes over a finite symbol alphabet.
//!
//! A code is represented as a binary tree whose leaves are symbols and
//! whose root-to-leaf paths are codewords. The tree is built either from
//! symbol frequencies (`CodeTree::from_frequencies`) or from a persisted
//! codebook (`codebook::Codebook::to_tree`). Both construction paths
//! converge on the same representation, so persisting and translating are
//! agnostic of a tree's origin.

use freqs::Instances;
use ::{BuildError};

use itertools::Itertools;
use smallvec::SmallVec;

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

/// Persisted form of a code tree.
pub mod codebook;

/// Translating bit streams back into symbols.
pub mod read;

/// Writing symbol streams as bit sequences.
pub mod write;

/// A newtype for `u16` identifying a member of the alphabet.
///
/// Byte-driven alphabets use the values 0 through 255; the wider type
/// leaves room for codebooks whose identifiers exceed a byte.
#[derive(
    Constructor,
    Debug,
    Default,
    Display,
    From,
    Into,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
)]
pub struct Symbol(u16);

impl Symbol {
    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Symbol {
        Symbol(byte as u16)
    }
}

/// A root-to-leaf descent in a code tree: the codeword of the leaf's
/// symbol.
///
/// Descent steps are stored in root-first order as `0` (left) / `1`
/// (right) values. The textual codebook format puts no upper bound on
/// codeword length, so paths are backed by a growable buffer rather than a
/// fixed-width integer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodePath(SmallVec<[u8; 16]>);

impl CodePath {
    pub fn new() -> Self {
        CodePath(SmallVec::new())
    }

    /// The number of bits in this path.
    pub fn bit_len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append one descent step.
    ///
    /// `bit` MUST be 0 or 1.
    pub fn push(&mut self, bit: u8) {
        debug_assert!(bit <= 1);
        self.0.push(bit);
    }

    /// A copy of this path, one step longer.
    pub fn with_suffix(&self, bit: u8) -> Self {
        let mut longer = self.clone();
        longer.push(bit);
        longer
    }

    /// The descent steps, from the root.
    pub fn bits(&self) -> std::slice::Iter<u8> {
        self.0.iter()
    }
}

impl std::iter::FromIterator<u8> for CodePath {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        CodePath(iter.into_iter().collect())
    }
}

impl fmt::Display for CodePath {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0.iter().join(""))
    }
}

/// A node in the code tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeNode {
    /// A symbol of the alphabet; its codeword is the path from the root.
    Leaf(Symbol),

    /// An internal node joining two subtrees.
    ///
    /// Child slots are optional only because codebook reconstruction fills
    /// the tree one path at a time; a tree built from frequencies always
    /// carries both children.
    Internal {
        left: Option<Box<CodeNode>>,
        right: Option<Box<CodeNode>>,
    },
}

impl CodeNode {
    fn empty_internal() -> Self {
        CodeNode::Internal {
            left: None,
            right: None,
        }
    }

    /// The child reached by consuming `bit`, if present.
    pub fn child(&self, bit: u8) -> Option<&CodeNode> {
        match *self {
            CodeNode::Leaf(_) => None,
            CodeNode::Internal {
                ref left,
                ref right,
            } => {
                let slot = if bit == 0 { left } else { right };
                slot.as_ref().map(|child| &**child)
            }
        }
    }
}

/// A subtree being assembled, ordered for the construction min-heap.
struct Candidate {
    /// The total number of instances of all leaves in this subtree.
    instances: Instances,

    /// Position in heap insertion order, used to break instance ties.
    seq: usize,

    /// The subtree itself.
    content: CodeNode,
}

/// Custom ordering of `Candidate`.
///
/// Candidates compare by number of instances; equal counts fall back to
/// insertion order, which pins the shape of the finished tree for a given
/// source order.
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.instances, self.seq).cmp(&(other.instances, other.seq))
    }
}
impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.instances == other.instances && self.seq == other.seq
    }
}
impl Eq for Candidate {}

/// A prefix-free binary code: a tree whose leaves are symbols and whose
/// root-to-leaf paths are codewords.
///
/// Once built, a tree is never mutated; repeated saves and translations
/// may share it freely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTree {
    root: CodeNode,
}

impl CodeTree {
    /// Build the code minimizing total weighted codeword length for the
    /// given instance counts.
    ///
    /// Symbols with 0 instances are skipped. At least one symbol must
    /// carry a positive count, or construction fails with `EmptyAlphabet`
    /// and no tree is returned.
    ///
    /// # Determinism
    ///
    /// When two subtrees carry the same number of instances, the one that
    /// entered the queue first is merged first: leaves enter in source
    /// order, merged subtrees as they are created. A given source order
    /// therefore always yields the same tree, and the same saved codebook;
    /// this tie-break is part of the codebook format contract.
    /// `FrequencyTable` iterates by ascending symbol value.
    pub fn from_frequencies<S>(source: S) -> Result<Self, BuildError>
    where
        S: IntoIterator<Item = (Symbol, Instances)>,
    {
        let mut heap = BinaryHeap::new();
        let mut seq = 0;

        // Skip symbols that have 0 instances.
        for (symbol, instances) in source {
            if !instances.is_zero() {
                heap.push(Reverse(Candidate {
                    instances,
                    seq,
                    content: CodeNode::Leaf(symbol),
                }));
                seq += 1;
            }
        }

        if heap.is_empty() {
            return Err(BuildError::EmptyAlphabet);
        }
        debug!(target: "code_tree", "assembling a code over {} symbols", heap.len());

        // Take the two rarest subtrees, merge them behind a fresh internal
        // node carrying the summed count, reinsert. Repeat until a single
        // subtree remains.
        while heap.len() > 1 {
            let first = heap.pop().unwrap();
            let second = heap.pop().unwrap();
            heap.push(Reverse(Candidate {
                instances: first.0.instances + second.0.instances,
                seq,
                content: CodeNode::Internal {
                    left: Some(Box::new(first.0.content)),
                    right: Some(Box::new(second.0.content)),
                },
            }));
            seq += 1;
        }

        let root = heap.pop().unwrap(); // We have checked above that there is at least one subtree.
        Ok(CodeTree {
            root: root.0.content,
        })
    }

    /// The root node.
    pub fn root(&self) -> &CodeNode {
        &self.root
    }

    /// The `(symbol, codeword)` assignments of this tree, in depth-first
    /// order, left subtree before right. This is the order in which a
    /// codebook persists them.
    ///
    /// Child slots left empty by a partial reconstruction are skipped.
    pub fn assignments(&self) -> Vec<(Symbol, CodePath)> {
        let mut assignments = Vec::new();
        let mut stack = vec![(&self.root, CodePath::new())];
        while let Some((node, path)) = stack.pop() {
            match *node {
                CodeNode::Leaf(symbol) => assignments.push((symbol, path)),
                CodeNode::Internal {
                    ref left,
                    ref right,
                } => {
                    // Right first, so that the left subtree pops first.
                    if let Some(ref child) = *right {
                        stack.push((&**child, path.with_suffix(1)));
                    }
                    if let Some(ref child) = *left {
                        stack.push((&**child, path.with_suffix(0)));
                    }
                }
            }
        }
        assignments
    }
}

#[test]
fn test_textbook_frequencies() {
    // The classic distribution: the most frequent symbol must take the
    // shortest codeword, the two rarest the longest.
    let frequencies = vec![
        (Symbol::from(b'a'), Instances::from(5)),
        (Symbol::from(b'b'), Instances::from(9)),
        (Symbol::from(b'c'), Instances::from(12)),
        (Symbol::from(b'd'), Instances::from(13)),
        (Symbol::from(b'e'), Instances::from(16)),
        (Symbol::from(b'f'), Instances::from(45)),
    ];
    let tree = CodeTree::from_frequencies(frequencies.clone()).unwrap();
    let assignments = tree.assignments();
    assert_eq!(assignments.len(), 6);

    let bit_len_of = |byte: u8| {
        assignments
            .iter()
            .find(|&&(symbol, _)| symbol == Symbol::from(byte))
            .map(|&(_, ref path)| path.bit_len())
            .unwrap()
    };
    assert_eq!(bit_len_of(b'f'), 1);
    assert_eq!(bit_len_of(b'a'), 4);
    assert_eq!(bit_len_of(b'b'), 4);

    // Total weighted length must reach the theoretical minimum for this
    // distribution: 224 bits.
    let weighted: usize = frequencies
        .iter()
        .map(|&(symbol, instances)| {
            let count: usize = instances.into();
            count * bit_len_of(symbol.as_u16() as u8)
        })
        .sum();
    assert_eq!(weighted, 224);
}

#[test]
fn test_single_symbol_alphabet() {
    let tree = CodeTree::from_frequencies(vec![(Symbol::new(7), Instances::from(3))]).unwrap();
    let assignments = tree.assignments();

    // The single leaf is the root; its codeword is empty.
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].0, Symbol::new(7));
    assert!(assignments[0].1.is_empty());
}

#[test]
fn test_empty_alphabet_is_rejected() {
    let zeroes = vec![
        (Symbol::new(0), Instances::from(0)),
        (Symbol::new(1), Instances::from(0)),
    ];
    match CodeTree::from_frequencies(zeroes) {
        Err(BuildError::EmptyAlphabet) => {}
        other => panic!("Expected EmptyAlphabet, got {:?}", other),
    }
}

#[test]
fn test_equal_frequencies_tie_break() {
    // All counts equal: the shape is pinned by source order alone.
    let frequencies: Vec<_> = (0..4)
        .map(|value| (Symbol::new(value), Instances::from(1)))
        .collect();
    let tree = CodeTree::from_frequencies(frequencies.clone()).unwrap();

    let expected: Vec<(Symbol, CodePath)> = vec![
        (Symbol::new(0), vec![0, 0].into_iter().collect()),
        (Symbol::new(1), vec![0, 1].into_iter().collect()),
        (Symbol::new(2), vec![1, 0].into_iter().collect()),
        (Symbol::new(3), vec![1, 1].into_iter().collect()),
    ];
    assert_eq!(tree.assignments(), expected);

    // And repeating the build changes nothing.
    let again = CodeTree::from_frequencies(frequencies).unwrap();
    assert_eq!(again.assignments(), expected);
}

#[test]
fn test_prefix_freedom() {
    let frequencies = vec![
        (Symbol::new(1), Instances::from(7)),
        (Symbol::new(2), Instances::from(7)),
        (Symbol::new(3), Instances::from(2)),
        (Symbol::new(4), Instances::from(1)),
        (Symbol::new(5), Instances::from(1)),
    ];
    let tree = CodeTree::from_frequencies(frequencies).unwrap();
    let assignments = tree.assignments();

    let is_prefix = |shorter: &CodePath, longer: &CodePath| {
        shorter.bit_len() <= longer.bit_len()
            && shorter.bits().zip(longer.bits()).all(|(a, b)| a == b)
    };
    for (i, &(_, ref first)) in assignments.iter().enumerate() {
        for (j, &(_, ref second)) in assignments.iter().enumerate() {
            if i != j {
                assert!(!is_prefix(first, second));
            }
        }
    }
}
