//! End-to-end round trips over the public API: count, build, persist,
//! reload, encode, translate.

extern crate huffcode;

use huffcode::bits::BitVec;
use huffcode::freqs::FrequencyTable;
use huffcode::huffman::codebook::Codebook;
use huffcode::huffman::write::Encoder;
use huffcode::huffman::{CodePath, CodeTree, Symbol};

use std::io::Cursor;

/// Compress `source` from scratch: the codebook text and the bit payload,
/// framed the way the command-line tools store them.
fn compress(source: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let frequencies = FrequencyTable::tally_bytes(source);
    let tree = CodeTree::from_frequencies(frequencies.iter()).expect("Could not build tree");

    let mut codebook_text = Vec::new();
    Codebook::from_tree(&tree)
        .write(&mut codebook_text)
        .expect("Could not write codebook");

    let encoder = Encoder::from_tree(&tree);
    let mut payload = BitVec::new();
    encoder
        .encode(source.iter().map(|&byte| Symbol::from(byte)), &mut payload)
        .expect("Could not encode source");
    let mut framed = Vec::new();
    payload
        .write_payload(&mut framed)
        .expect("Could not frame payload");

    (codebook_text, framed)
}

/// Decompress from the persisted artifacts alone.
fn decompress(codebook_text: &[u8], framed: &[u8]) -> Vec<u8> {
    let codebook = Codebook::read(Cursor::new(codebook_text)).expect("Could not read codebook");
    let tree = codebook.to_tree().expect("Could not rebuild tree");
    let payload = BitVec::read_payload(&mut Cursor::new(framed)).expect("Could not read payload");

    let mut decoded = Vec::new();
    tree.translate(&mut payload.bits(), &mut decoded)
        .expect("Could not translate payload");
    decoded
}

#[test]
fn test_full_round_trip() {
    let source = b"this is an example of a huffman tree".to_vec();
    let (codebook_text, framed) = compress(&source);
    assert_eq!(decompress(&codebook_text, &framed), source);
}

#[test]
fn test_full_round_trip_large_sample() {
    let source = "Lorem ipsum dolor sit amet consectetur adipiscing elit convallis nostra, \
                  integer diam odio mus eros ut sodales sociis cursus, montes imperdiet morbi \
                  rhoncus felis venenatis curabitur magna. Volutpat tincidunt sociosqu pharetra \
                  id feugiat enim eget, integer quisque magna in senectus mollis, himenaeos \
                  malesuada convallis faucibus ornare egestas."
        .as_bytes()
        .to_vec();
    let (codebook_text, framed) = compress(&source);
    assert_eq!(decompress(&codebook_text, &framed), source);
}

#[test]
fn test_full_round_trip_every_byte_value() {
    let mut source = Vec::new();
    for value in 0..256usize {
        // Skewed counts, so codeword lengths differ across the alphabet.
        for _ in 0..(value % 7) + 1 {
            source.push(value as u8);
        }
    }
    let (codebook_text, framed) = compress(&source);
    assert_eq!(decompress(&codebook_text, &framed), source);
}

#[test]
fn test_reloaded_tree_preserves_assignments() {
    let source = b"mississippi riverbed";
    let frequencies = FrequencyTable::tally_bytes(source);
    let tree = CodeTree::from_frequencies(frequencies.iter()).unwrap();

    let mut text = Vec::new();
    Codebook::from_tree(&tree).write(&mut text).unwrap();
    let reloaded = Codebook::read(Cursor::new(text)).unwrap().to_tree().unwrap();

    assert_eq!(tree.assignments(), reloaded.assignments());
}

#[test]
fn test_assignments_are_prefix_free() {
    let source = b"so much depends upon a red wheel barrow glazed with rain water";
    let frequencies = FrequencyTable::tally_bytes(source);
    let tree = CodeTree::from_frequencies(frequencies.iter()).unwrap();
    let assignments = tree.assignments();

    let is_prefix = |shorter: &CodePath, longer: &CodePath| {
        shorter.bit_len() <= longer.bit_len()
            && shorter.bits().zip(longer.bits()).all(|(a, b)| a == b)
    };
    for (i, &(_, ref first)) in assignments.iter().enumerate() {
        for (j, &(_, ref second)) in assignments.iter().enumerate() {
            if i != j {
                assert!(
                    !is_prefix(first, second),
                    "{} is a prefix of {}",
                    first,
                    second
                );
            }
        }
    }
}

#[test]
fn test_compression_actually_shrinks_skewed_input() {
    // A heavily skewed source must beat the 8 bits per byte baseline.
    let mut source = vec![b'e'; 4000];
    source.extend_from_slice(b"the quick brown fox");
    let (_, framed) = compress(&source);
    assert!(framed.len() < source.len() / 2);
}
