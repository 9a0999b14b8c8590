//! Compress a byte source with a freshly built code.

extern crate clap;
extern crate env_logger;
extern crate huffcode;

use huffcode::bits::BitVec;
use huffcode::freqs::FrequencyTable;
use huffcode::huffman::codebook::Codebook;
use huffcode::huffman::write::Encoder;
use huffcode::huffman::{CodeTree, Symbol};

use std::fs::File;
use std::io::Read;

use clap::*;

fn main() {
    env_logger::init();

    let matches = App::new("huffcode compressor")
        .about("Build a code for a byte source, then store the codebook text and the compressed payload.")
        .args(&[
            Arg::with_name("INPUT")
                .required(true)
                .help("Input file to compress."),
            Arg::with_name("OUTPUT")
                .required(true)
                .help("Output payload file. Will be overwritten."),
            Arg::with_name("codebook")
                .long("codebook")
                .takes_value(true)
                .help("Destination of the codebook text. Defaults to OUTPUT.code."),
        ])
        .get_matches();

    let source_path = matches.value_of("INPUT").expect("Expected input file");
    let dest_path = matches.value_of("OUTPUT").expect("Expected output file");
    let codebook_path = match matches.value_of("codebook") {
        Some(path) => path.to_string(),
        None => format!("{}.code", dest_path),
    };

    println!("Reading {}.", source_path);
    let mut source = Vec::new();
    File::open(source_path)
        .expect("Could not open source")
        .read_to_end(&mut source)
        .expect("Could not read source");

    println!("Counting.");
    let frequencies = FrequencyTable::tally_bytes(&source);

    println!("Building the code.");
    let tree = CodeTree::from_frequencies(frequencies.iter())
        .expect("Source is empty, there is no code to build");
    let codebook = Codebook::from_tree(&tree);
    if codebook
        .mappings()
        .iter()
        .any(|&(_, ref path)| path.is_empty())
    {
        panic!("Source uses a single distinct byte value; the degenerate one-symbol code cannot be framed");
    }

    println!("Writing codebook to {}.", codebook_path);
    let mut codebook_file =
        File::create(&codebook_path).expect("Could not create codebook file");
    codebook
        .write(&mut codebook_file)
        .expect("Could not write codebook");

    println!("Compressing.");
    let encoder = Encoder::from_tree(&tree);
    let mut payload = BitVec::new();
    encoder
        .encode(source.iter().map(|&byte| Symbol::from(byte)), &mut payload)
        .expect("Could not encode source");

    let mut dest = File::create(dest_path).expect("Could not create destination file");
    payload
        .write_payload(&mut dest)
        .expect("Could not write destination file");

    println!(
        "Done: {} bytes in, {} payload bytes out ({} bits).",
        source.len(),
        payload.as_bytes().len() + 8,
        payload.bit_len()
    );
}
