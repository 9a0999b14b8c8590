//! Decompress a payload produced by the compressor.

extern crate clap;
extern crate env_logger;
extern crate huffcode;

use huffcode::bits::BitVec;
use huffcode::huffman::codebook::Codebook;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use clap::*;

fn main() {
    env_logger::init();

    let matches = App::new("huffcode decompressor")
        .about("Rebuild the code from a stored codebook, then translate the payload back into bytes.")
        .args(&[
            Arg::with_name("INPUT")
                .required(true)
                .help("Input payload file."),
            Arg::with_name("OUTPUT")
                .required(true)
                .help("Output file. Will be overwritten."),
            Arg::with_name("codebook")
                .long("codebook")
                .takes_value(true)
                .help("Codebook text to rebuild the code from. Defaults to INPUT.code."),
        ])
        .get_matches();

    let source_path = matches.value_of("INPUT").expect("Expected input file");
    let dest_path = matches.value_of("OUTPUT").expect("Expected output file");
    let codebook_path = match matches.value_of("codebook") {
        Some(path) => path.to_string(),
        None => format!("{}.code", source_path),
    };

    println!("Reading codebook from {}.", codebook_path);
    let codebook_file = File::open(&codebook_path).expect("Could not open codebook");
    let codebook = Codebook::read(BufReader::new(codebook_file))
        .unwrap_or_else(|error| panic!("Malformed codebook {}: {:?}", codebook_path, error));
    let tree = codebook
        .to_tree()
        .unwrap_or_else(|error| panic!("Inconsistent codebook {}: {:?}", codebook_path, error));

    println!("Reading payload from {}.", source_path);
    let mut payload_file = File::open(source_path).expect("Could not open payload");
    let payload = BitVec::read_payload(&mut payload_file).expect("Could not read payload");

    println!("Translating.");
    let mut dest =
        BufWriter::new(File::create(dest_path).expect("Could not create destination file"));
    let emitted = tree
        .translate(&mut payload.bits(), &mut dest)
        .unwrap_or_else(|error| panic!("Could not translate payload: {:?}", error));
    dest.flush().expect("Could not flush destination file");

    println!("Done: {} symbols written to {}.", emitted, dest_path);
}
