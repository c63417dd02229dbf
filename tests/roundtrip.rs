use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rawlzw::{Decoder, Encoder, LzwError};

fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = Encoder::new(Vec::new());
    encoder.encode(data).expect("writing into a Vec cannot fail");
    encoder.finish().expect("writing into a Vec cannot fail")
}

fn decompress(stream: &[u8]) -> Result<Vec<u8>, LzwError> {
    Decoder::new(Vec::new()).decode_all(stream)
}

fn assert_roundtrips(data: &[u8]) {
    let compressed = compress(data);
    let decoded = decompress(&compressed).expect("valid stream must decode");
    assert!(decoded == data, "roundtrip mismatch for {} bytes", data.len());
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

#[test]
fn empty_input_produces_empty_stream() {
    let compressed = compress(b"");
    assert!(compressed.is_empty());
    assert_eq!(decompress(&compressed).unwrap(), b"");
}

#[test]
fn single_byte_is_one_nine_bit_code() {
    // 'A' = 0x41 at 9 bits, MSB first, zero-padded to the byte boundary.
    assert_eq!(compress(b"A"), vec![0x20, 0x80]);
    assert_eq!(decompress(&[0x20, 0x80]).unwrap(), b"A");
}

#[test]
fn run_of_a_single_byte_needs_code_synthesis() {
    // Codes 97, 256, 257; 256 and 257 arrive before the decoder's table
    // holds them, which forces the synthesis branch twice.
    let compressed = compress(b"aaaaaa");
    assert_eq!(compressed, vec![0x30, 0xC0, 0x20, 0x20]);
    assert_eq!(decompress(&compressed).unwrap(), b"aaaaaa");
}

#[test]
fn alternating_pair_reuses_dictionary_entries() {
    // Greedy parsing emits A, B, AB, ABA, BA, B: six codes at 9 bits each,
    // 54 bits packed into 7 bytes.
    let data = b"ABABABABAB";
    let compressed = compress(data);
    assert_eq!(compressed.len(), 7);
    assert_eq!(decompress(&compressed).unwrap(), data);
}

#[test]
fn long_constant_run_roundtrips() {
    let data = vec![0u8; 2 << 20];
    assert_roundtrips(&data);
}

#[test]
fn incompressible_data_roundtrips() {
    let data = random_bytes(1 << 20, 0xFEED_F00D);
    let compressed = compress(&data);
    // Uniform noise does not compress; the bounds only anchor against gross
    // size regressions in the packing layer.
    assert!(compressed.len() > data.len() / 2);
    assert!(compressed.len() < data.len() * 2);
    assert_eq!(decompress(&compressed).unwrap(), data);
}

#[test]
fn dictionary_reset_roundtrips() {
    // Uniform noise assigns a new code every 2-3 bytes, so 5 MiB fills the
    // 2^20-entry dictionary about twice. The reset carries no marker on the
    // wire; only lockstep state keeps the two sides aligned through it.
    let data = random_bytes(5 << 20, 0x0DDB_A11);
    assert_roundtrips(&data);
}

#[test]
fn text_roundtrips_and_compresses() {
    let line = b"pack my box with five dozen liquor jugs; ";
    let mut data = Vec::new();
    while data.len() < 256 * 1024 {
        data.extend_from_slice(line);
    }
    let compressed = compress(&data);
    assert!(compressed.len() < data.len() / 4);
    assert_eq!(decompress(&compressed).unwrap(), data);
}

#[test]
fn chunked_delivery_matches_oneshot() {
    let data = b"how razorback-jumping frogs can level six piqued gymnasts";

    let mut encoder = Encoder::new(Vec::new());
    for chunk in data.chunks(3) {
        encoder.encode(chunk).unwrap();
    }
    let compressed = encoder.finish().unwrap();
    assert_eq!(compressed, compress(data));

    // Byte-at-a-time delivery cuts every code in half at least once.
    let mut decoder = Decoder::new(Vec::new());
    for byte in &compressed {
        decoder.decode(std::slice::from_ref(byte)).unwrap();
    }
    assert_eq!(decoder.finish().unwrap(), data);
}

#[test]
fn stream_drivers_match_the_push_interface() {
    let data = b"sphinx of black quartz, judge my vow";
    let from_reader = Encoder::new(Vec::new()).encode_all(&data[..]).unwrap();
    assert_eq!(from_reader, compress(data));
    assert_eq!(decompress(&from_reader).unwrap(), data);
}

#[test]
fn truncated_stream_is_rejected() {
    let err = decompress(&[0x20]).unwrap_err();
    assert!(matches!(err, LzwError::InputUnderrun { bits: 8 }));

    let compressed = compress(b"abcabcabc");
    let err = decompress(&compressed[..compressed.len() - 2]).unwrap_err();
    assert!(matches!(
        err,
        LzwError::InputUnderrun { .. } | LzwError::InvalidCode { .. }
    ));
}

#[test]
fn invented_code_is_rejected() {
    // Code 65 followed by code 258: at that point only 256 could exist.
    let err = decompress(&[0x20, 0xC0, 0x80]).unwrap_err();
    match err {
        LzwError::InvalidCode { code, max } => {
            assert_eq!(code, 258);
            assert_eq!(max, 255);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn all_byte_values_roundtrip() {
    let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    assert_roundtrips(&data);
}

proptest! {
    #[test]
    fn roundtrip_short_inputs(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        assert_roundtrips(&data);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn roundtrip_long_inputs(data in proptest::collection::vec(any::<u8>(), 0..65536)) {
        assert_roundtrips(&data);
    }

    #[test]
    fn garbage_never_panics(stream in proptest::collection::vec(any::<u8>(), 0..4096)) {
        // Arbitrary bytes may or may not form a valid stream; either way the
        // decoder must stop cleanly instead of panicking.
        let _ = decompress(&stream);
    }
}
