#![no_main]
use libfuzzer_sys::fuzz_target;
use rawlzw::{Decoder, Encoder};

fuzz_target!(|data: &[u8]| {
    let mut encoder = Encoder::new(Vec::with_capacity(2 * data.len() + 8));
    encoder.encode(data).unwrap();
    let compressed = encoder.finish().unwrap();

    let decoded = Decoder::new(Vec::with_capacity(data.len()))
        .decode_all(compressed.as_slice())
        .unwrap();
    assert_eq!(decoded, data);
});
