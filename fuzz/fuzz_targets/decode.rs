#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoder = rawlzw::Decoder::new(std::io::sink());
    let _ = decoder.decode_all(data);
});
