#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic, whatever the header claims
    let _ = zenraster::probe(data);
    let limits = zenraster::Limits::default().with_max_pixels(1 << 24);
    let _ = zenraster::DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable);
});
