#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits::default().with_max_pixels(1 << 24);
    let Ok(bitmap) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Everything up to the end of the raster must come back unchanged
    let encoded = encode(&bitmap, enough::Unstoppable).expect("re-encode failed");
    assert_eq!(encoded.len(), bitmap.encoded_len());
    assert_eq!(&encoded[..], &data[..encoded.len()], "roundtrip byte mismatch");

    let Ok(again) = decode(&encoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };
    assert_eq!(again, bitmap);
});
