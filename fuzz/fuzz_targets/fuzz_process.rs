#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits::default().with_max_pixels(1 << 20);
    let Ok(bitmap) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Operations may reject a depth but must never panic
    let _ = transform::grayscale(&mut bitmap.clone(), enough::Unstoppable);
    let _ = transform::binarize(&mut bitmap.clone(), BinarizeMode::default(), enough::Unstoppable);
    let _ = transform::draw_cross(&mut bitmap.clone());
    let _ = transform::draw_dark_region_rectangle(&mut bitmap.clone());
    let options = DetectOptions::default();
    let _ = detect::mark_objects(&mut bitmap.clone(), &options, enough::Unstoppable);
    let _ = diff::diff(&bitmap, &bitmap, 0.0, enough::Unstoppable);
});
