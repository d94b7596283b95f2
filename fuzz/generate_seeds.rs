#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn bmp(width: i32, height: i32, bits: u16, info_size: u32) -> Vec<u8> {
    let palette = if bits <= 8 { 1usize << bits } else { 0 };
    let stride = (width as usize * bits as usize).div_ceil(32) * 4;
    let raster = stride * height.unsigned_abs() as usize;
    let offset = 14 + info_size as usize + palette * 4;

    let mut out = vec![0u8; offset + raster];
    out[0] = b'B';
    out[1] = b'M';
    out[2..6].copy_from_slice(&(out.len() as u32).to_le_bytes()); // file size
    out[10..14].copy_from_slice(&(offset as u32).to_le_bytes()); // data offset
    out[14..18].copy_from_slice(&info_size.to_le_bytes()); // info header size
    out[18..22].copy_from_slice(&width.to_le_bytes());
    out[22..26].copy_from_slice(&height.to_le_bytes());
    out[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    out[28..30].copy_from_slice(&bits.to_le_bytes());
    for i in 0..palette {
        let v = (i * 255 / (palette - 1)) as u8;
        let at = 14 + info_size as usize + i * 4;
        out[at..at + 3].copy_from_slice(&[v, v, v]);
    }
    for (i, b) in out[offset..].iter_mut().enumerate() {
        *b = (i * 37) as u8;
    }
    out
}

fn main() {
    use std::fs;
    let dirs = [
        "fuzz/corpus/fuzz_decode",
        "fuzz/corpus/fuzz_roundtrip",
        "fuzz/corpus/fuzz_process",
    ];
    for dir in dirs {
        fs::create_dir_all(dir).unwrap();

        for bits in [1u16, 4, 8, 24, 32] {
            fs::write(format!("{dir}/bmp_{bits}bit_5x3.bmp"), bmp(5, 3, bits, 40)).unwrap();
            fs::write(format!("{dir}/bmp_{bits}bit_topdown.bmp"), bmp(3, -2, bits, 40)).unwrap();
        }
        fs::write(format!("{dir}/bmp_v5_24bit.bmp"), bmp(4, 4, 24, 124)).unwrap();
        fs::write(format!("{dir}/bmp_1x1.bmp"), bmp(1, 1, 24, 40)).unwrap();

        // Truncated/malformed seeds for edge coverage
        fs::write(format!("{dir}/empty.bin"), b"").unwrap();
        fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
        let mut cut = bmp(8, 8, 8, 40);
        cut.truncate(cut.len() - 5);
        fs::write(format!("{dir}/bmp_truncated.bin"), cut).unwrap();
    }

    println!("Generated seed corpora in fuzz/corpus/");
}
