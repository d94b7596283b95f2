//! File-to-file operations.

#![cfg(feature = "std")]

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{Layout, bmp_bytes, fill_rect, init_logging, solid};
use zenraster::ops::{self, Config, Processor};
use zenraster::*;

fn write_bitmap(dir: &Path, name: &str, bitmap: &Bitmap) -> PathBuf {
    let path = dir.join(name);
    ops::write_file(&path, bitmap).unwrap();
    path
}

#[test]
fn grayscale_writes_both_outputs() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.bmp");
    fs::write(&input, bmp_bytes(Layout::new(30, 20, 24), 4)).unwrap();
    let gray = dir.path().join("gray.bmp");
    let cross = dir.path().join("cross.bmp");

    let report = ops::convert_to_grayscale(&input, &gray, &cross).unwrap();
    assert!(report.cross_drawn);
    assert_eq!((report.width, report.height), (30, 20));

    let g = ops::read_file(&gray).unwrap();
    let c = ops::read_file(&cross).unwrap();
    assert_eq!(c.raster().color(15, 10), Color::RED);
    assert_eq!(c.raster().color(5, 10), Color::RED);
    let px = g.raster().color(0, 0);
    assert_eq!((px.red, px.green), (px.blue, px.blue));
    assert_eq!(c.raster().color(0, 0), px);
}

#[test]
fn grayscale_of_palette_image_skips_cross() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.bmp");
    fs::write(&input, bmp_bytes(Layout::new(9, 9, 8), 4)).unwrap();
    let gray = dir.path().join("gray.bmp");
    let cross = dir.path().join("cross.bmp");

    let report = ops::convert_to_grayscale(&input, &gray, &cross).unwrap();
    assert!(!report.cross_drawn);
    assert_eq!(report.bit_depth, BitDepth::Eight);
    assert_eq!(fs::read(&gray).unwrap(), fs::read(&cross).unwrap());
    let g = ops::read_file(&gray).unwrap();
    assert!(
        g.palette()
            .unwrap()
            .entries()
            .iter()
            .all(|e| e.red == e.green && e.green == e.blue && e.reserved == 0)
    );
}

#[test]
fn binary_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let mut src = solid(10, 10, BitDepth::TwentyFour, Color::gray(200));
    fill_rect(&mut src, 0, 0, 5, 10, Color::gray(60));
    let input = write_bitmap(dir.path(), "in.bmp", &src);
    let out = dir.path().join("bin.bmp");

    ops::convert_to_binary(&input, &out, BinarizeMode::Direct { threshold: 100 }).unwrap();
    let bin = ops::read_file(&out).unwrap();
    assert_eq!(bin.raster().color(0, 0), Color::BLACK);
    assert_eq!(bin.raster().color(9, 9), Color::WHITE);
    assert_eq!(bin.header(), src.header());
}

#[test]
fn rectangle_written_even_without_dark_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let src = solid(10, 10, BitDepth::TwentyFour, Color::WHITE);
    let input = write_bitmap(dir.path(), "in.bmp", &src);
    let out = dir.path().join("rect.bmp");

    assert_eq!(ops::detect_and_draw_rectangle(&input, &out).unwrap(), None);
    assert_eq!(fs::read(&out).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn rectangle_on_one_bit_copies_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.bmp");
    fs::write(&input, bmp_bytes(Layout::new(12, 6, 1), 3)).unwrap();
    let out = dir.path().join("rect.bmp");

    assert_eq!(ops::detect_and_draw_rectangle(&input, &out).unwrap(), None);
    assert_eq!(fs::read(&out).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn mark_objects_reports_and_draws() {
    let dir = tempfile::tempdir().unwrap();
    let mut src = solid(40, 40, BitDepth::TwentyFour, Color::WHITE);
    fill_rect(&mut src, 10, 10, 10, 10, Color::BLACK);
    let input = write_bitmap(dir.path(), "in.bmp", &src);
    let out = dir.path().join("marked.bmp");

    let found =
        ops::mark_objects_in_binary_image(&input, &out, &DetectOptions::default()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.objects[0].pixel_count, 100);
    let marked = ops::read_file(&out).unwrap();
    assert_eq!(marked.raster().color(8, 8), Color::RED);
}

#[test]
fn compare_writes_change_map() {
    let dir = tempfile::tempdir().unwrap();
    let a = solid(10, 10, BitDepth::TwentyFour, Color::WHITE);
    let mut b = a.clone();
    fill_rect(&mut b, 0, 0, 10, 1, Color::BLACK);
    let pa = write_bitmap(dir.path(), "a.bmp", &a);
    let pb = write_bitmap(dir.path(), "b.bmp", &b);
    let out = dir.path().join("diff.bmp");

    let res = ops::compare_binary_images(&pa, &pb, &out, 5.0).unwrap();
    assert_eq!(res.diff_count, 10);
    assert_eq!(res.diff_percentage, 10.0);
    assert!(res.has_change());
    let map = ops::read_file(&out).unwrap();
    assert_eq!(map.raster().color(3, 0), Color::RED);
    assert_eq!(map.raster().color(3, 1), Color::WHITE);
}

#[test]
fn failures_create_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = solid(10, 10, BitDepth::TwentyFour, Color::WHITE);
    let b = solid(10, 12, BitDepth::TwentyFour, Color::WHITE);
    let pa = write_bitmap(dir.path(), "a.bmp", &a);
    let pb = write_bitmap(dir.path(), "b.bmp", &b);
    let not_bmp = dir.path().join("note.txt");
    fs::write(&not_bmp, b"hello").unwrap();
    let four_bit = dir.path().join("four.bmp");
    fs::write(&four_bit, bmp_bytes(Layout::new(8, 8, 4), 1)).unwrap();

    let out = dir.path().join("out.bmp");
    let out2 = dir.path().join("out2.bmp");

    assert!(matches!(
        ops::compare_binary_images(&pa, &pb, &out, 1.0),
        Err(RasterError::GeometryMismatch { .. })
    ));
    assert!(matches!(
        ops::convert_to_grayscale(&not_bmp, &out, &out2),
        Err(RasterError::NotABitmap)
    ));
    assert!(matches!(
        ops::mark_objects_in_binary_image(&four_bit, &out, &DetectOptions::default()),
        Err(RasterError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        ops::convert_to_binary(&pa, &out, BinarizeMode::Percentage { percent: 101 }),
        Err(RasterError::InvalidParameter(_))
    ));
    assert!(matches!(
        ops::detect_and_draw_rectangle(dir.path().join("missing.bmp"), &out),
        Err(RasterError::Io(_))
    ));
    assert!(!out.exists());
    assert!(!out2.exists());
}

#[test]
fn processor_applies_limits() {
    let dir = tempfile::tempdir().unwrap();
    let src = solid(100, 100, BitDepth::TwentyFour, Color::WHITE);
    let input = write_bitmap(dir.path(), "in.bmp", &src);
    let out = dir.path().join("out.bmp");

    let config = Config::default().with_limits(Limits::default().with_max_pixels(5_000));
    let err = Processor::new(config).mark_objects(&input, &out);
    assert!(matches!(err, Err(RasterError::LimitExceeded(_))));
    assert!(!out.exists());

    let config = Config::default().with_binarize(BinarizeMode::Direct { threshold: 255 });
    let processor = Processor::new(config);
    processor.convert_to_binary(&input, &out).unwrap();
    assert_eq!(
        processor.load(&out).unwrap().raster().color(0, 0),
        Color::WHITE
    );
}
