//! # Integration tests.
//!
//! These tests are run on our executable to make sure that all the
//! command-line options work correctly.  Page fixtures are synthesized
//! with the `image` crate so every pixel value is known exactly.

extern crate cli_test_dir;
extern crate image;

use cli_test_dir::TestDir;
use image::{Rgb, RgbImage};
use std::io::Cursor;

fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(vec![]);
    img.write_to(&mut out, image::ImageOutputFormat::Png)
        .expect("could not encode PNG");
    out.into_inner()
}

/// A white page with solid gray blocks, each `(left, top, width, height,
/// level)`.
fn page_with_blocks(width: u32, height: u32, blocks: &[(u32, u32, u32, u32, u8)]) -> Vec<u8> {
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for &(left, top, w, h, level) in blocks {
        for y in top..top + h {
            for x in left..left + w {
                img.put_pixel(x, y, Rgb([level, level, level]));
            }
        }
    }
    png_bytes(&img)
}

#[test]
fn components_decodes_lines() {
    let workdir = TestDir::new("glyphscan2txt", "components_decodes_lines");
    // Two distinct blocks on one text line.
    workdir.create_file(
        "page-000.png",
        page_with_blocks(20, 12, &[(3, 4, 3, 3, 0), (12, 4, 3, 3, 60)]),
    );
    workdir.create_file("mapping.txt", "AB\n");

    let status = workdir
        .cmd()
        .args(&["components", "--mapping", "mapping.txt", "page-XXX.png", "1"])
        .status()
        .expect("could not run command");
    assert!(status.success());

    workdir.expect_file_contents("output/plaintext.txt", "AB\n");
    workdir.expect_path("output/glyph_map.png");
    workdir.expect_contains("output/report.json", "\"unique_glyphs\":2");
    workdir.expect_contains("output/report.json", "\"unknown_symbols\":0");
}

#[test]
fn unannotated_glyphs_come_out_as_question_marks() {
    let workdir = TestDir::new("glyphscan2txt", "unannotated_glyphs");
    workdir.create_file(
        "page-000.png",
        page_with_blocks(20, 12, &[(3, 4, 3, 3, 0), (12, 4, 3, 3, 60)]),
    );
    workdir.create_file("mapping.txt", "A?\n");

    let status = workdir
        .cmd()
        .args(&["components", "--mapping", "mapping.txt", "page-XXX.png", "1"])
        .status()
        .expect("could not run command");
    assert!(status.success());

    workdir.expect_file_contents("output/plaintext.txt", "A?\n");
    workdir.expect_contains("output/report.json", "\"unknown_symbols\":1");
}

#[test]
fn missing_mapping_still_writes_the_catalog() {
    let workdir = TestDir::new("glyphscan2txt", "missing_mapping");
    workdir.create_file(
        "page-000.png",
        page_with_blocks(20, 12, &[(3, 4, 3, 3, 0)]),
    );

    let status = workdir
        .cmd()
        .args(&[
            "components",
            "--mapping",
            "mapping.txt",
            "--dump-mask",
            "page-XXX.png",
            "1",
        ])
        .status()
        .expect("could not run command");
    assert!(status.success());

    workdir.expect_path("output/glyph_map.png");
    workdir.expect_path("output/mask.png");
    workdir.expect_no_such_path("output/plaintext.txt");
    workdir.expect_no_such_path("output/report.json");
}

#[test]
fn payload_is_base64_decoded() {
    let workdir = TestDir::new("glyphscan2txt", "payload_decode");
    // Four distinct blocks spelling the base64 string "QUJD" ("ABC").
    workdir.create_file(
        "page-000.png",
        page_with_blocks(
            20,
            12,
            &[
                (2, 4, 2, 3, 0),
                (6, 4, 2, 3, 60),
                (10, 4, 2, 3, 120),
                (14, 4, 2, 3, 180),
            ],
        ),
    );
    workdir.create_file("mapping.txt", "QUJD\n");

    let status = workdir
        .cmd()
        .args(&[
            "components",
            "--mapping",
            "mapping.txt",
            "--decode-payload",
            "payload.bin",
            "page-XXX.png",
            "1",
        ])
        .status()
        .expect("could not run command");
    assert!(status.success());

    workdir.expect_file_contents("output/plaintext.txt", "QUJD\n");
    workdir.expect_file_contents("output/payload.bin", "ABC");
}

#[test]
fn grid_mode_decodes_a_blank_scan() {
    let workdir = TestDir::new("glyphscan2txt", "grid_blank_scan");
    // An all-white page carries one distinct glyph: the blank cell.
    workdir.create_file("page-000.png", page_with_blocks(660, 1020, &[]));
    let values = vec!["255"; 66].join(", ");
    workdir.create_file("mappings.txt", format!("A: ({})\n", values));

    let status = workdir
        .cmd()
        .args(&["grid", "page-XXX.png", "1", "mappings.txt"])
        .status()
        .expect("could not run command");
    assert!(status.success());

    workdir.expect_contains(
        "output/output.txt",
        &"A".repeat(76),
    );
    workdir.expect_contains("output/report.json", "\"unique_glyphs\":1");
    workdir.expect_contains("output/report.json", "\"unknown_symbols\":0");
}

#[test]
fn skip_pages_excludes_leading_pages() {
    let workdir = TestDir::new("glyphscan2txt", "skip_pages");
    // The glyph on page 0 never appears in the output.
    workdir.create_file(
        "page-000.png",
        page_with_blocks(20, 12, &[(3, 4, 3, 3, 120)]),
    );
    workdir.create_file(
        "page-001.png",
        page_with_blocks(20, 12, &[(3, 4, 3, 3, 0)]),
    );
    workdir.create_file("mapping.txt", "B\n");

    let status = workdir
        .cmd()
        .args(&[
            "components",
            "--skip-pages",
            "1",
            "--mapping",
            "mapping.txt",
            "page-XXX.png",
            "2",
        ])
        .status()
        .expect("could not run command");
    assert!(status.success());

    workdir.expect_file_contents("output/plaintext.txt", "B\n");
    workdir.expect_contains("output/report.json", "\"unique_glyphs\":1");
}
