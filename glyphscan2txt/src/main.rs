#[macro_use]
extern crate common_failures;
extern crate base64;
extern crate docopt;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate glyphscan;
extern crate image;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use docopt::Docopt;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glyphscan::{
    load_pages, render_catalog, wrap, Assembled, DecodeContext, GridGeometry, Icing,
    Mapping, Rect, Result,
};

const USAGE: &'static str = "
Decode glyph-cipher scanned pages into plain text.

Usage:
  glyphscan2txt grid [options] <page-template> <count> <mapping-file>
  glyphscan2txt components [options] <page-template> <count>
  glyphscan2txt --help

The page template names one image file per page, with XXX standing in for
the zero-padded page number (input/EFTA-XXX.png).

Options:
  -o, --out-dir=DIR        Output directory [default: output].
  --skip-pages=N           Leading pages to exclude from decoding
                           [default: 0].
  --prefix=TEXT            Decoded text known to precede the scanned
                           region (grid mode).
  --mapping=FILE           Positional glyph mapping file (components
                           mode); decoding is skipped if it is missing.
  --crop=SPEC              Text-area crop applied to every page, as
                           L,T,W,H (components mode).
  --reference-pages=LIST   Comma-separated page indices whose whitespace
                           profiles drive detection; default is all pages.
  --white-threshold=T      Whitespace profile threshold [default: 0.95].
  --dump-mask              Also write the smeared whitespace mask as
                           mask.png, for tuning the threshold by eye
                           (components mode).
  --decode-payload=FILE    Also base64-decode the assembled text and write
                           the raw bytes to FILE in the output directory.
";

#[derive(Debug, Deserialize)]
struct Args {
    cmd_grid: bool,
    cmd_components: bool,
    arg_page_template: String,
    arg_count: usize,
    arg_mapping_file: Option<String>,
    flag_out_dir: String,
    flag_skip_pages: usize,
    flag_prefix: Option<String>,
    flag_mapping: Option<String>,
    flag_crop: Option<String>,
    flag_reference_pages: Option<String>,
    flag_white_threshold: f64,
    flag_dump_mask: bool,
    flag_decode_payload: Option<String>,
}

quick_main!(run);

/// Summary of a decoding run, written alongside the text output so the
/// manual-mapping workflow can see its progress at a glance.
#[derive(Serialize)]
struct Report {
    pages: usize,
    total_glyphs: usize,
    unique_glyphs: usize,
    unknown_symbols: usize,
    /// Glyph ids carried by each mapped character; several ids under one
    /// character mean pixel-level variants that want a second look.
    variants: BTreeMap<char, Vec<usize>>,
}

fn run() -> Result<()> {
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let out_dir = Path::new(&args.flag_out_dir).to_owned();
    fs::create_dir_all(&out_dir)?;

    let pages = load_pages(&args.arg_page_template, args.arg_count)?;
    let pages: Vec<_> = pages.into_iter().skip(args.flag_skip_pages).collect();
    if pages.is_empty() {
        return Err(format_err!("no pages left after --skip-pages"));
    }

    if args.cmd_grid {
        run_grid(&args, &out_dir, pages)
    } else {
        run_components(&args, &out_dir, pages)
    }
}

fn run_grid(args: &Args, out_dir: &Path, pages: Vec<glyphscan::Page>) -> Result<()> {
    let geometry = GridGeometry::efta_scan();
    let mapping_file = args
        .arg_mapping_file
        .as_ref()
        .expect("docopt guarantees <mapping-file> in grid mode");
    let mapping = Mapping::open_coords(mapping_file, geometry.fingerprint_shape())?;

    let mut ctx = DecodeContext::new(pages);
    ctx.scan_grid(&geometry)?;
    let prefix = args.flag_prefix.as_deref().unwrap_or("");
    let out = ctx.decode_grid(&mapping, prefix);

    let txt_path = out_dir.join("output.txt");
    fs::write(&txt_path, wrap(&out.text, geometry.dims.0 as usize))?;
    info!("Wrote: {}", txt_path.display());

    write_catalog(&ctx, out_dir)?;
    write_report(&ctx, out_dir, &mapping, &out)?;
    decode_payload(args, out_dir, &out.text)?;
    Ok(())
}

fn run_components(args: &Args, out_dir: &Path, pages: Vec<glyphscan::Page>) -> Result<()> {
    let pages = match &args.flag_crop {
        Some(spec) => {
            let crop = parse_crop(spec)?;
            pages
                .into_iter()
                .map(|p| p.cropped(&crop))
                .collect::<Result<Vec<_>>>()?
        }
        None => pages,
    };
    let reference = match &args.flag_reference_pages {
        Some(list) => parse_indices(list)?,
        None => vec![],
    };

    let mut ctx = DecodeContext::new(pages);
    let detection = ctx.scan_components(&reference, args.flag_white_threshold)?;
    if args.flag_dump_mask {
        let path = out_dir.join("mask.png");
        detection.mask.save(&path)?;
        info!("Wrote: {}", path.display());
    }
    write_catalog(&ctx, out_dir)?;

    let mapping = match &args.flag_mapping {
        Some(path) => Mapping::open_positional(path, ctx.alphabet())?,
        None => Mapping::default(),
    };
    if mapping.is_empty() {
        info!("no glyph mappings yet; annotate the catalog and rerun");
        return Ok(());
    }

    let out = ctx.decode_lines(&mapping);
    let txt_path = out_dir.join("plaintext.txt");
    fs::write(&txt_path, format!("{}\n", out.text))?;
    info!(
        "Wrote: {} (with {} unknown symbol(s))",
        txt_path.display(),
        out.unknown_symbols
    );

    write_report(&ctx, out_dir, &mapping, &out)?;
    decode_payload(args, out_dir, &out.text)?;
    Ok(())
}

fn write_catalog(ctx: &DecodeContext, out_dir: &Path) -> Result<()> {
    let catalog = render_catalog(
        ctx.pages(),
        ctx.glyphs(),
        ctx.alphabet(),
        glyphscan::DEFAULT_PANEL,
        Icing::default(),
    );
    let path = out_dir.join("glyph_map.png");
    catalog.save(&path)?;
    info!("Wrote: {}", path.display());
    Ok(())
}

fn write_report(
    ctx: &DecodeContext,
    out_dir: &Path,
    mapping: &Mapping,
    out: &Assembled,
) -> Result<()> {
    let report = Report {
        pages: ctx.pages().len(),
        total_glyphs: ctx.glyphs().len(),
        unique_glyphs: ctx.alphabet().len(),
        unknown_symbols: out.unknown_symbols,
        variants: ctx.alphabet().variants(mapping),
    };
    let path = out_dir.join("report.json");
    let mut f = fs::File::create(&path)?;
    serde_json::to_writer(&mut f, &report)
        .map_err(|e| format_err!("error writing report.json: {}", e))?;
    info!("Wrote: {}", path.display());
    Ok(())
}

/// Base64-decode the assembled text into a binary artifact.  The encoded
/// payload may have been wrapped and re-wrapped on its way through the
/// scanner, so internal whitespace is dropped before decoding.
fn decode_payload(args: &Args, out_dir: &Path, text: &str) -> Result<()> {
    let name = match &args.flag_decode_payload {
        Some(name) => name,
        None => return Ok(()),
    };
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format_err!("assembled text is not valid base64: {}", e))?;
    let path = out_dir.join(name);
    fs::write(&path, bytes)?;
    info!("Wrote: {}", path.display());
    Ok(())
}

fn parse_crop(spec: &str) -> Result<Rect> {
    let parts: Vec<u32> = spec
        .split(',')
        .map(|v| v.trim().parse::<u32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| format_err!("--crop expects L,T,W,H, not {:?}", spec))?;
    if parts.len() != 4 {
        return Err(format_err!("--crop expects L,T,W,H, not {:?}", spec));
    }
    Ok(Rect::ltwh(parts[0], parts[1], parts[2], parts[3]))
}

fn parse_indices(list: &str) -> Result<Vec<usize>> {
    list.split(',')
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| format_err!("--reference-pages expects numbers, not {:?}", v))
        })
        .collect()
}
