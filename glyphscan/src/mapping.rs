//! The human-maintained fingerprint-to-character mapping.
//!
//! Mappings are built by hand, one glyph at a time, from the catalog image;
//! they are incomplete by nature.  Two on-disk formats exist:
//!
//! * **Coordinate lines** (fixed-grid mode): one entry per line, shaped
//!   `<char>: (<v0>, <v1>, ...)` where the value list is the glyph's
//!   row-major intensity sequence.
//! * **Positional** (component mode): a flat character sequence whose i-th
//!   character annotates the i-th glyph of the catalog, i.e. the i-th
//!   distinct fingerprint in first-seen order.
//!
//! In both formats the character `?` means "not identified yet" and is
//! excluded from the mapping, so those glyphs stay unknown.

use common_failures::prelude::*;
use regex::Regex;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use crate::alphabet::{Alphabet, UNKNOWN_CHAR};
use crate::glyph::Fingerprint;

/// An external fingerprint-to-character mapping.  Lookups of fingerprints
/// that were never annotated simply return `None`; that is the normal state
/// of affairs mid-transcription, not an error.
#[derive(Default)]
pub struct Mapping {
    entries: std::collections::HashMap<Fingerprint, char>,
}

impl Mapping {
    /// Parse coordinate-line entries for fingerprints of the given
    /// `(width, height)` shape.  Malformed lines (bad number, wrong value
    /// count, no separator) are skipped, not fatal: mapping files are
    /// hand-edited and half-finished lines are common.
    pub fn parse_coords<R: BufRead>(input: R, shape: (u32, u32)) -> Result<Mapping> {
        lazy_static! {
            static ref ENTRY: Regex = Regex::new(r"^(.): \((.*)\)$").unwrap();
        }

        let mut mapping = Mapping::default();
        for line in input.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let cap = match ENTRY.captures(&line) {
                Some(cap) => cap,
                None => {
                    debug!("skipping unparseable mapping line: {:?}", line);
                    continue;
                }
            };
            let c = cap.get(1).unwrap().as_str().chars().next().unwrap();
            let values: ::std::result::Result<Vec<u8>, _> = cap
                .get(2)
                .unwrap()
                .as_str()
                .split(", ")
                .map(|v| v.parse::<u8>())
                .collect();
            let values = match values {
                Ok(values) => values,
                Err(_) => {
                    debug!("skipping mapping line with bad values: {:?}", line);
                    continue;
                }
            };
            let fingerprint = match Fingerprint::from_parts(shape.0, shape.1, values) {
                Some(fingerprint) => fingerprint,
                None => {
                    debug!("skipping mapping line with wrong shape: {:?}", line);
                    continue;
                }
            };
            if c != UNKNOWN_CHAR {
                mapping.entries.insert(fingerprint, c);
            }
        }
        Ok(mapping)
    }

    /// Parse a positional mapping against the fingerprints registered in
    /// `alphabet`: lines are right-trimmed and concatenated, and the i-th
    /// character annotates the i-th first-seen fingerprint.  Characters
    /// past the end of the alphabet are ignored, as are `?` entries.
    pub fn parse_positional<R: BufRead>(input: R, alphabet: &Alphabet) -> Result<Mapping> {
        let mut meanings = String::new();
        for line in input.lines() {
            meanings.push_str(line?.trim_end());
        }

        let mut mapping = Mapping::default();
        for (fingerprint, c) in alphabet.iter().zip(meanings.chars()) {
            if c != UNKNOWN_CHAR {
                mapping.entries.insert(fingerprint.to_owned(), c);
            }
        }
        Ok(mapping)
    }

    /// Read a coordinate-line mapping file.  A missing file is fatal: grid
    /// decoding without any mapping would produce nothing but `?`.
    pub fn open_coords<P: AsRef<Path>>(path: P, shape: (u32, u32)) -> Result<Mapping> {
        let path = path.as_ref();
        let f = fs::File::open(path)
            .with_context(|_| format!("could not read mapping file {}", path.display()))?;
        info!("Loading mappings from {}", path.display());
        Mapping::parse_coords(io::BufReader::new(f), shape)
    }

    /// Read a positional mapping file if it exists.  A missing file yields
    /// an empty mapping: on a first pass the catalog has not been annotated
    /// yet, and the caller still wants the catalog image out.
    pub fn open_positional<P: AsRef<Path>>(path: P, alphabet: &Alphabet) -> Result<Mapping> {
        let path = path.as_ref();
        if !path.exists() {
            info!("no mapping file at {}; all glyphs unknown", path.display());
            return Ok(Mapping::default());
        }
        let f = fs::File::open(path)
            .with_context(|_| format!("could not read mapping file {}", path.display()))?;
        info!("Loading mappings from {}", path.display());
        Mapping::parse_positional(io::BufReader::new(f), alphabet)
    }

    /// Add or replace a single entry.
    pub fn insert(&mut self, fingerprint: Fingerprint, c: char) {
        self.entries.insert(fingerprint, c);
    }

    /// The character mapped to `fingerprint`, if it has been identified.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<char> {
        self.entries.get(fingerprint).copied()
    }

    /// Number of identified fingerprints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Does this mapping identify no fingerprints at all?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fp(data: &[u8]) -> Fingerprint {
        Fingerprint::from_parts(data.len() as u32, 1, data.to_vec()).unwrap()
    }

    #[test]
    fn coordinate_lines_parse() {
        let input = "A: (0, 128, 255)\nb: (1, 2, 3)\n";
        let mapping = Mapping::parse_coords(input.as_bytes(), (3, 1)).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(&fp(&[0, 128, 255])), Some('A'));
        assert_eq!(mapping.get(&fp(&[1, 2, 3])), Some('b'));
    }

    #[test]
    fn malformed_lines_are_skipped_silently() {
        let _ = env_logger::try_init();
        let input = "\
A: (0, 128, 255)
garbage
B: (1, 2, banana)
C: (1, 2)
D: (9, 9, 999)
E: (7, 8, 9)
";
        let mapping = Mapping::parse_coords(input.as_bytes(), (3, 1)).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(&fp(&[0, 128, 255])), Some('A'));
        assert_eq!(mapping.get(&fp(&[7, 8, 9])), Some('E'));
    }

    #[test]
    fn question_mark_entries_stay_unknown() {
        let input = "?: (1, 2, 3)\nX: (4, 5, 6)\n";
        let mapping = Mapping::parse_coords(input.as_bytes(), (3, 1)).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get(&fp(&[1, 2, 3])), None);
    }

    #[test]
    fn positional_mapping_follows_first_seen_order() {
        let mut alphabet = Alphabet::new();
        let a = fp(&[1]);
        let b = fp(&[2]);
        let c = fp(&[3]);
        alphabet.register(&a);
        alphabet.register(&b);
        alphabet.register(&c);

        let mapping = Mapping::parse_positional("x?\nz".as_bytes(), &alphabet).unwrap();
        assert_eq!(mapping.get(&a), Some('x'));
        assert_eq!(mapping.get(&b), None);
        assert_eq!(mapping.get(&c), Some('z'));
    }

    #[test]
    fn positional_mapping_may_be_shorter_than_the_alphabet() {
        let mut alphabet = Alphabet::new();
        let a = fp(&[1]);
        let b = fp(&[2]);
        alphabet.register(&a);
        alphabet.register(&b);

        let mapping = Mapping::parse_positional("x".as_bytes(), &alphabet).unwrap();
        assert_eq!(mapping.get(&a), Some('x'));
        assert_eq!(mapping.get(&b), None);
    }

    #[test]
    fn missing_positional_file_is_an_empty_mapping() {
        let alphabet = Alphabet::new();
        let mapping = Mapping::open_positional("no-such-mapping.txt", &alphabet).unwrap();
        assert!(mapping.is_empty());
    }
}
