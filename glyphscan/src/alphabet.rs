//! The deduplicated glyph alphabet.

use std::collections::{BTreeMap, HashMap};

use crate::glyph::Fingerprint;
use crate::mapping::Mapping;

/// The sentinel emitted for glyphs with no character mapping.
pub const UNKNOWN_CHAR: char = '?';

/// What a fingerprint resolved to.  "Unknown" is an explicit value rather
/// than an error or a `None`, because unresolved glyphs are an expected,
/// counted part of every decoding run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolved {
    /// The external mapping assigned this character.
    Known(char),
    /// The fingerprint has no entry in the external mapping.
    Unknown,
}

impl Resolved {
    /// The character to emit into decoded text.
    pub fn to_char(self) -> char {
        match self {
            Resolved::Known(c) => c,
            Resolved::Unknown => UNKNOWN_CHAR,
        }
    }
}

/// A registry assigning a stable small integer to every distinct
/// fingerprint seen during a run, in first-seen order.
///
/// There is deliberately no process-wide registry: every scan owns its
/// alphabet, so independent runs (and tests) never share identity state.
#[derive(Default)]
pub struct Alphabet {
    ids: HashMap<Fingerprint, usize>,
    order: Vec<Fingerprint>,
}

impl Alphabet {
    /// Create an empty alphabet.
    pub fn new() -> Alphabet {
        Alphabet::default()
    }

    /// Return the id for `fingerprint`, assigning the next free one on
    /// first sight.  Idempotent; ids never change once assigned.
    pub fn register(&mut self, fingerprint: &Fingerprint) -> usize {
        if let Some(&id) = self.ids.get(fingerprint) {
            return id;
        }
        let id = self.order.len();
        self.ids.insert(fingerprint.to_owned(), id);
        self.order.push(fingerprint.to_owned());
        id
    }

    /// The id previously assigned to `fingerprint`, if any.
    pub fn id(&self, fingerprint: &Fingerprint) -> Option<usize> {
        self.ids.get(fingerprint).copied()
    }

    /// Number of distinct fingerprints registered.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Is the alphabet still empty?
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over all distinct fingerprints in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.order.iter()
    }

    /// Resolve a fingerprint to a character through the external mapping.
    pub fn resolve(&self, fingerprint: &Fingerprint, mapping: &Mapping) -> Resolved {
        match mapping.get(fingerprint) {
            Some(c) => Resolved::Known(c),
            None => Resolved::Unknown,
        }
    }

    /// Reverse lookup for manual-mapping review: every mapped character
    /// together with the ids of all glyph variants carrying it.
    pub fn variants(&self, mapping: &Mapping) -> BTreeMap<char, Vec<usize>> {
        let mut out: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        for (id, fingerprint) in self.order.iter().enumerate() {
            if let Some(c) = mapping.get(fingerprint) {
                out.entry(c).or_default().push(id);
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fp(data: &[u8]) -> Fingerprint {
        Fingerprint::from_parts(data.len() as u32, 1, data.to_vec()).unwrap()
    }

    #[test]
    fn register_is_idempotent_and_first_seen_ordered() {
        let mut alphabet = Alphabet::new();
        let a = fp(&[1, 2]);
        let b = fp(&[3, 4]);
        assert_eq!(alphabet.register(&a), 0);
        assert_eq!(alphabet.register(&b), 1);
        assert_eq!(alphabet.register(&a), 0);
        assert_eq!(alphabet.len(), 2);
        let order: Vec<_> = alphabet.iter().cloned().collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn ids_strictly_increase_by_one_per_new_fingerprint() {
        let mut alphabet = Alphabet::new();
        for i in 0..10u8 {
            assert_eq!(alphabet.register(&fp(&[i])), usize::from(i));
        }
        // Re-registering in a different order changes nothing.
        for i in (0..10u8).rev() {
            assert_eq!(alphabet.register(&fp(&[i])), usize::from(i));
        }
    }

    #[test]
    fn identical_cells_share_an_id() {
        use crate::geom::Rect;
        use crate::glyph::Fingerprint;
        use crate::test_util::page_with_blocks;

        // A 2x2-cell page: (0,0) and (1,1) are identical gray squares, the
        // other two cells are white.
        let page = page_with_blocks(
            8,
            8,
            &[(Rect::ltwh(0, 0, 4, 4), 100), (Rect::ltwh(4, 4, 4, 4), 100)],
        );
        let mut alphabet = Alphabet::new();
        let mut ids = vec![];
        for (cx, cy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let rect = Rect::ltwh(cx * 4, cy * 4, 4, 4);
            ids.push(alphabet.register(&Fingerprint::of_region(page.image(), &rect)));
        }
        assert_eq!(ids, vec![0, 1, 1, 0]);
        assert_eq!(alphabet.len(), 2);
    }

    #[test]
    fn variants_group_ids_by_mapped_character() {
        let mut alphabet = Alphabet::new();
        let a1 = fp(&[1]);
        let a2 = fp(&[2]);
        let unmapped = fp(&[3]);
        alphabet.register(&a1);
        alphabet.register(&a2);
        alphabet.register(&unmapped);

        let mut mapping = Mapping::default();
        mapping.insert(a1.clone(), 'l');
        mapping.insert(a2.clone(), 'l');

        let variants = alphabet.variants(&mapping);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[&'l'], vec![0, 1]);
        assert_eq!(alphabet.resolve(&unmapped, &mapping), Resolved::Unknown);
        assert_eq!(alphabet.resolve(&a1, &mapping), Resolved::Known('l'));
    }
}
