//! Counting symbol occurrences.

use huffman::Symbol;

use vec_map::VecMap;

/// A newtype for `usize` counting the occurrences of a symbol.
///
/// Counts only matter while a tree is being built; a finished tree
/// carries none.
#[derive(
    Debug, Default, Display, From, Into, Add, AddAssign, Clone, Copy, PartialOrd, Ord, PartialEq,
    Eq,
)]
pub struct Instances(usize);

impl Instances {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl std::iter::Sum for Instances {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Instances>,
    {
        iter.fold(Default::default(), std::ops::Add::add)
    }
}

/// Occurrence counts for an alphabet, indexed by symbol value.
///
/// The table is sparse: symbols never seen carry no entry, and zero-count
/// entries are skipped when a tree is built from the table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable(VecMap<Instances>);

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable(VecMap::new())
    }

    /// Count every byte of `source`.
    pub fn tally_bytes(source: &[u8]) -> Self {
        let mut table = FrequencyTable::new();
        for &byte in source {
            table.add(Symbol::from(byte));
        }
        table
    }

    /// Record one more occurrence of `symbol`.
    pub fn add(&mut self, symbol: Symbol) {
        let counter = self
            .0
            .entry(symbol.as_u16() as usize)
            .or_insert(Instances::from(0));
        *counter += Instances::from(1);
    }

    /// The recorded count for `symbol`; 0 if never seen.
    pub fn get(&self, symbol: Symbol) -> Instances {
        self.0
            .get(symbol.as_u16() as usize)
            .cloned()
            .unwrap_or_default()
    }

    /// The recorded counts, by ascending symbol value.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (Symbol, Instances)> + 'a {
        self.0
            .iter()
            .map(|(index, &instances)| (Symbol::new(index as u16), instances))
    }
}

#[test]
fn test_tally() {
    let table = FrequencyTable::tally_bytes(b"abracadabra");
    assert_eq!(table.get(Symbol::from(b'a')), Instances::from(5));
    assert_eq!(table.get(Symbol::from(b'b')), Instances::from(2));
    assert_eq!(table.get(Symbol::from(b'r')), Instances::from(2));
    assert_eq!(table.get(Symbol::from(b'c')), Instances::from(1));
    assert_eq!(table.get(Symbol::from(b'd')), Instances::from(1));
    assert_eq!(table.get(Symbol::from(b'z')), Instances::from(0));
}

#[test]
fn test_iter_ascends_by_symbol() {
    let mut table = FrequencyTable::new();
    table.add(Symbol::new(200));
    table.add(Symbol::new(3));
    table.add(Symbol::new(90));
    table.add(Symbol::new(3));

    let recorded: Vec<_> = table.iter().collect();
    assert_eq!(
        recorded,
        vec![
            (Symbol::new(3), Instances::from(2)),
            (Symbol::new(90), Instances::from(1)),
            (Symbol::new(200), Instances::from(1)),
        ]
    );
}
