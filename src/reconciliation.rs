mod event;
mod recipient;

pub use event::{
    EventKind, LcaPair, ReconciliationRecord, RecordError, classify,
    extract_fields, parse_record,
};
pub use recipient::{
    RecipientError, RecipientMatch, RecipientResolution, TransferBackTarget,
    resolve_recipients,
};

use rustc_hash::FxHashMap;

/// The parsed reconciliation block, in report order.
///
/// Report order is not guaranteed to follow tree topology. Lookups by node
/// name resolve to the first record carrying that name.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    records: Vec<ReconciliationRecord>,
    index: FxHashMap<String, usize>,
}

impl Reconciliation {
    pub fn new(records: Vec<ReconciliationRecord>) -> Self {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        for (i, record) in records.iter().enumerate() {
            let _ = index.entry(record.node_name().to_string()).or_insert(i);
        }
        Self { records, index }
    }

    pub fn records(&self) -> &[ReconciliationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReconciliationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, node_name: &str) -> Option<&ReconciliationRecord> {
        self.index.get(node_name).map(|&i| &self.records[i])
    }

    /// The species a node is mapped to.
    pub fn find_map(&self, node_name: &str) -> Option<&str> {
        self.find(node_name).map(|record| record.mapped_species())
    }

    /// Leaf records whose name starts with `prefix`, in report order.
    pub fn leaves_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a ReconciliationRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.is_leaf() && r.node_name().starts_with(prefix))
    }
}

impl FromIterator<ReconciliationRecord> for Reconciliation {
    fn from_iter<T: IntoIterator<Item = ReconciliationRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Reconciliation {
    type Item = &'a ReconciliationRecord;
    type IntoIter = std::slice::Iter<'a, ReconciliationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
