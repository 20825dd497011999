use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::geometry::Feature;
use crate::record::ClimateRecord;

/// Canonical key → climate record, built once per dataset load.
///
/// Records keep their dataset order for search. When two records share a key
/// the later one wins the lookup; the duplicates are counted, not rejected.
#[derive(Debug, Clone, Default)]
pub struct JoinIndex {
    records: Vec<ClimateRecord>,
    by_key: HashMap<String, usize>,
    duplicates: usize,
}

impl JoinIndex {
    pub fn build(records: Vec<ClimateRecord>) -> Self {
        let mut by_key = HashMap::with_capacity(records.len());
        let mut duplicates = 0usize;
        for (i, r) in records.iter().enumerate() {
            if by_key.insert(r.code_insee.clone(), i).is_some() {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            warn!(duplicates, "duplicate INSEE codes in climate table; last record wins");
        }
        Self { records, by_key, duplicates }
    }

    #[inline]
    pub fn lookup(&self, key: &str) -> Option<&ClimateRecord> {
        self.by_key.get(key).map(|&i| &self.records[i])
    }

    /// All records in dataset order, duplicates included.
    pub fn records(&self) -> &[ClimateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Count how many features find a record. Logged as a diagnostic only.
    pub fn join_report<'a>(&self, features: impl IntoIterator<Item = &'a Feature>) -> JoinReport {
        let mut report = JoinReport::default();
        for f in features {
            if self.lookup(&f.join_key()).is_some() {
                report.joined += 1;
            } else {
                report.unjoined += 1;
            }
        }
        info!(
            joined = report.joined,
            unjoined = report.unjoined,
            "communes with DRIAS data / without match"
        );
        report
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub joined: usize,
    pub unjoined: usize,
}
