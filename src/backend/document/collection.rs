//! Embedded document collection
//!
//! Documents are JSON objects persisted one per line. Two indexes are kept
//! in memory:
//!
//! - `transaction_id` → positions (duplicates are kept and reported)
//! - `date` → positions (ordered; serves date-range candidate lookups)
//!
//! Candidate positions are always visited in insertion order so that ties
//! in later sorts resolve the same way a full scan would.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::ops::Bound;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::dataset::{DatasetError, DatasetResult, Transaction, TransactionField};
use crate::query::{PageWindow, ResultSorter, SortField, SortKey, SortSpec};

use super::pipeline::Stage;
use super::query::DocFilter;

/// Default documents per import batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Outcome of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    /// Inserted documents whose `transaction_id` was already present
    pub duplicate_ids: usize,
}

/// In-memory document collection with secondary indexes
#[derive(Debug, Default)]
pub struct DocumentCollection {
    documents: Vec<Value>,
    id_index: BTreeMap<u64, Vec<usize>>,
    date_index: BTreeMap<String, Vec<usize>>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON-lines file. Blank lines are ignored.
    pub fn open(path: &Path) -> DatasetResult<Self> {
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }
        info!(path = %path.display(), "opening document store");

        let reader = BufReader::new(File::open(path)?);
        let mut collection = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let document: Value =
                serde_json::from_str(&line).map_err(|e| DatasetError::MalformedDocument {
                    line: idx + 1,
                    reason: e.to_string(),
                })?;
            if !document.is_object() {
                return Err(DatasetError::MalformedDocument {
                    line: idx + 1,
                    reason: "expected a JSON object".into(),
                });
            }
            collection.insert(document);
        }

        info!(documents = collection.len(), "document store opened");
        Ok(collection)
    }

    /// Builds a collection from typed records
    pub fn from_transactions(records: &[Transaction]) -> DatasetResult<Self> {
        let mut collection = Self::new();
        for record in records {
            collection.insert(serde_json::to_value(record)?);
        }
        Ok(collection)
    }

    /// Writes `records` to `path` as JSON lines, in batches.
    ///
    /// Every record is written; repeated ids are counted in the report.
    pub fn import(path: &Path, records: &[Transaction], batch_size: usize) -> DatasetResult<ImportReport> {
        let batch_size = batch_size.max(1);
        let mut writer = BufWriter::new(File::create(path)?);
        let mut collection = Self::new();
        let mut report = ImportReport::default();

        for (batch_no, batch) in records.chunks(batch_size).enumerate() {
            let mut written = 0;
            for record in batch {
                if !collection.insert(serde_json::to_value(record)?) {
                    report.duplicate_ids += 1;
                }
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
                written += 1;
            }
            report.inserted += written;
            info!(
                batch = batch_no + 1,
                written,
                total = report.inserted,
                "import batch written"
            );
        }

        writer.flush()?;
        info!(
            inserted = report.inserted,
            duplicate_ids = report.duplicate_ids,
            path = %path.display(),
            "import complete"
        );
        Ok(report)
    }

    /// Inserts one document and indexes it.
    ///
    /// Returns `false` when the id was already present; the document is
    /// stored either way.
    pub fn insert(&mut self, document: Value) -> bool {
        let position = self.documents.len();
        let mut unique = true;

        if let Some(id) = document
            .get(TransactionField::TransactionId.name())
            .and_then(Value::as_u64)
        {
            let positions = self.id_index.entry(id).or_default();
            if !positions.is_empty() {
                warn!(transaction_id = id, "duplicate transaction_id");
                unique = false;
            }
            positions.push(position);
        }

        if let Some(date) = document
            .get(TransactionField::Date.name())
            .and_then(Value::as_str)
        {
            self.date_index
                .entry(date.to_string())
                .or_default()
                .push(position);
        }

        self.documents.push(document);
        unique
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// First document stored under `transaction_id`
    pub fn get(&self, transaction_id: u64) -> Option<&Value> {
        self.id_index
            .get(&transaction_id)
            .and_then(|positions| positions.first())
            .and_then(|pos| self.documents.get(*pos))
    }

    /// Documents that could match `filter`, in insertion order
    fn candidates(&self, filter: &DocFilter) -> Vec<&Value> {
        let Some((from, to)) = filter.date_bounds() else {
            return self.documents.iter().collect();
        };
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Vec::new();
            }
        }

        let lower = from.map_or(Bound::Unbounded, |d| Bound::Included(d.to_string()));
        let upper = to.map_or(Bound::Unbounded, |d| Bound::Included(d.to_string()));
        let mut positions: Vec<usize> = self
            .date_index
            .range((lower, upper))
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect();
        positions.sort_unstable();

        debug!(
            candidates = positions.len(),
            documents = self.documents.len(),
            "date index lookup"
        );
        positions
            .into_iter()
            .filter_map(|pos| self.documents.get(pos))
            .collect()
    }

    /// Matching documents for one page, plus the total match count
    pub fn find(&self, filter: &DocFilter, sort: &SortSpec, window: PageWindow) -> (u64, Vec<&Value>) {
        let matched: Vec<&Value> = self
            .candidates(filter)
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        let total = matched.len() as u64;
        let sorted = ResultSorter::sort(matched, sort, |d, field| document_sort_key(d, field));
        (total, window.apply(sorted))
    }

    /// Runs an aggregation pipeline
    pub fn aggregate(&self, stages: &[Stage]) -> Vec<Value> {
        let mut stream: Vec<Cow<'_, Value>> = match stages.first() {
            Some(Stage::Match(filter)) => self.candidates(filter).into_iter().map(Cow::Borrowed).collect(),
            _ => self.documents.iter().map(Cow::Borrowed).collect(),
        };

        for stage in stages {
            stream = match stage {
                Stage::Match(filter) => stream.into_iter().filter(|d| filter.matches(d)).collect(),
                Stage::Group(spec) => spec
                    .run(stream.iter().map(|d| &**d))
                    .into_iter()
                    .map(Cow::Owned)
                    .collect(),
            };
        }

        stream.into_iter().map(Cow::into_owned).collect()
    }
}

/// Sort key read from a stored document; missing or null values have none.
pub fn document_sort_key(document: &Value, field: SortField) -> Option<SortKey> {
    let value = document.get(field.as_str())?;
    match value {
        Value::Number(n) => n.as_f64().map(SortKey::Number),
        Value::String(s) if field == SortField::CustomerName => Some(SortKey::Text(s.to_lowercase())),
        Value::String(s) => Some(SortKey::Text(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::document::pipeline::{Accumulator, GroupSpec};
    use crate::query::{FilterCriteria, FilterPredicate, PageRequest};
    use serde_json::json;

    fn make(id: u64, date: &str, quantity: u32) -> Transaction {
        Transaction {
            transaction_id: id,
            date: date.into(),
            quantity,
            ..Default::default()
        }
    }

    fn sample() -> DocumentCollection {
        DocumentCollection::from_transactions(&[
            make(1, "2023-01-05", 5),
            make(2, "2023-02-10", 2),
            make(3, "2023-01-05", 5),
            make(4, "2023-03-01", 1),
        ])
        .unwrap()
    }

    fn filter(criteria: FilterCriteria) -> DocFilter {
        DocFilter::from_predicate(&FilterPredicate::build(&criteria).unwrap()).unwrap()
    }

    fn ids(docs: &[&Value]) -> Vec<u64> {
        docs.iter()
            .map(|d| d["transaction_id"].as_u64().unwrap())
            .collect()
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let mut collection = sample();
        assert!(!collection.insert(json!({ "transaction_id": 1, "date": "2023-09-09" })));
        assert_eq!(collection.len(), 5);
        assert_eq!(collection.get(1).unwrap()["date"], "2023-01-05");

        let f = filter(FilterCriteria::new().with_dates(Some("2023-09-01"), None));
        let window = PageWindow::for_request(&PageRequest::default());
        let (total, docs) = collection.find(&f, &SortSpec::default(), window);
        assert_eq!(total, 1);
        assert_eq!(ids(&docs), vec![1]);
    }

    #[test]
    fn test_date_index_keeps_insertion_order() {
        let collection = sample();
        let f = filter(FilterCriteria::new().with_dates(Some("2023-01-01"), Some("2023-02-28")));
        let window = PageWindow::for_request(&PageRequest::default());
        let (total, docs) = collection.find(&f, &SortSpec::desc(SortField::Quantity), window);
        assert_eq!(total, 3);
        assert_eq!(ids(&docs), vec![1, 3, 2]);
    }

    #[test]
    fn test_find_pages() {
        let collection = sample();
        let window = PageWindow::for_request(&PageRequest::new(2, 3).unwrap());
        let (total, docs) = collection.find(&DocFilter::all(), &SortSpec::asc(SortField::Date), window);
        assert_eq!(total, 4);
        assert_eq!(ids(&docs), vec![4]);
    }

    #[test]
    fn test_open_ended_date_range() {
        let collection = sample();
        let f = filter(FilterCriteria::new().with_dates(Some("2023-02-01"), None));
        let window = PageWindow::for_request(&PageRequest::default());
        let (total, docs) = collection.find(&f, &SortSpec::asc(SortField::Date), window);
        assert_eq!(total, 2);
        assert_eq!(ids(&docs), vec![2, 4]);
    }

    #[test]
    fn test_group_by_key() {
        let collection = sample();
        let stages = vec![Stage::Group(
            GroupSpec::by(TransactionField::Date).with_output("count", Accumulator::Count),
        )];
        let out = collection.aggregate(&stages);
        let keys: Vec<&str> = out.iter().map(|g| g["_id"].as_str().unwrap()).collect();
        assert_eq!(keys, vec!["2023-01-05", "2023-02-10", "2023-03-01"]);
        assert_eq!(out[0]["count"], json!(2));
    }

    #[test]
    fn test_aggregate_match_then_group() {
        let collection = sample();
        let stages = vec![
            Stage::Match(filter(FilterCriteria::new().with_dates(None, Some("2023-01-31")))),
            Stage::Group(
                GroupSpec::all()
                    .with_output("units", Accumulator::Sum(TransactionField::Quantity))
                    .with_output("count", Accumulator::Count),
            ),
        ];
        let out = collection.aggregate(&stages);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["units"], json!(10.0));
        assert_eq!(out[0]["count"], json!(2));
    }

    #[test]
    fn test_sort_key_missing_is_none() {
        assert_eq!(document_sort_key(&json!({}), SortField::Date), None);
        assert_eq!(
            document_sort_key(&json!({ "customer_name": "Bob" }), SortField::CustomerName),
            Some(SortKey::Text("bob".into()))
        );
    }

    #[test]
    fn test_import_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.jsonl");
        let records = vec![make(1, "2023-01-01", 1), make(1, "2023-01-02", 2), make(2, "2023-01-03", 3)];

        let report = DocumentCollection::import(&path, &records, 2).unwrap();
        assert_eq!(report, ImportReport { inserted: 3, duplicate_ids: 1 });

        let reopened = DocumentCollection::open(&path).unwrap();
        assert_eq!(reopened.len(), 3);
        assert_eq!(reopened.get(1).unwrap()["quantity"], 1);
    }

    #[test]
    fn test_open_rejects_non_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{\"transaction_id\": 1}\n\n[1, 2]\n").unwrap();
        match DocumentCollection::open(&path) {
            Err(DatasetError::MalformedDocument { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
