//! Aggregation pipeline
//!
//! A small subset of a document-store pipeline: `$match` narrows the stream,
//! `$group` folds it into one output document per group key.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::dataset::TransactionField;

use super::query::DocFilter;

/// One pipeline stage
#[derive(Debug, Clone)]
pub enum Stage {
    Match(DocFilter),
    Group(GroupSpec),
}

/// Group stage: optional key field plus named accumulators
#[derive(Debug, Clone)]
pub struct GroupSpec {
    /// `None` folds everything into a single group
    pub key: Option<TransactionField>,
    pub outputs: Vec<(String, Accumulator)>,
}

impl GroupSpec {
    pub fn all() -> Self {
        Self {
            key: None,
            outputs: Vec::new(),
        }
    }

    pub fn by(field: TransactionField) -> Self {
        Self {
            key: Some(field),
            outputs: Vec::new(),
        }
    }

    pub fn with_output(mut self, name: impl Into<String>, acc: Accumulator) -> Self {
        self.outputs.push((name.into(), acc));
        self
    }
}

/// Group accumulators
#[derive(Debug, Clone, Copy)]
pub enum Accumulator {
    /// `$sum` of a numeric field; non-numeric values count as zero
    Sum(TransactionField),
    /// `$sum` of `minuend - subtrahend`
    SumDifference(TransactionField, TransactionField),
    /// `$sum: 1`
    Count,
}

#[derive(Debug, Clone, Copy)]
enum Running {
    Float(f64),
    Int(u64),
}

impl Accumulator {
    fn start(&self) -> Running {
        match self {
            Accumulator::Count => Running::Int(0),
            _ => Running::Float(0.0),
        }
    }

    fn fold(&self, running: &mut Running, document: &Value) {
        match (self, running) {
            (Accumulator::Sum(field), Running::Float(acc)) => *acc += number(document, *field),
            (Accumulator::SumDifference(a, b), Running::Float(acc)) => {
                *acc += number(document, *a) - number(document, *b)
            }
            (Accumulator::Count, Running::Int(acc)) => *acc += 1,
            _ => {}
        }
    }

    fn to_document(&self) -> Value {
        match self {
            Accumulator::Sum(field) => json!({ "$sum": format!("${}", field.name()) }),
            Accumulator::SumDifference(a, b) => json!({
                "$sum": { "$subtract": [format!("${}", a.name()), format!("${}", b.name())] }
            }),
            Accumulator::Count => json!({ "$sum": 1 }),
        }
    }
}

fn number(document: &Value, field: TransactionField) -> f64 {
    document
        .get(field.name())
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

impl Running {
    fn into_value(self) -> Value {
        match self {
            Running::Float(v) => json!(v),
            Running::Int(v) => json!(v),
        }
    }
}

impl GroupSpec {
    /// Folds documents in input order. Groups come out ordered by key.
    pub(crate) fn run<'a, I>(&self, documents: I) -> Vec<Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut groups: BTreeMap<String, (Value, Vec<Running>)> = BTreeMap::new();

        for document in documents {
            let key_value = self
                .key
                .and_then(|f| document.get(f.name()).cloned())
                .unwrap_or(Value::Null);
            let entry = groups.entry(key_value.to_string()).or_insert_with(|| {
                let start = self.outputs.iter().map(|(_, acc)| acc.start()).collect();
                (key_value.clone(), start)
            });
            for ((_, acc), running) in self.outputs.iter().zip(entry.1.iter_mut()) {
                acc.fold(running, document);
            }
        }

        groups
            .into_values()
            .map(|(key, running)| {
                let mut out = Map::new();
                out.insert("_id".into(), key);
                for ((name, _), value) in self.outputs.iter().zip(running) {
                    out.insert(name.clone(), value.into_value());
                }
                Value::Object(out)
            })
            .collect()
    }

    pub fn to_document(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            "_id".into(),
            self.key
                .map(|f| Value::String(format!("${}", f.name())))
                .unwrap_or(Value::Null),
        );
        for (name, acc) in &self.outputs {
            body.insert(name.clone(), acc.to_document());
        }
        json!({ "$group": body })
    }
}

impl Stage {
    pub fn to_document(&self) -> Value {
        match self {
            Stage::Match(filter) => json!({ "$match": filter.to_document() }),
            Stage::Group(spec) => spec.to_document(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Value> {
        vec![
            json!({ "gender": "male", "quantity": 2, "total_amount": 100.0, "final_amount": 90.0 }),
            json!({ "gender": "female", "quantity": 3, "total_amount": 50.0, "final_amount": 50.0 }),
            json!({ "gender": "male", "quantity": 1, "total_amount": 10.0, "final_amount": 5.0 }),
        ]
    }

    #[test]
    fn test_single_group_sums() {
        let spec = GroupSpec::all()
            .with_output("units", Accumulator::Sum(TransactionField::Quantity))
            .with_output(
                "discount",
                Accumulator::SumDifference(
                    TransactionField::TotalAmount,
                    TransactionField::FinalAmount,
                ),
            )
            .with_output("count", Accumulator::Count);
        let docs = docs();
        let out = spec.run(&docs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["units"], json!(6.0));
        assert_eq!(out[0]["discount"], json!(15.0));
        assert_eq!(out[0]["count"], json!(3));
    }

    #[test]
    fn test_group_by_key() {
        let spec = GroupSpec::by(TransactionField::Gender).with_output("count", Accumulator::Count);
        let docs = docs();
        let out = spec.run(&docs);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["_id"], "female");
        assert_eq!(out[1]["count"], json!(2));
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        let spec = GroupSpec::all().with_output("count", Accumulator::Count);
        assert!(spec.run(&Vec::<Value>::new()).is_empty());
    }

    #[test]
    fn test_rendering() {
        let stage = Stage::Group(GroupSpec::all().with_output("n", Accumulator::Count));
        assert_eq!(
            stage.to_document(),
            json!({ "$group": { "_id": null, "n": { "$sum": 1 } } })
        );
    }
}
