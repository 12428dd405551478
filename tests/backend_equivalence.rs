//! Backend Equivalence Tests
//!
//! Every property runs against both backends through one harness. For
//! each backend the results must satisfy the property, and the two
//! backends must produce identical output for identical requests.

use std::sync::Arc;

use salesdb::backend::{DocumentBackend, DocumentCollection, MemoryBackend};
use salesdb::dataset::Transaction;
use salesdb::engine::QueryEngine;
use salesdb::query::{
    FilterCriteria, ListRequest, PageRequest, QueryErrorCode, SortDirection, SortField, SortSpec,
};

// =============================================================================
// Harness
// =============================================================================

fn engines(records: &[Transaction]) -> Vec<(&'static str, QueryEngine)> {
    let collection = DocumentCollection::from_transactions(records).unwrap();
    vec![
        (
            "memory",
            QueryEngine::new(Arc::new(MemoryBackend::new(records.to_vec()))),
        ),
        (
            "document",
            QueryEngine::new(Arc::new(DocumentBackend::new(collection))),
        ),
    ]
}

/// Runs `check` on every backend and asserts all return the same JSON
fn on_all_backends<T, F>(records: &[Transaction], check: F) -> T
where
    T: serde::Serialize,
    F: Fn(&str, &QueryEngine) -> T,
{
    let mut outputs: Vec<(String, T)> = engines(records)
        .iter()
        .map(|(name, engine)| (name.to_string(), check(*name, engine)))
        .collect();

    let first = serde_json::to_string(&outputs[0].1).unwrap();
    for (name, output) in &outputs[1..] {
        assert_eq!(
            serde_json::to_string(output).unwrap(),
            first,
            "{} backend diverged from {}",
            name,
            outputs[0].0
        );
    }
    outputs.remove(0).1
}

const REGIONS: [&str; 4] = ["north", "south", "east", "west"];
const GENDERS: [&str; 2] = ["male", "female"];
const CATEGORIES: [&str; 3] = ["beauty", "electronics", "clothing"];
const PAYMENTS: [&str; 3] = ["upi", "cash", "credit card"];
const TAGS: [&str; 5] = ["organic", "organics", "skincare", "gadgets", "wireless"];
const NAMES: [&str; 6] = ["Neha Khan", "arjun mehta", "Priya Shah", "Rahul Verma", "anita Roy", "Vikram Das"];

/// Deterministic pseudo-random dataset
fn dataset(n: u64) -> Vec<Transaction> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move |bound: u64| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) % bound
    };

    (1..=n)
        .map(|id| {
            let quantity = next(10) as u32 + 1;
            let price = (next(5000) + 100) as f64;
            let total = price * f64::from(quantity);
            let discount = next(30) as f64;
            let tag_a = TAGS[next(5) as usize];
            let tag_b = TAGS[next(5) as usize];
            Transaction {
                transaction_id: id,
                date: format!("2023-{:02}-{:02}", next(12) + 1, next(28) + 1),
                customer_id: format!("CUST-{}", 40000 + next(1000)),
                customer_name: NAMES[next(6) as usize].to_string(),
                phone_number: format!("9{:09}", next(1_000_000_000)),
                gender: GENDERS[next(2) as usize].to_string(),
                age: next(60) as u32 + 18,
                customer_region: REGIONS[next(4) as usize].to_string(),
                customer_type: "returning".to_string(),
                product_id: format!("PROD-{}", 8000 + next(500)),
                product_name: "Herbal Face Wash".to_string(),
                brand: "SilkSkin".to_string(),
                product_category: CATEGORIES[next(3) as usize].to_string(),
                tags: format!("{},{}", tag_a, tag_b),
                quantity,
                price_per_unit: price,
                discount_percentage: discount,
                total_amount: total,
                final_amount: total * (1.0 - discount / 100.0),
                payment_method: PAYMENTS[next(3) as usize].to_string(),
                order_status: "completed".to_string(),
                delivery_type: "standard".to_string(),
                store_id: format!("ST-{:03}", next(20)),
                store_location: "Ahmedabad".to_string(),
                salesperson_id: format!("EMP-{}", 7000 + next(999)),
                employee_name: "Harsh Agarwal".to_string(),
            }
        })
        .collect()
}

fn list(engine: &QueryEngine, filters: FilterCriteria, sort: SortSpec, page: u32, size: u32) -> salesdb::query::TransactionPage {
    engine
        .list_transactions(&ListRequest::new(
            filters,
            sort,
            PageRequest::new(page, size).unwrap(),
        ))
        .unwrap()
}

fn ids(page: &salesdb::query::TransactionPage) -> Vec<u64> {
    page.transactions.iter().map(|t| t.transaction_id).collect()
}

// =============================================================================
// Totals match an independent recount
// =============================================================================

#[test]
fn test_total_matches_independent_recount() {
    let data = dataset(400);

    type Oracle = Box<dyn Fn(&Transaction) -> bool>;
    fn oracle(f: impl Fn(&Transaction) -> bool + 'static) -> Oracle {
        Box::new(f)
    }

    let cases: Vec<(FilterCriteria, Oracle)> = vec![
        (FilterCriteria::new(), oracle(|_: &Transaction| true)),
        (
            FilterCriteria::new().with_regions(["North", " east "]),
            oracle(|t: &Transaction| t.customer_region == "north" || t.customer_region == "east"),
        ),
        (
            FilterCriteria::new()
                .with_genders(["female"])
                .with_age(Some(30), Some(45)),
            oracle(|t: &Transaction| t.gender == "female" && (30..=45).contains(&t.age)),
        ),
        (
            FilterCriteria::new().with_dates(Some("2023-03-01"), Some("2023-06-30")),
            oracle(|t: &Transaction| t.date.as_str() >= "2023-03-01" && t.date.as_str() <= "2023-06-30"),
        ),
        (
            FilterCriteria::new().with_tags(["organic"]),
            oracle(|t: &Transaction| t.tags.split(',').any(|tag| tag == "organic")),
        ),
        (
            FilterCriteria::new()
                .with_categories(["beauty"])
                .with_payment_methods(["UPI", "cash"])
                .with_tags(["gadgets", "wireless"]),
            oracle(|t: &Transaction| {
                t.product_category == "beauty"
                    && (t.payment_method == "upi" || t.payment_method == "cash")
                    && t.tags.split(',').any(|tag| tag == "gadgets" || tag == "wireless")
            }),
        ),
        (
            FilterCriteria::new().with_search("KHAN").with_tags(["skincare"]),
            oracle(|t: &Transaction| {
                t.customer_name.to_lowercase().contains("khan")
                    && t.tags.split(',').any(|tag| tag == "skincare")
            }),
        ),
        (
            FilterCriteria::new().with_regions(["  ", ""]),
            oracle(|_: &Transaction| true),
        ),
    ];

    for (criteria, oracle) in cases {
        let expected = data.iter().filter(|t| oracle(*t)).count() as u64;
        let total = on_all_backends(&data, |_, engine| {
            list(engine, criteria.clone(), SortSpec::default(), 1, 10).total
        });
        assert_eq!(total, expected, "criteria: {:?}", criteria);

        let summary = on_all_backends(&data, |_, engine| engine.summary(&criteria).unwrap());
        assert_eq!(summary.total_sales_records, expected);
    }
}

// =============================================================================
// Idempotence and pagination
// =============================================================================

#[test]
fn test_repeated_requests_are_byte_identical() {
    let data = dataset(200);
    let criteria = FilterCriteria::new().with_regions(["south", "west"]);

    on_all_backends(&data, |_, engine| {
        let first = list(engine, criteria.clone(), SortSpec::asc(SortField::CustomerName), 2, 15);
        let second = list(engine, criteria.clone(), SortSpec::asc(SortField::CustomerName), 2, 15);
        let a = serde_json::to_string(&first).unwrap();
        assert_eq!(a, serde_json::to_string(&second).unwrap());
        a
    });
}

#[test]
fn test_total_pages_and_page_past_end() {
    let data = dataset(53);

    on_all_backends(&data, |_, engine| {
        let page = list(engine, FilterCriteria::new(), SortSpec::default(), 1, 10);
        assert_eq!(page.total, 53);
        assert_eq!(page.total_pages, 6);

        let past = list(engine, FilterCriteria::new(), SortSpec::default(), 7, 10);
        assert!(past.transactions.is_empty());
        assert_eq!(past.total, 53);
        assert_eq!(past.total_pages, 6);

        let last = list(engine, FilterCriteria::new(), SortSpec::default(), 6, 10);
        assert_eq!(last.transactions.len(), 3);
        (page.total_pages, ids(&last))
    });

    on_all_backends(&data, |_, engine| {
        let empty = list(
            engine,
            FilterCriteria::new().with_regions(["atlantis"]),
            SortSpec::default(),
            1,
            10,
        );
        assert_eq!(empty.total, 0);
        assert_eq!(empty.total_pages, 0);
        empty.total_pages
    });
}

#[test]
fn test_pages_partition_the_sorted_result() {
    let data = dataset(97);

    on_all_backends(&data, |_, engine| {
        let full = list(engine, FilterCriteria::new(), SortSpec::desc(SortField::Date), 1, 100);
        let mut stitched = Vec::new();
        for page in 1..=10 {
            stitched.extend(ids(&list(engine, FilterCriteria::new(), SortSpec::desc(SortField::Date), page, 10)));
        }
        assert_eq!(stitched, ids(&full));
        stitched
    });
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_quantity_asc_desc_reverse_with_stable_ties() {
    let data = dataset(100);

    on_all_backends(&data, |_, engine| {
        let asc = list(engine, FilterCriteria::new(), SortSpec::asc(SortField::Quantity), 1, 100);
        let desc = list(engine, FilterCriteria::new(), SortSpec::desc(SortField::Quantity), 1, 100);

        let asc_qty: Vec<u32> = asc.transactions.iter().map(|t| t.quantity).collect();
        let mut desc_qty: Vec<u32> = desc.transactions.iter().map(|t| t.quantity).collect();
        desc_qty.reverse();
        assert_eq!(asc_qty, desc_qty);

        // ties keep dataset order in both directions
        for page in [&asc, &desc] {
            for pair in page.transactions.windows(2) {
                if pair[0].quantity == pair[1].quantity {
                    assert!(pair[0].transaction_id < pair[1].transaction_id);
                }
            }
        }
        (ids(&asc), ids(&desc))
    });
}

#[test]
fn test_unknown_sort_field_and_order_fall_back() {
    let data = dataset(40);

    on_all_backends(&data, |_, engine| {
        let fallback = list(engine, FilterCriteria::new(), SortSpec::parse("price", "sideways"), 1, 40);
        let explicit = list(engine, FilterCriteria::new(), SortSpec::new(SortField::Date, SortDirection::Desc), 1, 40);
        assert_eq!(ids(&fallback), ids(&explicit));
        ids(&fallback)
    });
}

#[test]
fn test_customer_name_sort_is_case_insensitive() {
    let data = dataset(60);

    on_all_backends(&data, |_, engine| {
        let page = list(engine, FilterCriteria::new(), SortSpec::asc(SortField::CustomerName), 1, 60);
        let names: Vec<String> = page
            .transactions
            .iter()
            .map(|t| t.customer_name.to_lowercase())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        ids(&page)
    });
}

// =============================================================================
// Filters and search
// =============================================================================

#[test]
fn test_tag_filter_matches_whole_tokens_only() {
    let data = vec![
        Transaction {
            transaction_id: 1,
            tags: "organics,skincare".into(),
            ..Default::default()
        },
        Transaction {
            transaction_id: 2,
            tags: "gadgets, organic".into(),
            ..Default::default()
        },
    ];

    on_all_backends(&data, |_, engine| {
        let page = list(engine, FilterCriteria::new().with_tags(["Organic"]), SortSpec::default(), 1, 10);
        assert_eq!(ids(&page), vec![2]);
        ids(&page)
    });
}

#[test]
fn test_range_validation_errors() {
    let data = dataset(5);
    let invalid = [
        FilterCriteria::new().with_age(Some(160), None),
        FilterCriteria::new().with_age(Some(40), Some(20)),
        FilterCriteria::new().with_dates(Some("2024-05-01"), Some("2024-01-01")),
        FilterCriteria::new().with_dates(Some("05/01/2024"), None),
    ];

    for criteria in invalid {
        on_all_backends(&data, |_, engine| {
            let request = ListRequest::new(criteria.clone(), SortSpec::default(), PageRequest::default());
            let err = engine.list_transactions(&request).unwrap_err();
            assert_eq!(err.code(), QueryErrorCode::InvalidRange);
            let err = engine.summary(&criteria).unwrap_err();
            assert_eq!(err.code(), QueryErrorCode::InvalidRange);
            err.code().code()
        });
    }
}

#[test]
fn test_three_record_quantity_scenario() {
    let data: Vec<Transaction> = [(1, 5, "2023-01-01"), (2, 2, "2023-01-02"), (3, 5, "2023-01-03")]
        .into_iter()
        .map(|(id, quantity, date)| Transaction {
            transaction_id: id,
            quantity,
            date: date.into(),
            ..Default::default()
        })
        .collect();

    on_all_backends(&data, |_, engine| {
        let page = list(engine, FilterCriteria::new(), SortSpec::desc(SortField::Quantity), 1, 2);
        assert_eq!(ids(&page), vec![1, 3]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        page
    });
}

#[test]
fn test_search_digit_rules() {
    let data = vec![
        Transaction {
            transaction_id: 1,
            phone_number: "9720639364".into(),
            customer_name: "Neha Khan".into(),
            ..Default::default()
        },
        Transaction {
            transaction_id: 97206,
            phone_number: "+91 88888-00000".into(),
            ..Default::default()
        },
        Transaction {
            transaction_id: 3,
            phone_number: "+91 97206-39364".into(),
            ..Default::default()
        },
        Transaction {
            transaction_id: 972060,
            ..Default::default()
        },
    ];

    on_all_backends(&data, |_, engine| {
        // id equality, raw phone substring, digit-only phone substring
        let page = list(engine, FilterCriteria::new().with_search("97206"), SortSpec::asc(SortField::Date), 1, 10);
        assert_eq!(ids(&page), vec![1, 97206, 3]);

        // no digits: only text clauses apply
        let page = list(engine, FilterCriteria::new().with_search("neha"), SortSpec::default(), 1, 10);
        assert_eq!(ids(&page), vec![1]);

        // blank search is no search
        let page = list(engine, FilterCriteria::new().with_search("   "), SortSpec::default(), 1, 10);
        assert_eq!(page.total, 4);
        page.total
    });
}

// =============================================================================
// Summary and filter options
// =============================================================================

#[test]
fn test_summary_scenario() {
    let data = vec![
        Transaction {
            transaction_id: 1,
            quantity: 3,
            total_amount: 100.0,
            final_amount: 90.0,
            gender: "female".into(),
            ..Default::default()
        },
        Transaction {
            transaction_id: 2,
            quantity: 4,
            total_amount: 200.0,
            final_amount: 180.0,
            gender: "female".into(),
            ..Default::default()
        },
        Transaction {
            transaction_id: 3,
            quantity: 9,
            total_amount: 999.0,
            final_amount: 999.0,
            gender: "male".into(),
            ..Default::default()
        },
    ];

    on_all_backends(&data, |_, engine| {
        let stats = engine
            .summary(&FilterCriteria::new().with_genders(["Female"]))
            .unwrap();
        assert_eq!(stats.total_discount, 30.0);
        assert_eq!(stats.total_amount, 300.0);
        assert_eq!(stats.total_units_sold, 7);
        assert_eq!(stats.total_sales_records, 2);

        let none = engine
            .summary(&FilterCriteria::new().with_regions(["nowhere"]))
            .unwrap();
        assert_eq!(none.total_sales_records, 0);
        assert_eq!(none.total_amount, 0.0);
        stats
    });
}

#[test]
fn test_summary_totals_on_generated_data() {
    let data = dataset(300);
    let criteria = FilterCriteria::new().with_categories(["electronics"]);
    let expected_units: u64 = data
        .iter()
        .filter(|t| t.product_category == "electronics")
        .map(|t| u64::from(t.quantity))
        .sum();

    let stats = on_all_backends(&data, |_, engine| engine.summary(&criteria).unwrap());
    assert_eq!(stats.total_units_sold, expected_units);
}

#[test]
fn test_filter_options_scenario() {
    let data = vec![
        Transaction {
            transaction_id: 1,
            tags: "Organic,Skincare".into(),
            customer_region: "north east".into(),
            ..Default::default()
        },
        Transaction {
            transaction_id: 2,
            tags: "organic".into(),
            customer_region: "".into(),
            ..Default::default()
        },
    ];

    on_all_backends(&data, |_, engine| {
        let options = engine.filter_options().unwrap();
        assert_eq!(options.tags, vec!["Organic", "Skincare"]);
        assert_eq!(options.customer_regions, vec!["North east"]);
        assert!(options.genders.is_empty());
        options
    });
}

#[test]
fn test_filter_options_ignore_current_filters() {
    let data = dataset(120);
    on_all_backends(&data, |_, engine| {
        let options = engine.filter_options().unwrap();
        assert_eq!(options.customer_regions, vec!["East", "North", "South", "West"]);
        assert_eq!(options.payment_methods, vec!["Cash", "Credit card", "Upi"]);
        assert_eq!(options.tags.len(), 5);
        options
    });
}

// =============================================================================
// Duplicate and unparsed ids
// =============================================================================

#[test]
fn test_duplicate_and_zero_ids_are_kept() {
    // loader maps unparseable ids to 0
    let mut records = dataset(12);
    for (idx, id) in [(2, 0), (5, 0), (7, 0), (9, 4), (10, 4)] {
        records[idx].transaction_id = id;
    }

    let (all, zeros, summary) = on_all_backends(&records, |_, engine| {
        let all = list(engine, FilterCriteria::new(), SortSpec::asc(SortField::Quantity), 1, 100);
        let zeros = list(engine, FilterCriteria::new().with_search("0"), SortSpec::default(), 1, 100);
        let summary = engine.summary(&FilterCriteria::new()).unwrap();
        (all, zeros, summary)
    });

    assert_eq!(all.total, 12);
    assert_eq!(summary.total_sales_records, 12);
    assert_eq!(ids(&all).iter().filter(|id| **id == 0).count(), 3);
    assert_eq!(ids(&all).iter().filter(|id| **id == 4).count(), 3);
    assert!(ids(&zeros).iter().filter(|id| **id == 0).count() >= 3);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_released_backend_is_unavailable() {
    for (_, engine) in engines(&dataset(3)) {
        engine.shutdown().unwrap();
        let err = engine.filter_options().unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::BackendUnavailable);
    }
}
