// Integration tests for shopmatch
use serde_json::{json, Value};
use shopmatch::io::read_catalog;
use shopmatch::prelude::*;
use shopmatch::Component;
use std::io::Write;
use std::sync::Arc;

fn asus() -> Value {
    json!({
        "id": "A",
        "product_name": "ASUS ROG Strix G16, AMD Ryzen 9 8940HX, Gaming Laptop (RTX 5050-8GB/16GB RAM/1TB SSD)",
        "brand": "ASUS",
        "series": "ROG Strix G16",
        "form_factor": "Gaming Laptop",
        "standing_screen_display_size": "16 Inches",
        "processor_type": "Ryzen 9",
        "ram_gb": 16,
        "storage_gb": 1000,
        "graphics_coprocessor": "NVIDIA GeForce RTX 5050",
        "mrp": 144990,
        "selling_price": 140640,
        "rating": 4.8,
        "reviews_count": 30
    })
}

fn hp() -> Value {
    json!({
        "id": "B",
        "product_name": "HP Pavilion Aero 13, AMD Ryzen 7, 16GB RAM, 512GB SSD, 13.3'' WUXGA",
        "brand": "HP",
        "series": "Pavilion Aero 13",
        "form_factor": "Ultrabook",
        "standing_screen_display_size": "13.3 Inches",
        "processor_type": "Ryzen 7",
        "ram_gb": 16,
        "storage_gb": 512,
        "graphics_coprocessor": "AMD Radeon",
        "mrp": 89999,
        "selling_price": 74999,
        "rating": 4.5,
        "reviews_count": 18
    })
}

fn two_laptops() -> SearchEngine {
    let engine = SearchEngine::new();
    let report = engine.load_catalog(vec![asus(), hp()]).unwrap();
    assert_eq!(report.accepted, 2);
    engine
}

fn ids(response: &SearchResponse) -> Vec<&str> {
    response
        .results
        .iter()
        .map(|r| r.product_id.as_str())
        .collect()
}

#[test]
fn test_gaming_laptop_under_price_ranks_asus_first() {
    let engine = two_laptops();
    let response = engine
        .search("gaming laptop under 150000", &SearchOptions::default())
        .unwrap();

    assert_eq!(ids(&response)[0], "A");
    assert_eq!(response.total_candidates, 2);
    assert!(response.results[0].match_score > response.results[1].match_score);
}

#[test]
fn test_budget_ultrabook_ranks_hp_first() {
    let engine = two_laptops();
    let response = engine
        .search("budget ultrabook", &SearchOptions::default())
        .unwrap();

    assert_eq!(ids(&response)[0], "B");
    assert_eq!(response.results[0].price.discount_percent, 16.7);
}

#[test]
fn test_unsatisfiable_memory_returns_empty() {
    let engine = two_laptops();
    let response = engine
        .search("laptop with at least 32GB ram", &SearchOptions::default())
        .unwrap();

    assert!(response.results.is_empty());
    assert_eq!(response.total_candidates, 0);
    assert_eq!(response.disqualified.len(), 2);
    for d in &response.disqualified {
        assert_eq!(d.reason, "memory 16 does not satisfy ≥ 32");
    }
}

#[test]
fn test_price_bound_after_memory_phrase() {
    let engine = two_laptops();
    let response = engine
        .search("laptop with 16gb ram under 80000", &SearchOptions::default())
        .unwrap();

    assert_eq!(ids(&response), vec!["B"]);
    assert_eq!(response.disqualified.len(), 1);
    assert_eq!(response.disqualified[0].product_id.as_str(), "A");
}

#[test]
fn test_load_with_missing_name() {
    let engine = SearchEngine::new();
    let nameless = json!({"id": "C", "category": "Ultrabook", "price": 50000});
    let report = engine.load_catalog(vec![hp(), nameless.clone()]).unwrap();

    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].reason, "missing name");
    assert_eq!(report.rejected[0].record, nameless);
    assert_eq!(engine.catalog().len(), 1);
}

#[test]
fn test_strict_load_keeps_previous_snapshot() {
    let engine = two_laptops();
    let version = engine.catalog().version();

    let result = engine.load_catalog_with(
        vec![json!({"id": "C", "name": "Broken", "category": "Laptop", "price": -5})],
        LoadMode::Strict,
    );

    assert!(matches!(result, Err(Error::StrictLoad { count: 1, .. })));
    assert_eq!(engine.catalog().version(), version);
    assert_eq!(engine.catalog().len(), 2);
}

#[test]
fn test_search_is_deterministic() {
    let engine = two_laptops();
    let options = SearchOptions::default();
    let first = engine.search("lightweight laptop under 100000", &options).unwrap();
    for _ in 0..5 {
        let again = engine.search("lightweight laptop under 100000", &options).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn test_scores_within_range_and_sorted() {
    let engine = SearchEngine::new();
    let records = read_catalog(std::path::Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/data/catalog.json"
    )))
    .unwrap();
    engine.load_catalog(records).unwrap();

    for query in [
        "gaming laptop under 150000",
        "running shoes",
        "premium headphones",
        "tablet with at least 8gb ram",
        "something",
    ] {
        let response = engine.search(query, &SearchOptions::default()).unwrap();
        assert!(response.results.iter().all(|r| r.match_score <= 100));
        assert!(response
            .results
            .windows(2)
            .all(|w| w[0].match_score >= w[1].match_score));
        for entry in &response.results {
            assert!(entry.match_explanation.len() <= 3);
        }
    }
}

#[test]
fn test_truncation_reports_total() {
    let engine = SearchEngine::new();
    let records: Vec<Value> = (0..30)
        .map(|i| {
            json!({"id": format!("p{i:02}"), "name": format!("Laptop {i}"),
                   "category": "Laptop", "price": 50000 + i * 100, "rating": 4.0})
        })
        .collect();
    engine.load_catalog(records).unwrap();

    let response = engine
        .search("laptop", &SearchOptions::default().with_limit(7))
        .unwrap();
    assert_eq!(response.results.len(), 7);
    assert_eq!(response.total_candidates, 30);

    let response = engine.search("laptop", &SearchOptions::default()).unwrap();
    assert_eq!(response.results.len(), 20);
}

#[test]
fn test_empty_catalog() {
    let engine = SearchEngine::new();
    let response = engine.search("gaming laptop", &SearchOptions::default()).unwrap();
    assert!(response.results.is_empty());
    assert_eq!(response.total_candidates, 0);
    assert_eq!(response.stats.candidates_scored, 0);
}

#[test]
fn test_empty_query_error() {
    let engine = two_laptops();
    let err = engine.search("", &SearchOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "enter a query");
}

#[test]
fn test_contradictory_bounds_noted() {
    let engine = two_laptops();
    let response = engine
        .search("laptop over 100000 under 80000", &SearchOptions::default())
        .unwrap();

    assert_eq!(ids(&response), vec!["B"]);
    assert_eq!(
        response.applied_query.notes,
        vec!["conflicting price bounds: dropped > 100000, kept ≤ 80000"]
    );
}

#[test]
fn test_custom_weights_change_explanation() {
    let engine = two_laptops();
    let keyword_only = ScoreWeights {
        keyword: 1.0,
        category: 0.0,
        constraints: 0.0,
        quality: 0.0,
    };
    let response = engine
        .search(
            "pavilion",
            &SearchOptions::default().with_weights(keyword_only),
        )
        .unwrap();

    assert_eq!(ids(&response)[0], "B");
    assert_eq!(response.results[0].match_score, 100);
    assert_eq!(response.results[0].match_explanation.len(), 1);
    assert_eq!(
        response.results[0].match_explanation[0].factor,
        Component::Keyword
    );
}

#[test]
fn test_reload_is_atomic_for_readers() {
    let catalog = Arc::new(Catalog::new());
    let engine = SearchEngine::with_catalog(Arc::clone(&catalog));
    engine.load_catalog(vec![asus(), hp()]).unwrap();

    let held = catalog.all();
    engine.load_catalog(vec![hp()]).unwrap();

    assert_eq!(held.len(), 2);
    assert_eq!(catalog.all().len(), 1);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..50 {
                    let response = engine.search("laptop", &SearchOptions::default()).unwrap();
                    assert!(matches!(response.results.len(), 1 | 2));
                }
            });
        }
        s.spawn(|| {
            for i in 0..50 {
                let records = if i % 2 == 0 { vec![asus(), hp()] } else { vec![hp()] };
                engine.load_catalog(records).unwrap();
            }
        });
    });
}

#[test]
fn test_catalog_file_roundtrip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let body = json!({ "products": [asus(), hp(), {"id": "X", "price": 1}] });
    write!(file, "{}", body).unwrap();

    let records = read_catalog(file.path()).unwrap();
    assert_eq!(records.len(), 3);

    let engine = SearchEngine::new();
    let report = engine.load_catalog(records).unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected[0].reason, "missing name");

    let json = serde_json::to_value(
        engine
            .search("budget ultrabook", &SearchOptions::default())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(json["results"][0]["productId"], "B");
    assert!(json["results"][0]["matchExplanation"].is_array());
    assert_eq!(json["appliedQuery"]["hints"][0], "budget");
}
