use rust_decimal::Decimal;
use serde_json::json;

use helpdesk_agent::application::QuotationEngine;
use helpdesk_agent::domain::{QuoteRequest, QuoteResult};
use helpdesk_agent::infrastructure::load_quotation_engine;

fn quote(engine: &QuotationEngine, request: QuoteRequest) -> QuoteResult {
    engine.quote(&request)
}

#[test]
fn test_quotes_are_deterministic() {
    let engine = QuotationEngine::standard();
    let request = QuoteRequest::new("carpet_cleaning", "4321").with_area(Decimal::new(137, 1));

    let first = quote(&engine, request.clone());
    for _ in 0..10 {
        assert_eq!(quote(&engine, request.clone()), first);
    }
}

#[test]
fn test_service_type_spellings_are_equivalent() {
    let engine = QuotationEngine::standard();
    let spellings = ["Carpet Cleaning", "carpet cleaning", "carpet_cleaning", "CARPET cleaning"];
    let results: Vec<_> = spellings
        .into_iter()
        .map(|s| quote(&engine, QuoteRequest::new(s, "2000").with_area(Decimal::from(12))))
        .collect();

    assert!(results[0].available);
    assert!(results.iter().all(|r| r == &results[0]));
    assert_eq!(results[0].service_type.as_deref(), Some("carpet_cleaning"));
}

#[test]
fn test_range_boundaries_are_inclusive() {
    let engine = QuotationEngine::standard();
    let cases = [
        ("2000", "NSW"),
        ("2999", "NSW"),
        ("3000", "VIC"),
        ("4999", "QLD"),
        ("5000", "SA"),
        ("6999", "WA"),
    ];

    for (postcode, region) in cases {
        assert_eq!(
            engine.resolve_region(postcode).map(|r| r.as_str()),
            Some(region),
            "postcode {postcode}"
        );
    }
    assert!(engine.resolve_region("1999").is_none());
    assert!(engine.resolve_region("7000").is_none());
}

#[test]
fn test_unknown_service_lists_known_types() {
    let result = quote(
        &QuotationEngine::standard(),
        QuoteRequest::new("pool_cleaning", "2000"),
    );

    assert!(!result.available);
    assert!(result.region.is_none());
    assert_eq!(
        result.error.as_deref(),
        Some("Service type 'pool_cleaning' not found. Available services: carpet_cleaning, upholstery_cleaning, tile_cleaning")
    );
}

#[test]
fn test_tile_cleaning_unavailable_in_wa() {
    let result = quote(
        &QuotationEngine::standard(),
        QuoteRequest::new("tile_cleaning", "6000").with_area(Decimal::from(10)),
    );

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "available": false,
            "region": "WA",
            "error": "Service 'tile_cleaning' is not available in WA"
        })
    );
}

#[test]
fn test_reference_quotes() {
    let engine = QuotationEngine::standard();

    let carpet = quote(
        &engine,
        QuoteRequest::new("carpet_cleaning", "2500").with_area(Decimal::from(20)),
    );
    assert_eq!(
        serde_json::to_value(&carpet).unwrap(),
        json!({
            "available": true,
            "service_type": "carpet_cleaning",
            "region": "NSW",
            "base_price": 150.0,
            "variable_cost": 100.0,
            "regional_multiplier": 1.0,
            "final_price": 250.0,
            "currency": "AUD"
        })
    );

    let upholstery = quote(
        &engine,
        QuoteRequest::new("upholstery_cleaning", "3500").with_items(3),
    );
    assert_eq!(upholstery.variable_cost, Some(Decimal::from(120)));
    assert_eq!(upholstery.regional_multiplier, Some(Decimal::new(105, 2)));
    assert_eq!(upholstery.final_price, Some(Decimal::new(21000, 2)));
}

#[test]
fn test_non_numeric_postcode_has_no_region() {
    let engine = QuotationEngine::standard();

    for postcode in ["abcd", "", "20 00", "-2000"] {
        let result = quote(&engine, QuoteRequest::new("carpet_cleaning", postcode));
        assert!(!result.available, "postcode {postcode:?}");
        assert!(result.region.is_none());
        assert_eq!(
            result.error,
            Some(format!("Invalid postcode '{postcode}' or region not supported"))
        );
    }
}

#[test]
fn test_prices_always_have_two_decimal_places() {
    let engine = QuotationEngine::standard();

    let cases = [
        (Decimal::new(31, 1), "4000"),
        (Decimal::new(1, 3), "3000"),
        (Decimal::new(333, 1), "6000"),
        (Decimal::from(20), "2000"),
    ];

    for (area, postcode) in cases {
        let price = engine
            .try_quote(&QuoteRequest::new("carpet_cleaning", postcode).with_area(area))
            .unwrap()
            .final_price;
        assert_eq!(price.scale(), 2, "area {area} in {postcode}");
    }
}

#[test]
fn test_bundled_pricing_file_matches_built_in_tables() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/pricing.yaml");
    let from_file = load_quotation_engine(Some(&path)).unwrap();
    let built_in = QuotationEngine::standard();

    for service in ["carpet_cleaning", "upholstery_cleaning", "tile_cleaning"] {
        for postcode in ["2100", "3100", "4100", "5100", "6100"] {
            let request = QuoteRequest::new(service, postcode)
                .with_area(Decimal::new(155, 1))
                .with_items(2);
            assert_eq!(quote(&from_file, request.clone()), quote(&built_in, request));
        }
    }
}
