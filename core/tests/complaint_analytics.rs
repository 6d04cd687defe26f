//! Complaint aggregator tests: the six dashboard tables.

use cityassist_core::{
    aggregator::{aggregate, aggregate_value, CountRow, NamedValue, SummaryTables, TrendRow},
    complaint::decode_complaints,
    error::AnalyticsError,
    role::Role,
};
use serde_json::{json, Value};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn tables(complaints: Value, role: Role) -> SummaryTables {
    aggregate_value(&complaints, role).unwrap()
}

fn row(name: &str, value: f64) -> NamedValue {
    NamedValue::new(name, value)
}

fn count(name: &str, value: u64) -> CountRow {
    CountRow::new(name, value)
}

fn value_of(rows: &[NamedValue], name: &str) -> Option<f64> {
    rows.iter().find(|r| r.name == name).map(|r| r.value)
}

fn count_of(rows: &[CountRow], name: &str) -> Option<u64> {
    rows.iter().find(|r| r.name == name).map(|r| r.value)
}

fn two_record_scenario() -> Value {
    json!([
        {"id": "c-1", "category": "water", "priority": "high",
         "date": "2024-01-05T10:00:00", "resolved_date": "2024-01-05T14:00:00"},
        {"id": "c-2", "category": "energy", "priority": "low",
         "date": "2024-01-20T22:00:00", "resolved_date": "2024-01-22T22:00:00"}
    ])
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn two_record_scenario_produces_expected_tables() {
    let _ = env_logger::builder().is_test(true).try_init();
    let t = tables(two_record_scenario(), Role::Citizen);

    assert_eq!(t.category_data, vec![count("water", 1), count("energy", 1)]);
    assert_eq!(
        t.priority_data,
        vec![count("high", 1), count("medium", 0), count("low", 1)]
    );
    assert_eq!(
        t.trends_data,
        vec![TrendRow { date: "2024-01".into(), water: 1, energy: 1, total: 2 }]
    );
    // 4 hours = 0.1667 days, rounded to one decimal.
    assert_eq!(t.resolution_data, vec![row("water", 0.2), row("energy", 2.0)]);
    // 4h lands in "< 6 hours"; exactly 48h lands in "> 48 hours".
    assert_eq!(
        t.response_rate_data,
        vec![
            row("< 6 hours", 50.0),
            row("< 12 hours", 0.0),
            row("12-24 hours", 0.0),
            row("24-48 hours", 0.0),
            row("> 48 hours", 50.0),
        ]
    );
    // Hour 10 is morning, hour 22 is evening; empty quadrants are omitted.
    assert_eq!(
        t.time_of_day_data,
        vec![count("Morning (6-12)", 1), count("Evening (18-24)", 1)]
    );
}

#[test]
fn category_rows_follow_count_then_first_encounter() {
    let t = tables(
        json!([
            {"category": "energy"},
            {"category": "water"},
            {"category": "water"},
            {"category": "sewage"},
            {"category": "energy"},
            {"category": "water"}
        ]),
        Role::Citizen,
    );
    assert_eq!(
        t.category_data,
        vec![count("water", 3), count("energy", 2), count("sewage", 1)]
    );
}

#[test]
fn category_sum_matches_records_with_category() {
    let complaints = json!([
        {"category": "water", "priority": "low"},
        {"priority": "high"},
        {"category": 17},
        {"category": "energy"},
        {"category": "  "}
    ]);
    let records = decode_complaints(&complaints).unwrap();
    let with_category = records.iter().filter(|r| r.category.is_some()).count();
    let t = aggregate(&records, Role::Citizen);

    let sum: u64 = t.category_data.iter().map(|r| r.value).sum();
    assert_eq!(sum as usize, with_category, "category counts must cover every categorised record");
    assert_eq!(with_category, 2);
}

#[test]
fn canonical_priorities_always_present_then_extras_in_encounter_order() {
    let t = tables(
        json!([
            {"priority": "urgent"},
            {"priority": "HIGH"},
            {"priority": "critical"},
            {"priority": "urgent"}
        ]),
        Role::Citizen,
    );
    assert_eq!(
        t.priority_data,
        vec![
            count("high", 1),
            count("medium", 0),
            count("low", 0),
            count("urgent", 2),
            count("critical", 1),
        ]
    );
}

#[test]
fn empty_collection_still_reports_fixed_priorities() {
    let t = tables(json!([]), Role::Citizen);
    assert!(t.category_data.is_empty());
    assert_eq!(
        t.priority_data,
        vec![count("high", 0), count("medium", 0), count("low", 0)]
    );
    assert!(t.trends_data.is_empty());
    assert!(t.resolution_data.is_empty());
    assert!(t.response_rate_data.is_empty());
    assert!(t.time_of_day_data.is_empty());
}

#[test]
fn monthly_trend_is_chronological_without_synthesized_months() {
    let t = tables(
        json!([
            {"category": "water", "date": "2024-03-02T08:00:00"},
            {"category": "energy", "date": "2023-12-30"},
            {"category": "water", "date": "2024-01-15T12:00:00Z"},
            {"category": "energy", "date": "2024-03-20T19:45:00"},
            {"category": "sewage", "date": "2024-05-01T00:00:00"},
            {"category": "water", "date": "garbage"}
        ]),
        Role::Citizen,
    );

    let months: Vec<&str> = t.trends_data.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(months, vec!["2023-12", "2024-01", "2024-03", "2024-05"]);
    for r in &t.trends_data {
        assert_eq!(r.total, r.water + r.energy, "total must equal water + energy for {}", r.date);
    }
    let march = &t.trends_data[2];
    assert_eq!((march.water, march.energy, march.total), (1, 1, 2));
    // A month holding only uncategorised labels still appears, with zero counts.
    assert_eq!(t.trends_data[3].total, 0);
}

#[test]
fn undated_records_still_count_in_category_and_priority() {
    let t = tables(
        json!([
            {"category": "water", "priority": "medium", "date": "not a date"},
            {"category": "water", "priority": "medium"}
        ]),
        Role::Citizen,
    );
    assert_eq!(t.category_data, vec![count("water", 2)]);
    assert_eq!(count_of(&t.priority_data, "medium"), Some(2));
    assert!(t.trends_data.is_empty());
    assert!(t.time_of_day_data.is_empty());
}

#[test]
fn inverted_resolution_interval_is_excluded_from_duration_tables() {
    let t = tables(
        json!([
            {"category": "water", "date": "2024-02-10T12:00:00", "resolved_date": "2024-02-09T12:00:00"},
            {"category": "water", "date": "2024-02-10T12:00:00", "resolved_date": "2024-02-10T20:00:00"}
        ]),
        Role::Citizen,
    );
    assert_eq!(t.category_data, vec![count("water", 2)]);
    assert_eq!(t.resolution_data, vec![row("water", 0.3)]);
    assert_eq!(value_of(&t.response_rate_data, "< 12 hours"), Some(100.0));
}

#[test]
fn response_percentages_sum_to_one_hundred() {
    let t = tables(
        json!([
            {"category": "water", "date": "2024-01-01T00:00:00", "resolved_date": "2024-01-01T01:00:00"},
            {"category": "water", "date": "2024-01-01T00:00:00", "resolved_date": "2024-01-01T07:00:00"},
            {"category": "energy", "date": "2024-01-01T00:00:00", "resolved_date": "2024-01-02T06:00:00"}
        ]),
        Role::Citizen,
    );
    let labels: Vec<&str> = t.response_rate_data.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        labels,
        vec!["< 6 hours", "< 12 hours", "12-24 hours", "24-48 hours", "> 48 hours"]
    );
    let sum: f64 = t.response_rate_data.iter().map(|r| r.value).sum();
    assert!((sum - 100.0).abs() <= 0.5, "percentages summed to {sum}");
    assert_eq!(value_of(&t.response_rate_data, "24-48 hours"), Some(33.3));
}

#[test]
fn zero_duration_counts_as_fastest_bucket() {
    let t = tables(
        json!([{"category": "energy", "date": "2024-06-01", "resolved_date": "2024-06-01"}]),
        Role::Citizen,
    );
    assert_eq!(value_of(&t.response_rate_data, "< 6 hours"), Some(100.0));
    assert_eq!(t.resolution_data, vec![row("energy", 0.0)]);
}

#[test]
fn time_of_day_uses_wall_clock_hour_without_wraparound() {
    let t = tables(
        json!([
            {"date": "2024-01-01T00:00:00"},
            {"date": "2024-01-01T05:59:59"},
            {"date": "2024-01-01T06:00:00"},
            {"date": "2024-01-01T18:00:00"},
            {"date": "2024-01-01T23:30:00+05:30"}
        ]),
        Role::Citizen,
    );
    assert_eq!(
        t.time_of_day_data,
        vec![
            count("Night (0-6)", 2),
            count("Morning (6-12)", 1),
            count("Evening (18-24)", 2),
        ]
    );
}

#[test]
fn aggregation_is_idempotent() {
    let input = two_record_scenario();
    let a = tables(input.clone(), Role::SuperAdmin);
    let b = tables(input, Role::SuperAdmin);
    assert_eq!(a, b);
}

#[test]
fn structural_errors_fail_the_whole_call() {
    for bad in [json!({"complaints": []}), json!("oops"), json!([{"category": "water"}, 3])] {
        let err = aggregate_value(&bad, Role::Citizen).unwrap_err();
        assert!(
            matches!(err, AnalyticsError::MalformedInput { .. }),
            "expected MalformedInput for {bad}, got {err:?}"
        );
    }
}

#[test]
fn tables_serialize_with_dashboard_keys() {
    let t = tables(two_record_scenario(), Role::Citizen);
    let v = serde_json::to_value(&t).unwrap();
    for key in [
        "categoryData",
        "priorityData",
        "trendsData",
        "resolutionData",
        "responseRateData",
        "timeOfDayData",
    ] {
        assert!(v.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(v["trendsData"][0]["date"], "2024-01");
    assert_eq!(v["categoryData"][0]["name"], "water");
}

#[test]
fn count_tables_serialize_integer_values() {
    let t = tables(two_record_scenario(), Role::Citizen);
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["categoryData"][0]["value"], json!(1));
    assert_eq!(v["priorityData"][1], json!({"name": "medium", "value": 0}));
    assert_eq!(v["timeOfDayData"][0]["value"], json!(1));
    assert!(v["categoryData"][0]["value"].is_u64(), "counts must not render as 1.0");
    // Means and percentages stay fractional.
    assert_eq!(v["resolutionData"][0]["value"], json!(0.2));
    assert!(v["responseRateData"][0]["value"].is_f64());
}

#[test]
fn many_distinct_labels_group_in_linear_time() {
    let labels = 20_000;
    let complaints: Vec<Value> = (0..labels)
        .flat_map(|i| {
            let record = json!({
                "category": format!("area-{i}"),
                "priority": format!("tier-{i}"),
                "date": "2024-01-01T00:00:00",
                "resolved_date": "2024-01-01T01:00:00"
            });
            [record.clone(), record]
        })
        .collect();

    let started = std::time::Instant::now();
    let t = tables(Value::Array(complaints), Role::Citizen);
    let elapsed = started.elapsed();

    assert_eq!(t.category_data.len(), labels);
    assert!(t.category_data.iter().all(|r| r.value == 2));
    assert_eq!(t.category_data[0].name, "area-0", "ties keep first-encounter order");
    assert_eq!(t.priority_data.len(), labels + 3);
    assert_eq!(t.priority_data[3], count("tier-0", 2));
    assert_eq!(t.resolution_data.len(), labels);
    assert!(
        elapsed < std::time::Duration::from_secs(5),
        "grouping {labels} labels took {elapsed:?}"
    );
}
