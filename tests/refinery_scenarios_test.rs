use entity_flow::config::keywords::KeywordTables;
use entity_flow::refinery::{
    classify, extract_address_like, normalize, separate, ColumnAssignment, Refinery,
    RefineryConfig, SourceKind,
};
use pretty_assertions::assert_eq;

const URL: &str = "https://example.com/hospitals";

fn kw() -> &'static KeywordTables {
    KeywordTables::global()
}

#[test]
fn test_comma_split_with_road_address() {
    let result = separate(
        "Apollo Hospitals Enterprise Ltd, 154/11, Bannerghatta Road, Bangalore 560076",
        kw(),
    );
    assert_eq!(result.name, "Apollo Hospitals Enterprise Ltd");
    assert_eq!(result.address, "154/11, Bannerghatta Road, Bangalore 560076");
}

#[test]
fn test_near_token_starts_address() {
    let result = separate(
        "Max Super-Specialty Hospital Near Civil Hospital, Phase-VI, Mohali, Punjab-160055",
        kw(),
    );
    assert_eq!(result.name, "Max Super-Specialty Hospital");
    assert!(result.address.starts_with("Near Civil Hospital"));
}

#[test]
fn test_header_keywords_pick_name_and_location() {
    let headers: Vec<String> = ["Hospital Name", "Location", "Contact", "Rating"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let assignment = classify(&headers, &[], kw());
    assert_eq!(
        assignment,
        ColumnAssignment {
            entity_col: 0,
            address_col: 1
        }
    );
}

#[test]
fn test_identical_cells_become_one_separated_record() {
    let html = r#"
        <table>
            <tr><th>Name</th><th>Address</th></tr>
            <tr><td>Dr. X Hospital, Phase 2, Mohali</td><td>Dr. X Hospital, Phase 2, Mohali</td></tr>
        </table>"#;
    let report = Refinery::new().process(html, URL).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].entity_name, "Dr. X Hospital");
    assert_eq!(report.records[0].address, "Phase 2, Mohali");
    assert_ne!(report.records[0].entity_name, report.records[0].address);
}

#[test]
fn test_unseparable_text_yields_name_only() {
    let result = separate("Just A Name", kw());
    assert_eq!(result.name, "Just A Name");
    assert_eq!(result.address, "");

    let html = r#"<ul><li>Just A Name here<br>Just A Name</li></ul>
        <table><tr><th>Name</th><th>Address</th></tr>
        <tr><td>Just A Name</td><td>Just A Name</td></tr></table>"#;
    let report = Refinery::new().process(html, URL).unwrap();
    assert!(report
        .records
        .iter()
        .all(|r| r.source_kind != SourceKind::Table));
}

#[test]
fn test_address_matcher_echoes_unmatched_input() {
    assert_eq!(extract_address_like("Just A Name"), "Just A Name");
    assert_eq!(extract_address_like("Clinic at 12 Mall Road today"), "12 Mall Road");
}

#[test]
fn test_normalize_is_idempotent() {
    let samples = [
        "  Apollo &amp; Sons\u{00a0}\u{00a0}Ltd ",
        "154/11,\tBannerghatta\nRoad",
        "Dr. (Mrs.) Rao & Co. #12",
        "",
    ];
    for sample in samples {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn test_records_satisfy_length_thresholds() {
    let html = r#"
        <table>
            <tr><th>Hospital Name</th><th>Address</th></tr>
            <tr><td>AB</td><td>12 Mall Road, Ludhiana</td></tr>
            <tr><td>Good Health Clinic</td><td>Pune</td></tr>
            <tr><td>City Care Hospital</td><td>12 Mall Road, Ludhiana</td></tr>
        </table>"#;
    let report = Refinery::new().process(html, URL).unwrap();
    assert_eq!(report.records.len(), 1);
    for record in &report.records {
        assert!(record.entity_name.chars().count() > 2);
        assert!(record.address.chars().count() > 5);
    }
}

#[test]
fn test_duplicates_across_extractors_are_kept() {
    let html = r#"
        <html><head><script type="application/ld+json">
            {"@type": "Hospital", "name": "City Care Hospital",
             "address": {"streetAddress": "12 Mall Road, Ludhiana"}}
        </script></head>
        <body><table>
            <tr><th>Name</th><th>Address</th></tr>
            <tr><td>City Care Hospital</td><td>12 Mall Road, Ludhiana</td></tr>
        </table></body></html>"#;
    let report = Refinery::new().process(html, URL).unwrap();
    let kinds: Vec<SourceKind> = report.records.iter().map(|r| r.source_kind).collect();
    assert_eq!(kinds, vec![SourceKind::Table, SourceKind::Structured]);
    assert_eq!(report.records[0].entity_name, report.records[1].entity_name);
}

#[test]
fn test_custom_keyword_tables() {
    let tables = KeywordTables::from_json_str(r#"{"entity": ["Praxis"], "address": ["Anschrift"]}"#)
        .unwrap();
    let html = r#"
        <table>
            <tr><th>Anschrift</th><th>Praxis</th></tr>
            <tr><td>12 Mall Road, Ludhiana</td><td>City Care Hospital</td></tr>
        </table>"#;
    let refinery = Refinery::with_config(RefineryConfig::default(), &tables);
    let report = refinery.process(html, URL).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].entity_name, "City Care Hospital");
    assert_eq!(report.records[0].address, "12 Mall Road, Ludhiana");
}

#[test]
fn test_provenance_carried_to_records() {
    let html = r#"
        <table><tr><td>x</td></tr></table>
        <table>
            <tr><th>Name</th><th>Address</th></tr>
            <tr><td>Sunrise Clinic</td><td>8 Hill Street, Shimla</td></tr>
        </table>"#;
    let report = Refinery::new().process(html, URL).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].source_url, URL);
    assert_eq!(report.records[0].table_index, Some(2));
    assert_eq!(report.records[0].row_index, Some(1));
}
