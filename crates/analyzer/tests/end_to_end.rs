use analytics::AnalyticsError;
use analyzer::error::AnalyzerError;
use analyzer::{Analyzer, Stage};
use configuration::{Settings, UnknownMerchantPolicy};
use core_types::{EventCategory, MerchantId};
use dump_store::{DumpRepository, StoreError};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use timeline::TimelineError;

const T0: &str = "2018-01-01T10:00:00.000000Z";
const T1: &str = "2018-01-01T10:00:01.000000Z";
const T2: &str = "2018-01-01T10:00:02.000000Z";

/// Builds the two-merchant dump used throughout: Acme restocks and sells, Bolt only sells.
struct DumpFixture {
    dir: TempDir,
}

impl DumpFixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("kafka")).unwrap();
        let fixture = Self { dir };

        fixture.write_mapping(json!({"m1": "Acme", "m2": "Bolt"}));
        fixture.write_category(
            "buyOffer",
            json!([
                {"merchant_id": "m1", "offer_id": 1, "amount": 2, "price": 5.0, "timestamp": T1, "http_code": 200},
                {"merchant_id": "m2", "offer_id": 2, "amount": 1, "price": 10.0, "timestamp": T2, "http_code": 200}
            ]),
        );
        fixture.write_category(
            "producer",
            json!([{"merchant_id": "m1", "amount": 5, "billing_amount": 3.0, "timestamp": T0}]),
        );
        fixture.write_category("holding_cost", json!([{"merchant_id": "m1", "cost": 1.0}]));
        fixture.write_category(
            "addOffer",
            json!([
                {"merchant_id": "m1", "offer_id": 1, "price": 5.0, "timestamp": T0, "http_code": 200},
                {"merchant_id": "m2", "offer_id": 2, "price": 10.0, "timestamp": T0, "http_code": 200}
            ]),
        );
        fixture.write_category(
            "updateOffer",
            json!([{"merchant_id": "m1", "offer_id": 1, "price": 4.5, "timestamp": T2, "http_code": 200}]),
        );
        fixture
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_mapping(&self, mapping: Value) {
        fs::write(self.path().join("merchant_id_mapping.json"), mapping.to_string()).unwrap();
    }

    fn write_category(&self, name: &str, records: Value) {
        fs::write(self.path().join("kafka").join(name), records.to_string()).unwrap();
    }

    fn remove_category(&self, name: &str) {
        fs::remove_file(self.path().join("kafka").join(name)).unwrap();
    }

    fn repository(&self, settings: &Settings) -> DumpRepository {
        DumpRepository::open(self.path(), settings.layout.clone()).unwrap()
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name)).unwrap()
    }

    fn exists(&self, name: &str) -> bool {
        self.path().join(name).exists()
    }
}

fn summary_rows(fixture: &DumpFixture) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(fixture.path().join("results.csv")).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn worked_example_produces_summary_and_charts() {
    let fixture = DumpFixture::new();
    let settings = Settings::default();
    let repo = fixture.repository(&settings);

    let outcome = Analyzer::new(settings).run(&repo).unwrap();

    let acme = outcome.report.summary_for(&MerchantId::new("m1")).unwrap();
    assert_eq!((acme.revenue, acme.holding_cost, acme.order_cost, acme.profit), (10.0, 1.0, 3.0, 6.0));
    let bolt = outcome.report.summary_for(&MerchantId::new("m2")).unwrap();
    assert_eq!((bolt.revenue, bolt.holding_cost, bolt.order_cost, bolt.profit), (10.0, 0.0, 0.0, 10.0));

    assert_eq!(
        outcome.artifacts,
        vec![
            fixture.path().join("results.csv"),
            fixture.path().join("inventory_levels.svg"),
            fixture.path().join("prices_reduced.svg"),
        ]
    );
    assert!(!fixture.exists("prices.svg"));

    let rows = summary_rows(&fixture);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "Acme");
    assert_eq!(rows[0][4].parse::<f64>().unwrap(), 6.0);
    assert_eq!(rows[1][0], "Bolt");
    assert_eq!(rows[1][4].parse::<f64>().unwrap(), 10.0);

    let inventory = fixture.read("inventory_levels.svg");
    assert!(inventory.starts_with("<svg"));
    assert!(inventory.contains(">Acme</text>"));
    assert!(inventory.contains(">Bolt</text>"));
    assert_eq!(inventory.matches("<path").count(), 2);

    let prices = fixture.read("prices_reduced.svg");
    assert_eq!(prices.matches("<path").count(), 2);
}

#[test]
fn per_offer_prices_adds_the_offer_chart() {
    let fixture = DumpFixture::new();
    let mut settings = Settings::default();
    settings.output.per_offer_prices = true;
    let repo = fixture.repository(&settings);

    let outcome = Analyzer::new(settings).run(&repo).unwrap();

    assert_eq!(outcome.artifacts.len(), 4);
    let offers = fixture.read("prices.svg");
    assert!(offers.contains(">Acme #1</text>"));
    assert!(offers.contains(">Bolt #2</text>"));
}

#[test]
fn reject_policy_fails_before_any_artifact() {
    let fixture = DumpFixture::new();
    fixture.write_category(
        "holding_cost",
        json!([{"merchant_id": "m1", "cost": 1.0}, {"merchant_id": "ghost", "cost": 2.0}]),
    );
    let mut settings = Settings::default();
    settings.analysis.unknown_merchants = UnknownMerchantPolicy::Reject;
    let repo = fixture.repository(&settings);

    let err = Analyzer::new(settings).run(&repo).unwrap_err();

    match err {
        AnalyzerError::Analytics(AnalyticsError::UnknownMerchant(ids)) => {
            assert_eq!(ids, vec![MerchantId::new("ghost")]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fixture.exists("results.csv"));
}

#[test]
fn drop_policy_leaves_unknown_merchants_out_of_every_artifact() {
    let fixture = DumpFixture::new();
    fixture.write_category(
        "producer",
        json!([
            {"merchant_id": "m1", "amount": 5, "billing_amount": 3.0, "timestamp": T0},
            {"merchant_id": "ghost", "amount": 9, "billing_amount": 7.0, "timestamp": T1}
        ]),
    );
    let settings = Settings::default();
    let repo = fixture.repository(&settings);

    let outcome = Analyzer::new(settings).run(&repo).unwrap();

    assert_eq!(outcome.report.summaries.len(), 2);
    assert_eq!(
        outcome.report.unknown_merchants.iter().collect::<Vec<_>>(),
        vec![&MerchantId::new("ghost")]
    );
    assert_eq!(summary_rows(&fixture).len(), 2);
    let inventory = fixture.read("inventory_levels.svg");
    assert!(!inventory.contains("ghost"));
    assert_eq!(inventory.matches("<path").count(), 2);
}

#[test]
fn offer_only_merchants_count_as_unknown_when_dropped() {
    let fixture = DumpFixture::new();
    fixture.write_category(
        "updateOffer",
        json!([{"merchant_id": "shadow", "offer_id": 9, "price": 1.0, "timestamp": T2, "http_code": 200}]),
    );
    let settings = Settings::default();
    let repo = fixture.repository(&settings);

    let outcome = Analyzer::new(settings).run(&repo).unwrap();

    assert_eq!(
        outcome.report.unknown_merchants.iter().collect::<Vec<_>>(),
        vec![&MerchantId::new("shadow")]
    );
    assert!(!fixture.read("prices_reduced.svg").contains("shadow"));
}

#[test]
fn offer_only_merchants_are_rejected_before_any_artifact() {
    let fixture = DumpFixture::new();
    fixture.write_category(
        "addOffer",
        json!([
            {"merchant_id": "m1", "offer_id": 1, "price": 5.0, "timestamp": T0, "http_code": 200},
            {"merchant_id": "shadow", "offer_id": 9, "price": 1.0, "timestamp": T0, "http_code": 200}
        ]),
    );
    let mut settings = Settings::default();
    settings.analysis.unknown_merchants = UnknownMerchantPolicy::Reject;
    let repo = fixture.repository(&settings);

    let err = Analyzer::new(settings).run(&repo).unwrap_err();

    match err {
        AnalyzerError::Analytics(AnalyticsError::UnknownMerchant(ids)) => {
            assert_eq!(ids, vec![MerchantId::new("shadow")]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fixture.exists("results.csv"));
}

#[test]
fn missing_category_aborts_the_run() {
    let fixture = DumpFixture::new();
    fixture.remove_category("producer");
    let settings = Settings::default();
    let repo = fixture.repository(&settings);

    let err = Analyzer::new(settings).run(&repo).unwrap_err();

    assert!(matches!(
        err,
        AnalyzerError::Store(StoreError::MissingCategory { category: EventCategory::Order, .. })
    ));
    assert!(!fixture.exists("results.csv"));
}

#[test]
fn bad_timestamp_fails_the_charts_but_keeps_the_summary() {
    let fixture = DumpFixture::new();
    fixture.write_category(
        "producer",
        json!([{"merchant_id": "m1", "amount": 5, "billing_amount": 3.0, "timestamp": "yesterday"}]),
    );
    let settings = Settings::default();
    let repo = fixture.repository(&settings);

    let err = Analyzer::new(settings).run(&repo).unwrap_err();

    assert!(matches!(err, AnalyzerError::Timeline(TimelineError::Timestamp(_))));
    assert_eq!(summary_rows(&fixture).len(), 2);
    assert!(!fixture.exists("inventory_levels.svg"));
}

#[test]
fn timestamp_without_fraction_is_rejected() {
    let fixture = DumpFixture::new();
    fixture.write_category(
        "producer",
        json!([{"merchant_id": "m1", "amount": 5, "billing_amount": 3.0, "timestamp": "2018-01-01T10:00:00Z"}]),
    );
    let settings = Settings::default();
    let repo = fixture.repository(&settings);

    let err = Analyzer::new(settings).run(&repo).unwrap_err();

    assert!(matches!(err, AnalyzerError::Timeline(TimelineError::Timestamp(_))));
    assert!(!fixture.exists("inventory_levels.svg"));
}

#[test]
fn dump_without_offers_skips_the_price_charts() {
    let fixture = DumpFixture::new();
    fixture.remove_category("addOffer");
    fixture.remove_category("updateOffer");
    let settings = Settings::default();
    let repo = fixture.repository(&settings);

    let outcome = Analyzer::new(settings).run(&repo).unwrap();

    assert_eq!(outcome.artifacts.len(), 2);
    assert!(!fixture.exists("prices_reduced.svg"));
}

#[test]
fn stages_can_be_driven_one_by_one() {
    let fixture = DumpFixture::new();
    let settings = Settings::default();
    let repo = fixture.repository(&settings);
    let analyzer = Analyzer::new(settings);

    let events = analyzer.load(&repo).unwrap();
    let report = analyzer.summarize(&events).unwrap();
    assert!((report.total_profit() - 16.0).abs() < 1e-9);

    let path = analyzer.render_inventory(&repo, &events).unwrap();
    assert!(path.ends_with("inventory_levels.svg"));
    assert!(!fixture.exists("results.csv"));
}

#[test]
fn progress_callback_sees_every_stage_in_order() {
    let fixture = DumpFixture::new();
    let settings = Settings::default();
    let repo = fixture.repository(&settings);
    let mut seen = Vec::new();

    Analyzer::new(settings)
        .run_with_progress(&repo, |stage| seen.push(stage))
        .unwrap();

    assert_eq!(seen, Stage::ALL.to_vec());
    assert_eq!(seen.iter().map(Stage::index).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn progress_callback_stops_at_the_failing_stage() {
    let fixture = DumpFixture::new();
    fixture.remove_category("producer");
    let settings = Settings::default();
    let repo = fixture.repository(&settings);
    let mut seen = Vec::new();

    let result = Analyzer::new(settings).run_with_progress(&repo, |stage| seen.push(stage));

    assert!(result.is_err());
    assert_eq!(seen, vec![Stage::Load]);
}
