//! End-to-end scenario runs against the in-memory widget.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use tablecheck::mock::{demo_table, MockColumn, MockFaults, MockTable};
use tablecheck::{
    run_suite, ColumnResolver, DiagnosticKind, FilterControl, ScenarioRunner, ScenarioSpec,
    SettlePolicy, SuiteConfig, TablePage, TableSnapshotReader, Timeouts, UiDriver, ValueFormat,
    ValueFormatter, WidgetSelectors,
};

fn quiet_config() -> SuiteConfig {
    SuiteConfig {
        screenshot_dir: None,
        ..SuiteConfig::default()
    }
}

fn ytd_table(values: &[&str], faults: MockFaults) -> MockTable {
    let mut builder = MockTable::builder()
        .column(MockColumn::text("name", "Name"))
        .column(MockColumn::percent("ytd", "YTD", 2))
        .global_filter("ytd")
        .faults(faults);
    for (i, v) in values.iter().enumerate() {
        let name = format!("Fund {i}");
        builder = builder.row(&[name.as_str(), v]);
    }
    builder.build()
}

mod suite {
    use super::*;

    #[tokio::test]
    async fn default_suite_passes_on_demo_table() {
        let mut table = demo_table();
        let report = run_suite(&mut table, &quiet_config(), &[]).await.unwrap();
        assert!(report.passed(), "{:#?}", report.scenarios);
        assert_eq!(report.failed_count(), 0);
        assert!(report.scenarios.iter().all(|s| s.checks > 0));
    }

    #[tokio::test]
    async fn legacy_delays_pass_and_take_simulated_time() {
        let mut table = demo_table();
        let config = SuiteConfig {
            settle: SettlePolicy::legacy(),
            ..quiet_config()
        };
        let report = run_suite(&mut table, &config, &["ytd-multiselect".to_string()])
            .await
            .unwrap();
        assert!(report.passed(), "{:#?}", report.scenarios);
        // six selection changes at one second each, one close at 200ms
        assert_eq!(table.elapsed().as_millis(), 6_200);
    }

    #[tokio::test]
    async fn fatal_scenario_does_not_stop_the_suite() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            r"
screenshot_dir: {}
scenarios:
  - name: sector
    column_key: sector
    control: {{ kind: header, column_key: sector }}
    format: {{ kind: raw }}
    all_label: All Sector
  - name: ytd
    column_key: ytd
    control: {{ kind: global, filter_key: ytd }}
    all_label: All YTD
",
            dir.path().display()
        );
        let config = SuiteConfig::from_yaml(&yaml).unwrap();
        let mut table = demo_table();
        let report = run_suite(&mut table, &config, &[]).await.unwrap();

        assert_eq!(report.failed_count(), 1);
        let sector = &report.scenarios[0];
        assert!(!sector.passed);
        assert!(sector.fatal.as_deref().unwrap().contains("th[data-column='sector']"));
        assert_eq!(
            sector.screenshot.as_deref(),
            Some(dir.path().join("sector_error.png").as_path())
        );
        assert!(report.scenarios[1].passed, "{:#?}", report.scenarios[1]);
        assert_eq!(table.screenshots_taken(), 1);
    }

    #[tokio::test]
    async fn aborted_selection_does_not_leak_into_next_scenario() {
        let spec = |name: &str| ScenarioSpec {
            name: name.to_string(),
            ..ScenarioSpec::ytd_multiselect()
        };
        let config = SuiteConfig {
            scenarios: vec![spec("a"), spec("b")],
            ..quiet_config()
        };
        let mut table = ytd_table(
            &["0.05", "-0.02", "0.031"],
            MockFaults {
                uncheck_timeouts: 1,
                ..MockFaults::default()
            },
        );
        let report = run_suite(&mut table, &config, &[]).await.unwrap();

        let a = &report.scenarios[0];
        assert!(!a.passed);
        assert!(a
            .fatal
            .as_deref()
            .unwrap()
            .contains("Timed out after 10000ms waiting for checkbox"));
        assert!(report.scenarios[1].passed, "{:#?}", report.scenarios[1]);
        assert!(table.checked_values("ytd").is_empty());
        assert!(!table.is_open("ytd"));
    }

    #[tokio::test]
    async fn grouped_percentages_pass_on_demo_widget() {
        let mut table = ytd_table(&["12.345", "0.05"], MockFaults::default());
        let report = run_suite(&mut table, &quiet_config(), &["ytd-multiselect".to_string()])
            .await
            .unwrap();
        assert!(report.passed(), "{:#?}", report.scenarios);
    }

    #[tokio::test]
    async fn report_serializes_to_json() {
        let mut table = ytd_table(
            &["0.05", "-0.02"],
            MockFaults {
                ignore_filters: true,
                ..MockFaults::default()
            },
        );
        let report = run_suite(&mut table, &quiet_config(), &["ytd-multiselect".to_string()])
            .await
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["url"], "http://localhost:8000/demo.html");
        assert_eq!(json["scenarios"][0]["passed"], false);
        assert_eq!(
            json["scenarios"][0]["diagnostics"][0]["kind"],
            "assertion_mismatch"
        );
        assert!(json["scenarios"][0]["fatal"].is_null());
    }
}

mod widget_contract {
    use super::*;

    /// Check the option whose value is `raw` in the open ytd dropdown
    async fn check_value(page: &TablePage<'_, MockTable>, raw: &str) {
        let control = FilterControl::Global {
            filter_key: "ytd".to_string(),
        };
        let panel = page.wait_options_open(&control).await.unwrap();
        for item in page.option_items(&panel).await.unwrap() {
            let checkbox = page.checkbox(&item).await.unwrap().unwrap();
            if page.attribute(&checkbox, "value").await.unwrap().as_deref() == Some(raw) {
                page.check(&checkbox).await.unwrap();
                return;
            }
        }
        panic!("no option with value {raw}");
    }

    #[tokio::test]
    async fn ytd_selection_renders_formatted_values() {
        let table = demo_table();
        let selectors = WidgetSelectors::default();
        let page = TablePage::new(&table, &selectors, Timeouts::default());
        let control = FilterControl::Global {
            filter_key: "ytd".to_string(),
        };
        let trigger = page.trigger(&control).await.unwrap();
        assert_eq!(page.text(&trigger).await.unwrap().trim(), "All YTD");

        let index = ColumnResolver::new(&page).resolve("ytd").await.unwrap();
        let reader = TableSnapshotReader::new(&page);
        let initial = reader.read(index).await.unwrap();
        let formatter = ValueFormatter::default();

        page.toggle(&trigger).await.unwrap();
        check_value(&page, "0.05").await;
        let one = reader.read(index).await.unwrap();
        assert!(!one.is_empty());
        assert!(one.values().iter().all(|v| *v == formatter.format("0.05")));
        assert!(one.values().iter().all(|v| v == "5.00%"));

        check_value(&page, "-0.02").await;
        let label = page.text(&trigger).await.unwrap();
        assert!(label.contains("0.05") && label.contains("-0.02") && label.contains(','));
        let two = reader.read(index).await.unwrap();
        assert!(two.all_in(&["5.00%", "-2.00%"]));
        assert!(two.contains("5.00%") && two.contains("-2.00%"));

        for item in table.checked_values("ytd") {
            let panel = page.wait_options_open(&control).await.unwrap();
            for entry in page.option_items(&panel).await.unwrap() {
                let checkbox = page.checkbox(&entry).await.unwrap().unwrap();
                if page.attribute(&checkbox, "value").await.unwrap() == Some(item.clone()) {
                    page.uncheck(&checkbox).await.unwrap();
                }
            }
        }
        assert_eq!(page.text(&trigger).await.unwrap().trim(), "All YTD");
        assert_eq!(reader.read(index).await.unwrap(), initial);
    }

    #[tokio::test]
    async fn check_is_idempotent() {
        let table = demo_table();
        let selectors = WidgetSelectors::default();
        let page = TablePage::new(&table, &selectors, Timeouts::default());
        let control = FilterControl::Global {
            filter_key: "ytd".to_string(),
        };
        let trigger = page.trigger(&control).await.unwrap();
        page.toggle(&trigger).await.unwrap();
        check_value(&page, "0.12").await;
        check_value(&page, "0.12").await;
        assert_eq!(table.checked_values("ytd"), vec!["0.12"]);
    }

    #[tokio::test]
    async fn header_filter_scenario_with_full_sequence() {
        let table = demo_table();
        let config = quiet_config();
        let spec = ScenarioSpec {
            name: "flags-selection".to_string(),
            column_key: "countryCode".to_string(),
            control: FilterControl::Header {
                column_key: "countryCode".to_string(),
            },
            format: ValueFormat::Raw,
            all_label: "All Flag".to_string(),
            verify_selection: true,
        };
        let report = ScenarioRunner::new(&table, &config).run(&spec).await;
        assert!(report.passed, "{:#?}", report.diagnostics);
        assert!(table.was_called("check:Checkbox { filter: 0, option: 2 }"));
    }

    #[tokio::test]
    async fn loading_table_reports_missing_initial_data() {
        let table = demo_table();
        table.set_loading(true);
        let config = quiet_config();
        let report = ScenarioRunner::new(&table, &config)
            .run(&ScenarioSpec::ytd_multiselect())
            .await;
        assert!(!report.passed);
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.message == "Could not retrieve initial ytd data from table"));
        assert!(report.fatal.is_none());
    }

    #[tokio::test]
    async fn screenshot_is_png() {
        let table = demo_table();
        let shot = table.screenshot().await.unwrap();
        assert!(shot.is_valid());
        assert_eq!(&shot.data[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }
}

mod properties {
    use super::*;

    fn run_ytd(values: &[String], faults: MockFaults) -> tablecheck::ScenarioReport {
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let table = ytd_table(&refs, faults);
        let config = quiet_config();
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(async {
                ScenarioRunner::new(&table, &config)
                    .run(&ScenarioSpec::ytd_multiselect())
                    .await
            })
    }

    fn ytd_values() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::sample::select(vec!["-0.02", "0", "0.031", "0.05", "0.12", "1.5"]),
            1..12,
        )
        .prop_map(|v| v.into_iter().map(str::to_string).collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn correct_widget_always_passes(values in ytd_values()) {
            let report = run_ytd(&values, MockFaults::default());
            prop_assert!(report.passed, "{:#?}", report.diagnostics);
        }

        #[test]
        fn ignored_filters_fail_with_two_distinct_values(values in ytd_values()) {
            let mut distinct = values.clone();
            distinct.sort();
            distinct.dedup();
            prop_assume!(distinct.len() >= 2);
            let report = run_ytd(
                &values,
                MockFaults { ignore_filters: true, ..MockFaults::default() },
            );
            prop_assert!(!report.passed);
            prop_assert!(report
                .diagnostics
                .iter()
                .all(|d| d.kind == DiagnosticKind::AssertionMismatch));
        }
    }
}
