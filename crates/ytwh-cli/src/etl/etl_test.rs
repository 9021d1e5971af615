use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::etl::test_support::{
    category_item, channel_item, list_body, statistics_item, test_client, test_settings,
    video_item, MemoryWarehouse,
};

#[test]
fn all_runs_every_job_in_dependency_order() {
    assert_eq!(
        Job::All.sequence(),
        vec![
            Job::Categories,
            Job::Videos,
            Job::Channels,
            Job::VideoFacts,
            Job::ChannelFacts,
        ]
    );
    assert_eq!(Job::Channels.sequence(), vec![Job::Channels]);
}

#[test]
fn job_names_match_cli_values() {
    for job in Job::value_variants() {
        let value = job.to_possible_value().expect("every job is selectable");
        assert_eq!(value.get_name(), job.name());
    }
}

#[test]
fn settings_follow_app_config() {
    let config = ytwh_core::AppConfig {
        database_url: "postgres://example".to_owned(),
        env: ytwh_core::Environment::Test,
        log_level: "info".to_owned(),
        youtube_api_key: Some("k".to_owned()),
        db_max_connections: 2,
        db_min_connections: 1,
        db_acquire_timeout_secs: 10,
        api_base_url: "http://127.0.0.1:1".to_owned(),
        api_timeout_secs: 30,
        api_user_agent: "ua".to_owned(),
        region_code: "GB".to_owned(),
        language: "de".to_owned(),
        batch_size: 25,
        handoff_path: PathBuf::from("/tmp/ids.txt"),
        truncate_duration_days: true,
    };

    let settings = JobSettings::from_app_config(&config, true);
    assert_eq!(settings.region_code, "GB");
    assert_eq!(settings.language, "de");
    assert_eq!(settings.batch_size, 25);
    assert_eq!(settings.duration_mode, DurationMode::SubDay);
    assert!(settings.dry_run);
}

#[test]
fn dedupe_keeps_first_occurrence() {
    let rows = vec![("a", 1), ("b", 2), ("a", 3)];
    assert_eq!(dedupe_by(rows, |r| r.0), vec![("a", 1), ("b", 2)]);
}

#[test]
fn restrict_keeps_only_listed_keys() {
    let rows = vec![("a", 1), ("b", 2), ("c", 3)];
    assert_eq!(
        restrict_to(rows, &["c", "a"], |r| r.0),
        vec![("a", 1), ("c", 3)]
    );
}

#[test]
fn summary_line_lists_counts_and_tables() {
    let mut report = JobReport::new(Job::Videos);
    report.extracted = 50;
    report.malformed = 1;
    report.novel = Some(3);
    report.loaded = vec![("video_dim", 3), ("video_fact", 3)];
    report.handoff = Some(2);

    assert_eq!(
        report.summary(),
        "videos: extracted 50, malformed 1, novel 3, video_dim +3, video_fact +3, \
         handoff 2 channel ids"
    );
}

#[test]
fn summary_line_for_empty_fact_run() {
    let mut report = JobReport::new(Job::ChannelFacts);
    report.failed_requests = 2;
    assert_eq!(
        report.summary(),
        "channel-facts: extracted 0, malformed 0, failed requests 2, nothing loaded"
    );
}

#[test]
fn summary_line_lists_failed_loads() {
    let mut report = JobReport::new(Job::Videos);
    report.extracted = 2;
    report.novel = Some(2);
    report.loaded = vec![("video_dim", 2)];
    report.failed_loads = vec!["video_fact"];

    assert_eq!(
        report.summary(),
        "videos: extracted 2, malformed 0, novel 2, video_dim +2, failed loads video_fact"
    );
}

#[tokio::test]
async fn empty_batch_is_not_recorded_as_a_load() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    let warehouse = MemoryWarehouse::default().failing_on("video_dim");
    let mut report = JobReport::new(Job::Videos);

    let written = load_rows::<_, ytwh_core::VideoDimRow>(&warehouse, &settings, &mut report, &[])
        .await
        .unwrap();

    assert_eq!(written, 0);
    assert!(report.loaded.is_empty());
    assert!(report.failed_loads.is_empty());
}

#[tokio::test]
async fn failed_job_does_not_stop_the_chain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videoCategories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![category_item(
            "10", "Music",
        )])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("chart", "mostPopular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![video_item("a", "UC1")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("part", "statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![statistics_item("a")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "snippet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![channel_item("UC1")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![statistics_item("UC1")])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(dir.path());
    let warehouse = MemoryWarehouse::default().failing_on("categories_dim");

    let outcomes = run_jobs(Job::All, &test_client(&server), &warehouse, &settings).await;

    let ran: Vec<Job> = outcomes.iter().map(|o| o.job).collect();
    assert_eq!(ran, Job::All.sequence());
    assert!(outcomes[0].result.is_err(), "categories load should fail");
    assert!(outcomes[1..].iter().all(|o| o.result.is_ok()));

    assert_eq!(warehouse.inserted("video_dim"), vec!["a"]);
    assert_eq!(warehouse.inserted("channel_dim"), vec!["UC1"]);
    assert_eq!(warehouse.inserted("video_fact"), vec!["a", "a"]);
    assert_eq!(warehouse.inserted("channel_fact"), vec!["UC1"]);
}
