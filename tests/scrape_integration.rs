//! Integration tests for the page parsers.
//!
//! These run whole pages through the public API the way a polling client
//! would: detect the version, resolve a profile, then parse each page.

mod support;

use std::sync::Arc;

use amuleweb_core::{
    Compatibility, NumberLocale, PreferenceMapping, ProfileRegistry, ScrapeContext, StatusMonitor,
    compatibility, detect_version, parse_downloads, parse_log, parse_search_results,
    parse_servers, parse_stats, parse_uploads, scrape::completed_percentage, total_speed,
};
use support::fixtures::{
    FOOTER_233, LOG_PAGE, STATS_PAGE, download_page, download_row, search_page, search_row,
    server_page, server_row, upload_row,
};

fn context_for(footer: &str, locale: NumberLocale) -> ScrapeContext {
    ScrapeContext::detect(
        &ProfileRegistry::builtin(),
        footer,
        Arc::new(PreferenceMapping::builtin()),
        locale,
    )
}

#[test]
fn test_version_detection_selects_profile() {
    let version = detect_version(FOOTER_233);
    assert_eq!(version, "2.3.3");
    assert!(matches!(compatibility(&version), Compatibility::Supported(_)));

    let profile = ProfileRegistry::builtin().resolve(&version);
    assert_eq!(profile.label, "2.3.3");
    assert_eq!(profile.download.table_index, 6);
}

#[test]
fn test_unknown_version_falls_back_to_default_profile() {
    let version = detect_version("<html><body>no version here</body></html>");
    assert_eq!(version, "unknown");
    assert_eq!(ProfileRegistry::builtin().resolve(&version).label, "default");
    assert_eq!(compatibility(&version), Compatibility::Unknown);
}

#[test]
fn test_download_page_yields_one_record_per_row() {
    let rows: String = (1..=5)
        .map(|i| download_row(&i.to_string(), &format!("file{i}.iso"), "350.2&nbsp;MB (50.1%)", "10.0 kb/s"))
        .collect();
    let html = download_page(&rows, "");
    let context = context_for(FOOTER_233, NumberLocale::Period);

    let records = context.downloads(&html);
    assert_eq!(records.len(), 5);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.id.as_deref(), Some((i + 1).to_string().as_str()));
        assert_eq!(record.name, format!("file{}.iso", i + 1));
        assert_eq!(record.completed, "350.2 MB (50.1%)");
        assert!((record.progress - 50.1).abs() < 1e-9);
        assert_eq!(record.priority, "Normal");
    }
}

#[test]
fn test_truncated_download_row_is_dropped() {
    let full = download_row("1", "good.iso", "1 MB (1%)", "1 kb/s");
    let truncated = r#"<tr><td><input type="checkbox" name="2"></td><td>cut.iso</td><td>700 MB</td></tr>"#;
    let after = download_row("3", "after.iso", "2 MB (2%)", "2 kb/s");
    let html = download_page(&format!("{full}{truncated}{after}"), "");

    let records = parse_downloads(
        &html,
        &ProfileRegistry::builtin().resolve("2.3.2"),
        NumberLocale::Period,
    );
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["good.iso", "after.iso"]);
    assert_eq!(records[1].id.as_deref(), Some("3"));
}

#[test]
fn test_aggregated_speed_sums_downloads() {
    let rows = format!(
        "{}{}{}",
        download_row("1", "a", "1 MB (1%)", "10.5 kb/s"),
        download_row("2", "b", "1 MB (1%)", "5 kb/s"),
        download_row("3", "c", "1 MB (1%)", ""),
    );
    let html = download_page(&rows, "");
    let context = context_for(FOOTER_233, NumberLocale::Period);
    let records = context.downloads(&html);
    assert_eq!(records.len(), 3);
    assert!((total_speed(&records, NumberLocale::Period) - 15.5).abs() < 1e-9);

    let monitor = StatusMonitor::new(NumberLocale::Period);
    assert_eq!(monitor.publish_downloads(&records).display, "15.50 kb/s");
}

#[test]
fn test_completed_percentage_accepts_either_separator() {
    assert!((completed_percentage("350.2 MB (50.1%)", NumberLocale::Period) - 50.1).abs() < 1e-9);
    assert!((completed_percentage("350,2 MB (50,1%)", NumberLocale::Comma) - 50.1).abs() < 1e-9);
    assert!((completed_percentage("350,2 MB (50,1%)", NumberLocale::Period) - 50.1).abs() < 1e-9);
    assert!(completed_percentage("350 MB", NumberLocale::Period).abs() < f64::EPSILON);
}

#[test]
fn test_uploads_share_the_download_page() {
    let html = download_page(
        &download_row("1", "a.iso", "1 MB (1%)", "1 kb/s"),
        &format!("{}{}", upload_row("a.iso", "peer-one", "3.1 kb/s"), upload_row("b.iso", "peer-two", "0.5 kb/s")),
    );
    let uploads = parse_uploads(&html, &ProfileRegistry::builtin().resolve("2.3.3"));
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].user_name, "peer-one");
    assert_eq!(uploads[1].speed, "0.5 kb/s");
    assert_eq!(uploads[1].uploaded, "10.5 MB");
}

#[test]
fn test_server_page_extracts_endpoints() {
    let html = server_page(&format!(
        "{}{}",
        server_row("176.103.48.36", "4184", "eMule Security"),
        server_row("91.208.184.143", "4232", "!! Sharing-Devils No.1 !!"),
    ));
    let servers = parse_servers(&html, &ProfileRegistry::builtin().resolve("2.3.2"));
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].id.as_deref(), Some("176.103.48.36"));
    assert_eq!(servers[0].port.as_deref(), Some("4184"));
    assert_eq!(servers[1].name, "!! Sharing-Devils No.1 !!");
    assert_eq!(servers[1].address, "91.208.184.143:4232");
}

#[test]
fn test_search_page_results() {
    let html = search_page(&format!(
        "{}{}",
        search_row("B3DA63E3AE699395F593D732189C50FB", "ligabue - certe notti.mp3", "4.5 MB", "12"),
        search_row("94C46DFBAD8CEE5C8FDE3EF6260C339F", "ligabue live.avi", "700 MB", "3"),
    ));
    let results = parse_search_results(&html, &ProfileRegistry::builtin().resolve("2.3.3"));
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id.as_deref(), Some("B3DA63E3AE699395F593D732189C50FB"));
    assert_eq!(results[1].sources, "3");
}

#[test]
fn test_search_page_keeps_every_row() {
    let hashes: Vec<String> = (0..10).map(|i| format!("{:032X}", 0xB3DA_0000_u32 + i)).collect();
    let mut rows: String = hashes
        .iter()
        .enumerate()
        .map(|(i, hash)| search_row(hash, &format!("result {i}.mp3"), "4.5 MB", "1"))
        .collect();
    rows.push_str(r#"<tr><td><input name="94C46DFBAD8CEE5C8FDE3EF6260C339F" type="checkbox"></td><td>late.avi</td><td>700 MB</td><td>3</td></tr>"#);
    let html = search_page(&rows);
    let context = context_for(FOOTER_233, NumberLocale::Period);

    for _ in 0..20 {
        let results = context.search_results(&html);
        assert_eq!(results.len(), 11);
        assert_eq!(results[0].id.as_deref(), Some(hashes[0].as_str()));
        assert_eq!(results[10].id.as_deref(), Some("94C46DFBAD8CEE5C8FDE3EF6260C339F"));
        assert_eq!(results[10].name, "late.avi");
    }
}

#[test]
fn test_stats_page_status() {
    let stats = parse_stats(STATS_PAGE, &ProfileRegistry::builtin().resolve("default")).unwrap();
    assert_eq!(stats.primary, "Connected");
    assert_eq!(stats.secondary, "Firewalled");
}

#[test]
fn test_log_page_text() {
    let log = parse_log(LOG_PAGE, &ProfileRegistry::builtin().resolve("default")).unwrap();
    assert!(log.starts_with("2024-01-01 12:00:00: Connected to server"));
    assert!(log.contains("Kad firewalled"));
}

#[test]
fn test_parsers_return_empty_on_blank_input() {
    let context = ScrapeContext::default();
    assert!(context.downloads("").is_empty());
    assert!(context.uploads("").is_empty());
    assert!(context.servers("").is_empty());
    assert!(context.search_results("").is_empty());
    assert!(context.stats("").is_none());
    assert!(context.preferences("").is_none());
    assert!(context.log("").is_none());
}

#[test]
fn test_context_parses_concurrently() {
    let context = Arc::new(context_for(FOOTER_233, NumberLocale::Period));
    let html = Arc::new(download_page(&download_row("1", "a", "1 MB (1%)", "1 kb/s"), ""));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let context = Arc::clone(&context);
            let html = Arc::clone(&html);
            std::thread::spawn(move || context.downloads(&html).len())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
