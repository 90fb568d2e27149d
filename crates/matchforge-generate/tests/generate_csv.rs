use std::fs;
use std::path::PathBuf;

use matchforge_generate::output::read_records;
use matchforge_generate::{
    FixtureEngine, GenerateOptions, GenerationError, GenerationReport, SubjectRecord,
    WatchlistRecord,
};

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "matchforge_generate_{label}_{}",
        uuid::Uuid::new_v4()
    ));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn options(label: &str, seed: u64) -> GenerateOptions {
    GenerateOptions {
        out_dir: temp_out_dir(label),
        seed: Some(seed),
        ..GenerateOptions::default()
    }
}

fn data_rows(contents: &str) -> Vec<&str> {
    contents.lines().skip(1).collect()
}

#[test]
fn anchor_is_first_row_of_both_files() {
    let options = options("anchor", 2024);
    let result = FixtureEngine::new(options.clone())
        .run()
        .expect("run generation");

    let client = fs::read_to_string(options.subject_path()).expect("read client csv");
    let server = fs::read_to_string(options.watchlist_path()).expect("read server csv");

    assert_eq!(client.lines().next(), Some("name,date_of_birth,country"));
    assert_eq!(
        server.lines().next(),
        Some("name,date_of_birth,country,program,aliases")
    );

    let client_rows = data_rows(&client);
    let server_rows = data_rows(&server);
    assert_eq!(client_rows.len(), 1000);
    assert_eq!(server_rows.len(), 1000);
    assert_eq!(client_rows[0], "Christina Vargas,1995-07-23,AU");
    assert_eq!(server_rows[0], "Christina Vargas,1995-07-23,AU,OFAC SDN,");

    let report = result.report;
    assert!(report.anchor_included);
    assert_eq!(report.seed, Some(2024));
    assert_eq!(report.subjects.rows, 1000);
    assert_eq!(report.watchlist.rows, 1000);
    assert!(report.observed_matches >= 1);
    assert!(report.collision.probability_any < 0.05);
}

#[test]
fn generate_is_deterministic_for_a_seed() {
    let a = options("seed_a", 99);
    let b = options("seed_b", 99);

    let report_a = FixtureEngine::new(a.clone()).run().expect("run A").report;
    let report_b = FixtureEngine::new(b.clone()).run().expect("run B").report;

    assert_eq!(report_a.subjects.sha256, report_b.subjects.sha256);
    assert_eq!(report_a.watchlist.sha256, report_b.watchlist.sha256);
    assert_eq!(
        fs::read_to_string(a.watchlist_path()).expect("read A"),
        fs::read_to_string(b.watchlist_path()).expect("read B"),
        "watchlist csv should be deterministic"
    );
}

#[test]
fn different_seeds_differ() {
    let report_a = FixtureEngine::new(options("diff_a", 1))
        .run()
        .expect("run A")
        .report;
    let report_b = FixtureEngine::new(options("diff_b", 2))
        .run()
        .expect("run B")
        .report;
    assert_ne!(report_a.subjects.sha256, report_b.subjects.sha256);
}

#[test]
fn zero_count_with_anchor_is_header_only_every_run() {
    for seed in 0..3 {
        let options = GenerateOptions {
            subject_count: 0,
            watchlist_count: 0,
            ..options("zero", seed)
        };
        let report = FixtureEngine::new(options.clone())
            .run()
            .expect("run generation")
            .report;

        assert_eq!(
            fs::read_to_string(options.subject_path()).expect("read client"),
            "name,date_of_birth,country\n"
        );
        assert_eq!(
            fs::read_to_string(options.watchlist_path()).expect("read server"),
            "name,date_of_birth,country,program,aliases\n"
        );
        assert!(!report.anchor_included);
        assert_eq!(report.observed_matches, 0);
    }
}

#[test]
fn without_anchor_first_row_is_random() {
    let options = GenerateOptions {
        include_anchor: false,
        subject_count: 50,
        watchlist_count: 50,
        ..options("no_anchor", 5)
    };
    let report = FixtureEngine::new(options.clone())
        .run()
        .expect("run generation")
        .report;

    let subjects: Vec<SubjectRecord> =
        read_records(&options.subject_path()).expect("read subjects");
    assert_eq!(subjects.len(), 50);
    assert!(!report.anchor_included);
    assert!(!report.subjects.anchored);
    assert_eq!(report.accidental_matches(), report.observed_matches);
}

#[test]
fn report_is_written_as_json() {
    let options = GenerateOptions {
        subject_count: 10,
        watchlist_count: 12,
        ..options("report", 8)
    };
    let result = FixtureEngine::new(options.clone())
        .run()
        .expect("run generation");

    assert_eq!(result.report_path, options.report_path());
    let parsed: GenerationReport = serde_json::from_str(
        &fs::read_to_string(&result.report_path).expect("read generation_report.json"),
    )
    .expect("parse report");
    assert_eq!(parsed.run_id, result.report.run_id);
    assert_eq!(parsed.watchlist.rows, 12);
    assert_eq!(parsed.subjects.sha256, result.report.subjects.sha256);
}

#[test]
fn written_files_round_trip() {
    let options = GenerateOptions {
        subject_count: 200,
        watchlist_count: 200,
        alias_probability: 0.5,
        ..options("round_trip", 31)
    };
    FixtureEngine::new(options.clone())
        .run()
        .expect("run generation");

    let subjects: Vec<SubjectRecord> =
        read_records(&options.subject_path()).expect("read subjects");
    let watchlist: Vec<WatchlistRecord> =
        read_records(&options.watchlist_path()).expect("read watchlist");

    let pools = matchforge_generate::AttributePools::builtin();
    let policy = options.policy().expect("policy");
    let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(31);
    let expected = matchforge_generate::Datasets::generate(&pools, policy, 200, 200, true, &mut rng)
        .expect("regenerate");

    assert_eq!(subjects, expected.subjects.records());
    assert_eq!(watchlist, expected.watchlist.records());
}

#[test]
fn invalid_options_stop_before_writing() {
    let options = GenerateOptions {
        start_year: 2006,
        end_year: 2005,
        ..options("invalid", 1)
    };
    let err = FixtureEngine::new(options.clone()).run().unwrap_err();
    assert!(matches!(err, GenerationError::InvalidOptions(_)));
    assert!(!options.subject_path().exists());
}

#[test]
fn empty_asset_pool_is_rejected() {
    let assets = temp_out_dir("assets");
    fs::write(assets.join("programs.txt"), "\n").expect("write programs");
    let options = GenerateOptions {
        assets_dir: Some(assets),
        ..options("empty_pool", 1)
    };
    let err = FixtureEngine::new(options).run().unwrap_err();
    assert!(matches!(err, GenerationError::EmptyPool { pool: "programs" }));
}
