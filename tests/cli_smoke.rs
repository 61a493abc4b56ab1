#![allow(clippy::unwrap_used)]
//! CLI smoke tests. None of these reach the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with config, data and keys isolated from the host.
#[allow(deprecated)]
fn clip_tl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clip-tl").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("DEEPSEEK_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("CLIP_TL_LOG");
    cmd
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("LLM translation CLI"))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_languages_list() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("auto"))
        .stdout(predicate::str::contains("ja"))
        .stdout(predicate::str::contains("zh"));
}

#[test]
fn test_models_list_marks_default() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("deepseek-v3-0324 (default)"))
        .stdout(predicate::str::contains("gpt-4o-mini"))
        .stdout(predicate::str::contains("no deepseek API key configured"));
}

#[test]
fn test_detect_languages() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .args(["detect", "アバターとは何ですか"])
        .assert()
        .success()
        .stdout("ja\tJapanese\n");

    clip_tl(&home)
        .args(["detect", "안녕하세요"])
        .assert()
        .success()
        .stdout("ko\tKorean\n");

    clip_tl(&home)
        .args(["detect", "12345"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("unknown"));
}

#[test]
fn test_cost_for_one_million_tokens_each() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .args([
            "cost",
            "-m",
            "gpt-4o",
            "--prompt-tokens",
            "1000000",
            "--completion-tokens",
            "1000000",
        ])
        .assert()
        .success()
        .stdout("$20.000000\n");
}

#[test]
fn test_cost_with_huge_token_counts_does_not_overflow() {
    let home = TempDir::new().unwrap();
    let huge = u64::MAX.to_string();
    clip_tl(&home)
        .args([
            "cost",
            "-m",
            "gpt-4o-mini",
            "--prompt-tokens",
            huge.as_str(),
            "--completion-tokens",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$"));
}

#[test]
fn test_cost_unknown_model_fails() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .args([
            "cost",
            "-m",
            "gpt-99",
            "--prompt-tokens",
            "1",
            "--completion-tokens",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_estimate_names_model() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .args(["estimate", "Hello world", "-m", "gpt-4o-mini"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o-mini"))
        .stdout(predicate::str::contains("tokens"));
}

#[test]
fn test_invalid_target_language() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .args(["--text", "hello", "-t", "xx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xx"));
}

#[test]
fn test_missing_key_explains_remedy() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .args(["--text", "hello", "-t", "ja", "--no-history"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DEEPSEEK_API_KEY"));
}

#[test]
fn test_same_language_returns_text_unchanged() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .env("DEEPSEEK_API_KEY", "unused")
        .args(["--text", "Hello world", "-f", "en", "-t", "en", "--no-history"])
        .assert()
        .success()
        .stdout("Hello world\n");
}

#[test]
fn test_json_output_for_short_circuit() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .env("DEEPSEEK_API_KEY", "unused")
        .args(["--json", "--text", "Hello", "-t", "en", "--no-history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"short_circuited\": true"))
        .stdout(predicate::str::contains("\"cost\": 0.0"));
}

#[test]
fn test_history_and_stats_record_translations() {
    let home = TempDir::new().unwrap();
    clip_tl(&home)
        .env("DEEPSEEK_API_KEY", "unused")
        .args(["--quiet", "--text", "Hello world", "-t", "en"])
        .assert()
        .success();

    clip_tl(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello world"))
        .stdout(predicate::str::contains("deepseek-v3-0324"));

    clip_tl(&home)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Totals"))
        .stdout(predicate::str::contains("translations  1"));

    let export = home.path().join("history.csv");
    clip_tl(&home)
        .args(["history", "export", "--format", "csv", "-o"])
        .arg(&export)
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported 1 history entries"));
    let csv = std::fs::read_to_string(&export).unwrap();
    assert!(csv.contains(r#""Hello world""#));

    clip_tl(&home)
        .args(["history", "clear"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed 1 history entries"));

    clip_tl(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No translations recorded yet."));
}

#[test]
fn test_configure_show_reads_config_file() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("custom.toml");
    std::fs::write(
        &config_path,
        "[defaults]\nmodel = \"gpt-4o\"\nto = \"ja\"\n\n[terms]\n\"a\" = \"b\"\n",
    )
    .unwrap();

    clip_tl(&home)
        .args(["configure", "--show", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o"))
        .stdout(predicate::str::contains("terms 1"));
}

#[test]
fn test_batch_rejects_blank_file() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("blank.txt");
    std::fs::write(&input, "\n  \n").unwrap();

    clip_tl(&home)
        .arg("batch")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no texts"));
}
