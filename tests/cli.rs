use std::io::Cursor;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

/// Runs the binary from an empty directory with an isolated HOME so no
/// user or project config leaks into the test.
struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("chemcheck").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn write(&self, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(["--report", "json"])
            .args(args)
            .output()
            .unwrap();
        serde_json::from_slice(&out.stdout).expect("valid json")
    }
}

#[test]
fn safe_product_exits_zero() {
    Env::new()
        .cmd()
        .args(["--report", "text", "Aqua, Glycerin, Shea Butter"])
        .assert()
        .success()
        .stdout(contains("- aqua : Low risk"))
        .stdout(contains("Product appears safe."));
}

#[test]
fn harmful_product_exits_one() {
    Env::new()
        .cmd()
        .args(["--report", "text", "Aqua, Glycerin, Methylparaben"])
        .assert()
        .code(1)
        .stdout(contains("- methylparaben : High risk"))
        .stdout(contains("Harmful ingredients detected: methylparaben"));
}

#[test]
fn no_input_exits_two() {
    Env::new()
        .cmd()
        .assert()
        .code(2)
        .stderr(contains("no input provided"));
}

#[test]
fn garbage_input_has_no_valid_ingredients() {
    Env::new()
        .cmd()
        .arg("1234 %%% ;;")
        .assert()
        .code(2)
        .stderr(contains("no valid ingredients"));
}

#[test]
fn json_report_structure() {
    let json = Env::new().run_json(&["Aqua, Sodium Benzoate, Triclosan"]);

    assert_eq!(json["keyword_version"], "builtin-1");
    assert_eq!(json["ingredients"].as_array().unwrap().len(), 3);
    assert_eq!(json["report"]["verdict"], "unsafe");
    assert_eq!(json["report"]["harmful"][0], "triclosan");
    assert_eq!(json["report"]["assessments"][1]["risk_label"], "Moderate");
    assert_eq!(json["report"]["assessments"][1]["toxicity_score"], 0.7);
    assert!(json.get("compounds").is_none());
}

#[test]
fn config_keywords_replace_builtin_list() {
    let env = Env::new();
    let config = env.write(
        "custom.toml",
        b"[keywords]\nversion = \"test-1\"\nhigh = [\"shea\"]\n",
    );

    let json = env.run_json(&["--config", config.to_str().unwrap(), "Shea Butter, Methylparaben"]);

    assert_eq!(json["keyword_version"], "test-1");
    assert_eq!(json["report"]["harmful"], serde_json::json!(["shea butter"]));
}

#[test]
fn local_config_dir_is_discovered() {
    let env = Env::new();
    std::fs::create_dir(env.dir.path().join(".chemcheck")).unwrap();
    env.write(".chemcheck/config.toml", b"[analysis]\ndeduplicate = true\n");

    let json = env.run_json(&["talc, aqua, talc"]);
    assert_eq!(json["ingredients"], serde_json::json!(["talc", "aqua"]));
}

#[test]
fn dedup_flag() {
    let env = Env::new();
    assert_eq!(env.run_json(&["talc, talc"])["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(
        env.run_json(&["--dedup", "talc, talc"])["ingredients"].as_array().unwrap().len(),
        1
    );
}

#[test]
fn text_from_stdin() {
    Env::new()
        .cmd()
        .args(["--report", "text", "--text-file", "-"])
        .write_stdin("Water, Coal Tar Extract\n")
        .assert()
        .code(1)
        .stdout(contains("coal tar extract : High risk"));
}

#[test]
fn missing_image_is_acquisition_error() {
    Env::new()
        .cmd()
        .args(["--image", "missing.png", "Aqua"])
        .assert()
        .code(2)
        .stderr(contains("text acquisition failed"));
}

#[test]
fn unavailable_ocr_engine_is_reported() {
    let env = Env::new();
    let mut png = Vec::new();
    image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(16, 16, image::Luma([255u8])))
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .unwrap();
    let label = env.write("label.png", &png);
    let config = env.write("ocr.toml", b"[ocr]\ncommand = \"chemcheck-missing-ocr\"\n");

    env.cmd()
        .args(["--quiet", "--config", config.to_str().unwrap()])
        .args(["--image", label.to_str().unwrap()])
        .arg("Aqua")
        .assert()
        .code(2)
        .stderr(contains("chemcheck-missing-ocr"));
}

#[test]
fn terminal_quiet_summary() {
    Env::new()
        .cmd()
        .args(["--quiet", "Aqua, Talc, Methylparaben"])
        .assert()
        .code(1)
        .stdout(contains("Total: 3"))
        .stdout(contains("Verdict: unsafe"));
}

#[test]
fn terminal_verbose_lists_ingredients() {
    Env::new()
        .cmd()
        .args(["--verbose", "Aqua, Glycerin"])
        .assert()
        .success()
        .stdout(contains("SUMMARY"))
        .stdout(contains("aqua, glycerin"))
        .stdout(contains("Product appears safe."));
}

#[test]
fn pdf_report_is_written() {
    let env = Env::new();
    env.cmd()
        .args(["--pdf", "out.pdf", "Aqua, Glycerin"])
        .assert()
        .success();

    let bytes = std::fs::read(env.dir.path().join("out.pdf")).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn malformed_config_exits_two() {
    let env = Env::new();
    let config = env.write("bad.toml", b"[keywords\nhigh = 3");

    env.cmd()
        .args(["--config", config.to_str().unwrap(), "Methylparaben"])
        .assert()
        .code(2)
        .stderr(contains("Invalid config"));
}

#[test]
fn unwritable_pdf_path_exits_two() {
    Env::new()
        .cmd()
        .args(["--pdf", "/nonexistent/dir/out.pdf", "Methylparaben"])
        .assert()
        .code(2)
        .stderr(contains("Failed to write PDF"));
}

#[test]
fn zero_ocr_timeout_is_rejected() {
    Env::new()
        .cmd()
        .args(["--ocr-timeout", "0", "Aqua"])
        .assert()
        .failure()
        .stderr(contains("--ocr-timeout"));
}
