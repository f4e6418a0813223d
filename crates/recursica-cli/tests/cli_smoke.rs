use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "recursica-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_recursica<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_recursica");
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("recursica command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_json(path: &Path, value: &Value) -> String {
    fs::write(path, serde_json::to_vec_pretty(value).expect("fixture json"))
        .expect("fixture should be written");
    path.display().to_string()
}

fn write_tokens(dir: &Path) -> String {
    let levels = [
        ("000", "#ffffff"),
        ("050", "#f5f5f5"),
        ("100", "#e5e5e5"),
        ("200", "#d4d4d4"),
        ("300", "#a3a3a3"),
        ("400", "#8a8a8a"),
        ("500", "#737373"),
        ("600", "#525252"),
        ("700", "#404040"),
        ("800", "#262626"),
        ("900", "#171717"),
        ("1000", "#0a0a0a"),
    ];
    let gray: serde_json::Map<String, Value> = levels
        .iter()
        .map(|(level, hex)| {
            (
                (*level).to_string(),
                json!({"$type": "color", "$value": hex}),
            )
        })
        .collect();
    write_json(
        &dir.join("tokens.json"),
        &json!({"tokens": {"colors": {"gray": gray}, "sizes": {"sm": {"$type": "dimension", "$value": "4px"}}}}),
    )
}

fn write_brand(dir: &Path) -> String {
    write_json(
        &dir.join("brand.json"),
        &json!({
            "brand": {"themes": {"light": {
                "palettes": {"neutral": {
                    "100": {"color": {"tone": "#ffffff", "on-tone": "{tokens.colors.gray.050}"}},
                    "900": {"color": {"tone": "{tokens.colors.gray.900}", "on-tone": "#ffffff"}}
                }},
                "layers": {"0": {"properties": {
                    "surface": "#ffffff",
                    "element-text-color": "{brand.palettes.neutral.900.color.tone}"
                }}}
            }}}
        }),
    )
}

fn write_uikit(dir: &Path) -> String {
    write_json(
        &dir.join("uikit.json"),
        &json!({"ui-kit": {"globals": {"focus": "{brand.themes.light.palettes.neutral.900.color.tone}"}}}),
    )
}

#[test]
fn name_encode_and_decode_round_trip() {
    let output = run_recursica(["name", "encode", "tokens", "colors", "scale-01", "500"]);
    assert_success(&output);
    let stdout = stdout_text(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "--recursica_tokens_colors_scale-01_500",
            "--recursica-tokens-colors-scale-01-500"
        ]
    );

    let output = run_recursica(["name", "decode", "--", "--recursica_a__b_c"]);
    assert_success(&output);
    assert_eq!(stdout_text(&output).trim(), "a_b c");

    let output = run_recursica(["name", "decode", "--", "--not-exported"]);
    assert_failure(&output);
}

#[test]
fn name_path_reports_specific_spelling() {
    let output = run_recursica([
        "name",
        "path",
        "--",
        "--recursica-brand-themes-light-layer-0-properties-element-text-color",
    ]);
    assert_success(&output);
    let stdout = stdout_text(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "brand themes light layers 0 properties element-text-color",
            "--recursica-brand-themes-light-layer-0-properties-element_text_color"
        ]
    );
}

#[test]
fn resolve_follows_brand_references_to_hex() {
    let temp = TempDirGuard::new("resolve");
    let tokens = write_tokens(temp.path());
    let brand = write_brand(temp.path());
    let output = run_recursica([
        "resolve",
        "var(--recursica-tokens-colors-gray-500)",
        "--tokens",
        tokens.as_str(),
        "--brand",
        brand.as_str(),
        "--json",
    ]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["hex"], json!("#737373"));
    assert_eq!(payload["tokenRef"], json!("var(--recursica-tokens-colors-gray-500)"));

    let output = run_recursica([
        "resolve",
        "var(--recursica-nowhere)",
        "--tokens",
        tokens.as_str(),
    ]);
    assert_failure(&output);
    assert_eq!(stdout_text(&output).trim(), "unresolved");
}

#[test]
fn step_until_aa_reaches_first_compliant_level() {
    let temp = TempDirGuard::new("step");
    let tokens = write_tokens(temp.path());
    let output = run_recursica([
        "step",
        "#f5f5f5",
        "--tokens",
        tokens.as_str(),
        "--until-aa",
        "--json",
    ]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["hex"], json!("#737373"));
    assert_eq!(payload["ref"], json!("var(--recursica-tokens-colors-gray-500)"));
    assert_eq!(payload["compliant"], json!(true));

    let output = run_recursica([
        "step",
        "#f5f5f5",
        "--tokens",
        tokens.as_str(),
        "--direction",
        "sideways",
    ]);
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid direction"));
}

#[test]
fn audit_reports_violations_and_fixes() {
    let temp = TempDirGuard::new("audit");
    let tokens = write_tokens(temp.path());
    let brand = write_brand(temp.path());
    let output = run_recursica([
        "audit",
        "--tokens",
        tokens.as_str(),
        "--brand",
        brand.as_str(),
        "--fix",
        "--json",
    ]);
    assert_failure(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["compliant"], json!(false));
    let violations = payload["violations"].as_array().expect("violations array");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["location"], json!("palettes.neutral.100"));
    assert_eq!(violations[0]["type"], json!("palette-on-tone"));
    assert_eq!(
        payload["fixes"][0]["suggestedRef"],
        json!("var(--recursica-tokens-colors-gray-500)")
    );
}

#[test]
fn export_writes_artifacts_and_bundle() {
    let temp = TempDirGuard::new("export");
    let tokens = write_tokens(temp.path());
    let brand = write_brand(temp.path());
    let uikit = write_uikit(temp.path());
    let out = temp.path().join("out");
    let out_arg = out.display().to_string();
    let output = run_recursica([
        "export",
        "--tokens",
        tokens.as_str(),
        "--brand",
        brand.as_str(),
        "--uikit",
        uikit.as_str(),
        "--out",
        out_arg.as_str(),
        "--json",
    ]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["artifacts"].as_array().map(Vec::len), Some(5));
    for name in [
        "tokens.json",
        "brand.json",
        "uikit.json",
        "recursica-specific.css",
        "recursica-scoped.css",
        "recursica-export.tar.gz",
    ] {
        assert!(out.join(name).exists(), "{name} should be written");
    }
    let uikit_doc: Value =
        serde_json::from_slice(&fs::read(out.join("uikit.json")).expect("uikit.json"))
            .expect("uikit json");
    assert_eq!(
        uikit_doc["ui-kit"]["globals"]["focus"],
        json!("{brand.palettes.neutral.900.color.tone}")
    );
}

#[test]
fn export_logs_blocked_artifacts_and_writes_the_rest() {
    let temp = TempDirGuard::new("export-blocked");
    let tokens = write_tokens(temp.path());
    let brand = write_brand(temp.path());
    let uikit = write_json(
        &temp.path().join("uikit.json"),
        &json!({"ui-kit": {"globals": {"focus": "{brand palettes}"}}}),
    );
    let out = temp.path().join("out");
    let out_arg = out.display().to_string();
    let output = run_recursica([
        "export",
        "--tokens",
        tokens.as_str(),
        "--brand",
        brand.as_str(),
        "--uikit",
        uikit.as_str(),
        "--out",
        out_arg.as_str(),
    ]);
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not writing blocked artifact"), "{stderr}");
    assert!(stderr.contains("uikit.json"), "{stderr}");
    assert!(out.join("tokens.json").exists());
    assert!(out.join("recursica-specific.css").exists());
    assert!(!out.join("uikit.json").exists());
}

#[test]
fn export_honors_config_and_compliance_gate() {
    let temp = TempDirGuard::new("export-config");
    let tokens = write_tokens(temp.path());
    let brand = write_brand(temp.path());
    let uikit = write_uikit(temp.path());
    let config = temp.path().join("recursica.toml");
    fs::write(&config, "[export]\nfile_stem = \"acme\"\nbundle = \"never\"\n")
        .expect("config should be written");
    let out = temp.path().join("out");
    let args = |config: &Path| {
        vec![
            "export".to_string(),
            "--tokens".to_string(),
            tokens.clone(),
            "--brand".to_string(),
            brand.clone(),
            "--uikit".to_string(),
            uikit.clone(),
            "--out".to_string(),
            out.display().to_string(),
            "--config".to_string(),
            config.display().to_string(),
        ]
    };

    let output = run_recursica(args(&config));
    assert_success(&output);
    assert!(out.join("acme-scoped.css").exists());
    assert!(!out.join("acme-export.tar.gz").exists());

    let gated = temp.path().join("gated.toml");
    fs::write(&gated, "[audit]\ngate_export = true\n").expect("config should be written");
    let output = run_recursica(args(&gated));
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("AA contrast violation"));

    let broken = temp.path().join("broken.toml");
    fs::write(&broken, "[export]\nbundle = 3\n").expect("config should be written");
    let output = run_recursica(args(&broken));
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config at"));
}
