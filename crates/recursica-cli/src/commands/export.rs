use crate::support::{load_config_or_exit, load_store_or_exit, print_json_or_exit};
use recursica_export::{Artifact, ExportOptions, StructuralValidator, export};
use std::fs;
use std::path::Path;

pub struct Args {
    pub tokens: String,
    pub brand: String,
    pub uikit: String,
    pub out: String,
    pub config: Option<String>,
    pub json: bool,
}

fn write_artifact_or_exit(dir: &Path, artifact: &Artifact) {
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to write {}: {e}", path.display());
        std::process::exit(1);
    });
    tracing::debug!(path = %path.display(), size = artifact.size, "wrote artifact");
}

pub fn run(args: Args) {
    let config = load_config_or_exit(args.config.as_deref());
    let store = load_store_or_exit(
        &args.tokens,
        Some(&args.brand),
        Some(&args.uikit),
        &config.audit.mode,
    );
    let options = ExportOptions::from(&config);

    let outcome = export(&store, &StructuralValidator, &options, chrono::Utc::now())
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });

    for failure in &outcome.failures {
        tracing::warn!(artifact = %failure.file_name, "not writing blocked artifact");
    }

    let out = Path::new(&args.out);
    fs::create_dir_all(out).unwrap_or_else(|e| {
        eprintln!("error: failed to create {}: {e}", out.display());
        std::process::exit(1);
    });
    for artifact in outcome.artifacts.iter().chain(outcome.bundle.as_ref()) {
        write_artifact_or_exit(out, artifact);
    }

    if args.json {
        print_json_or_exit(&outcome, "export");
    } else {
        println!("recursica export");
        println!("  Out: {}", out.display());
        println!("  Exported at: {}", outcome.exported_at);
        for artifact in outcome.artifacts.iter().chain(outcome.bundle.as_ref()) {
            println!(
                "  - {} ({} bytes, sha256 {})",
                artifact.file_name, artifact.size, artifact.sha256
            );
        }
        if !outcome.skipped_tokens.is_empty() {
            println!("  Skipped tokens: {}", outcome.skipped_tokens.len());
            for skipped in &outcome.skipped_tokens {
                println!("    - {}: {}", skipped.path, skipped.reason);
            }
        }
        for failure in &outcome.failures {
            println!("  Blocked {}: {}", failure.file_name, failure.message);
        }
    }

    if !outcome.is_complete() {
        std::process::exit(1);
    }
}
