use crate::support::{load_store_or_exit, print_json_or_exit};
use recursica_audit::{audit, suggest_fixes};
use recursica_kernel::{TokenSet, TokenStore};
use serde_json::json;

pub fn run(tokens: String, brand: String, uikit: Option<String>, fix: bool, json_output: bool) {
    let store = load_store_or_exit(&tokens, Some(&brand), uikit.as_deref(), "light");
    let token_set = TokenSet::from_json(&store.state().tokens);
    let index = token_set.index();
    let report = audit(&store.state().theme, &store, &index);
    let fixes = if fix {
        suggest_fixes(&report, &token_set)
    } else {
        Vec::new()
    };

    if json_output {
        let mut payload = json!({
            "compliant": report.is_compliant(),
            "checked": report.checked,
            "violations": report.violations,
        });
        if fix {
            payload["fixes"] = json!(fixes);
        }
        print_json_or_exit(&payload, "audit");
    } else {
        println!("recursica audit");
        println!("  Tokens: {tokens}");
        println!("  Brand: {brand}");
        println!("  Pairs checked: {}", report.checked);
        println!("  Violations: {}", report.violations.len());
        for violation in &report.violations {
            println!("    - [{}] {}", violation.kind.as_str(), violation.message);
        }
        for suggestion in &fixes {
            println!(
                "  Fix {} {}: {} -> {} ({}, {:.2}:1{})",
                suggestion.mode,
                suggestion.location,
                suggestion.current_hex,
                suggestion.suggested_hex,
                suggestion.suggested_ref,
                suggestion.contrast_ratio,
                if suggestion.compliant { "" } else { ", still failing" }
            );
        }
    }

    if !report.is_compliant() {
        std::process::exit(1);
    }
}
