use recursica_export::RecursicaConfig;
use recursica_kernel::{Direction, Hex, MemoryStore, normalize::MODES};
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;

pub fn read_json_file_or_exit(path: &str, label: &str) -> Value {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {path}: {e}");
        std::process::exit(1);
    });
    serde_json::from_slice::<Value>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {path}: {e}");
        std::process::exit(1);
    })
}

fn read_optional_json_or_exit(path: Option<&str>, label: &str) -> Value {
    path.map_or_else(|| json!({}), |path| read_json_file_or_exit(path, label))
}

/// Load the three documents into a store projected for `mode`.
pub fn load_store_or_exit(
    tokens: &str,
    brand: Option<&str>,
    uikit: Option<&str>,
    mode: &str,
) -> MemoryStore {
    let tokens = read_json_file_or_exit(tokens, "tokens");
    let brand = read_optional_json_or_exit(brand, "brand");
    let uikit = read_optional_json_or_exit(uikit, "uikit");
    let mut store = MemoryStore::new(&tokens, &brand, &uikit);
    if mode != MODES[0] {
        store.set_mode(mode).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });
        store.recompute_and_apply_all();
    }
    store
}

pub fn load_config_or_exit(path: Option<&str>) -> RecursicaConfig {
    let Some(path) = path else {
        return RecursicaConfig::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read config at {path}: {e}");
        std::process::exit(1);
    });
    RecursicaConfig::parse(&text, path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn parse_hex_or_exit(value: &str, label: &str) -> Hex {
    value.parse().unwrap_or_else(|e| {
        eprintln!("error: {label}: {e}");
        std::process::exit(1);
    })
}

pub fn parse_direction_or_exit(value: &str) -> Direction {
    value.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn print_json_or_exit<T: Serialize>(payload: &T, label: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {label} payload: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}
