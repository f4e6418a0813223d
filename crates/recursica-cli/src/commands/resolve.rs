use crate::support::{load_store_or_exit, print_json_or_exit};
use recursica_kernel::{
    ColorResolver, TokenSet, TokenStore, find_color_family_and_level, hex_to_css_var_ref,
};
use serde_json::json;

pub struct Args {
    pub value: String,
    pub tokens: String,
    pub brand: Option<String>,
    pub uikit: Option<String>,
    pub mode: String,
    pub json: bool,
}

pub fn run(args: Args) {
    let store = load_store_or_exit(
        &args.tokens,
        args.brand.as_deref(),
        args.uikit.as_deref(),
        &args.mode,
    );
    let tokens = TokenSet::from_json(&store.state().tokens);
    let index = tokens.index();
    let resolved = ColorResolver::new(&index, &store)
        .with_mode(args.mode.as_str())
        .resolve(&args.value);

    if args.json {
        let address = resolved
            .as_ref()
            .and_then(|hex| find_color_family_and_level(hex, &tokens));
        let payload = json!({
            "value": args.value,
            "mode": args.mode,
            "hex": resolved,
            "token": address,
            "tokenRef": resolved.as_ref().map(|hex| hex_to_css_var_ref(hex, &tokens)),
        });
        print_json_or_exit(&payload, "resolve");
    } else {
        match resolved.as_ref() {
            Some(hex) => println!("{hex}"),
            None => println!("unresolved"),
        }
    }

    if resolved.is_none() {
        std::process::exit(1);
    }
}
