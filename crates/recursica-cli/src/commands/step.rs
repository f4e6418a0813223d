use crate::support::{
    parse_direction_or_exit, parse_hex_or_exit, print_json_or_exit, read_json_file_or_exit,
};
use recursica_kernel::{
    TokenSet, contrast_ratio, get_stepped_color, hex_to_css_var_ref, meets_aa,
    step_until_aa_compliant,
};
use serde_json::json;

pub struct Args {
    pub hex: String,
    pub tokens: String,
    pub surface: String,
    pub direction: String,
    pub until_aa: bool,
    pub max_steps: usize,
    pub json: bool,
}

pub fn run(args: Args) {
    let tokens = TokenSet::from_json(&read_json_file_or_exit(&args.tokens, "tokens"));
    let start = parse_hex_or_exit(&args.hex, "start color");
    let surface = parse_hex_or_exit(&args.surface, "surface");
    let direction = parse_direction_or_exit(&args.direction);

    let result = if args.until_aa {
        step_until_aa_compliant(&start, &surface, direction, &tokens, args.max_steps)
    } else {
        get_stepped_color(start.as_str(), direction, &tokens).unwrap_or_else(|| start.clone())
    };
    let ratio = contrast_ratio(&result, &surface);
    let compliant = meets_aa(&result, &surface);
    let reference = hex_to_css_var_ref(&result, &tokens);

    if args.json {
        let payload = json!({
            "start": start,
            "direction": direction.as_str(),
            "surface": surface,
            "hex": result,
            "ref": reference,
            "contrastRatio": ratio,
            "compliant": compliant,
        });
        print_json_or_exit(&payload, "step");
    } else {
        println!("recursica step");
        println!("  Start: {start}");
        println!("  Direction: {}", direction.as_str());
        println!("  Result: {result}");
        println!("  Reference: {reference}");
        println!("  Contrast vs {surface}: {ratio:.2}:1");
        println!("  AA: {}", if compliant { "pass" } else { "fail" });
    }

    if args.until_aa && !compliant {
        std::process::exit(1);
    }
}
