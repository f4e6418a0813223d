use recursica_kernel::{
    exported_name_to_path, internal_name_to_path, path_to_exported_name, path_to_internal_name,
    specific_name,
};

pub fn encode(segments: Vec<String>) {
    println!("{}", path_to_exported_name(&segments));
    if let Some(internal) = path_to_internal_name(&segments) {
        println!("{internal}");
    }
}

pub fn decode(name: String) {
    let path = exported_name_to_path(&name);
    if path.is_empty() {
        eprintln!("error: not an exported name: {name}");
        std::process::exit(1);
    }
    println!("{}", path.join(" "));
}

pub fn path(name: String) {
    let path = internal_name_to_path(&name);
    if path.is_empty() {
        eprintln!("error: unrecognized variable name: {name}");
        std::process::exit(1);
    }
    println!("{}", path.join(" "));
    println!("{}", specific_name(&name));
}
