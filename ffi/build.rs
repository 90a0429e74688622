use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").map(PathBuf::from).unwrap_or_default();
    let header = crate_dir.join("include").join("sodam.h");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("SODAM_H")
        .with_parse_deps(false)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(header);
        }
        // Best effort; the library still builds without a header.
        Err(e) => println!("cargo:warning=sodam.h not generated: {e}"),
    }
}
