use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let (Some(crate_dir), Some(out_dir)) = (
        std::env::var_os("CARGO_MANIFEST_DIR"),
        std::env::var_os("OUT_DIR"),
    ) else {
        println!("cargo:warning=header generation skipped: cargo build environment missing");
        return;
    };
    let header = PathBuf::from(out_dir).join("itemlist.h");

    let bindings = match cbindgen::Builder::new()
        .with_crate(PathBuf::from(crate_dir))
        .with_language(cbindgen::Language::C)
        .with_include_guard("ITEMLIST_FFI_H")
        .with_cpp_compat(true)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=header generation skipped: {err}");
            return;
        }
    };
    bindings.write_to_file(header);
}
