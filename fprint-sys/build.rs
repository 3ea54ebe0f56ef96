use std::env;
use std::path::PathBuf;

fn main() {
    let out_path = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let lib = pkg_config::Config::new()
        .print_system_libs(false)
        .atleast_version("0.5")
        .probe("libfprint")
        .expect("libfprint 0.x development files are required (pkg-config `libfprint`)");

    for path in &lib.include_paths {
        println!("cargo:include={}", path.display());
    }

    // fprint.h lives directly in one of the include paths (usually .../libfprint)
    let header = lib
        .include_paths
        .iter()
        .map(|include| include.join("fprint.h"))
        .find(|candidate| candidate.exists())
        .expect("fprint.h not found in libfprint include paths");

    let bindings = lib
        .include_paths
        .iter()
        .fold(bindgen::Builder::default(), |builder, include| {
            builder.clang_arg(format!("-I{}", include.display()))
        })
        .header("stddef.h")
        .header(header.to_string_lossy().into_owned())
        .allowlist_function("fp_.*")
        .allowlist_type("fp_.*")
        .allowlist_var("FP_.*")
        .generate_comments(true)
        .blocklist_type("max_align_t")
        .blocklist_type("__fsid_t")
        .generate()
        .expect("unable to generate libfprint bindings");

    bindings
        .write_to_file(out_path.join("fprint.rs"))
        .expect("unable to write libfprint bindings");
}
