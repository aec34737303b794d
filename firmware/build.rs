// NOTE: Adapted from cortex-m/build.rs
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=link.x");

    let target = env::var("TARGET").unwrap();
    // hosted builds link like any other host program
    if !target.starts_with("riscv") {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let linker_file_path = PathBuf::from("link.x");
    println!("cargo:rustc-link-arg=-Tlink.x");

    // Put the linker script somewhere the linker can find it
    fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(out_dir.join("link.x"))
        .unwrap()
        .write_all(fs::read_to_string(linker_file_path).expect("linker file read").as_bytes())
        .unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
}
