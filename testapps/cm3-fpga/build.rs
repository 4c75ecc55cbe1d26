use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/* Memory layout of the Cortex-M3 soft core: FLASH (ITCM) and RAM (DTCM) */
fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();

    println!("cargo:rustc-link-search={}", out.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Link args
    println!("cargo:rustc-link-arg=-Tlink.x");
}
