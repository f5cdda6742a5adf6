use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=images");

    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is missing"));
    let images = manifest_dir.join("images");
    println!(
        "cargo:rustc-env=UMPIRE_TRACK_SOURCE_IMAGES={}",
        images.display()
    );
}
