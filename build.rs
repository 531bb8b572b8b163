use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

// Bundle the demo assets next to the build output so the binary and the
// tests find them without a configured asset root.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let out_dir = env::var("OUT_DIR")?;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if assets_src.exists() {
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src], out_dir, &copy_options)?;
    }

    Ok(())
}
