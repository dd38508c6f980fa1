use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Mirrors `assets/` (painting, floor and ceiling textures plus the linked
/// document) next to the build output so the native binary and the web bundle
/// resolve the same relative paths.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.exists() {
        println!("cargo:warning=no assets/ directory, textures will stay blank");
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut options = CopyOptions::new();
    options.overwrite = true;
    copy_items(&[assets], out_dir, &options)?;

    Ok(())
}
