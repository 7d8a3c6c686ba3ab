use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let (Ok(out_dir), Ok(profile)) = (env::var("OUT_DIR"), env::var("PROFILE")) else {
        println!("cargo:warning=OUT_DIR/PROFILE not set, skipping config.toml copy");
        return;
    };

    // OUT_DIR is typically: target/debug/build/backend-xxx/out
    // We need to go to: target/debug or target/release
    let out_path = Path::new(&out_dir);
    let Some(target_dir) = out_path.ancestors().find(|p| p.ends_with(&profile)) else {
        println!("cargo:warning=Could not find target profile directory");
        return;
    };

    let Some(workspace_root) = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
    else {
        println!("cargo:warning=Could not find workspace root");
        return;
    };

    let source_config = workspace_root.join("config.toml");
    let dest_config = target_dir.join("config.toml");

    if source_config.exists() {
        match fs::copy(&source_config, &dest_config) {
            Ok(_) => println!("cargo:warning=Copied config.toml to {:?}", dest_config),
            Err(e) => println!("cargo:warning=Failed to copy config.toml: {}", e),
        }
    } else {
        println!(
            "cargo:warning=config.toml not found at {:?}, using default config",
            source_config
        );
    }
}
