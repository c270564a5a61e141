//! Emits `VERGEN_BUILD_DATE` and `VERGEN_CARGO_TARGET_TRIPLE` for `--version`.

use vergen::{BuildBuilder, CargoBuilder, Emitter};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let mut emitter = Emitter::default();
    match BuildBuilder::all_build() {
        Ok(build) => {
            let _ = emitter.add_instructions(&build);
        }
        Err(e) => eprintln!("vergen build info unavailable: {e}"),
    }
    match CargoBuilder::all_cargo() {
        Ok(cargo) => {
            let _ = emitter.add_instructions(&cargo);
        }
        Err(e) => eprintln!("vergen cargo info unavailable: {e}"),
    }

    if let Err(e) = emitter.emit() {
        eprintln!("vergen emit skipped: {e}");
    }
}
