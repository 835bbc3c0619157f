//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ridgeline_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("ridgeline_core version={}", ridgeline_core::core_version());
    match ridgeline_core::db::open_db_in_memory() {
        Ok(_) => println!("ridgeline_core storage=ok"),
        Err(err) => {
            eprintln!("ridgeline_core storage=error {err}");
            std::process::exit(1);
        }
    }
}
