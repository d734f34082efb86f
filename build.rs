// build.rs

use chrono::Utc;

fn main() {
    // Get the current UTC time
    let now = Utc::now();
    // Format the date/time string as desired
    let build_date = now.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    // Expose as a compile-time env var so `concat!(env!("BUILD_DATE"))` works
    // in clap's long version string.
    println!("cargo:rustc-env=BUILD_DATE={build_date}");

    // Tell Cargo to re-run this build script only if build.rs itself changes
    // This ensures the build date is updated on new builds.
    println!("cargo:rerun-if-changed=build.rs");
}
