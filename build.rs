use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let build_time = chrono::Utc::now().to_rfc3339();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);

    match env::var("GIT_HASH") {
        Ok(hash) => println!("cargo:rustc-env=GIT_HASH={}", hash),
        Err(_) => println!("cargo:rustc-env=GIT_HASH=unknown"),
    }
}
