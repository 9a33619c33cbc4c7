//! Host-side helper: `cargo run` compiles the wasm bundle into
//! `static/pkg` and serves the hero page locally for preview.

use std::process::{Command, Stdio};
use std::{env, path::Path, thread, time::Duration};

const DEFAULT_PORT: &str = "8000";

fn main() {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return;
    }
    let port = env::args().nth(1).unwrap_or_else(|| DEFAULT_PORT.to_owned());

    build_wasm_bundle();
    serve("static", &port);
}

fn build_wasm_bundle() {
    println!("Building WASM pkg …");
    let status = Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status();

    match status {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!(
                "wasm-pack not found in PATH. Serving whatever is already in static/pkg."
            );
            if !Path::new("static/pkg").exists() {
                eprintln!("static/pkg does not exist yet; the page will not start.");
                std::process::exit(1);
            }
        }
    }
}

fn serve(dir: &str, port: &str) {
    println!("Serving the hero page at http://127.0.0.1:{port} …");
    let _server = Command::new("python3")
        .args(["-m", "http.server", port, "--directory", dir])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start http server");

    // Keep process alive while the child serves.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
