use std::env;
use std::path::PathBuf;

macro_rules! println_build {
    ($($tokens:tt)*) => {
        println!("cargo:warning=\r\x1b[32;1m   {}", format!($($tokens)*))
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed=ASI_SDK_LIB_DIR");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    match env::var_os("ASI_SDK_LIB_DIR").map(PathBuf::from) {
        Some(dir) => {
            println_build!("Linking libASICamera2 from {}", dir.display());
            println!("cargo:rustc-link-search=native={}", dir.display());
        }
        None => {
            // Fall back to the system search path (e.g. /usr/local/lib after the SDK installer).
            println_build!("ASI_SDK_LIB_DIR not set, relying on the system library path");
        }
    }
    println!("cargo:rustc-link-lib=dylib=ASICamera2");
}
