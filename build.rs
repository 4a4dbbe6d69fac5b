fn main() {
    // write build time info for run reporting
    built::write_built_file().expect("Failed to acquire build-time information");
    // unconditionally rerun this build script so build time info is always up to date
    #[cfg(not(debug_assertions))]
    println!("cargo:rerun-if-changed=foobaz");
}
