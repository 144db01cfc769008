/// Configure tracing once at startup for the whole process.
///
/// Filtering comes from `RUST_LOG` and falls back to `info`:
///
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=foodell_pages::pages::checkout=debug,info cargo run
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
