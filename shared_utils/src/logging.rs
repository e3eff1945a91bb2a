use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber for a connector binary.
///
/// `RUST_LOG` wins when set; otherwise `default_directives` is used, e.g.
/// `"otx_connector=info,doc_store=info"`. Calling this twice is harmless.
pub fn init_tracing(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
