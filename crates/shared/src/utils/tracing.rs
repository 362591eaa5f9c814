#[cfg(feature = "wasm")]
use std::sync::Once;

#[cfg(feature = "backend")]
pub fn configure_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::TRACE)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_line_number(true)
            .with_file(true)
            .with_span_events(FmtSpan::CLOSE)
            .finish(),
    )
    .expect("Failed to set default tracing subscriber");
}

/// Sends events to the browser console and spans to the performance timeline
#[cfg(all(feature = "wasm", not(feature = "backend")))]
pub fn configure_tracing() {
    use time::format_description::well_known::Iso8601;
    use tracing_subscriber::{
        fmt::{format::Pretty, time::UtcTime},
        layer::SubscriberExt,
        util::SubscriberInitExt,
    };
    use tracing_web::{performance_layer, MakeWebConsoleWriter};

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_timer(UtcTime::new(Iso8601::DEFAULT))
        .with_writer(MakeWebConsoleWriter::new());
    let perf_layer = performance_layer().with_details_from_fields(Pretty::default());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(perf_layer)
        .init();
}

/// Event handlers in a worker all start here, only the first call installs the
/// subscriber
#[cfg(feature = "wasm")]
pub fn configure_tracing_once() {
    static ONCE: Once = Once::new();
    ONCE.call_once(configure_tracing);
}
