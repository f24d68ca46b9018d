pub mod stats;

use std::sync::Once;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("finmind_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Folds a label for matching: Unicode-decomposed, combining marks stripped,
/// trimmed, lowercased. `"Categoría"` and `"categoria"` fold to the same key.
pub fn fold_label(raw: &str) -> String {
    let stripped: String = raw.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.trim().to_lowercase()
}
