pub mod fixtures;
pub mod svg;

pub use fixtures::{KeywordTokenizer, StaticThemes};
pub use svg::{assert_svg_eq, attr_values, root_size, text_lines};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    EnvFilter::new("rime_core=debug,rime_terminal=debug,rime_test_utils=debug")
                }),
            )
            .with_test_writer()
            .init();
    });
}
