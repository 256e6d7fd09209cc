use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger` once per test binary so `log::debug!`/`log::trace!`
/// records the splitter emits (see `src/splitter/expr.rs`) are observable
/// when a test is run with `RUST_LOG=sql_splitter=trace`.
pub fn init_test_env() {
    INIT.call_once(|| {
        env_logger::init();
    });
}
