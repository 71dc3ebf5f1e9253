use std::sync::Once;

static INIT: Once = Once::new();

/// Routes engine logs to the test output. `RUST_LOG` picks the targets,
/// e.g. `RUST_LOG=course_models::merge=debug`.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
