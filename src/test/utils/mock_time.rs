use crate::time::TimeProvider;
use mockall::mock;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

mock! {
    pub TimeProvider {}

    impl TimeProvider for TimeProvider {
        fn now(&self) -> i64;
    }
}

/// Clock pinned at `now`.
pub fn fixed_time_provider(now: i64) -> Arc<MockTimeProvider> {
    let mut mock_time = MockTimeProvider::new();
    mock_time.expect_now().times(0..).returning(move || now);
    Arc::new(mock_time)
}

/// Clock that reads `clock` on every call, so tests can move time.
pub fn shared_clock_provider(clock: Arc<AtomicI64>) -> Arc<MockTimeProvider> {
    let mut mock_time = MockTimeProvider::new();
    mock_time.expect_now().times(0..).returning(move || clock.load(Ordering::SeqCst));
    Arc::new(mock_time)
}
