use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use vocab_quiz_backend::config::Config;
use vocab_quiz_backend::routes::build_router;
use vocab_quiz_backend::state::AppState;
use vocab_quiz_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn store(&self) -> &Store {
        self.state.store()
    }
}

pub async fn spawn_with_pool_size(pool_size: usize) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("vocab-quiz-test.sled");

    // 直接构造 Config，避免 set_var 在并行测试中互相干扰
    let config = Config {
        sled_path: sled_path.to_string_lossy().to_string(),
        distractor_pool_size: pool_size,
        ..Config::default()
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let state = AppState::new(store, &config);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with_pool_size(60).await
}
