use rstest::fixture;
use tracing::info;

mod mock_chirpy;
pub use self::mock_chirpy::*;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub async fn chirpy() -> MockChirpy {
    init_tracing();
    match MockChirpy::start().await {
        Ok(chirpy) => chirpy,
        Err(error) => {
            panic!("fail to start mock chirpy: {error:?}");
        }
    }
}
