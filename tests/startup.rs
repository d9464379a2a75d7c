//! Startup against replicas that never come up.

use std::time::{Duration, Instant};

use market_gateway::config::PoolConfig;
use market_gateway::lifecycle::Gateway;

mod common;

#[tokio::test]
async fn test_startup_gives_up_on_first_unreachable_replica() {
    let port = common::closed_port().await;
    let mut config = common::local_config(port);
    config.startup.max_attempts = 2;
    config.startup.retry_delay_secs = 0;

    let started = tokio::time::timeout(Duration::from_secs(20), Gateway::start(config))
        .await
        .expect("startup did not give up");

    let err = match started {
        Ok(_) => panic!("startup succeeded against a closed port"),
        Err(e) => e,
    };
    assert_eq!(err.replica, "bitcoin_read_1");
    assert_eq!(err.attempts, 2);
}

#[tokio::test]
async fn test_startup_attempts_are_single_connects() {
    let port = common::closed_port().await;
    let mut config = common::local_config(port);
    config.pool = PoolConfig::default();
    config.startup.max_attempts = 5;
    config.startup.retry_delay_secs = 0;

    let start = Instant::now();
    let err = match Gateway::start(config).await {
        Ok(_) => panic!("startup succeeded against a closed port"),
        Err(e) => e,
    };

    // five refused connects; none waits out the 30s acquire timeout
    assert!(start.elapsed() < Duration::from_secs(5), "{:?}", start.elapsed());
    assert_eq!(err.attempts, 5);
    let cause = err.source.downcast_ref::<sqlx::Error>();
    assert!(matches!(cause, Some(sqlx::Error::Io(_))), "{cause:?}");
}
