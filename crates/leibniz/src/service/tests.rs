use super::*;
use crate::error::Error;
use core::time::Duration;
use num_traits::Zero;

fn small_config() -> ServiceConfig {
    ServiceConfig {
        num_workers: 3,
        runtime_threads: 2,
        scale: 24,
        digits: 20,
        ..ServiceConfig::default()
    }
}

#[test]
fn default_config_is_valid() {
    let config = ServiceConfig::default();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.num_workers, DEFAULT_NUM_WORKERS);
    assert_eq!(config.fold_order, FoldOrder::Sequenced);
}

#[test]
fn rejects_zero_sized_settings() {
    let cases = [
        ServiceConfig { num_workers: 0, ..small_config() },
        ServiceConfig { runtime_threads: 0, ..small_config() },
        ServiceConfig { worker_queue_depth: 0, ..small_config() },
        ServiceConfig { term_buffer_size: 0, ..small_config() },
        ServiceConfig { scale: 0, ..small_config() },
        ServiceConfig { digits: 0, ..small_config() },
    ];
    for config in cases {
        assert!(
            matches!(Service::with_config(config.clone()), Err(Error::InvalidConfig { .. })),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn digits_are_bounded_by_the_carried_scale() {
    let widest = ServiceConfig { scale: 10, digits: 11, ..small_config() };
    assert!(Service::with_config(widest).is_ok());

    let padded = ServiceConfig { scale: 10, digits: 40, ..small_config() };
    assert!(matches!(
        Service::with_config(padded),
        Err(Error::InvalidConfig { reason }) if reason.contains("scale 10")
    ));
}

#[test]
fn fold_order_parses_case_insensitively() {
    assert_eq!("Sequenced".parse::<FoldOrder>(), Ok(FoldOrder::Sequenced));
    assert_eq!(" arrival ".parse::<FoldOrder>(), Ok(FoldOrder::Arrival));
    assert!(matches!(
        "random".parse::<FoldOrder>(),
        Err(Error::InvalidConfig { .. })
    ));
    assert_eq!(FoldOrder::Arrival.to_string(), "arrival");
}

#[test]
fn new_service_is_idle() {
    let service = Service::with_config(small_config()).unwrap();
    assert_eq!(service.state(), State::Created);
    assert!(service.iterations().is_zero());
    assert!(!service.is_drained());
    assert_eq!(service.stop(), Err(Error::NotStarted));
    assert_eq!(
        service.wait_drained(Duration::from_millis(10)),
        Err(Error::NotStarted)
    );
    // Misuse leaves the state untouched.
    assert_eq!(service.state(), State::Created);
}

#[test]
fn start_and_stop_are_single_shot() {
    let service = Service::with_config(small_config()).unwrap();
    service.start().unwrap();
    assert_eq!(service.state(), State::Running);
    assert_eq!(service.start(), Err(Error::AlreadyStarted));

    service.stop().unwrap();
    assert_eq!(service.state(), State::Stopped);
    assert_eq!(service.stop(), Err(Error::AlreadyStopped));
    assert_eq!(service.start(), Err(Error::AlreadyStopped));
}

#[test]
fn waiting_on_a_running_service_times_out() {
    let service = Service::with_config(small_config()).unwrap();
    service.start().unwrap();
    assert_eq!(
        service.wait_drained(Duration::from_millis(20)),
        Err(Error::DrainTimeout {
            timeout: Duration::from_millis(20)
        })
    );
    service.stop().unwrap();
    service.wait_drained(Duration::from_secs(5)).unwrap();
    assert!(service.is_drained());
}

#[test]
fn snapshot_agrees_with_result_once_drained() {
    let service = Service::with_config(small_config()).unwrap();
    service.start().unwrap();
    service.stop().unwrap();
    service.wait_drained(Duration::from_secs(5)).unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.result, service.result());
    assert_eq!(snapshot.iterations, service.iterations());
}

#[test]
fn dropping_a_running_service_does_not_hang() {
    let service = Service::with_config(small_config()).unwrap();
    service.start().unwrap();
    drop(service);
}

#[tokio::test]
async fn can_be_driven_from_async_code() {
    let service = Service::with_config(small_config()).unwrap();
    service.start().unwrap();
    tokio::task::yield_now().await;
    service.stop().unwrap();
    tokio::time::timeout(Duration::from_secs(5), service.drained())
        .await
        .unwrap();
    assert!(service.is_drained());
    // Dropped while a runtime is current.
}
