use bigdecimal::BigDecimal;
use core::{str::FromStr, time::Duration};
use leibniz::{Error, FixedPoint, FoldOrder, Service, ServiceConfig, State, approximate};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::{
    sync::Arc,
    thread,
    time::Instant,
};

const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

fn config(fold_order: FoldOrder) -> ServiceConfig {
    ServiceConfig {
        num_workers: 4,
        runtime_threads: 2,
        scale: 32,
        digits: 30,
        fold_order,
        ..ServiceConfig::default()
    }
}

fn wait_for_iterations(service: &Service, min: u64) -> BigUint {
    let deadline = Instant::now() + DRAIN_TIMEOUT;
    loop {
        let iterations = service.iterations();
        if iterations >= BigUint::from(min) {
            return iterations;
        }
        assert!(Instant::now() < deadline, "no progress past {iterations} terms");
        thread::sleep(Duration::from_millis(1));
    }
}

fn value(result: &str) -> BigDecimal {
    BigDecimal::from_str(result).unwrap()
}

/// What a serial summation of the same number of terms would report.
fn serial_result(config: &ServiceConfig, iterations: &BigUint) -> String {
    let terms = iterations.to_u64().unwrap();
    approximate(&FixedPoint::new(config.scale).prefix_sum(terms), config.digits)
}

#[test]
fn unstarted_service_reports_exactly_four() {
    let service = Service::new();
    let result = service.result();
    assert_eq!(value(&result), BigDecimal::from(4));
    assert!(result.starts_with("4.000"));
    assert_eq!(service.state(), State::Created);
}

#[test]
fn ten_terms_in_lands_between_three_and_three_and_a_half() {
    let service = Service::with_config(config(FoldOrder::Sequenced)).unwrap();
    service.start().unwrap();
    wait_for_iterations(&service, 10);

    let approx = value(&service.result());
    assert!(approx > BigDecimal::from(3), "{approx}");
    assert!(approx < BigDecimal::from_str("3.5").unwrap(), "{approx}");
    service.stop().unwrap();
}

#[test]
fn double_stop_returns_promptly() {
    let service = Service::with_config(config(FoldOrder::Sequenced)).unwrap();
    service.start().unwrap();

    let started = Instant::now();
    assert_eq!(service.stop(), Ok(()));
    assert_eq!(service.stop(), Err(Error::AlreadyStopped));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn result_is_stable_after_drain() {
    let service = Service::with_config(config(FoldOrder::Sequenced)).unwrap();
    service.start().unwrap();
    wait_for_iterations(&service, 100);
    service.stop().unwrap();
    service.wait_drained(DRAIN_TIMEOUT).unwrap();

    let first = service.snapshot();
    thread::sleep(Duration::from_millis(20));
    let second = service.snapshot();
    assert_eq!(first, second);
    assert_eq!(service.result(), service.result());
}

#[test]
fn iterations_never_go_backwards() {
    let service = Arc::new(Service::with_config(config(FoldOrder::Arrival)).unwrap());
    service.start().unwrap();

    let reader = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            let mut last = BigUint::default();
            for _ in 0..200 {
                let now = service.iterations();
                assert!(now >= last, "{now} < {last}");
                last = now;
                thread::sleep(Duration::from_micros(200));
            }
        })
    };

    reader.join().unwrap();
    service.stop().unwrap();
    service.wait_drained(DRAIN_TIMEOUT).unwrap();
}

#[test]
fn sequenced_snapshots_are_exact_prefix_sums() {
    let config = config(FoldOrder::Sequenced);
    let service = Service::with_config(config.clone()).unwrap();
    service.start().unwrap();

    for _ in 0..5 {
        let snapshot = service.snapshot();
        assert_eq!(
            snapshot.iterations.clone() % 2_u32,
            BigUint::default(),
            "units fold whole"
        );
        assert_eq!(snapshot.result, serial_result(&config, &snapshot.iterations));
        thread::sleep(Duration::from_millis(2));
    }
    service.stop().unwrap();
}

#[test]
fn drained_result_matches_serial_sum_in_both_orders() {
    for order in [FoldOrder::Sequenced, FoldOrder::Arrival] {
        let config = config(order);
        let service = Service::with_config(config.clone()).unwrap();
        service.start().unwrap();
        wait_for_iterations(&service, 500);
        service.stop().unwrap();
        service.wait_drained(DRAIN_TIMEOUT).unwrap();

        let snapshot = service.snapshot();
        assert_eq!(
            snapshot.result,
            serial_result(&config, &snapshot.iterations),
            "{order} order"
        );
    }
}

#[test]
fn concurrent_services_do_not_share_state() {
    let config = config(FoldOrder::Arrival);
    let first = Service::with_config(config.clone()).unwrap();
    let second = Service::with_config(config.clone()).unwrap();

    first.start().unwrap();
    wait_for_iterations(&first, 200);
    second.start().unwrap();
    wait_for_iterations(&second, 50);

    first.stop().unwrap();
    first.wait_drained(DRAIN_TIMEOUT).unwrap();
    // Still running, and unaffected by its neighbour stopping.
    assert_eq!(second.state(), State::Running);
    assert!(!second.is_drained());
    second.stop().unwrap();
    second.wait_drained(DRAIN_TIMEOUT).unwrap();

    for service in [&first, &second] {
        let snapshot = service.snapshot();
        assert_eq!(snapshot.result, serial_result(&config, &snapshot.iterations));
    }
}

#[test]
fn approximation_improves_with_more_terms() {
    let service = Service::with_config(config(FoldOrder::Sequenced)).unwrap();
    service.start().unwrap();
    wait_for_iterations(&service, 20_000);
    service.stop().unwrap();
    service.wait_drained(DRAIN_TIMEOUT).unwrap();

    let pi = BigDecimal::from_str("3.14159265358979323846264338327950288").unwrap();
    let error = (value(&service.result()) - pi).abs();
    // Alternating series: the error is below the first omitted term.
    assert!(error < BigDecimal::from_str("0.0002").unwrap(), "{error}");
}
