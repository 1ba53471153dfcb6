use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use slh_dsa_bridge::slh::{SchemeConfig, PARAM_COUNT};
use slh_dsa_bridge::{Bridge, ParameterSet, SchemeInfo};

fn expected_info(name: &str) -> SchemeInfo {
    ParameterSet::ALL
        .iter()
        .find(|set| set.name() == name)
        .map(|set| set.record().to_scheme_info())
        .unwrap_or_else(|| panic!("reader observed unknown scheme name {name}"))
}

#[test]
fn test_readers_never_observe_torn_switch() {
    let bridge = Bridge::new();
    bridge.initialize_config(0).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut reads = 0u64;
                while !done.load(Ordering::Acquire) || reads == 0 {
                    let info = bridge
                        .current_parameters()
                        .expect("Query failed")
                        .expect("Parameters absent after initialize");
                    assert_eq!(info, expected_info(&info.name), "torn read");
                    reads += 1;
                }
            });
        }

        for round in 0..2_000 {
            bridge
                .set_parameter_scheme(round % PARAM_COUNT as i32)
                .expect("Switch failed");
        }
        done.store(true, Ordering::Release);
    });
}

#[test]
fn test_snapshot_identifier_matches_record() {
    let config = SchemeConfig::new();
    config.initialize(ParameterSet::SHAKE_128s).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    let active = config.snapshot().expect("Snapshot absent");
                    assert_eq!(active.record, active.set.record());
                }
            });
        }

        let writers: Vec<_> = (0..2)
            .map(|offset| {
                let config = &config;
                scope.spawn(move || {
                    for round in 0..1_000 {
                        let set = ParameterSet::ALL[(round + offset * 5) % PARAM_COUNT];
                        config.set_scheme(set).expect("Switch failed");
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
    });

    assert!(config.is_initialized());
}

#[test]
fn test_switch_is_visible_to_other_threads() {
    let bridge = Bridge::new();
    bridge.initialize_config(ParameterSet::SHAKE_256f.id() as i32).unwrap();
    bridge.set_parameter_scheme(ParameterSet::SHA2_192s.id() as i32).unwrap();

    thread::scope(|scope| {
        let name = scope
            .spawn(|| bridge.current_scheme_name().unwrap())
            .join()
            .unwrap();
        assert_eq!(name, "SLH-DSA-SHA2-192s");
    });
}

#[test]
fn test_concurrent_keygen_and_signing() {
    let bridge = Bridge::new();
    bridge.initialize_config(ParameterSet::SHAKE_128f.id() as i32).unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let bridge = &bridge;
                scope.spawn(move || {
                    let pair = bridge.keygen().expect("Failed to generate keypair");
                    let message = format!("Message {}", i).into_bytes();
                    let signature = bridge
                        .sign(Some(message.as_slice()), None, Some(pair.private_key.as_slice()))
                        .expect("Failed to sign");
                    bridge
                        .verify(Some(message.as_slice()), Some(signature.as_slice()), None, Some(pair.public_key.as_slice()))
                        .expect("Failed to verify")
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap(), "Signature verification failed");
        }
    });
}
