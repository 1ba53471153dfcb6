use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use slh_dsa_bridge::{Bridge, ParameterSet};

const FAST_SETS: [ParameterSet; 2] = [ParameterSet::SHAKE_128f, ParameterSet::SHA2_128f];

fn bridge_for(set: ParameterSet) -> Bridge {
    let bridge = Bridge::new();
    bridge.initialize_config(set.id() as i32).unwrap();
    bridge
}

fn message(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(7))
        .collect()
}

fn bench_keygen(c: &mut Criterion) {
    let mut group = c.benchmark_group("slh_keygen");
    group.sample_size(20);
    for set in FAST_SETS {
        let bridge = bridge_for(set);
        group.bench_function(format!("keygen_{}", set), |b| {
            b.iter(|| bridge.keygen().unwrap());
        });
    }
    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("slh_sign");
    group.sample_size(10);
    let msg_sizes = [32usize, 1024, 64 * 1024];

    for set in FAST_SETS {
        let bridge = bridge_for(set);
        let pair = bridge.keygen().unwrap();
        for &m in &msg_sizes {
            let msg = message(m);
            group.throughput(Throughput::Elements(1));
            group.bench_function(format!("sign_{}_m{m}", set), |b| {
                b.iter(|| {
                    bridge
                        .sign(Some(msg.as_slice()), None, Some(pair.private_key.as_slice()))
                        .unwrap()
                });
            });
        }
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("slh_verify");
    let msg_sizes = [32usize, 1024];

    for set in FAST_SETS {
        let bridge = bridge_for(set);
        let pair = bridge.keygen().unwrap();
        for &m in &msg_sizes {
            let msg = message(m);
            let sig = bridge
                .sign(Some(msg.as_slice()), None, Some(pair.private_key.as_slice()))
                .unwrap();
            group.throughput(Throughput::Elements(1));
            group.bench_function(format!("verify_{}_m{m}", set), |b| {
                b.iter(|| {
                    let ok = bridge
                        .verify(
                            Some(msg.as_slice()),
                            Some(sig.as_slice()),
                            None,
                            Some(pair.public_key.as_slice()),
                        )
                        .unwrap();
                    assert!(ok);
                });
            });
        }
    }
    group.finish();
}

fn bench_scheme_switch(c: &mut Criterion) {
    let mut group = c.benchmark_group("slh_scheme");
    let bridge = bridge_for(ParameterSet::SHAKE_128s);

    group.bench_function("set_parameter_scheme", |b| {
        let mut next = 0i32;
        b.iter_batched(
            || {
                next = (next + 1) % 12;
                next
            },
            |raw| bridge.set_parameter_scheme(raw).unwrap(),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("current_parameters", |b| {
        b.iter(|| black_box(bridge.current_parameters().unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_keygen, bench_sign, bench_verify, bench_scheme_switch);
criterion_main!(benches);
