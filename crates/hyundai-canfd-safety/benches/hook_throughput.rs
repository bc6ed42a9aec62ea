//! Hook throughput benchmarks
//!
//! Per-frame cost of the rx, tx and fwd paths. Every frame goes through all
//! three at bus rate, so these must stay allocation-free.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use hyundai_canfd_safety::prelude::*;

/// One MDPS frame per counter value, sealed so every frame passes the address check.
fn mdps_frames(hooks: &HyundaiCanfd, bus: u8) -> Vec<CanFrame> {
    (0..=u8::MAX)
        .filter_map(|counter| {
            let mut buf = [0u8; 24];
            encode::driver_torque(&mut buf, i32::from(counter) - 128);
            encode::counter(&mut buf, counter);
            encode::seal(hooks.crc(), addr::MDPS, &mut buf);
            CanFrame::new(addr::MDPS, bus, &buf).ok()
        })
        .collect()
}

fn bench_rx_driver_torque(c: &mut Criterion) {
    let hooks = HyundaiCanfd::from(HyundaiParamFlags::EV_GAS);
    let frames = mdps_frames(&hooks, bus::MAIN);
    let mut engine = hooks.into_engine();
    let mut now: Micros = 0;

    c.bench_function("rx_mdps_sealed", |b| {
        b.iter(|| {
            for frame in &frames {
                now = now.wrapping_add(10_000);
                black_box(engine.rx(black_box(frame), now));
            }
        })
    });
}

fn bench_tx_torque(c: &mut Criterion) {
    let mut engine = HyundaiCanfd::from(HyundaiParamFlags::empty()).into_engine();
    engine.state_mut().vehicle.controls_allowed = true;
    let mut buf = [0u8; 16];
    encode::lkas_torque_cmd(&mut buf, 0, false);
    let Ok(frame) = CanFrame::new(addr::LFA, bus::MAIN, &buf) else {
        return;
    };
    let mut now: Micros = 0;

    c.bench_function("tx_lfa_torque", |b| {
        b.iter(|| {
            now = now.wrapping_add(10_000);
            black_box(engine.tx(black_box(&frame), now))
        })
    });
}

fn bench_tx_angle(c: &mut Criterion) {
    let flags = HyundaiParamFlags::CANFD_LKA_STEERING
        | HyundaiParamFlags::CANFD_LKA_STEERING_ALT
        | HyundaiParamFlags::CANFD_ANGLE_STEERING;
    let mut engine = HyundaiCanfd::from(flags).into_engine();
    engine.state_mut().vehicle.controls_allowed = true;
    let mut buf = [0u8; 32];
    encode::lkas_angle_cmd(&mut buf, 0, true);
    let Ok(frame) = CanFrame::new(addr::LKAS_ALT, bus::MAIN, &buf) else {
        return;
    };

    c.bench_function("tx_lkas_angle", |b| {
        b.iter(|| black_box(engine.tx(black_box(&frame), 0)))
    });
}

fn bench_fwd(c: &mut Criterion) {
    let engine = HyundaiCanfd::from(HyundaiParamFlags::CANFD_LKA_STEERING).into_engine();

    c.bench_function("fwd_camera_bus", |b| {
        b.iter(|| {
            for address in [addr::LKAS, addr::CAM_0X2A4, addr::MDPS, addr::SCC_CONTROL] {
                black_box(engine.fwd(black_box(bus::CAM), black_box(address)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_rx_driver_torque,
    bench_tx_torque,
    bench_tx_angle,
    bench_fwd
);
criterion_main!(benches);
