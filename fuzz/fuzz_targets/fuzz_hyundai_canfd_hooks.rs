//! Fuzzes the Hyundai CAN-FD hooks with arbitrary parameters and frame streams.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_hyundai_canfd_hooks

#![no_main]

use hyundai_canfd_safety::prelude::*;
use libfuzzer_sys::fuzz_target;

const LENGTHS: [usize; 5] = [8, 16, 24, 32, 64];

fuzz_target!(|data: &[u8]| {
    let Some((head, mut rest)) = data.split_first_chunk::<2>() else {
        return;
    };
    let mut engine = HyundaiCanfd::from_param(u16::from_le_bytes(*head)).into_engine();
    let mut now: Micros = 0;

    // Each record: [kind, bus, addr lo, addr hi, len selector, payload...]
    while let Some((hdr, tail)) = rest.split_first_chunk::<5>() {
        let [kind, bus, lo, hi, sel] = *hdr;
        let len = LENGTHS[usize::from(sel) % LENGTHS.len()];
        let take = len.min(tail.len());
        let (body, next) = tail.split_at(take);
        rest = next;

        let mut payload = [0u8; 64];
        payload[..take].copy_from_slice(body);
        let address = u32::from(u16::from_le_bytes([lo, hi]) & 0x7ff);
        let Ok(frame) = CanFrame::new(address, bus % 4, &payload[..len]) else {
            continue;
        };

        now = now.wrapping_add(u32::from(kind) * 100);
        // Must never panic, whatever the frame order.
        match kind % 3 {
            0 => {
                engine.rx(&frame, now);
            }
            1 => {
                engine.tx(&frame, now);
            }
            _ => {
                let _ = engine.fwd(frame.bus(), frame.addr());
            }
        }
        engine.tick(now);

        if engine.state().vehicle.relay_malfunction {
            assert!(!engine.tx(&frame, now));
        }
    }
});
