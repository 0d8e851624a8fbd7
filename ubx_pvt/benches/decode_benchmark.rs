use criterion::{criterion_group, criterion_main, Criterion};
use std::{hint::black_box, io::Cursor};
use ubx_pvt::*;

fn nav_pvt_stream(frames: usize, noise: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..frames {
        data.extend(std::iter::repeat(0x00).take(noise));
        let pvt = NavPvt {
            itow: i as u32 * 1000,
            fix_type: GnssFixType::Fix3D,
            lat: 400_000_000 + i as i32,
            lon: -1_050_000_000,
            ..NavPvt::default()
        };
        data.extend_from_slice(&pvt.into_packet_bytes());
    }
    data
}

fn decode_all(data: &[u8]) -> usize {
    let mut link = ReplayTransceiver::new(Cursor::new(data));
    let mut count = 0;
    loop {
        match next_frame(&mut link, None) {
            Ok(frame) => {
                if let UbxPacket::NavPvt(_) = decode_frame(&frame).packet {
                    count += 1;
                }
            },
            Err(Error::Io(_)) => break,
            Err(e) => panic!("No errors allowed! got: {:?}", e),
        }
    }
    count
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for noise in &[0usize, 16, 256] {
        let data = nav_pvt_stream(1000, *noise);
        c.bench_function(&format!("next_frame_nav_pvt_noise_{}", noise), |b| {
            b.iter(|| assert_eq!(decode_all(black_box(&data)), 1000))
        });
    }

    let payload = nav_pvt_stream(1, 0)[6..98].to_vec();
    c.bench_function("nav_pvt_from_payload", |b| {
        b.iter(|| NavPvt::from_payload(black_box(&payload)))
    });

    c.bench_function("double_buffer_publish_snapshot", |b| {
        let buf = DoubleBuffer::new(NavPvt::default());
        let pvt = NavPvt::from_payload(&payload);
        b.iter(|| {
            buf.publish(black_box(pvt));
            black_box(buf.snapshot())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
