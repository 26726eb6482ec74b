use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ring_buffer::RingBuffer;
use std::sync::Arc;
use std::thread;

#[derive(Clone, Copy, Default)]
#[repr(C, align(64))]
struct Frame {
    timestamp_ms: u32,
    driver_id: u8,
    payload: [f32; 10],
}

fn single_thread_push_pop(c: &mut Criterion) {
    let buffer = RingBuffer::<Frame>::new(1024).unwrap();
    c.bench_function("push_pop_single_thread", |b| {
        b.iter(|| {
            buffer.push(black_box(Frame::default())).unwrap();
            black_box(buffer.pop().unwrap());
        })
    });
}

fn producer_consumer_tick(c: &mut Criterion) {
    c.bench_function("spsc_20x50_ticks", |b| {
        b.iter(|| {
            let buffer = Arc::new(RingBuffer::<Frame>::new(1024).unwrap());
            let producer = {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for tick in 0..50u32 {
                        for driver_id in 0..20u8 {
                            let frame = Frame {
                                timestamp_ms: tick * 20,
                                driver_id,
                                ..Default::default()
                            };
                            buffer.push(frame).unwrap();
                        }
                    }
                    buffer.shutdown();
                })
            };
            let mut received = 0usize;
            while buffer.pop().is_ok() {
                received += 1;
            }
            producer.join().unwrap();
            black_box(received)
        })
    });
}

criterion_group!(benches, single_thread_push_pop, producer_consumer_tick);
criterion_main!(benches);
