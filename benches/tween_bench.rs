use cardfolio::animation::DeckController;
use cardfolio::deck::{CardId, CardLayout, ClickTarget, PageLayout, SubCardLayout, Viewport};
use cardfolio::geometry::Rect;
use cardfolio::options::Options;
use cardfolio::tween::{Easing, Prop, PropertySink, TweenEngine, TweenSpec};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f32::consts::TAU;
use std::time::Duration;
use web_time::Instant;

struct NullSink;

impl PropertySink<u32> for NullSink {
    fn read(&self, _target: u32, _prop: Prop) -> f32 {
        0.0
    }

    fn write(&mut self, target: u32, prop: Prop, value: f32) {
        let _ = black_box((target, prop, value));
    }
}

fn easing_benchmark(c: &mut Criterion) {
    c.bench_function("power2_in_out_easing", |b| {
        b.iter(|| black_box(Easing::Power2InOut.evaluate(black_box(0.4))))
    });
}

fn engine_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");

    for count in [10u32, 100, 1000].iter() {
        let start = Instant::now();
        let mut engine: TweenEngine<u32, ()> = TweenEngine::new();
        for target in 0..*count {
            let _ = engine.animate(
                TweenSpec::new(target)
                    .prop_from_to(Prop::Angle, 0.0, TAU)
                    .duration(Duration::from_secs(30))
                    .repeat_forever(),
                start,
            );
        }
        let mut sink = NullSink;
        let mut frame = 0u64;

        group.bench_function(format!("{count}_orbits"), |b| {
            b.iter(|| {
                frame += 1;
                let now = start + Duration::from_millis(frame * 16);
                black_box(engine.tick(now, &mut sink))
            })
        });
    }
    group.finish();
}

fn controller_frame_benchmark(c: &mut Criterion) {
    let layout = PageLayout {
        viewport: Viewport::default(),
        cards: vec![CardLayout {
            id: 1,
            rect: Rect::new(100.0, 100.0, 240.0, 320.0),
            z_index: 1,
            sub_cards: (0..12)
                .map(|id| SubCardLayout {
                    id,
                    width: 80.0,
                    height: 100.0,
                })
                .collect(),
        }],
    };
    let deck = cardfolio::deck::Deck::from_layout(&layout).unwrap();
    let mut ctrl = DeckController::with_seed(deck, Options::default(), 1);
    let mut now = Instant::now();
    let _ = ctrl.click(ClickTarget::Card(CardId(1)), now);
    while ctrl.engine().is_busy() {
        now += Duration::from_millis(16);
        let _ = ctrl.tick(now);
    }

    c.bench_function("orbiting_frame_12_sub_cards", |b| {
        b.iter(|| {
            now += Duration::from_millis(16);
            black_box(ctrl.tick(now))
        })
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    engine_tick_benchmark,
    controller_frame_benchmark
);
criterion_main!(benches);
