use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use math::ring::Ring;
use sampling::source::Source;
use vm::alu::opcode::ADD;
use vm::demo::multiply_image;
use vm::{Engine, EngineConfig, Instruction, OperationTable};

// 2^61 - 2^21 + 1 = 1 mod 2^22
const Q: u64 = 0x1fffffffffe00001u64;

fn step(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("step");

    for log_n in 4..12 {
        let n: usize = 1 << log_n;
        let ring: Arc<Ring<u64>> = Arc::new(Ring::<u64>::new(n, Q).unwrap());

        // Two slots bouncing between each other, never reaching the halt slot.
        let program: Vec<Instruction> = vec![
            Instruction::new(ADD).rs1(0).rs2(1).rd(0),
            Instruction::new(ADD).rs1(0).rs2(1).rd(0).forward(0).backward(1),
        ];

        let mut source: Source = Source::new([0u8; 32]);
        let mut registers: Vec<u64> = vec![0; n];
        let mut memory: Vec<u64> = vec![0; n];
        source.fill_u64_below(Q, &mut registers);
        source.fill_u64_below(Q, &mut memory);

        let mut engine: Engine = Engine::load(
            ring,
            &program,
            &registers,
            &memory,
            OperationTable::default(),
            EngineConfig::default(),
        )
        .unwrap();

        let id: BenchmarkId = BenchmarkId::new("cycle", format!("n={}", n));
        b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
            b.iter(|| engine.step().unwrap())
        });
    }
}

fn demo(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("demo");

    for y in [1u64, 4, 16] {
        let id: BenchmarkId = BenchmarkId::new("multiply", format!("y={}", y));
        b.bench_with_input(id, &y, |b: &mut criterion::Bencher<'_>, y| {
            b.iter(|| {
                let image = multiply_image(6, *y).unwrap();
                let mut engine: Engine =
                    Engine::from_image(&image, OperationTable::default(), EngineConfig::default())
                        .unwrap();
                engine.run().unwrap()
            })
        });
    }
}

criterion_group!(benches, step, demo);
criterion_main!(benches);
