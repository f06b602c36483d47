use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use math::modulus::WordOps;
use math::poly::{Coeff, Eval, Poly};
use math::ring::Ring;
use sampling::source::Source;

// 2^61 - 2^21 + 1 = 1 mod 2^22
const Q: u64 = 0x1fffffffffe00001u64;

fn random_poly<D: math::poly::Domain>(ring: &Ring<u64>, source: &mut Source) -> Poly<D> {
    let mut a: Poly<D> = ring.new_poly();
    source.fill_u64_below(ring.q(), a.coeffs_mut());
    a
}

fn ntt(c: &mut Criterion) {
    fn runner<'a, const LAZY: bool>(ring: &'a Ring<u64>) -> Box<dyn FnMut() + 'a> {
        let mut source: Source = Source::new([0u8; 32]);
        let a: Poly<Coeff> = random_poly(ring, &mut source);
        let mut b: Poly<Eval> = ring.new_poly();
        if LAZY {
            let mut buf: Vec<u64> = a.into_vec();
            Box::new(move || ring.dft.forward_inplace_lazy(&mut buf))
        } else {
            Box::new(move || ring.ntt(&a, &mut b))
        }
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("ntt");

    for log_n in 4..13 {
        let ring: Ring<u64> = Ring::<u64>::new(1 << log_n, Q).unwrap();

        let runners: [(String, Box<dyn FnMut()>); 2] = [
            (format!("LAZY=true/q={}", Q.log2()), runner::<true>(&ring)),
            (format!("LAZY=false/q={}", Q.log2()), runner::<false>(&ring)),
        ];

        for (name, mut runner) in runners {
            let id: BenchmarkId = BenchmarkId::new(name, format!("n={}", 1 << log_n));
            b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
                b.iter(&mut runner)
            });
        }
    }
}

fn intt(c: &mut Criterion) {
    fn runner<'a, const LAZY: bool>(ring: &'a Ring<u64>) -> Box<dyn FnMut() + 'a> {
        let mut source: Source = Source::new([1u8; 32]);
        let a: Poly<Eval> = random_poly(ring, &mut source);
        let mut b: Poly<Coeff> = ring.new_poly();
        if LAZY {
            let mut buf: Vec<u64> = a.into_vec();
            Box::new(move || ring.dft.backward_inplace_lazy(&mut buf))
        } else {
            Box::new(move || ring.intt(&a, &mut b))
        }
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("intt");

    for log_n in 4..13 {
        let ring: Ring<u64> = Ring::<u64>::new(1 << log_n, Q).unwrap();

        let runners: [(String, Box<dyn FnMut()>); 2] = [
            (format!("LAZY=true/q={}", Q.log2()), runner::<true>(&ring)),
            (format!("LAZY=false/q={}", Q.log2()), runner::<false>(&ring)),
        ];

        for (name, mut runner) in runners {
            let id: BenchmarkId = BenchmarkId::new(name, format!("n={}", 1 << log_n));
            b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
                b.iter(&mut runner)
            });
        }
    }
}

criterion_group!(benches, ntt, intt);
criterion_main!(benches);
