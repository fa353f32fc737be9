use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gcpeak::chromatogram::{AcquisitionInfo, GasChromatogram};
use gcpeak::detection::{
    detect, detect_manual, AreaMethod, DetectionConfig, Peak, PolynomialBaseline,
};
use gcpeak::record::{read_records, write_records};
use gcpeak::trace::Trace;

/// Trace with one Gaussian component every 400 samples on a drifting baseline
fn create_trace(samples: usize) -> Trace {
    let times: Vec<f64> = (0..samples).map(|i| i as f64 * 0.01).collect();
    let intensities = times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let center = ((i / 400) * 400 + 200) as f64 * 0.01;
            0.05 + 0.004 * t + 0.8 * (-(t - center).powi(2) / (2.0 * 0.05 * 0.05)).exp()
        })
        .collect();
    Trace::new(times, intensities).unwrap()
}

/// Benchmark automatic detection for both area methods
fn bench_auto_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_detection");

    for samples in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(samples as u64));
        let trace = create_trace(samples);

        for method in [AreaMethod::Addition, AreaMethod::Trapezoidal] {
            let config = DetectionConfig::default().with_area_method(method);
            group.bench_with_input(
                BenchmarkId::new(method.as_str(), samples),
                &trace,
                |b, trace| {
                    b.iter(|| black_box(detect(black_box(trace), &config)));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark manual integration of the automatically found peaks
fn bench_manual_integration(c: &mut Criterion) {
    let mut group = c.benchmark_group("manual_integration");
    let strategy = PolynomialBaseline::default();

    for samples in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(samples as u64));
        let trace = create_trace(samples);
        let config = DetectionConfig::default();
        let existing: Vec<_> = detect(&trace, &config).peaks.iter().map(Peak::bounds).collect();

        group.bench_with_input(BenchmarkId::from_parameter(samples), &trace, |b, trace| {
            b.iter(|| {
                let detection =
                    detect_manual(black_box(trace), &[], &existing, None, &config, &strategy)
                        .unwrap();
                black_box(detection);
            });
        });
    }

    group.finish();
}

/// Benchmark record serialization of processed chromatograms
fn bench_record_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_io");

    for samples in [1_000, 10_000] {
        let mut gc = GasChromatogram::new(
            create_trace(samples),
            AcquisitionInfo::default(),
            DetectionConfig::default(),
        );
        gc.find_peaks();

        let mut encoded = Vec::new();
        write_records(&mut encoded, [&gc]).unwrap();
        group.throughput(Throughput::Bytes(encoded.len() as u64));

        group.bench_with_input(BenchmarkId::new("write", samples), &gc, |b, gc| {
            b.iter(|| {
                let mut out = Vec::with_capacity(encoded.len());
                write_records(&mut out, [gc]).unwrap();
                black_box(out);
            });
        });

        group.bench_with_input(BenchmarkId::new("read", samples), &encoded, |b, encoded| {
            b.iter(|| black_box(read_records(encoded.as_slice()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_auto_detection, bench_manual_integration, bench_record_io);
criterion_main!(benches);
