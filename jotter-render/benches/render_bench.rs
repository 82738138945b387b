use criterion::{criterion_group, criterion_main, Criterion};

use jotter_core::{
    compute, CancelToken, ComplexGrid, EscapeParameters, Extent, ReferenceGeometry, ResolutionSpec,
};
use jotter_render::{generate_reference, render_julia, Colormap, JuliaRequest};

fn bench_banded_render(c: &mut Criterion) {
    let request = JuliaRequest::new(
        ResolutionSpec::new(900, 600).unwrap(),
        EscapeParameters::default().with_max_iterations(100),
    );
    let cancel = CancelToken::new();

    c.bench_function("julia_900x600_100iter", |b| {
        b.iter(|| render_julia(&request, &cancel));
    });
}

fn bench_single_thread_engine(c: &mut Criterion) {
    let grid = ComplexGrid::build(ResolutionSpec::new(300, 200).unwrap(), &Extent::WIDE);
    let params = EscapeParameters::default().with_max_iterations(100);

    c.bench_function("engine_300x200_100iter", |b| {
        b.iter(|| compute(&grid, &params));
    });
}

fn bench_colorize(c: &mut Criterion) {
    let request = JuliaRequest::new(
        ResolutionSpec::new(900, 600).unwrap(),
        EscapeParameters::default(),
    );
    let result = render_julia(&request, &CancelToken::new()).unwrap();
    let cmap = Colormap::by_name("twilight_shifted").unwrap();

    c.bench_function("colorize_900x600", |b| {
        b.iter(|| cmap.colorize_field(&result.field));
    });
}

fn bench_reference(c: &mut Criterion) {
    let geometry = ReferenceGeometry::MANDELBROT;
    c.bench_function("reference_1000x800_100iter", |b| {
        b.iter(|| generate_reference(&geometry, 100));
    });
}

criterion_group!(
    benches,
    bench_banded_render,
    bench_single_thread_engine,
    bench_colorize,
    bench_reference
);
criterion_main!(benches);
