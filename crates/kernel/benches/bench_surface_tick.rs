use std::hint::black_box;
use std::time::Instant;

use ripplefx_common::{CanvasSize, DistortMode, GridDims};
use ripplefx_kernel::{RippleLookupTable, RippleSurface, SurfaceConfig};

fn make_surface(cells: u32, ripple_count: usize, mode: DistortMode) -> RippleSurface {
    let config = SurfaceConfig {
        grid: GridDims::new(cells, cells),
        canvas: CanvasSize::new(512.0, 512.0),
        initial_mode: mode,
        max_ripples: None,
    };
    let mut surface = RippleSurface::new(&config).expect("valid bench config");
    for i in 0..ripple_count {
        let t = i as f32 / ripple_count.max(1) as f32;
        let x = (t * 6.283).cos() * 200.0;
        let y = (t * 6.283).sin() * 200.0;
        surface.add_ripple(x, y, 7).expect("point on canvas");
    }
    surface
}

fn bench_table_build(cells: u32, iterations: usize) {
    let dims = GridDims::new(cells, cells);
    let canvas = CanvasSize::new(512.0, 512.0);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(RippleLookupTable::new(black_box(dims), black_box(canvas)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  table build ({cells}x{cells}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_tick(cells: u32, ripple_count: usize, mode: DistortMode, iterations: usize) {
    let mut surface = make_surface(cells, ripple_count, mode);

    let start = Instant::now();
    for _ in 0..iterations {
        surface.tick();
        black_box(surface.live_attribute());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  tick ({cells}x{cells}, {ripple_count} ripples, {mode}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Ripple Surface Benchmarks ===\n");

    println!("Lookup table build:");
    bench_table_build(32, 1000);
    bench_table_build(128, 100);

    println!("\nTick (texcoords):");
    bench_tick(32, 1, DistortMode::TexCoords, 1000);
    bench_tick(32, 16, DistortMode::TexCoords, 1000);
    bench_tick(128, 16, DistortMode::TexCoords, 100);

    println!("\nTick (vertices):");
    bench_tick(32, 16, DistortMode::Vertices, 1000);
    bench_tick(128, 64, DistortMode::Vertices, 50);

    println!("\n=== Done ===");
}
