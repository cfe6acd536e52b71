//! Write synthetic VQE convergence runs in the tuple-encoded series format.
//!
//! Usage: `generate_sample [OUT_DIR] [ITERATIONS]` (defaults: `data`, 12).
//! The default run reproduces the embedded `data/vqe_*_series.csv` fixtures.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Energy of a damped gradient-descent run approaching `ground`.
fn convergence(i: usize, start: f64, ground: f64, rate: f64) -> f64 {
    ground + (start - ground) * (-(i as f64) * rate).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn render_series(label: &str, iterations: usize, ground: f64, rate: f64, rng: &mut SimpleRng) -> String {
    let start = 0.5 * rng.next_f64();
    let mut out = String::from("mof,energy\n");
    for i in 0..iterations {
        let energy = convergence(i, start, ground, rate) + rng.gauss(0.0, 0.002);
        // `{:?}` keeps the shortest round-trip representation.
        let _ = writeln!(out, "{label},\"({i}, {energy:?})\"");
    }
    out
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "data".into()));
    let iterations: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("'{n}' is not an iteration count"))?,
        None => 12,
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let runs = [
        ("vqe_existing_series.csv", "MOF-5", -0.54, 0.35),
        ("vqe_generated_series.csv", "gen-mof-1", -0.61, 0.42),
    ];

    for (file, label, ground, rate) in runs {
        let path = out_dir.join(file);
        let text = render_series(label, iterations, ground, rate, &mut rng);
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {iterations} iterations of {label} to {}", path.display());
    }

    Ok(())
}
