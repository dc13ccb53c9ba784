use std::path::Path;

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

/// Synthetic two-port: insertion loss growing with sqrt(f), a return-loss
/// ripple from a mismatch `ripple_m` long, and a little measurement noise.
struct Dut {
    name: &'static str,
    loss_db_per_sqrt_ghz: f64,
    return_loss_db: f64,
    ripple_m: f64,
    block_layout: bool,
}

const C: f64 = 299_792_458.0;

fn sweep(dut: &Dut, freqs: &[f64], rng: &mut SimpleRng) -> Vec<(f64, f64, f64)> {
    freqs
        .iter()
        .map(|&f| {
            let ghz = f / 1e9;
            let phase = 2.0 * std::f64::consts::PI * f * 2.0 * dut.ripple_m / C;
            let s11 = -dut.return_loss_db + 6.0 * phase.cos() + rng.gauss(0.0, 0.2);
            let s21 = -dut.loss_db_per_sqrt_ghz * ghz.sqrt() + rng.gauss(0.0, 0.02);
            (f, s11.min(-0.5), s21)
        })
        .collect()
}

fn write_sweep(dir: &Path, dut: &Dut, data: &[(f64, f64, f64)]) {
    let path = dir.join(format!("{}.csv", dut.name));
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&path)
        .expect("Failed to create output file");

    let header = ["Freq(Hz)", "S11 Log Mag(dB)", "S21 Log Mag(dB)"];
    if dut.block_layout {
        wtr.write_record(["!Synthetic network analyzer export"]).unwrap();
        wtr.write_record(["!Date: 2026-01-01"]).unwrap();
        wtr.write_record(["BEGIN"]).unwrap();
        wtr.write_record(header).unwrap();
    } else {
        // Five metadata rows then the header: data starts at row 6.
        for line in ["!CSV A.01.01", "!Synthetic", "!Source: Standard", "", "!Trace: S11,S21"] {
            wtr.write_record([line]).unwrap();
        }
        wtr.write_record(["Frequency", "dB(S(1,1))", "dB(S(2,1))"]).unwrap();
    }
    for (f, s11, s21) in data {
        wtr.write_record([format!("{f:.0}"), format!("{s11:.6}"), format!("{s21:.6}")])
            .unwrap();
    }
    if dut.block_layout {
        wtr.write_record(["END"]).unwrap();
    }
    wtr.flush().expect("Failed to flush output file");
    println!("Wrote {} points to {}", data.len(), path.display());
}

fn main() {
    let dir = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    std::fs::create_dir_all(&dir).expect("Failed to create output directory");

    let mut rng = SimpleRng::new(42);

    // 10 MHz → 6 GHz, 1001 points
    let freqs: Vec<f64> = (0..1001)
        .map(|i| 10e6 + i as f64 * (6e9 - 10e6) / 1000.0)
        .collect();

    let duts = [
        Dut {
            name: "Ref",
            loss_db_per_sqrt_ghz: 0.3,
            return_loss_db: 25.0,
            ripple_m: 0.05,
            block_layout: true,
        },
        Dut {
            name: "DUT_A",
            loss_db_per_sqrt_ghz: 0.9,
            return_loss_db: 18.0,
            ripple_m: 0.12,
            block_layout: false,
        },
        Dut {
            name: "DUT_B",
            loss_db_per_sqrt_ghz: 1.4,
            return_loss_db: 14.0,
            ripple_m: 0.2,
            block_layout: true,
        },
    ];

    for dut in &duts {
        let data = sweep(dut, &freqs, &mut rng);
        write_sweep(&dir, dut, &data);
    }
}
