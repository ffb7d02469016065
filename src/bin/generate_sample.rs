//! Writes `sample_plays.csv`: a synthetic play-by-play log for trying out the
//! viewer's filters and sorting.

use anyhow::{Context, Result};

/// Seeded SplitMix64 generator; the same seed always writes the same file.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SampleRng(2024);

    let opponents = ["Colorado", "Iowa", "Purdue", "UCLA", "Wisconsin"];
    let plays = ["Run", "Pass", "Pass", "Run", "Punt", "Field Goal"];
    let formations = ["Shotgun", "Pistol", "Under Center"];

    let output_path = "sample_plays.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Opponent", "Quarter", "Down", "Distance", "Formation", "Play", "Yards"])?;

    let mut rows = 0usize;
    for opponent in opponents {
        for quarter in 1..=4 {
            let snaps = rng.range(12, 20);
            for _ in 0..snaps {
                let play = rng.pick(&plays);
                let yards = match play {
                    "Punt" | "Field Goal" => String::new(),
                    "Pass" => rng.range(-8, 45).to_string(),
                    _ => rng.range(-3, 20).to_string(),
                };
                let quarter = quarter.to_string();
                let down = rng.range(1, 4).to_string();
                let distance = rng.range(1, 15).to_string();
                writer.write_record([
                    opponent,
                    quarter.as_str(),
                    down.as_str(),
                    distance.as_str(),
                    rng.pick(&formations),
                    play,
                    yards.as_str(),
                ])?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} plays to {output_path}");
    Ok(())
}
