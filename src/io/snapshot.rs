//! Plain-text position snapshots.
//!
//! `output.txt` holds one `x y` pair per particle, written on shutdown and
//! read back by the color seeder to recolor the next run deterministically.
//! Purely an external convenience format, not part of the physics
//! contract.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::simulation::particle::Particle;

pub const SNAPSHOT_PATH: &str = "output.txt";

pub fn save_positions(path: &Path, particles: &[Particle]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for particle in particles {
        writeln!(out, "{} {}", particle.position.x, particle.position.y)?;
    }
    out.flush()?;

    Ok(())
}

pub fn load_positions(path: &Path) -> Result<Vec<(f32, f32)>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let mut positions = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            continue;
        };
        positions.push((x.parse()?, y.parse()?));
    }

    Ok(positions)
}
