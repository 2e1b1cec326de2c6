use serde::{Deserialize, Serialize};

/// Heritable cell traits, persisted across runs as a fixed-size numeric
/// vector and copied into the `dna` component at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dna {
    pub speed: f32,
    pub perception: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub density: f32,
}

impl Dna {
    pub const STRIDE: usize = 6;

    /// Component-record layout: [speed, perception, r, g, b, density].
    pub fn to_values(self) -> [f32; Self::STRIDE] {
        [
            self.speed,
            self.perception,
            self.r,
            self.g,
            self.b,
            self.density,
        ]
    }

    pub fn from_values(values: &[f32]) -> Self {
        Self {
            speed: values[0],
            perception: values[1],
            r: values[2],
            g: values[3],
            b: values[4],
            density: values[5],
        }
    }
}

impl Default for Dna {
    fn default() -> Self {
        Self {
            speed: 1.0,
            perception: 100.0,
            r: 0.0,
            g: 1.0,
            b: 1.0,
            density: 1.0,
        }
    }
}

/// Simulation world extents. Positions are clamped to `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: crate::constants::WORLD_WIDTH,
            height: crate::constants::WORLD_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_value_round_trip() {
        let dna = Dna {
            speed: 1.5,
            perception: 80.0,
            r: 0.2,
            g: 0.4,
            b: 0.6,
            density: 0.9,
        };
        assert_eq!(Dna::from_values(&dna.to_values()), dna);
    }
}
