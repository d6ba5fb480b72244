use crate::config;
use rand::Rng;

/// Strategy for choosing the playfield lane of each converted hit object.
///
/// osu! hit objects carry 2-D screen coordinates with no natural mapping
/// onto the 9-lane playfield, so lanes are assigned independently of the
/// source data. The trait keeps the parser agnostic of the draw so a
/// coordinate-derived mapping can be swapped in later.
pub trait LanePicker {
    /// Returns a lane in `0..LANE_COUNT`.
    fn pick(&mut self) -> u8;
}

/// Uniform random lane, the default strategy.
pub struct RandomLanePicker;

impl LanePicker for RandomLanePicker {
    fn pick(&mut self) -> u8 {
        rand::rng().random_range(0..config::LANE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_lanes_stay_in_range() {
        let mut picker = RandomLanePicker;
        for _ in 0..1000 {
            assert!(picker.pick() < config::LANE_COUNT);
        }
    }
}
