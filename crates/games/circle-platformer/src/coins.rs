use serde::{Deserialize, Serialize};

use crate::level::Point;
use crate::physics::Aabb;

/// Pickup radius.
pub const COIN_RADIUS: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

/// The level's coins. Remembers the original positions so it can repopulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinField {
    coins: Vec<Coin>,
    origin: Vec<Point>,
}

impl CoinField {
    pub fn from_level(positions: &[Point]) -> Self {
        let mut field = Self {
            coins: Vec::with_capacity(positions.len()),
            origin: positions.to_vec(),
        };
        field.reset();
        field
    }

    /// Deactivate coin `i`. Returns the remaining active count, or `None` if
    /// it was already collected or does not exist.
    pub fn collect(&mut self, i: usize) -> Option<usize> {
        let coin = self.coins.get_mut(i).filter(|c| c.active)?;
        coin.active = false;
        Some(self.active_count())
    }

    pub fn active_count(&self) -> usize {
        self.coins.iter().filter(|c| c.active).count()
    }

    /// Restore every coin at its level position.
    pub fn reset(&mut self) {
        self.coins = self
            .origin
            .iter()
            .map(|p| Coin {
                x: p.x,
                y: p.y,
                active: true,
            })
            .collect();
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Indices of active coins overlapping `bounds`.
    pub fn overlapping(&self, bounds: &Aabb) -> Vec<usize> {
        self.coins
            .iter()
            .enumerate()
            .filter(|(_, c)| c.active && bounds.overlaps_circle(c.x, c.y, COIN_RADIUS))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> CoinField {
        CoinField::from_level(&[Point::new(10.0, 10.0), Point::new(200.0, 10.0)])
    }

    #[test]
    fn collect_counts_down_and_rejects_repeats() {
        let mut f = field();
        assert_eq!(f.active_count(), 2);
        assert_eq!(f.collect(0), Some(1));
        assert_eq!(f.collect(0), None);
        assert_eq!(f.collect(1), Some(0));
        assert_eq!(f.collect(9), None);
    }

    #[test]
    fn reset_restores_original_positions() {
        let mut f = field();
        f.collect(0);
        f.collect(1);
        f.reset();
        assert_eq!(f.active_count(), 2);
        assert_eq!((f.coins()[1].x, f.coins()[1].y), (200.0, 10.0));
    }

    #[test]
    fn overlap_uses_pickup_radius_and_skips_inactive() {
        let mut f = field();
        let player = Aabb::from_center(50.0, 10.0, 32.0, 48.0);
        // left edge at 34, coin 0 is 24px away
        assert_eq!(f.overlapping(&player), vec![0]);
        f.collect(0);
        assert!(f.overlapping(&player).is_empty());
    }
}
