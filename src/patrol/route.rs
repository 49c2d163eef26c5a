//! Pendulum patrol routes

use crate::core::types::AreaId;

/// A looped route that walks its waypoints out and back.
///
/// Waypoints `[a, b, c]` become the loop `a b c b`, so the guard turns around
/// at each end without visiting the endpoint twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatrolRoute {
    stops: Vec<AreaId>,
    index: usize,
}

impl PatrolRoute {
    pub fn pendulum(waypoints: &[AreaId]) -> Self {
        let mut stops = waypoints.to_vec();
        if waypoints.len() > 2 {
            stops.extend(waypoints[1..waypoints.len() - 1].iter().rev());
        }
        Self { stops, index: 0 }
    }

    pub fn stops(&self) -> &[AreaId] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn start(&self) -> Option<AreaId> {
        self.stops.first().copied()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<AreaId> {
        self.stops.get(self.index).copied()
    }

    /// Step to the next stop, wrapping to the start past the end
    pub fn advance(&mut self) {
        if self.stops.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.stops.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<AreaId> {
        raw.iter().map(|&i| AreaId(i)).collect()
    }

    #[test]
    fn test_pendulum_shape() {
        let route = PatrolRoute::pendulum(&ids(&[0, 1, 2, 3]));
        assert_eq!(route.stops(), ids(&[0, 1, 2, 3, 2, 1]).as_slice());
    }

    #[test]
    fn test_short_routes() {
        assert_eq!(PatrolRoute::pendulum(&ids(&[4])).stops(), ids(&[4]).as_slice());
        assert_eq!(PatrolRoute::pendulum(&ids(&[4, 5])).stops(), ids(&[4, 5]).as_slice());
        assert!(PatrolRoute::pendulum(&[]).is_empty());
    }

    #[test]
    fn test_advance_wraps() {
        let mut route = PatrolRoute::pendulum(&ids(&[0, 1, 2]));
        let mut visited = Vec::new();
        for _ in 0..5 {
            visited.push(route.current().unwrap());
            route.advance();
        }
        assert_eq!(visited, ids(&[0, 1, 2, 1, 0]));
    }
}
