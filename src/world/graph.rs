//! Area connectivity and shortest paths
//!
//! Every connection is an unweighted edge, so breadth-first search gives the
//! shortest route in hops.

use std::collections::VecDeque;

use crate::core::error::{Result, SimError};
use crate::core::types::AreaId;

#[derive(Debug, Clone, Default)]
pub struct AreaGraph {
    adjacency: Vec<Vec<AreaId>>,
}

impl AreaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self) -> AreaId {
        self.adjacency.push(Vec::new());
        AreaId((self.adjacency.len() - 1) as u32)
    }

    /// Parallel edges collapse into one
    pub fn add_edge(&mut self, a: AreaId, b: AreaId) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        if !self.adjacency[a.index()].contains(&b) {
            self.adjacency[a.index()].push(b);
        }
        if !self.adjacency[b.index()].contains(&a) {
            self.adjacency[b.index()].push(a);
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbors(&self, area: AreaId) -> &[AreaId] {
        self.adjacency
            .get(area.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_adjacent(&self, a: AreaId, b: AreaId) -> bool {
        self.neighbors(a).contains(&b)
    }

    fn check(&self, area: AreaId) -> Result<()> {
        if area.index() < self.adjacency.len() {
            Ok(())
        } else {
            Err(SimError::AreaNotFound(area))
        }
    }

    /// Shortest path from `start` to `goal`, both inclusive.
    ///
    /// `Ok(None)` when the areas are disconnected; `Err` only for unknown areas.
    pub fn shortest_path(&self, start: AreaId, goal: AreaId) -> Result<Option<Vec<AreaId>>> {
        self.check(start)?;
        self.check(goal)?;

        if start == goal {
            return Ok(Some(vec![start]));
        }

        let mut came_from: Vec<Option<AreaId>> = vec![None; self.adjacency.len()];
        let mut visited = vec![false; self.adjacency.len()];
        let mut frontier = VecDeque::new();

        visited[start.index()] = true;
        frontier.push_back(start);

        while let Some(current) = frontier.pop_front() {
            for &neighbor in &self.adjacency[current.index()] {
                if visited[neighbor.index()] {
                    continue;
                }
                visited[neighbor.index()] = true;
                came_from[neighbor.index()] = Some(current);

                if neighbor == goal {
                    return Ok(Some(reconstruct_path(&came_from, goal)));
                }
                frontier.push_back(neighbor);
            }
        }

        Ok(None)
    }

    /// First hop from `start` toward `goal`; `None` when already there or unreachable
    pub fn next_step(&self, start: AreaId, goal: AreaId) -> Result<Option<AreaId>> {
        if self.is_adjacent(start, goal) {
            return Ok(Some(goal));
        }
        Ok(self
            .shortest_path(start, goal)?
            .and_then(|path| path.get(1).copied()))
    }
}

fn reconstruct_path(came_from: &[Option<AreaId>], mut current: AreaId) -> Vec<AreaId> {
    let mut path = vec![current];
    while let Some(prev) = came_from[current.index()] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 - 1 - 2 - 3, plus a shortcut 0 - 3 when `ring` is set, and an isolated 4
    fn corridor(ring: bool) -> AreaGraph {
        let mut graph = AreaGraph::new();
        for _ in 0..5 {
            graph.add_node();
        }
        graph.add_edge(AreaId(0), AreaId(1)).unwrap();
        graph.add_edge(AreaId(1), AreaId(2)).unwrap();
        graph.add_edge(AreaId(2), AreaId(3)).unwrap();
        if ring {
            graph.add_edge(AreaId(3), AreaId(0)).unwrap();
        }
        graph
    }

    #[test]
    fn test_adjacent_path_has_two_nodes() {
        let graph = corridor(false);
        let path = graph.shortest_path(AreaId(0), AreaId(1)).unwrap().unwrap();
        assert_eq!(path, vec![AreaId(0), AreaId(1)]);
    }

    #[test]
    fn test_path_through_corridor() {
        let graph = corridor(false);
        let path = graph.shortest_path(AreaId(0), AreaId(3)).unwrap().unwrap();
        assert_eq!(path, vec![AreaId(0), AreaId(1), AreaId(2), AreaId(3)]);
    }

    #[test]
    fn test_shortcut_is_preferred() {
        let graph = corridor(true);
        let path = graph.shortest_path(AreaId(0), AreaId(3)).unwrap().unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_disconnected_is_none_not_error() {
        let graph = corridor(false);
        assert_eq!(graph.shortest_path(AreaId(0), AreaId(4)).unwrap(), None);
        assert_eq!(graph.next_step(AreaId(0), AreaId(4)).unwrap(), None);
    }

    #[test]
    fn test_unknown_area_is_error() {
        let graph = corridor(false);
        assert!(graph.shortest_path(AreaId(0), AreaId(42)).is_err());
    }

    #[test]
    fn test_same_start_and_goal() {
        let graph = corridor(false);
        assert_eq!(
            graph.shortest_path(AreaId(2), AreaId(2)).unwrap(),
            Some(vec![AreaId(2)])
        );
        assert_eq!(graph.next_step(AreaId(2), AreaId(2)).unwrap(), None);
    }

    #[test]
    fn test_parallel_edges_collapse() {
        let mut graph = corridor(false);
        graph.add_edge(AreaId(1), AreaId(0)).unwrap();
        assert_eq!(graph.neighbors(AreaId(0)), &[AreaId(1)]);
    }
}
