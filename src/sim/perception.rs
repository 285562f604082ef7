//! Perception grid
//!
//! Discretizes the playfield into square cells and marks the ones covered
//! by an obstacle the agent has not passed yet. This is the decision agent's
//! whole view of obstacle geometry.
//!
//! The grid is rebuilt from scratch every tick. Only the columns under each
//! obstacle's footprint are tested, so the cost is obstacles-ahead × rows
//! instead of the full grid × every obstacle.

use serde::{Deserialize, Serialize};

use super::collision::{Rect, overlaps};
use super::state::Obstacle;
use crate::config::SimConfig;

/// Boolean occupancy grid, row-major, `rows × columns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionGrid {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl PerceptionGrid {
    /// All-clear grid
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![false; columns * rows],
        }
    }

    /// Grid sized for a configuration
    pub fn for_config(config: &SimConfig) -> Self {
        Self::new(config.grid_columns(), config.grid_rows())
    }

    /// Rasterize the scoreable obstacles
    pub fn encode(obstacles: &[Obstacle], config: &SimConfig) -> Self {
        let mut grid = Self::for_config(config);
        if grid.columns == 0 || grid.rows == 0 {
            return grid;
        }
        let cell = config.cell_size;
        let last_column = grid.columns as i64 - 1;

        for obstacle in obstacles.iter().filter(|o| o.scoreable) {
            let top = obstacle.top_segment(config);
            let bottom = obstacle.bottom_segment(config);

            // Snap the footprint outward to cell boundaries. A left edge sitting
            // exactly on a boundary also touches the cell before it.
            let (left, right) = obstacle.footprint(config.obstacle_width);
            let mut first = (left / cell).floor();
            if first * cell == left {
                first -= 1.0;
            }
            let first = (first as i64).max(0);
            let last = ((right / cell).ceil() as i64).min(last_column);
            if first > last {
                continue;
            }

            for row in 0..grid.rows {
                for column in first as usize..=last as usize {
                    let cell_rect = grid.cell_rect(column, row, cell);
                    if overlaps(&cell_rect, &top) || overlaps(&cell_rect, &bottom) {
                        grid.set(column, row, true);
                    }
                }
            }
        }

        grid
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell state; out-of-range lookups read as clear
    pub fn get(&self, column: usize, row: usize) -> bool {
        if column >= self.columns || row >= self.rows {
            return false;
        }
        self.cells[row * self.columns + column]
    }

    fn set(&mut self, column: usize, row: usize, value: bool) {
        self.cells[row * self.columns + column] = value;
    }

    /// Pixel rectangle covered by a cell
    pub fn cell_rect(&self, column: usize, row: usize, cell_size: f32) -> Rect {
        Rect::new(
            column as f32 * cell_size,
            row as f32 * cell_size,
            cell_size,
            cell_size,
        )
    }

    /// Iterate rows top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.columns.max(1))
    }

    /// `(column, row)` of every occupied cell
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(i, _)| (i % self.columns, i / self.columns))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Flat row-major view, handy as a network input vector
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }

    /// Nested `[row][column]` copy
    pub fn to_nested(&self) -> Vec<Vec<bool>> {
        self.iter_rows().map(<[bool]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(x: f32, y: f32, scoreable: bool) -> Obstacle {
        Obstacle { x, y, scoreable }
    }

    /// Full-grid brute force reference
    fn brute_force(obstacles: &[Obstacle], config: &SimConfig) -> PerceptionGrid {
        let mut grid = PerceptionGrid::for_config(config);
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let cell = grid.cell_rect(column, row, config.cell_size);
                let hit = obstacles.iter().filter(|o| o.scoreable).any(|o| {
                    overlaps(&cell, &o.top_segment(config))
                        || overlaps(&cell, &o.bottom_segment(config))
                });
                grid.set(column, row, hit);
            }
        }
        grid
    }

    #[test]
    fn test_empty_field_is_clear() {
        let config = SimConfig::default();
        let grid = PerceptionGrid::encode(&[], &config);
        assert_eq!(grid.columns(), 32);
        assert_eq!(grid.rows(), 24);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_single_obstacle() {
        let config = SimConfig::default();
        // Footprint 290..330, gap 130..270
        let grid = PerceptionGrid::encode(&[obstacle(310.0, 200.0, true)], &config);

        // Columns 14 (280..300) through 16 (320..340) are touched; 13 ends at 280 < 290
        assert!(!grid.get(13, 0));
        assert!(grid.get(14, 0));
        assert!(grid.get(15, 0));
        assert!(grid.get(16, 0));
        assert!(!grid.get(17, 0));

        // Row 6 spans 120..140 and touches the top segment ending at 130
        assert!(grid.get(15, 6));
        // Rows 7..=12 (140..260) are inside the gap
        for row in 7..=12 {
            assert!(!grid.get(15, row), "row {row} should be open");
        }
        // Row 13 spans 260..280 and touches the bottom segment starting at 270
        assert!(grid.get(15, 13));
        assert!(grid.get(15, 23));
    }

    #[test]
    fn test_edges_on_cell_boundaries_touch() {
        let config = SimConfig::default();
        // Footprint 280..320 lies exactly on column boundaries
        let grid = PerceptionGrid::encode(&[obstacle(300.0, 200.0, true)], &config);
        assert!(grid.get(13, 0));
        assert!(grid.get(16, 0));
        assert!(!grid.get(12, 0));
        assert!(!grid.get(17, 0));
        assert_eq!(grid, brute_force(&[obstacle(300.0, 200.0, true)], &config));
    }

    #[test]
    fn test_passed_obstacles_are_invisible() {
        let config = SimConfig::default();
        let grid = PerceptionGrid::encode(&[obstacle(310.0, 200.0, false)], &config);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_partially_offscreen_obstacles_clamp() {
        let config = SimConfig::default();
        let left = PerceptionGrid::encode(&[obstacle(5.0, 200.0, true)], &config);
        assert!(left.get(0, 0));
        assert!(left.get(1, 0));

        let right = PerceptionGrid::encode(&[obstacle(650.0, 200.0, true)], &config);
        assert!(right.get(31, 0));

        let beyond = PerceptionGrid::encode(&[obstacle(900.0, 200.0, true)], &config);
        assert_eq!(beyond.occupied_count(), 0);
    }

    #[test]
    fn test_pruned_matches_brute_force() {
        let config = SimConfig::default();
        let obstacles = [
            obstacle(-15.0, 300.0, true),
            obstacle(107.3, 150.0, true),
            obstacle(333.3, 211.7, true),
            obstacle(420.0, 369.0, false),
            obstacle(555.5, 110.0, true),
            obstacle(648.0, 250.0, true),
        ];
        let pruned = PerceptionGrid::encode(&obstacles, &config);
        let reference = brute_force(&obstacles, &config);
        assert_eq!(pruned, reference);
    }

    #[test]
    fn test_nested_layout() {
        let config = SimConfig::default();
        let grid = PerceptionGrid::encode(&[obstacle(310.0, 200.0, true)], &config);
        let nested = grid.to_nested();
        assert_eq!(nested.len(), grid.rows());
        assert_eq!(nested[0].len(), grid.columns());
        assert_eq!(nested[0][15], grid.get(15, 0));
        assert_eq!(grid.occupied().count(), grid.occupied_count());
    }
}
