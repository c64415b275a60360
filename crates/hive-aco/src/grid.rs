//! Bounded 2D grid carrying pheromone and obstacles.

use hive_core::{AcoConfig, Direction, Position, RandomSource};
use serde::{Deserialize, Serialize};

/// Pheromone below this level after evaporation is zeroed
pub const PHEROMONE_FLOOR: f64 = 0.01;

/// Obstacle blocks are between 2 and 4 cells on each side
const MIN_BLOCK_SIDE: usize = 2;
const BLOCK_SIDE_CHOICES: usize = 3;

/// A single grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pheromone: f64,
    obstacle: bool,
}

impl Cell {
    fn open(position: Position) -> Self {
        Self {
            position,
            pheromone: 0.0,
            obstacle: false,
        }
    }

    pub fn pheromone(&self) -> f64 {
        self.pheromone
    }

    pub fn is_obstacle(&self) -> bool {
        self.obstacle
    }
}

/// Fixed-shape lattice with a designated start and target cell.
///
/// Obstacles are fixed once the grid is built; only pheromone changes
/// afterwards. Start and target are never obstacles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    pub start: Position,
    pub target: Position,
    cells: Vec<Cell>,
}

impl Grid {
    /// Obstacle-free grid
    pub fn new(rows: i32, cols: i32, start: Position, target: Position) -> Self {
        let cell_count = rows.max(0) as usize * cols.max(0) as usize;
        let mut grid = Self {
            rows,
            cols,
            start,
            target,
            cells: Vec::with_capacity(cell_count),
        };
        for index in 0..cell_count {
            let position = grid.index_to_pos(index);
            grid.cells.push(Cell::open(position));
        }
        grid
    }

    /// Grid with an explicit obstacle layout. Positions outside the grid and
    /// the start/target cells are ignored.
    pub fn with_obstacles(
        rows: i32,
        cols: i32,
        start: Position,
        target: Position,
        obstacles: impl IntoIterator<Item = Position>,
    ) -> Self {
        let mut grid = Self::new(rows, cols, start, target);
        for pos in obstacles {
            grid.block(pos);
        }
        grid
    }

    /// Place `obstacle_count` random rectangular blocks.
    ///
    /// Each block's anchor stays two cells away from the border when the grid
    /// is large enough. Blocks are clipped at the grid edge, and a block
    /// covering start or target skips just that cell. Reachability of the
    /// target is not checked.
    pub fn build<R: RandomSource + ?Sized>(
        rows: i32,
        cols: i32,
        obstacle_count: usize,
        start: Position,
        target: Position,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::new(rows, cols, start, target);

        for _ in 0..obstacle_count {
            let x = anchor(cols, rng);
            let y = anchor(rows, rng);
            let width = (MIN_BLOCK_SIDE + rng.next_index(BLOCK_SIDE_CHOICES)) as i32;
            let height = (MIN_BLOCK_SIDE + rng.next_index(BLOCK_SIDE_CHOICES)) as i32;

            for dy in 0..height {
                for dx in 0..width {
                    grid.block(Position::new(x + dx, y + dy));
                }
            }
        }

        grid
    }

    /// Create a grid from colony configuration
    pub fn from_config<R: RandomSource + ?Sized>(config: &AcoConfig, rng: &mut R) -> Self {
        Self::build(
            config.grid_rows,
            config.grid_cols,
            config.obstacle_count,
            config.start,
            config.target,
            rng,
        )
    }

    fn block(&mut self, pos: Position) -> bool {
        if pos == self.start || pos == self.target {
            return false;
        }
        match self.index_of(pos) {
            Some(index) => {
                self.cells[index].obstacle = true;
                true
            }
            None => false,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|index| &self.cells[index])
    }

    /// Out-of-bounds positions count as blocked
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.cell(pos).map_or(true, Cell::is_obstacle)
    }

    /// Pheromone at a position; zero outside the grid
    pub fn pheromone(&self, pos: Position) -> f64 {
        self.cell(pos).map_or(0.0, Cell::pheromone)
    }

    /// Overwrite pheromone at a position. Negative values clamp to zero.
    pub fn set_pheromone(&mut self, pos: Position, level: f64) {
        if let Some(index) = self.index_of(pos) {
            self.cells[index].pheromone = level.max(0.0);
        }
    }

    /// Add pheromone at a position; non-positive amounts are ignored
    pub fn deposit(&mut self, pos: Position, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        if let Some(index) = self.index_of(pos) {
            self.cells[index].pheromone += amount;
        }
    }

    /// Multiply every cell's pheromone by `1 - rate`, zeroing levels that
    /// fall under [`PHEROMONE_FLOOR`]
    pub fn evaporate(&mut self, rate: f64) {
        let retain = 1.0 - rate;
        for cell in &mut self.cells {
            cell.pheromone *= retain;
            if cell.pheromone < PHEROMONE_FLOOR {
                cell.pheromone = 0.0;
            }
        }
    }

    pub fn total_pheromone(&self) -> f64 {
        self.cells.iter().map(Cell::pheromone).sum()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.obstacle).count()
    }

    /// In-bounds 4-neighbourhood in up/right/down/left order
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::all()
            .iter()
            .map(|dir| {
                let (dx, dy) = dir.to_delta();
                pos.add(dx, dy)
            })
            .filter(|next| self.in_bounds(*next))
            .collect()
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.cols as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let cols = self.cols as usize;
        Position::new((index % cols) as i32, (index / cols) as i32)
    }

    /// Iterator over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }
}

fn anchor<R: RandomSource + ?Sized>(extent: i32, rng: &mut R) -> i32 {
    if extent > 4 {
        2 + rng.next_index((extent - 4) as usize) as i32
    } else {
        rng.next_index(extent as usize) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_grid() -> Grid {
        Grid::new(15, 20, Position::new(1, 7), Position::new(18, 7))
    }

    #[test]
    fn test_grid_creation() {
        let grid = open_grid();
        assert_eq!(grid.rows, 15);
        assert_eq!(grid.cols, 20);
        assert_eq!(grid.cells().count(), 300);
        assert_eq!(grid.obstacle_count(), 0);
        assert_eq!(grid.total_pheromone(), 0.0);
    }

    #[test]
    fn test_neighbors_are_bounds_checked() {
        let grid = open_grid();

        let corner = grid.neighbors(Position::new(0, 0));
        assert_eq!(corner, vec![Position::new(1, 0), Position::new(0, 1)]);

        let middle = grid.neighbors(Position::new(5, 5));
        assert_eq!(
            middle,
            vec![
                Position::new(5, 4),
                Position::new(6, 5),
                Position::new(5, 6),
                Position::new(4, 5),
            ]
        );
    }

    #[test]
    fn test_build_keeps_endpoints_open() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let grid = Grid::build(15, 20, 40, Position::new(1, 7), Position::new(18, 7), &mut rng);
            assert!(!grid.is_obstacle(grid.start));
            assert!(!grid.is_obstacle(grid.target));
            assert!(grid.obstacle_count() > 0);
        }
    }

    #[test]
    fn test_single_block_is_two_to_four_cells_per_side() {
        let start = Position::new(0, 0);
        // anchors stay two cells off the border, so column 0 is never blocked
        let target = Position::new(0, 49);
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let grid = Grid::build(50, 50, 1, start, target, &mut rng);
            assert!(
                (4..=16).contains(&grid.obstacle_count()),
                "seed {} placed {} cells",
                seed,
                grid.obstacle_count()
            );

            let blocked: Vec<Position> = grid
                .cells()
                .filter(|cell| cell.is_obstacle())
                .map(|cell| cell.position)
                .collect();
            let min_x = blocked.iter().map(|p| p.x).min().unwrap();
            let max_x = blocked.iter().map(|p| p.x).max().unwrap();
            let min_y = blocked.iter().map(|p| p.y).min().unwrap();
            let max_y = blocked.iter().map(|p| p.y).max().unwrap();
            let width = max_x - min_x + 1;
            let height = max_y - min_y + 1;
            assert!((2..=4).contains(&width));
            assert!((2..=4).contains(&height));
            assert_eq!(blocked.len() as i32, width * height);
        }
    }

    #[test]
    fn test_block_skips_only_endpoint_cell() {
        let start = Position::new(2, 2);
        let target = Position::new(9, 9);
        let grid = Grid::with_obstacles(
            10,
            10,
            start,
            target,
            [Position::new(2, 2), Position::new(3, 2), Position::new(2, 3)],
        );
        assert!(!grid.is_obstacle(start));
        assert!(grid.is_obstacle(Position::new(3, 2)));
        assert!(grid.is_obstacle(Position::new(2, 3)));
        assert_eq!(grid.obstacle_count(), 2);
    }

    #[test]
    fn test_small_grid_build() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let grid = Grid::build(2, 3, 3, Position::new(0, 0), Position::new(2, 1), &mut rng);
        assert!(!grid.is_obstacle(Position::new(0, 0)));
        assert!(!grid.is_obstacle(Position::new(2, 1)));
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let grid = open_grid();
        assert!(grid.is_obstacle(Position::new(-1, 0)));
        assert!(grid.is_obstacle(Position::new(20, 0)));
        assert_eq!(grid.pheromone(Position::new(0, 15)), 0.0);
    }

    #[test]
    fn test_deposit_and_evaporate() {
        let mut grid = open_grid();
        let pos = Position::new(4, 4);

        grid.deposit(pos, 10.0);
        grid.deposit(pos, -3.0);
        assert_eq!(grid.pheromone(pos), 10.0);

        grid.evaporate(0.5);
        assert!((grid.pheromone(pos) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaporation_floor() {
        let mut grid = open_grid();
        let pos = Position::new(4, 4);
        grid.set_pheromone(pos, 0.0105);
        grid.evaporate(0.1);
        assert_eq!(grid.pheromone(pos), 0.0);

        grid.set_pheromone(pos, -4.0);
        assert_eq!(grid.pheromone(pos), 0.0);
    }
}
