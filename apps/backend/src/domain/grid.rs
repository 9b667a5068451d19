//! Static maze definition and the accessibility predicate.

use serde::{Deserialize, Serialize};

use crate::errors::domain::{ActionKind, DomainError};

/// Grid coordinate. Origin is the top-left cell; north decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Human-readable label: column letter plus 1-based row (`(0,0)` is `A1`).
    pub fn label(&self) -> String {
        let col = u8::try_from(self.x)
            .ok()
            .filter(|x| *x < 26)
            .map(|x| char::from(b'A' + x).to_string())
            .unwrap_or_else(|| format!("C{}", self.x));
        format!("{col}{}", self.y + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub accessible: bool,
}

/// Row-major grid snapshot, `rows[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: Vec<Vec<Cell>>,
}

const BUILTIN_MAZE: [&str; 10] = [
    "##.#....#....#..",
    "#..#.##.#.##.#.#",
    "#.##..#...#..#.#",
    "#....##.###.##.#",
    "###.#...#...#..#",
    "#...#.#.#.#.#.##",
    "#.#...#...#...##",
    "#.##.##..##...##",
    "......#.#......#",
    "#.###...#.####.#",
];

impl Board {
    /// Parse ASCII rows: `#` is blocked, `.` is open. All rows must share a width.
    pub fn from_rows(rows: &[&str]) -> Result<Self, DomainError> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if width == 0 {
            return Err(DomainError::invalid(
                ActionKind::Other("board".into()),
                "board must have at least one cell",
            ));
        }
        let mut parsed = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DomainError::invalid(
                    ActionKind::Other("board".into()),
                    format!("row {y} has width {}, expected {width}", row.len()),
                ));
            }
            let cells = row
                .chars()
                .map(|c| match c {
                    '.' => Ok(Cell { accessible: true }),
                    '#' => Ok(Cell { accessible: false }),
                    other => Err(DomainError::invalid(
                        ActionKind::Other("board".into()),
                        format!("unexpected cell marker '{other}' in row {y}"),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(cells);
        }
        Ok(Self { rows: parsed })
    }

    /// The 16x10 maze every new session is created with.
    pub fn builtin() -> Self {
        let rows = BUILTIN_MAZE
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| Cell {
                        accessible: c == '.',
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn width(&self) -> i32 {
        self.rows.first().map(|r| r.len() as i32).unwrap_or(0)
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.rows
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
    }
}

/// True when `pos` is inside the board and not a wall.
pub fn is_accessible(pos: Position, board: &Board) -> bool {
    board.cell(pos).is_some_and(|c| c.accessible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_board_dimensions() {
        let board = Board::builtin();
        assert_eq!(board.width(), 16);
        assert_eq!(board.height(), 10);
    }

    #[test]
    fn starting_cells_are_open() {
        let board = Board::builtin();
        for pos in [
            Position::new(7, 8),
            Position::new(7, 7),
            Position::new(2, 0),
            Position::new(2, 1),
            Position::new(0, 8),
            Position::new(1, 8),
        ] {
            assert!(is_accessible(pos, &board), "{} should be open", pos.label());
        }
    }

    #[test]
    fn out_of_bounds_is_inaccessible() {
        let board = Board::builtin();
        assert!(!is_accessible(Position::new(-1, 0), &board));
        assert!(!is_accessible(Position::new(0, -1), &board));
        assert!(!is_accessible(Position::new(16, 0), &board));
        assert!(!is_accessible(Position::new(0, 10), &board));
    }

    #[test]
    fn walls_are_inaccessible() {
        let board = Board::builtin();
        assert!(!is_accessible(Position::new(0, 0), &board));
        assert!(!is_accessible(Position::new(6, 8), &board));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(Board::from_rows(&["..", "."]).is_err());
        assert!(Board::from_rows(&[]).is_err());
        assert!(Board::from_rows(&[".x"]).is_err());
    }

    #[test]
    fn from_rows_matches_builtin() {
        let parsed = Board::from_rows(&BUILTIN_MAZE).unwrap();
        assert_eq!(parsed, Board::builtin());
    }

    #[test]
    fn board_serializes_as_nested_rows() {
        let board = Board::from_rows(&["#."]).unwrap();
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!([[{"accessible": false}, {"accessible": true}]])
        );
    }

    #[test]
    fn position_labels() {
        assert_eq!(Position::new(0, 0).label(), "A1");
        assert_eq!(Position::new(7, 8).label(), "H9");
    }
}
