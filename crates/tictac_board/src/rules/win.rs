//! Win detection logic for tic-tac-toe.

use crate::{Board, Mark};
use tracing::instrument;

/// Returns the mark at `(x, y)` if it completes a line through that square.
///
/// Only the row, the column and any diagonal passing through `(x, y)` are
/// inspected. A single move can only complete lines through the square it
/// occupied, so this is enough to detect the win it creates.
#[instrument(skip(board))]
pub fn winner_at(board: &Board, x: usize, y: usize) -> Option<Mark> {
    let mark = board.get(x, y).mark()?;
    let holds = |(cx, cy): (usize, usize)| board.get(cx, cy).mark() == Some(mark);
    let last = Board::SIZE - 1;

    let column = (0..Board::SIZE).all(|cy| holds((x, cy)));
    let row = (0..Board::SIZE).all(|cx| holds((cx, y)));
    let diagonal = x == y && (0..Board::SIZE).all(|i| holds((i, i)));
    let anti_diagonal = x + y == last && (0..Board::SIZE).all(|i| holds((i, last - i)));

    (column || row || diagonal || anti_diagonal).then_some(mark)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays `moves` alternately starting with X.
    fn play(moves: &[(usize, usize)]) -> Board {
        let mut board = Board::new();
        let mut mark = Mark::X;
        for &(x, y) in moves {
            board.set(x, y, mark);
            mark = mark.opponent();
        }
        board
    }

    #[test]
    fn test_no_winner_after_one_move() {
        let board = play(&[(0, 0)]);
        assert_eq!(winner_at(&board, 0, 0), None);
    }

    #[test]
    fn test_no_winner_on_empty_square() {
        assert_eq!(winner_at(&Board::new(), 1, 1), None);
    }

    #[test]
    fn test_all_eight_lines_for_both_marks() {
        let lines: [[(usize, usize); 3]; 8] = [
            [(0, 0), (0, 1), (0, 2)],
            [(1, 0), (1, 1), (1, 2)],
            [(2, 0), (2, 1), (2, 2)],
            [(0, 0), (1, 0), (2, 0)],
            [(0, 1), (1, 1), (2, 1)],
            [(0, 2), (1, 2), (2, 2)],
            [(0, 0), (1, 1), (2, 2)],
            [(0, 2), (1, 1), (2, 0)],
        ];

        for mark in [Mark::X, Mark::O] {
            for line in lines {
                let mut board = Board::new();
                for (x, y) in line {
                    board.set(x, y, mark);
                }
                for (x, y) in line {
                    assert_eq!(
                        winner_at(&board, x, y),
                        Some(mark),
                        "{mark} line {line:?} seen from ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_row_win_first_column() {
        let board = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(winner_at(&board, 0, 2), Some(Mark::X));
    }

    #[test]
    fn test_diagonal_win() {
        let board = play(&[(0, 0), (0, 1), (1, 1), (0, 2), (2, 2)]);
        assert_eq!(winner_at(&board, 2, 2), Some(Mark::X));
    }

    #[test]
    fn test_diagonal_win_with_final_mark_in_middle() {
        let board = play(&[(0, 0), (0, 1), (2, 2), (0, 2), (1, 1)]);
        assert_eq!(winner_at(&board, 1, 1), Some(Mark::X));
    }

    #[test]
    fn test_anti_diagonal_win() {
        let board = play(&[(0, 2), (0, 1), (1, 1), (1, 2), (2, 0)]);
        assert_eq!(winner_at(&board, 2, 0), Some(Mark::X));
    }

    #[test]
    fn test_second_mark_wins() {
        let board = play(&[(1, 0), (0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
        assert_eq!(winner_at(&board, 0, 2), Some(Mark::O));
    }

    #[test]
    fn test_check_is_local_to_played_square() {
        // X holds the whole first column, but (2, 2) is not on it.
        let board = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (2, 2)]);
        assert_eq!(winner_at(&board, 0, 0), Some(Mark::X));
        assert_eq!(winner_at(&board, 2, 2), None);
    }

    #[test]
    fn test_off_diagonal_square_ignores_diagonals() {
        // (1, 0) is on neither diagonal even though X holds the main one.
        let mut board = Board::new();
        for (x, y) in [(0, 0), (1, 1), (2, 2)] {
            board.set(x, y, Mark::X);
        }
        board.set(1, 0, Mark::X);
        assert_eq!(winner_at(&board, 1, 0), None);
    }
}
