//! Text rendering of boards and move lists

use draughts_core::{Board, Move, PieceKind, Square, BOARD_SIZE};

fn glyph(kind: PieceKind) -> char {
    match kind {
        PieceKind::RedMan => 'X',
        PieceKind::BlackMan => 'O',
        PieceKind::RedKing => 'Y',
        PieceKind::BlackKing => 'P',
        PieceKind::Blank => '.',
    }
}

/// Board grid with a 1-8 file header and A-H rank labels
pub fn show_board(board: &Board) -> String {
    let mut out = String::from("  ");
    for file in 0..BOARD_SIZE {
        out.push((b'1' + file) as char);
    }
    out.push('\n');

    for rank in 0..BOARD_SIZE {
        out.push((b'A' + rank) as char);
        out.push(' ');
        for file in 0..BOARD_SIZE {
            out.push(glyph(board.square_state(Square::new(file, rank))));
        }
        out.push('\n');
    }
    out
}

/// Numbered move list a user can select from
pub fn show_moves(moves: &[Move]) -> String {
    if moves.is_empty() {
        return String::from("No more moves!\n");
    }
    let mut out = String::new();
    for (i, mv) in moves.iter().enumerate() {
        out.push_str(&format!("{i}: {mv}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_core::Player;

    #[test]
    fn test_starting_board_rendering() {
        let rendered = show_board(&Board::new());
        let expected = "\
  12345678
A .X.X.X.X
B X.X.X.X.
C .X.X.X.X
D ........
E ........
F O.O.O.O.
G .O.O.O.O
H O.O.O.O.
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_kings_render_distinctly() {
        let mut board = Board::empty();
        board.set_square(Square::new(0, 0), PieceKind::RedKing);
        board.set_square(Square::new(1, 0), PieceKind::BlackKing);
        let rendered = show_board(&board);
        assert!(rendered.contains("A YP......"));
    }

    #[test]
    fn test_move_list_is_numbered() {
        let board = Board::new();
        let moves = board.legal_moves(Player::Red);
        let listing = show_moves(&moves);
        assert!(listing.starts_with("0: "));
        assert_eq!(listing.lines().count(), moves.len());
        // Moves read as square chains in rank-letter/file-number notation.
        assert!(listing.contains("->"));
    }

    #[test]
    fn test_empty_move_list() {
        assert_eq!(show_moves(&[]), "No more moves!\n");
    }
}
