//! Cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use oracle_chess_rules::Square;

/// Moves the cursor one square in the direction of an arrow key.
///
/// Directions are as seen on screen, so a flipped board inverts them. The
/// cursor stops at the edges.
pub fn move_cursor(cursor: Square, key: KeyCode, flipped: bool) -> Square {
    let (file, rank) = (cursor.file() as i8, cursor.rank() as i8);
    let sign = if flipped { -1 } else { 1 };

    let (df, dr) = match key {
        KeyCode::Up => (0, sign),
        KeyCode::Down => (0, -sign),
        KeyCode::Right => (sign, 0),
        KeyCode::Left => (-sign, 0),
        _ => return cursor,
    };

    let (file, rank) = (file + df, rank + dr);
    if !(0..8).contains(&file) || !(0..8).contains(&rank) {
        return cursor;
    }
    Square::new(file as u8, rank as u8).unwrap_or(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_arrows_from_white_side() {
        assert_eq!(move_cursor(sq("e2"), KeyCode::Up, false), sq("e3"));
        assert_eq!(move_cursor(sq("e2"), KeyCode::Left, false), sq("d2"));
    }

    #[test]
    fn test_arrows_from_black_side() {
        assert_eq!(move_cursor(sq("e7"), KeyCode::Up, true), sq("e6"));
        assert_eq!(move_cursor(sq("e7"), KeyCode::Left, true), sq("f7"));
    }

    #[test]
    fn test_cursor_stops_at_edge() {
        assert_eq!(move_cursor(sq("a8"), KeyCode::Up, false), sq("a8"));
        assert_eq!(move_cursor(sq("a8"), KeyCode::Left, false), sq("a8"));
        assert_eq!(move_cursor(sq("h1"), KeyCode::Up, true), sq("h1"));
    }
}
