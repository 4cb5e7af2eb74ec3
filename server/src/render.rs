//! Text rendering of board snapshots for terminal clients

use game::{Coord, Snapshot, TileKind};
use std::collections::{HashMap, HashSet};

/// Moves the cursor home and clears the screen before each frame.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

fn tile_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => ' ',
        TileKind::Soft => ':',
        TileKind::Hard => '#',
    }
}

/// Renders a snapshot as bordered rows of one glyph per tile.
///
/// Per tile the first of these that applies wins: a pawn's initial
/// (upper-case alive, lower-case dead), `O` for a bomb, `x` for fire, then
/// the tile itself. Lines end in `\r\n` for telnet.
pub fn render(snapshot: &Snapshot) -> String {
    let bombs: HashSet<Coord> = snapshot.bombs.iter().copied().collect();
    let fires: HashSet<Coord> = snapshot.fires.iter().copied().collect();
    let mut pawns: HashMap<Coord, char> = HashMap::new();
    for pawn in &snapshot.pawns {
        let initial = pawn.name.chars().next().unwrap_or('?');
        let glyph = if pawn.alive {
            initial.to_ascii_uppercase()
        } else {
            initial.to_ascii_lowercase()
        };
        pawns.entry(pawn.location).or_insert(glyph);
    }

    let border = format!("+{}+\r\n", "-".repeat(snapshot.width as usize));
    let mut frame = String::with_capacity(border.len() * (snapshot.height as usize + 2));
    frame.push_str(&border);
    for y in 0..snapshot.height as i32 {
        frame.push('|');
        for x in 0..snapshot.width as i32 {
            let coord = Coord::new(x, y);
            let glyph = if let Some(glyph) = pawns.get(&coord) {
                *glyph
            } else if bombs.contains(&coord) {
                'O'
            } else if fires.contains(&coord) {
                'x'
            } else {
                snapshot.tile(coord).map(tile_glyph).unwrap_or(' ')
            };
            frame.push(glyph);
        }
        frame.push_str("|\r\n");
    }
    frame.push_str(&border);
    frame
}

/// A full frame as sent to clients.
pub fn frame(snapshot: &Snapshot) -> String {
    format!("{}{}", CLEAR_SCREEN, render(snapshot))
}
