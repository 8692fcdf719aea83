/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// Rocks and gems each have a small state family:
///   resting (`Rock`/`Gem`) → `Falling*` → back to resting on landing,
///   with `*Settling` as a one-tick marker between a left roll and the
///   next fall.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Tile {
    Wall,
    Empty,
    Path,         // Diggable dirt, the player clears it by walking
    Gem,
    Rock,
    FallingGem,
    FallingRock,
    GemSettling,  // Rolled left this tick, falls next tick
    RockSettling,
    Player,
    Exit,
    Border,       // Trailing newline column of a level row
}

impl Tile {
    /// Decode one byte of a level file.
    pub fn from_level_byte(b: u8) -> Option<Tile> {
        match b {
            b'X' => Some(Tile::Wall),
            b' ' => Some(Tile::Empty),
            b'.' => Some(Tile::Path),
            b'$' => Some(Tile::Gem),
            b'O' => Some(Tile::Rock),
            b'@' => Some(Tile::Player),
            b'E' => Some(Tile::Exit),
            b'\n' => Some(Tile::Border),
            _ => None,
        }
    }

    /// Canonical character, used for debug dumps and replay output.
    pub fn to_char(self) -> char {
        match self {
            Tile::Wall => 'X',
            Tile::Empty => ' ',
            Tile::Path => '.',
            Tile::Gem => '$',
            Tile::Rock => 'O',
            Tile::FallingGem => 'S',
            Tile::FallingRock => 'o',
            Tile::GemSettling => 'p',
            Tile::RockSettling => 'i',
            Tile::Player => '@',
            Tile::Exit => 'E',
            Tile::Border => '\n',
        }
    }

    /// Resting rock or gem (can start to fall or roll).
    pub fn is_resting_object(self) -> bool {
        matches!(self, Tile::Rock | Tile::Gem)
    }

    /// Is this any member of the gem family?
    pub fn is_gem_like(self) -> bool {
        matches!(self, Tile::Gem | Tile::FallingGem | Tile::GemSettling)
    }

    /// Falling variant of a rock/gem family member. Other tiles map to themselves.
    pub fn falling(self) -> Tile {
        match self {
            Tile::Rock | Tile::FallingRock | Tile::RockSettling => Tile::FallingRock,
            Tile::Gem | Tile::FallingGem | Tile::GemSettling => Tile::FallingGem,
            Tile::Wall | Tile::Empty | Tile::Path | Tile::Player | Tile::Exit | Tile::Border => self,
        }
    }

    /// Resting variant of a rock/gem family member.
    pub fn resting(self) -> Tile {
        match self {
            Tile::Rock | Tile::FallingRock | Tile::RockSettling => Tile::Rock,
            Tile::Gem | Tile::FallingGem | Tile::GemSettling => Tile::Gem,
            Tile::Wall | Tile::Empty | Tile::Path | Tile::Player | Tile::Exit | Tile::Border => self,
        }
    }

    /// Settling variant of a rock/gem family member.
    pub fn settling(self) -> Tile {
        match self {
            Tile::Rock | Tile::FallingRock | Tile::RockSettling => Tile::RockSettling,
            Tile::Gem | Tile::FallingGem | Tile::GemSettling => Tile::GemSettling,
            Tile::Wall | Tile::Empty | Tile::Path | Tile::Player | Tile::Exit | Tile::Border => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_alphabet_decodes() {
        assert_eq!(Tile::from_level_byte(b'X'), Some(Tile::Wall));
        assert_eq!(Tile::from_level_byte(b'$'), Some(Tile::Gem));
        assert_eq!(Tile::from_level_byte(b'\n'), Some(Tile::Border));
        assert_eq!(Tile::from_level_byte(b'o'), None);
        assert_eq!(Tile::from_level_byte(b'?'), None);
    }

    #[test]
    fn family_conversions() {
        assert_eq!(Tile::Rock.falling(), Tile::FallingRock);
        assert_eq!(Tile::GemSettling.falling(), Tile::FallingGem);
        assert_eq!(Tile::FallingGem.resting(), Tile::Gem);
        assert_eq!(Tile::FallingRock.settling(), Tile::RockSettling);
        assert_eq!(Tile::Wall.falling(), Tile::Wall);
    }

    #[test]
    fn chars_round_trip_for_level_tiles() {
        for b in [b'X', b' ', b'.', b'$', b'O', b'@', b'E'] {
            let t = Tile::from_level_byte(b).unwrap();
            assert_eq!(t.to_char(), b as char);
        }
    }
}
