/// Headings and the outcome labels attached to a finished game.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    #[cfg(test)]
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Unit offset in screen space (y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up    => (0, -1),
            Heading::Down  => (0, 1),
            Heading::Left  => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Heading {
        match self {
            Heading::Up    => Heading::Down,
            Heading::Down  => Heading::Up,
            Heading::Left  => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Same axis, reversed sign.
    pub fn is_opposite(self, other: Heading) -> bool {
        self.opposite() == other
    }
}

/// Why the last game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeathCause {
    /// Head left the board.
    Wall,
    /// Head ran into the body.
    SelfHit,
}

impl DeathCause {
    pub fn label(cause: Option<DeathCause>) -> &'static str {
        match cause {
            Some(DeathCause::Wall) => "wall",
            Some(DeathCause::SelfHit) => "self",
            None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        for h in Heading::ALL {
            assert!(h.is_opposite(h.opposite()));
            assert_eq!(h.opposite().opposite(), h);
            assert!(!h.is_opposite(h));
        }
    }

    #[test]
    fn perpendicular_is_not_opposite() {
        assert!(!Heading::Up.is_opposite(Heading::Left));
        assert!(!Heading::Up.is_opposite(Heading::Right));
        assert!(!Heading::Left.is_opposite(Heading::Down));
    }

    #[test]
    fn opposite_deltas_cancel() {
        for h in Heading::ALL {
            let (dx, dy) = h.delta();
            let (ox, oy) = h.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn cause_labels() {
        assert_eq!(DeathCause::label(Some(DeathCause::Wall)), "wall");
        assert_eq!(DeathCause::label(Some(DeathCause::SelfHit)), "self");
        assert_eq!(DeathCause::label(None), "none");
    }
}
