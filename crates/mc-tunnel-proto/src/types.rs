//! Base data types used throughout the protocol.

use std::fmt;

/// A world dimension as identified on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
    /// An identifier this protocol revision does not name.
    Other(i8),
}

impl Dimension {
    pub fn from_id(id: i8) -> Self {
        match id {
            0 => Dimension::Overworld,
            -1 => Dimension::Nether,
            1 => Dimension::End,
            other => Dimension::Other(other),
        }
    }

    pub fn id(self) -> i8 {
        match self {
            Dimension::Overworld => 0,
            Dimension::Nether => -1,
            Dimension::End => 1,
            Dimension::Other(id) => id,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Overworld => write!(f, "overworld"),
            Dimension::Nether => write!(f, "nether"),
            Dimension::End => write!(f, "end"),
            Dimension::Other(id) => write!(f, "dimension({id})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_ids() {
        assert_eq!(Dimension::from_id(0), Dimension::Overworld);
        assert_eq!(Dimension::from_id(-1), Dimension::Nether);
        assert_eq!(Dimension::from_id(1), Dimension::End);
        assert_eq!(Dimension::from_id(7), Dimension::Other(7));
        for id in [-1i8, 0, 1, 42] {
            assert_eq!(Dimension::from_id(id).id(), id);
        }
    }

    #[test]
    fn dimension_display() {
        assert_eq!(Dimension::Nether.to_string(), "nether");
        assert_eq!(Dimension::Other(3).to_string(), "dimension(3)");
    }
}
