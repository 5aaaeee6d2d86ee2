use std::fmt;

/// Inclusive validation range for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub minimum: f64,
    pub maximum: f64,
}

impl FieldBounds {
    pub const fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.minimum && value <= self.maximum
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    ExpectedGoals,
    ExpectedGoalsAgainst,
    Possession,
    ExpectedAssists,
    KeyPasses,
    PassesPenaltyArea,
    ProgressivePasses,
}

const BOUNDS: [FieldBounds; 7] = [
    FieldBounds::new(0.0, 10.0),
    FieldBounds::new(0.0, 10.0),
    FieldBounds::new(0.0, 100.0),
    FieldBounds::new(0.0, 10.0),
    FieldBounds::new(0.0, 100.0),
    FieldBounds::new(0.0, 100.0),
    FieldBounds::new(0.0, 100.0),
];

impl Field {
    /// Collection order; also the order errors are reported in.
    pub const ALL: [Field; 7] = [
        Field::ExpectedGoals,
        Field::ExpectedGoalsAgainst,
        Field::Possession,
        Field::ExpectedAssists,
        Field::KeyPasses,
        Field::PassesPenaltyArea,
        Field::ProgressivePasses,
    ];

    pub fn index(self) -> usize {
        match self {
            Field::ExpectedGoals => 0,
            Field::ExpectedGoalsAgainst => 1,
            Field::Possession => 2,
            Field::ExpectedAssists => 3,
            Field::KeyPasses => 4,
            Field::PassesPenaltyArea => 5,
            Field::ProgressivePasses => 6,
        }
    }

    /// Key used in the request body and in batch validation messages.
    pub fn key(self) -> &'static str {
        match self {
            Field::ExpectedGoals => "xG",
            Field::ExpectedGoalsAgainst => "xGA",
            Field::Possession => "Poss",
            Field::ExpectedAssists => "xA",
            Field::KeyPasses => "KP",
            Field::PassesPenaltyArea => "PPA",
            Field::ProgressivePasses => "PrgP",
        }
    }

    /// Identifier of the input element bound to this field.
    pub fn element_id(self) -> &'static str {
        match self {
            Field::ExpectedGoals => "xG",
            Field::ExpectedGoalsAgainst => "xGA",
            Field::Possession => "possession",
            Field::ExpectedAssists => "xA",
            Field::KeyPasses => "keyPasses",
            Field::PassesPenaltyArea => "PPA",
            Field::ProgressivePasses => "PrgP",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::ExpectedGoals => "Expected Goals (xG)",
            Field::ExpectedGoalsAgainst => "Expected Goals Against (xGA)",
            Field::Possession => "Possession %",
            Field::ExpectedAssists => "Expected Assists (xA)",
            Field::KeyPasses => "Key Passes",
            Field::PassesPenaltyArea => "Passes into Penalty Area",
            Field::ProgressivePasses => "Progressive Passes",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Field::KeyPasses | Field::PassesPenaltyArea | Field::ProgressivePasses
        )
    }

    pub fn bounds(self) -> FieldBounds {
        BOUNDS[self.index()]
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn from_element_id(id: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.element_id() == id)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
