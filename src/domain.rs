//! Domain classification from variable-name prefixes.
//!
//! The domain decides both the output subdirectory of a generated schema and
//! the path segment of its `$id`, so everything goes through [`Domain::classify`].

use std::fmt;

use crate::cdl::ParsedUnit;

/// Subject area a definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Poloidal field coils.
    PfActive,
    /// Toroidal field coils.
    TfActive,
    /// Plasma quantities.
    Plasma,
    /// Vacuum vessel.
    Vessel,
    /// Diagnostics.
    Diagnostics,
    /// Equilibrium reconstruction.
    Equilibrium,
    /// Shared base definitions (no recognised prefix).
    Base,
}

/// Prefixes checked in order for every variable name.
const PREFIXES: [(&str, Domain); 6] = [
    ("pf_", Domain::PfActive),
    ("tf_", Domain::TfActive),
    ("plasma_", Domain::Plasma),
    ("vessel_", Domain::Vessel),
    ("diag_", Domain::Diagnostics),
    ("eq_", Domain::Equilibrium),
];

impl Domain {
    /// Directory / `$id` label.
    pub fn label(self) -> &'static str {
        match self {
            Domain::PfActive => "pf_active",
            Domain::TfActive => "tf_active",
            Domain::Plasma => "plasma",
            Domain::Vessel => "vessel",
            Domain::Diagnostics => "diagnostics",
            Domain::Equilibrium => "equilibrium",
            Domain::Base => "base",
        }
    }

    /// Domain of a prefixed variable name, if any.
    pub fn of_name(name: &str) -> Option<Self> {
        PREFIXES
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map(|(_, domain)| *domain)
    }

    /// Classify by the first variable name (in order) carrying a known prefix.
    pub fn classify<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .find_map(Self::of_name)
            .unwrap_or(Domain::Base)
    }

    /// Classify a parsed unit by its variables.
    pub fn for_unit(unit: &ParsedUnit) -> Self {
        Self::classify(unit.variable_names())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
