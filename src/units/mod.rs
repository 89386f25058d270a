//! In-process unit registry.
//!
//! Resolves UDUNITS-style unit expressions (`m`, `V.m^-1`, `hPa`,
//! `meter/second`) to a canonical form made of symbol factors joined by `.`
//! with exponents written as `^n`.

mod table;

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use table::{UnitDef, PREFIXES, UNITS};

/// A unit name followed by an optional `^n` / `n` exponent.
static FACTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\d^+\-]+?)(?:\^?([+-]?\d+))?$").expect("valid unit factor pattern")
});

static SHARED: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Unit resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// A factor names no known unit.
    #[error("'{0}' is not defined in the unit registry")]
    Undefined(String),

    /// Nothing to resolve.
    #[error("empty unit expression")]
    Empty,

    /// The expression could not be split into factors.
    #[error("malformed unit expression '{expr}': {reason}")]
    Malformed {
        /// Offending expression.
        expr: String,
        /// What went wrong.
        reason: String,
    },
}

impl UnitError {
    fn malformed(expr: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

/// One `symbol^exponent` factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFactor {
    /// Canonical (possibly prefixed) symbol.
    pub symbol: String,
    /// Non-zero exponent.
    pub exponent: i32,
}

impl fmt::Display for UnitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 1 {
            f.write_str(&self.symbol)
        } else {
            write!(f, "{}^{}", self.symbol, self.exponent)
        }
    }
}

/// A resolved unit. Repeated symbols are merged in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalUnit {
    factors: Vec<UnitFactor>,
}

impl CanonicalUnit {
    /// Merge a factor. Returns `None` when the combined exponent overflows.
    fn push(&mut self, symbol: String, exponent: i32) -> Option<()> {
        match self.factors.iter_mut().find(|f| f.symbol == symbol) {
            Some(existing) => existing.exponent = existing.exponent.checked_add(exponent)?,
            None => self.factors.push(UnitFactor { symbol, exponent }),
        }
        Some(())
    }

    fn finish(mut self) -> Self {
        self.factors.retain(|f| f.exponent != 0);
        self
    }

    /// Factors in order.
    pub fn factors(&self) -> &[UnitFactor] {
        &self.factors
    }

    /// Factors rendered individually, e.g. `["m", "s^-1"]`.
    pub fn tokens(&self) -> Vec<String> {
        self.factors.iter().map(ToString::to_string).collect()
    }

    /// Check if all factors cancelled out.
    pub fn is_dimensionless(&self) -> bool {
        self.factors.is_empty()
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return f.write_str("1");
        }
        f.write_str(&self.tokens().join("."))
    }
}

/// Lookup tables for unit symbols, names and SI prefixes.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    symbols: HashMap<&'static str, &'static UnitDef>,
    names: HashMap<&'static str, &'static UnitDef>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Build the registry from the built-in tables.
    pub fn new() -> Self {
        let mut symbols = HashMap::new();
        let mut names = HashMap::new();

        for def in UNITS {
            symbols.insert(def.symbol, def);
            for alias in def.aliases {
                symbols.insert(*alias, def);
            }
            for name in def.names {
                names.insert(*name, def);
            }
        }

        Self { symbols, names }
    }

    /// Process-wide registry instance.
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Check if an expression resolves.
    pub fn is_defined(&self, expr: &str) -> bool {
        self.resolve(expr).is_ok()
    }

    /// Resolve an expression to its canonical form.
    pub fn resolve(&self, expr: &str) -> Result<CanonicalUnit, UnitError> {
        let normalized = expr.trim().replace("**", "^");
        if normalized.is_empty() {
            return Err(UnitError::Empty);
        }

        let mut unit = CanonicalUnit::default();
        for (i, part) in normalized.split('/').enumerate() {
            let sign = if i == 0 { 1 } else { -1 };
            let factors: Vec<&str> = part
                .split(|c: char| c == '.' || c == '*' || c.is_whitespace())
                .filter(|f| !f.is_empty())
                .collect();
            if factors.is_empty() {
                return Err(UnitError::malformed(expr, "empty factor"));
            }

            for factor in factors {
                if factor == "1" {
                    continue;
                }
                let caps = FACTOR.captures(factor).ok_or_else(|| {
                    UnitError::malformed(expr, format!("cannot read factor '{}'", factor))
                })?;
                let exponent = match caps.get(2) {
                    Some(m) => m.as_str().parse::<i32>().map_err(|_| {
                        UnitError::malformed(expr, format!("exponent out of range in '{}'", factor))
                    })?,
                    None => 1,
                };
                let symbol = self
                    .resolve_name(&caps[1])
                    .ok_or_else(|| UnitError::Undefined(caps[1].to_string()))?;
                exponent
                    .checked_mul(sign)
                    .and_then(|exponent| unit.push(symbol, exponent))
                    .ok_or_else(|| UnitError::malformed(expr, "exponent out of range"))?;
            }
        }

        Ok(unit.finish())
    }

    fn lookup_symbol(&self, token: &str) -> Option<&'static UnitDef> {
        self.symbols.get(token).copied()
    }

    fn lookup_name(&self, token: &str) -> Option<&'static UnitDef> {
        self.names
            .get(token)
            .or_else(|| token.strip_suffix('s').and_then(|t| self.names.get(t)))
            .copied()
    }

    /// Canonical symbol of a single unit name, with SI prefix if present.
    fn resolve_name(&self, token: &str) -> Option<String> {
        if let Some(def) = self.lookup_symbol(token).or_else(|| self.lookup_name(token)) {
            return Some(def.symbol.to_string());
        }

        for prefix in PREFIXES {
            let symbols = std::iter::once(&prefix.symbol).chain(prefix.aliases);
            for ps in symbols {
                let found = token
                    .strip_prefix(ps)
                    .and_then(|rest| self.lookup_symbol(rest))
                    .filter(|def| def.prefixable);
                if let Some(def) = found {
                    return Some(format!("{}{}", prefix.symbol, def.symbol));
                }
            }

            for pn in prefix.names {
                let found = token
                    .strip_prefix(pn)
                    .and_then(|rest| self.lookup_name(rest))
                    .filter(|def| def.prefixable);
                if let Some(def) = found {
                    return Some(format!("{}{}", prefix.symbol, def.symbol));
                }
            }
        }

        None
    }
}
