//! Built-in unit definitions.

/// One unit known to the registry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnitDef {
    /// Canonical symbol.
    pub(crate) symbol: &'static str,
    /// Long names (singular); plurals with a trailing `s` are also accepted.
    pub(crate) names: &'static [&'static str],
    /// Alternative spellings resolving to `symbol`.
    pub(crate) aliases: &'static [&'static str],
    /// Whether SI prefixes may be attached.
    pub(crate) prefixable: bool,
}

const fn unit(
    symbol: &'static str,
    names: &'static [&'static str],
    aliases: &'static [&'static str],
    prefixable: bool,
) -> UnitDef {
    UnitDef {
        symbol,
        names,
        aliases,
        prefixable,
    }
}

pub(crate) const UNITS: &[UnitDef] = &[
    // SI base
    unit("m", &["meter", "metre"], &[], true),
    unit("s", &["second"], &["sec"], true),
    unit("g", &["gram"], &[], true),
    unit("A", &["ampere"], &["amp"], true),
    unit("K", &["kelvin"], &[], true),
    unit("mol", &["mole"], &[], true),
    unit("cd", &["candela"], &[], true),
    // SI derived
    unit("Hz", &["hertz"], &[], true),
    unit("N", &["newton"], &[], true),
    unit("Pa", &["pascal"], &[], true),
    unit("J", &["joule"], &[], true),
    unit("W", &["watt"], &[], true),
    unit("C", &["coulomb"], &[], true),
    unit("V", &["volt"], &[], true),
    unit("F", &["farad"], &[], true),
    unit("ohm", &[], &["Ohm", "Ω"], true),
    unit("S", &["siemens"], &[], true),
    unit("Wb", &["weber"], &[], true),
    unit("T", &["tesla"], &[], true),
    unit("H", &["henry"], &[], true),
    unit("lm", &["lumen"], &[], true),
    unit("lx", &["lux"], &[], true),
    unit("Bq", &["becquerel"], &[], true),
    unit("Gy", &["gray"], &[], true),
    unit("Sv", &["sievert"], &[], true),
    unit("kat", &["katal"], &[], true),
    unit("rad", &["radian"], &[], true),
    unit("sr", &["steradian"], &[], true),
    unit("degC", &["degree_Celsius", "celsius"], &["°C"], false),
    // Accepted non-SI
    unit("eV", &["electronvolt", "electron_volt"], &[], true),
    unit("min", &["minute"], &[], false),
    unit("h", &["hour"], &["hr"], false),
    unit("d", &["day"], &[], false),
    unit("a", &["year"], &["yr"], false),
    unit("L", &["liter", "litre"], &["l"], true),
    unit("t", &["tonne"], &[], true),
    unit("bar", &[], &[], true),
    unit("atm", &["atmosphere"], &[], false),
    unit("u", &["dalton"], &["Da", "amu"], false),
    unit("deg", &["degree", "arcdeg"], &["°"], false),
    unit("percent", &[], &["%"], false),
];

/// An SI prefix.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PrefixDef {
    /// Canonical symbol.
    pub(crate) symbol: &'static str,
    /// Alternative symbols.
    pub(crate) aliases: &'static [&'static str],
    /// Long names, attached to long unit names.
    pub(crate) names: &'static [&'static str],
}

const fn prefix(
    symbol: &'static str,
    aliases: &'static [&'static str],
    names: &'static [&'static str],
) -> PrefixDef {
    PrefixDef {
        symbol,
        aliases,
        names,
    }
}

pub(crate) const PREFIXES: &[PrefixDef] = &[
    prefix("Y", &[], &["yotta"]),
    prefix("Z", &[], &["zetta"]),
    prefix("E", &[], &["exa"]),
    prefix("P", &[], &["peta"]),
    prefix("T", &[], &["tera"]),
    prefix("G", &[], &["giga"]),
    prefix("M", &[], &["mega"]),
    prefix("k", &[], &["kilo"]),
    prefix("h", &[], &["hecto"]),
    prefix("da", &[], &["deca", "deka"]),
    prefix("d", &[], &["deci"]),
    prefix("c", &[], &["centi"]),
    prefix("m", &[], &["milli"]),
    prefix("u", &["µ", "μ"], &["micro"]),
    prefix("n", &[], &["nano"]),
    prefix("p", &[], &["pico"]),
    prefix("f", &[], &["femto"]),
    prefix("a", &[], &["atto"]),
    prefix("z", &[], &["zepto"]),
    prefix("y", &[], &["yocto"]),
];
