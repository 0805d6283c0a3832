use lx_core::types::well_known::*;
use lx_core::types::Ty;

const NUMERIC: &[&str] = &[CHAR, INT32, UINT32, INT64, UINT64, SINGLE, DOUBLE, DECIMAL];

pub fn is_numeric(ty: &Ty) -> bool {
    NUMERIC.iter().any(|name| ty.is_named(name))
}

pub fn is_unsigned(ty: &Ty) -> bool {
    ty.is_named(UINT32) || ty.is_named(UINT64) || ty.is_named(CHAR)
}

/// Implicit widening targets of a numeric type, narrowest first.
pub fn widening_targets(name: &str) -> &'static [&'static str] {
    match name {
        CHAR => &[INT32, UINT32, INT64, UINT64, SINGLE, DOUBLE, DECIMAL],
        INT32 => &[INT64, SINGLE, DOUBLE, DECIMAL],
        UINT32 => &[INT64, UINT64, SINGLE, DOUBLE, DECIMAL],
        INT64 | UINT64 => &[SINGLE, DOUBLE, DECIMAL],
        SINGLE => &[DOUBLE],
        _ => &[],
    }
}

pub fn is_numeric_widening(from: &Ty, to: &Ty) -> bool {
    if !is_numeric(from) || !is_numeric(to) {
        return false;
    }
    widening_targets(from.name()).contains(&to.name())
}

/// Any numeric type converts to any other with an explicit cast.
pub fn is_numeric_cast(from: &Ty, to: &Ty) -> bool {
    is_numeric(from) && is_numeric(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_is_one_directional() {
        assert!(is_numeric_widening(&Ty::int32(), &Ty::int64()));
        assert!(!is_numeric_widening(&Ty::int64(), &Ty::int32()));
        assert!(is_numeric_widening(&Ty::uint32(), &Ty::uint64()));
        assert!(!is_numeric_widening(&Ty::int32(), &Ty::uint32()));
        assert!(!is_numeric_widening(&Ty::double(), &Ty::decimal()));
    }

    #[test]
    fn casts_cover_all_numeric_pairs() {
        assert!(is_numeric_cast(&Ty::double(), &Ty::int32()));
        assert!(!is_numeric_cast(&Ty::string(), &Ty::int32()));
    }
}
