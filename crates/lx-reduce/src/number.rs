//! Numeric literal parsing with base prefixes, digit separators, type
//! suffixes and the Int32/UInt32/Int64/UInt64 narrowing rules.

use bigdecimal::BigDecimal;
use lx_core::error::Error;
use lx_core::types::Literal;
use lx_core::Result;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy)]
struct Suffix {
    unsigned: bool,
    long: bool,
    float: bool,
    double: bool,
    decimal: bool,
}

impl Suffix {
    fn strip(digits: &str, base: u32) -> (&str, Suffix) {
        let allowed: &[char] = if base == 10 {
            &['D', 'F', 'M', 'L', 'U']
        } else {
            &['L', 'U']
        };
        let mut suffix = Suffix::default();
        let mut rest = digits;
        while let Some(last) = rest.chars().last().filter(|c| allowed.contains(c)) {
            match last {
                'U' => suffix.unsigned = true,
                'L' => suffix.long = true,
                'F' => suffix.float = true,
                'D' => suffix.double = true,
                _ => suffix.decimal = true,
            }
            rest = &rest[..rest.len() - 1];
        }
        (rest, suffix)
    }

    fn is_real(&self) -> bool {
        self.float || self.double || self.decimal
    }
}

pub fn parse_number(text: &str) -> Result<Literal> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect::<String>().to_uppercase();
    let (negative, unsigned_text) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let (base, body) = match unsigned_text.get(..2) {
        Some("0B") => (2, &unsigned_text[2..]),
        Some("0O") => (8, &unsigned_text[2..]),
        Some("0X") => (16, &unsigned_text[2..]),
        _ => (10, unsigned_text),
    };
    let (digits, suffix) = Suffix::strip(body, base);
    if digits.is_empty() {
        return Err(Error::invalid_literal(text, "missing digits"));
    }
    let sign = if negative { "-" } else { "" };

    if base == 10 && suffix.decimal {
        if suffix.float || suffix.double || suffix.long || suffix.unsigned {
            return Err(Error::invalid_literal(text, "conflicting suffixes"));
        }
        let value = BigDecimal::from_str(&format!("{}{}", sign, digits))
            .map_err(|err| Error::invalid_literal(text, err.to_string()))?;
        return Ok(Literal::Decimal(value));
    }
    if base == 10 && (digits.contains('.') || suffix.float || suffix.double) {
        if suffix.long || suffix.unsigned {
            return Err(Error::invalid_literal(text, "integer suffix on a real literal"));
        }
        let source = format!("{}{}", sign, digits);
        return if suffix.float {
            f32::from_str(&source)
                .map(Literal::Single)
                .map_err(|err| Error::invalid_literal(text, err.to_string()))
        } else {
            f64::from_str(&source)
                .map(Literal::Double)
                .map_err(|err| Error::invalid_literal(text, err.to_string()))
        };
    }
    if suffix.is_real() {
        return Err(Error::invalid_literal(text, "real suffix on a non-decimal literal"));
    }

    let magnitude = if base == 10 {
        u64::from_str(digits)
    } else {
        u64::from_str_radix(digits, base)
    }
    .map_err(|err| Error::invalid_literal(text, err.to_string()))?;

    if negative {
        if suffix.unsigned {
            return Err(Error::invalid_literal(text, "unsigned literal cannot be negative"));
        }
        let value = i64::try_from(-(magnitude as i128))
            .map_err(|_| Error::invalid_literal(text, "out of range for Int64"))?;
        if !suffix.long {
            if let Ok(narrow) = i32::try_from(value) {
                return Ok(Literal::Int32(narrow));
            }
        }
        return Ok(Literal::Int64(value));
    }

    Ok(narrow_unsigned(magnitude, suffix))
}

fn narrow_unsigned(value: u64, suffix: Suffix) -> Literal {
    match (suffix.unsigned, suffix.long) {
        (false, false) => {
            if let Ok(v) = i32::try_from(value) {
                Literal::Int32(v)
            } else if let Ok(v) = u32::try_from(value) {
                Literal::UInt32(v)
            } else if let Ok(v) = i64::try_from(value) {
                Literal::Int64(v)
            } else {
                Literal::UInt64(value)
            }
        }
        (true, false) => match u32::try_from(value) {
            Ok(v) => Literal::UInt32(v),
            Err(_) => Literal::UInt64(value),
        },
        (false, true) => match i64::try_from(value) {
            Ok(v) => Literal::Int64(v),
            Err(_) => Literal::UInt64(value),
        },
        (true, true) => Literal::UInt64(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Literal {
        parse_number(text).unwrap()
    }

    #[test]
    fn narrowing_table() {
        assert_eq!(parse("123"), Literal::Int32(123));
        assert_eq!(parse("4000000000"), Literal::UInt32(4_000_000_000));
        assert_eq!(parse("5000000000"), Literal::Int64(5_000_000_000));
        assert_eq!(parse("18446744073709551615"), Literal::UInt64(u64::MAX));
        assert_eq!(parse("123L"), Literal::Int64(123));
        assert_eq!(parse("123U"), Literal::UInt32(123));
        assert_eq!(parse("5000000000U"), Literal::UInt64(5_000_000_000));
        assert_eq!(parse("7UL"), Literal::UInt64(7));
        assert_eq!(parse("7LU"), Literal::UInt64(7));
    }

    #[test]
    fn prefixes_and_separators() {
        assert_eq!(parse("0xFF"), Literal::Int32(255));
        assert_eq!(parse("0b1010"), Literal::Int32(10));
        assert_eq!(parse("0o17"), Literal::Int32(15));
        assert_eq!(parse("0xFFFF_FFFF"), Literal::UInt32(u32::MAX));
        assert_eq!(parse("1_000_000"), Literal::Int32(1_000_000));
        // D and F are hex digits, not suffixes, in base 16.
        assert_eq!(parse("0xDF"), Literal::Int32(0xDF));
    }

    #[test]
    fn negative_literals() {
        assert_eq!(parse("-5"), Literal::Int32(-5));
        assert_eq!(parse("-5L"), Literal::Int64(-5));
        assert_eq!(parse("-3000000000"), Literal::Int64(-3_000_000_000));
        assert_eq!(parse("-9223372036854775808"), Literal::Int64(i64::MIN));
        assert!(parse_number("-1U").is_err());
        assert!(parse_number("-9223372036854775809").is_err());
    }

    #[test]
    fn reals() {
        assert_eq!(parse("1.5"), Literal::Double(1.5));
        assert_eq!(parse("1.5F"), Literal::Single(1.5));
        assert_eq!(parse("2D"), Literal::Double(2.0));
        assert_eq!(parse("2f"), Literal::Single(2.0));
        assert_eq!(parse("10M"), Literal::Decimal(BigDecimal::from(10)));
        assert_eq!(parse("-0.25m"), Literal::Decimal(BigDecimal::from_str("-0.25").unwrap()));
    }

    #[test]
    fn malformed_literals() {
        assert!(parse_number("0x").is_err());
        assert!(parse_number("12ab").is_err());
        assert!(parse_number("99999999999999999999").is_err());
        assert!(parse_number("1.5L").is_err());
    }

    #[test]
    fn parsing_is_deterministic() {
        for text in ["42", "0x10L", "3.25", "8M"] {
            assert_eq!(parse_number(text).ok(), parse_number(text).ok());
        }
    }
}
