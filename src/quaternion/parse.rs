//! Text front end for integral quaternions
//!
//! Accepted forms (whitespace is ignored everywhere):
//!
//! - signed terms over `i`, `j`, `k`: `23+2i+4j+6k`, `-i+3k`, `2 - j + 3j`
//!   (repeated units are summed, a missing coefficient means 1)
//! - four comma-separated integers: `23,2,4,6`
//!
//! `parse_quaternion(&format_quaternion(q)) == q` for every quaternion.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::Quaternion;
use crate::error::{EngineError, EngineResult};

const UNITS: [&str; 4] = ["", "i", "j", "k"];

/// Parse an integral quaternion
pub fn parse_quaternion(text: &str) -> EngineResult<Quaternion> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(EngineError::parse(text, "empty input"));
    }

    if compact.contains(',') {
        parse_tuple(text, &compact)
    } else {
        parse_terms(text, &compact)
    }
}

/// Format as `a+bi+cj+dk`, omitting zero terms and unit coefficients
pub fn format_quaternion(q: &Quaternion) -> String {
    let mut out = String::new();

    for (value, unit) in q.coords().into_iter().zip(UNITS) {
        if value.is_zero() {
            continue;
        }
        if value.is_negative() {
            out.push('-');
        } else if !out.is_empty() {
            out.push('+');
        }
        let magnitude = value.magnitude();
        if unit.is_empty() || !magnitude.is_one() {
            out.push_str(&magnitude.to_string());
        }
        out.push_str(unit);
    }

    if out.is_empty() {
        out.push('0');
    }
    out
}

fn parse_tuple(input: &str, compact: &str) -> EngineResult<Quaternion> {
    let parts: Vec<&str> = compact.split(',').collect();
    if parts.len() != 4 {
        return Err(EngineError::parse(
            input,
            format!("expected 4 comma-separated integers, found {}", parts.len()),
        ));
    }

    let mut coords: [BigInt; 4] = Default::default();
    for (slot, part) in coords.iter_mut().zip(parts) {
        *slot = parse_integer(input, part)?;
    }
    Ok(Quaternion::from_coords(coords))
}

fn parse_integer(input: &str, token: &str) -> EngineResult<BigInt> {
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let magnitude = parse_digits(digits)
        .ok_or_else(|| EngineError::parse(input, format!("{token:?} is not an integer")))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_digits(digits: &str) -> Option<BigInt> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigInt::parse_bytes(digits.as_bytes(), 10)
}

fn parse_terms(input: &str, compact: &str) -> EngineResult<Quaternion> {
    let bytes = compact.as_bytes();
    let mut coords: [BigInt; 4] = Default::default();
    let mut pos = 0;

    while pos < bytes.len() {
        let negative = match bytes[pos] {
            b'+' => {
                pos += 1;
                false
            }
            b'-' => {
                pos += 1;
                true
            }
            _ if pos == 0 => false,
            _ => return Err(unexpected(input, compact, pos)),
        };

        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let digits = &compact[start..pos];

        let slot = match bytes.get(pos) {
            Some(b'i') => 1,
            Some(b'j') => 2,
            Some(b'k') => 3,
            _ => 0,
        };
        if slot != 0 {
            pos += 1;
        }

        if digits.is_empty() && slot == 0 {
            return Err(if pos < bytes.len() {
                unexpected(input, compact, pos)
            } else {
                EngineError::parse(input, "sign without a term")
            });
        }

        let magnitude = if digits.is_empty() {
            BigInt::one()
        } else {
            parse_digits(digits)
                .ok_or_else(|| EngineError::parse(input, format!("{digits:?} is not an integer")))?
        };

        if negative {
            coords[slot] -= magnitude;
        } else {
            coords[slot] += magnitude;
        }
    }

    Ok(Quaternion::from_coords(coords))
}

fn unexpected(input: &str, compact: &str, pos: usize) -> EngineError {
    match compact[pos..].chars().next() {
        Some(ch) => EngineError::parse(input, format!("unexpected character {ch:?}")),
        None => EngineError::parse(input, "unexpected end of input"),
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_quaternion(self))
    }
}

impl FromStr for Quaternion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quaternion(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term_form() {
        assert_eq!(parse_quaternion("23+2i+4j+6k").unwrap(), Quaternion::new(23, 2, 4, 6));
        assert_eq!(parse_quaternion("-i+3k").unwrap(), Quaternion::new(0, -1, 0, 3));
        assert_eq!(parse_quaternion(" 8 + i ").unwrap(), Quaternion::new(8, 1, 0, 0));
        assert_eq!(parse_quaternion("k-7").unwrap(), Quaternion::new(-7, 0, 0, 1));
    }

    #[test]
    fn test_parse_sums_repeated_terms() {
        assert_eq!(parse_quaternion("2 - j + 3j").unwrap(), Quaternion::new(2, 0, 2, 0));
        assert_eq!(parse_quaternion("1+1+i-i").unwrap(), Quaternion::new(2, 0, 0, 0));
    }

    #[test]
    fn test_parse_tuple_form() {
        assert_eq!(parse_quaternion("23,2,4,6").unwrap(), Quaternion::new(23, 2, 4, 6));
        assert_eq!(parse_quaternion("-1, +2, 0, -3").unwrap(), Quaternion::new(-1, 2, 0, -3));
    }

    #[test]
    fn test_parse_big_coordinates() {
        let q = parse_quaternion("123456789012345678901234567890+i").unwrap();
        assert_eq!(q.a.to_string(), "123456789012345678901234567890");
        assert_eq!(q.b, BigInt::one());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for bad in ["", "   ", "1.5+i", "2i3", "3+", "--1", "1,2,3", "1,2,x,4", "q", "2*i"] {
            assert!(
                matches!(parse_quaternion(bad), Err(EngineError::Parse { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format_quaternion(&Quaternion::new(23, 2, 4, 6)), "23+2i+4j+6k");
        assert_eq!(format_quaternion(&Quaternion::new(0, -1, 0, 3)), "-i+3k");
        assert_eq!(format_quaternion(&Quaternion::new(-1, 1, -1, 0)), "-1+i-j");
        assert_eq!(format_quaternion(&Quaternion::zero()), "0");
        assert_eq!(Quaternion::new(8, 1, 0, 0).to_string(), "8+i");
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        let samples = [
            Quaternion::new(23, 2, 4, 6),
            Quaternion::new(0, -1, 0, 3),
            Quaternion::new(-5, 0, -1, 1),
            Quaternion::new(1, 1, 1, 1),
            Quaternion::zero(),
            Quaternion::scalar(BigInt::from(1u64 << 62) * BigInt::from(1u64 << 62)),
        ];
        for q in samples {
            let text = format_quaternion(&q);
            assert_eq!(text.parse::<Quaternion>().unwrap(), q, "round trip of {text}");
        }
    }
}
