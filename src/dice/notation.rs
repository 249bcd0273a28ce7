//! Dice notation (`NdM`, `NdM+K`, `NdM-K`, `dM`)
//!
//! Parsed with nom. Whitespace is ignored and the `d` is case-insensitive,
//! so `"2D6 + 3"` and `"2d6+3"` are the same notation.

use std::fmt;
use std::str::FromStr;

use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res, opt};
use nom::sequence::preceded;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};

/// Upper bound on dice per roll, keeps a typo like "1000d6" from allocating
pub const MAX_DICE_PER_ROLL: u32 = 100;

/// Largest die accepted
pub const MAX_DIE_SIDES: u32 = 1000;

/// Largest flat modifier accepted, either sign
pub const MAX_MODIFIER: i32 = 1000;

/// N dice of M sides plus a flat modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceNotation {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceNotation {
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parse notation such as "2d6+3"
    pub fn parse(text: &str) -> Result<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        let notation = match all_consuming(notation).parse(compact.as_str()) {
            Ok((_, notation)) => notation,
            Err(e) => {
                return Err(SkirmishError::NotationError(format!("{:?}: {}", text, e)));
            }
        };

        if notation.count == 0 || notation.sides == 0 {
            return Err(SkirmishError::NotationError(format!(
                "{:?}: needs at least one die with at least one side",
                text
            )));
        }
        if notation.count > MAX_DICE_PER_ROLL {
            return Err(SkirmishError::NotationError(format!(
                "{:?}: at most {} dice per roll",
                text, MAX_DICE_PER_ROLL
            )));
        }
        if notation.sides > MAX_DIE_SIDES {
            return Err(SkirmishError::NotationError(format!(
                "{:?}: at most {} sides per die",
                text, MAX_DIE_SIDES
            )));
        }
        if notation.modifier.unsigned_abs() > MAX_MODIFIER as u32 {
            return Err(SkirmishError::NotationError(format!(
                "{:?}: modifier must stay within +/-{}",
                text, MAX_MODIFIER
            )));
        }

        Ok(notation)
    }

    /// Smallest possible total
    pub fn min_total(&self) -> i32 {
        clamp_total(self.count as i64 + self.modifier as i64)
    }

    /// Largest possible total
    pub fn max_total(&self) -> i32 {
        clamp_total(self.count as i64 * self.sides as i64 + self.modifier as i64)
    }
}

/// Saturate a widened total back into i32
pub(crate) fn clamp_total(total: i64) -> i32 {
    total.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

impl FromStr for DiceNotation {
    type Err = SkirmishError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DiceNotation {
    type Error = SkirmishError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DiceNotation> for String {
    fn from(value: DiceNotation) -> Self {
        value.to_string()
    }
}

fn unsigned(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>).parse(input)
}

fn modifier(input: &str) -> IResult<&str, i32> {
    let (input, sign) = alt((char('+'), char('-'))).parse(input)?;
    let (input, value) = map_res(digit1, str::parse::<i32>).parse(input)?;
    Ok((input, if sign == '-' { -value } else { value }))
}

fn notation(input: &str) -> IResult<&str, DiceNotation> {
    let (input, count) = opt(unsigned).parse(input)?;
    let (input, sides) = preceded(tag_no_case("d"), unsigned).parse(input)?;
    let (input, modifier) = opt(modifier).parse(input)?;
    Ok((
        input,
        DiceNotation::new(count.unwrap_or(1), sides, modifier.unwrap_or(0)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(DiceNotation::parse("3d8").unwrap(), DiceNotation::new(3, 8, 0));
    }

    #[test]
    fn test_parse_with_modifier() {
        assert_eq!(DiceNotation::parse("1d6+2").unwrap(), DiceNotation::new(1, 6, 2));
        assert_eq!(DiceNotation::parse("2d4-1").unwrap(), DiceNotation::new(2, 4, -1));
    }

    #[test]
    fn test_parse_implicit_count_and_whitespace() {
        assert_eq!(DiceNotation::parse("d20").unwrap(), DiceNotation::new(1, 20, 0));
        assert_eq!(DiceNotation::parse(" 2D6 + 3 ").unwrap(), DiceNotation::new(2, 6, 3));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DiceNotation::parse("").is_err());
        assert!(DiceNotation::parse("0").is_err());
        assert!(DiceNotation::parse("2d").is_err());
        assert!(DiceNotation::parse("2d6+").is_err());
        assert!(DiceNotation::parse("2d6x").is_err());
        assert!(DiceNotation::parse("0d6").is_err());
        assert!(DiceNotation::parse("2d0").is_err());
        assert!(DiceNotation::parse("1000d6").is_err());
    }

    #[test]
    fn test_parse_rejects_oversized_dice_and_modifiers() {
        assert!(DiceNotation::parse("1d6+2147483647").is_err());
        assert!(DiceNotation::parse("1d6-5000").is_err());
        assert!(DiceNotation::parse("100d4294967295").is_err());
        assert!(DiceNotation::parse("1d1001").is_err());
        // digits past u32/i32 fail in the parser itself
        assert!(DiceNotation::parse("1d99999999999").is_err());
        assert!(DiceNotation::parse("1d6+99999999999").is_err());

        assert_eq!(
            DiceNotation::parse("100d1000+1000").unwrap(),
            DiceNotation::new(100, 1000, 1000)
        );
        assert_eq!(DiceNotation::parse("1d4-1000").unwrap().modifier, -1000);
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(DiceNotation::parse("2D6 + 3").unwrap().to_string(), "2d6+3");
        assert_eq!(DiceNotation::new(2, 4, -1).to_string(), "2d4-1");
        assert_eq!(DiceNotation::new(1, 20, 0).to_string(), "1d20");
    }

    #[test]
    fn test_totals() {
        let n = DiceNotation::new(1, 4, 3);
        assert_eq!(n.min_total(), 4);
        assert_eq!(n.max_total(), 7);

        // built directly, bypassing the parser's caps
        let huge = DiceNotation::new(u32::MAX, u32::MAX, i32::MAX);
        assert_eq!(huge.max_total(), i32::MAX);
        assert_eq!(DiceNotation::new(1, 6, i32::MIN).min_total(), i32::MIN + 1);
    }

    #[test]
    fn test_serde_as_string() {
        let n: DiceNotation = serde_json::from_str("\"1d4+3\"").unwrap();
        assert_eq!(n, DiceNotation::new(1, 4, 3));
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"1d4+3\"");
        assert!(serde_json::from_str::<DiceNotation>("\"banana\"").is_err());
    }
}
