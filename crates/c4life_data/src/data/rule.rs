use super::pattern::{Pattern, ORBIT_COUNT, PATTERN_COUNT, RULE_HEX_LEN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const HIGH_BITS: usize = ORBIT_COUNT - 128;
const HIGH_MASK: u16 = (1 << HIGH_BITS) - 1;

/// Failure to parse a rule hex string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFormatError {
    #[error("rule hex must be exactly {expected} characters, found {found}")]
    Length { expected: usize, found: usize },

    #[error("rule hex contains non-hexadecimal characters: {0:?}")]
    InvalidDigit(String),
}

/// A 140-bit rule indexed by orbit id.
///
/// Bits 0..64 live in `low`, 64..128 in `mid` and 128..140 in the low twelve
/// bits of `high`. The canonical text form is `{high:03x}{mid:016x}{low:016x}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OrbitRule {
    low: u64,
    mid: u64,
    high: u16,
}

impl OrbitRule {
    /// The rule mapping every orbit to dead.
    pub fn zeros() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, orbit: usize) -> bool {
        debug_assert!(orbit < ORBIT_COUNT);
        match orbit {
            0..=63 => (self.low >> orbit) & 1 == 1,
            64..=127 => (self.mid >> (orbit - 64)) & 1 == 1,
            _ => (self.high >> (orbit - 128)) & 1 == 1,
        }
    }

    #[inline]
    pub fn set(&mut self, orbit: usize, alive: bool) {
        debug_assert!(orbit < ORBIT_COUNT);
        let (word, bit) = match orbit {
            0..=63 => (&mut self.low, orbit),
            64..=127 => (&mut self.mid, orbit - 64),
            _ => {
                let bit = orbit - 128;
                if alive {
                    self.high |= 1 << bit;
                } else {
                    self.high &= !(1 << bit);
                }
                return;
            }
        };
        if alive {
            *word |= 1 << bit;
        } else {
            *word &= !(1 << bit);
        }
    }

    pub fn flip(&mut self, orbit: usize) {
        let current = self.get(orbit);
        self.set(orbit, !current);
    }

    /// Number of orbits mapped to alive.
    pub fn count_ones(&self) -> u32 {
        self.low.count_ones() + self.mid.count_ones() + self.high.count_ones()
    }

    /// Bits in orbit-id order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..ORBIT_COUNT).map(move |i| self.get(i))
    }

    pub fn to_hex(&self) -> String {
        format!("{:03x}{:016x}{:016x}", self.high, self.mid, self.low)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, RuleFormatError> {
        let found = hex_str.chars().count();
        if found != RULE_HEX_LEN {
            return Err(RuleFormatError::Length {
                expected: RULE_HEX_LEN,
                found,
            });
        }
        if !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RuleFormatError::InvalidDigit(hex_str.to_string()));
        }
        let parse = |s: &str| {
            u64::from_str_radix(s, 16).map_err(|_| RuleFormatError::InvalidDigit(s.to_string()))
        };
        let high = parse(&hex_str[..3])? as u16;
        let mid = parse(&hex_str[3..19])?;
        let low = parse(&hex_str[19..])?;
        Ok(Self {
            low,
            mid,
            high: high & HIGH_MASK,
        })
    }
}

impl std::fmt::Display for OrbitRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for OrbitRule {
    type Err = RuleFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<OrbitRule> for String {
    fn from(rule: OrbitRule) -> Self {
        rule.to_hex()
    }
}

impl TryFrom<String> for OrbitRule {
    type Error = RuleFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

/// A rule expanded to one output bit per neighbourhood.
#[derive(Clone, PartialEq, Eq)]
pub struct FullRule {
    table: [bool; PATTERN_COUNT],
}

impl FullRule {
    pub fn from_table(table: [bool; PATTERN_COUNT]) -> Self {
        Self { table }
    }

    #[inline(always)]
    pub fn apply(&self, pattern: Pattern) -> bool {
        self.table[pattern as usize & (PATTERN_COUNT - 1)]
    }

    pub fn table(&self) -> &[bool; PATTERN_COUNT] {
        &self.table
    }

    /// Fraction of neighbourhoods that produce a live cell.
    pub fn lambda(&self) -> f64 {
        self.table.iter().filter(|&&b| b).count() as f64 / PATTERN_COUNT as f64
    }
}

impl std::fmt::Debug for FullRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullRule")
            .field("lambda", &self.lambda())
            .finish()
    }
}
