//! Bank identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KiwiError, KiwiResult};

/// Explicit identifier of a bank, e.g. `bnz`.
///
/// Records carry no bank field of their own; the id travels alongside the
/// record through every store and pipeline call.
///
/// # Example
///
/// ```rust
/// use kiwi_core::types::BankId;
///
/// let bank = BankId::new("BNZ").unwrap();
/// assert_eq!(bank.as_str(), "bnz");
/// assert_eq!(bank.display_name(), "BNZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BankId(String);

impl BankId {
    /// Creates a bank id, lower-casing the input.
    ///
    /// Only ASCII letters, digits, `-` and `_` are accepted since the id is
    /// also used to name the bank's record file.
    pub fn new(id: impl AsRef<str>) -> KiwiResult<Self> {
        let id = id.as_ref().trim().to_ascii_lowercase();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(KiwiError::InvalidBankId(id));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the human-facing name (`bnz` -> `BNZ`).
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BankId {
    type Err = KiwiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BankId {
    type Error = KiwiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BankId> for String {
    fn from(id: BankId) -> Self {
        id.0
    }
}

impl AsRef<str> for BankId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
