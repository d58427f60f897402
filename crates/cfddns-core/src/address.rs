//! Public address and its record family

use std::fmt;

/// DNS record family an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordFamily {
    /// IPv4 (`A` record)
    A,
    /// IPv6 (`AAAA` record)
    Aaaa,
}

impl RecordFamily {
    /// Classify an address by the presence of a colon.
    ///
    /// This is a heuristic, not address validation: anything with a `:` is
    /// treated as IPv6.
    pub fn classify(address: &str) -> Self {
        if address.contains(':') {
            Self::Aaaa
        } else {
            Self::A
        }
    }

    /// Record type as the provider spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
        }
    }

    /// Whether a provider record type string names this family
    pub fn matches(&self, record_type: &str) -> bool {
        record_type.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for RecordFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller's public address as reported by the echo endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    value: String,
    family: RecordFamily,
}

impl Address {
    /// Build an address from echo endpoint text.
    ///
    /// Returns `None` when nothing but whitespace is left after trimming.
    pub fn parse(text: &str) -> Option<Self> {
        let value = text.trim();
        if value.is_empty() {
            return None;
        }

        Some(Self {
            value: value.to_string(),
            family: RecordFamily::classify(value),
        })
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Family derived from the address text
    pub fn family(&self) -> RecordFamily {
        self.family
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
