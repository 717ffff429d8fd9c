//! Forwarding chain assembly.

use crate::net::Address;

/// Ordered address claims from the forwarding header(s).
///
/// Index 0 is the oldest, client-asserted entry; the last entry was appended
/// by the most recent hop. Unparseable tokens never make it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardChain {
    entries: Vec<Address>,
}

impl ForwardChain {
    pub fn new(entries: Vec<Address>) -> Self {
        Self { entries }
    }

    /// Build a chain from raw header-line values, in the order received.
    ///
    /// Each line is a comma separated token list; multiple lines are treated as
    /// one concatenated list.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for value in values {
            for token in value.as_ref().split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                match Address::parse(token) {
                    Ok(addr) => entries.push(addr),
                    Err(e) => tracing::trace!(token = %token, error = %e, "Dropping forwarded token"),
                }
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Address> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.entries
    }
}

impl FromIterator<Address> for ForwardChain {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ForwardChain {
    type Item = &'a Address;
    type IntoIter = std::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
