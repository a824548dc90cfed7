use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use std::sync::Arc;

/// A fetch target of the form `scheme:identifier`, e.g. `github:facebook/react`.
///
/// Only the shape is checked here; each provider validates its own identifier format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    scheme: Arc<str>,
    identifier: Arc<str>,
}

impl Target {
    /// Create a target from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is empty.
    pub fn new(scheme: impl AsRef<str>, identifier: impl AsRef<str>) -> Result<Self, String> {
        let scheme = scheme.as_ref();
        let identifier = identifier.as_ref();

        if scheme.is_empty() {
            return Err(format!("invalid target '{scheme}:{identifier}': empty scheme"));
        }

        if identifier.is_empty() {
            return Err(format!("invalid target '{scheme}:{identifier}': empty identifier"));
        }

        Ok(Self {
            scheme: Arc::from(scheme),
            identifier: Arc::from(identifier),
        })
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let (scheme, identifier) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid target '{s}': expected 'scheme:identifier'"))?;

        Self::new(scheme, identifier)
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.scheme, self.identifier)
    }
}
