//! Tool requirements installed into a task environment.

use std::fmt;

/// A package to install: name, optional extras, optional version constraint.
///
/// Renders the way the package installer expects, e.g. `coverage[toml]` or
/// `ruff>=0.5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Distribution name.
    pub name: String,
    /// Extras inside the square brackets.
    pub extras: Vec<String>,
    /// Version constraint such as `>=0.5`, if any.
    pub constraint: Option<String>,
}

impl Requirement {
    /// A requirement on any version of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), extras: Vec::new(), constraint: None }
    }

    /// Adds an extra.
    #[must_use]
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extras.push(extra.into());
        self
    }

    /// Sets the version constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(constraint) = &self.constraint {
            f.write_str(constraint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_extras_and_constraint() {
        let req = Requirement::new("coverage").with_extra("toml").with_constraint(">=7");
        assert_eq!(req.to_string(), "coverage[toml]>=7");
        assert_eq!(Requirement::new("sphinx-rtd-theme").to_string(), "sphinx-rtd-theme");
    }

    #[test]
    fn extras_are_comma_joined() {
        let req = Requirement::new("uvicorn").with_extra("standard").with_extra("watch");
        assert_eq!(req.to_string(), "uvicorn[standard,watch]");
    }
}
