//! Path templates (`/user/:id/msg/:mid`)

use crate::foundation::constants::{PATH_SEPARATOR, VARIABLE_PREFIX};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the input segment exactly
    Literal(String),
    /// Binds any input segment under its name
    Variable(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(VARIABLE_PREFIX) {
            Some(name) if !name.is_empty() => Segment::Variable(name.to_string()),
            _ => Segment::Literal(raw.to_string()),
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Segment::Variable(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(s) => f.write_str(s),
            Segment::Variable(name) => write!(f, "{}{}", VARIABLE_PREFIX, name),
        }
    }
}

/// Ordered segments of one declared route key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteTemplate {
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parse a route key. One leading and one trailing separator are
    /// stripped; an empty key is the index template with no segments.
    pub fn parse(key: &str) -> Self {
        let key = key.strip_prefix(PATH_SEPARATOR).unwrap_or(key);
        let key = key.strip_suffix(PATH_SEPARATOR).unwrap_or(key);

        if key.is_empty() {
            return Self::default();
        }

        Self {
            segments: key.split(PATH_SEPARATOR).map(Segment::parse).collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names of the variable segments, in order
    pub fn variable_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
