// Value objects wrapping the primitives the API deals in. Every type here
// is immutable and can only be obtained through a validating factory: the
// inner field is private, so code outside this module cannot build an
// instance that skipped its checks.

use std::fmt;

use crate::error::{Error, Result};

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

fn validate_name(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.len() > 100 {
        return Err(Error::validation(
            field,
            format!("length must be 1-100, got {}", value.len()),
        ));
    }
    if !is_printable_ascii(value) {
        return Err(Error::validation(
            field,
            format!("must be printable ASCII, got {value:?}"),
        ));
    }
    Ok(())
}

macro_rules! name_value_object {
    ($(#[$doc:meta])* $name:ident, $field:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                validate_name($field, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_value_object!(
    /// Name of a group project. Printable ASCII, 1-100 chars.
    GroupName,
    "group name"
);
name_value_object!(
    /// Title of a topic. Printable ASCII, 1-100 chars.
    TopicTitle,
    "topic title"
);
name_value_object!(
    /// Title of a goal. Printable ASCII, 1-100 chars.
    GoalTitle,
    "goal title"
);

/// Free-form goal description, up to 400 chars. Empty is fine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalDescription(String);

impl GoalDescription {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > 400 {
            return Err(Error::validation(
                "description",
                format!("length must be at most 400, got {}", value.len()),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A URL-ish reference to a deliverable. Up to 200 chars, empty allowed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Link(String);

impl Link {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > 200 {
            return Err(Error::validation(
                "link",
                format!("length must be at most 200, got {}", value.len()),
            ));
        }
        Ok(Self(value))
    }

    pub fn empty() -> Self {
        Link(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Goal weight on the 1-5 scale. Only `create` and `parse` can build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(i64);

impl Points {
    pub fn create(value: i64) -> Result<Self> {
        if !(1..=5).contains(&value) {
            return Err(Error::validation(
                "points",
                format!("must be between 1 and 5, got {value}"),
            ));
        }
        Ok(Points(value))
    }

    /// Accepts exactly one decimal digit in `1..=5`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.as_bytes() {
            [d @ b'1'..=b'5'] => Points::create(i64::from(d - b'0')),
            _ => Err(Error::validation(
                "points",
                format!("must be a single digit 1-5, got {value:?}"),
            )),
        }
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
