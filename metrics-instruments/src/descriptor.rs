use std::sync::Arc;

use thiserror::Error;

use crate::{InstrumentKind, InstrumentationScope, SharedString, SignPolicy};

/// Longest name or unit an instrument will accept, in bytes.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Errors that can occur while constructing an instrument.
///
/// This is the only failure in the crate that propagates to the caller:
/// everything that can go wrong after construction is recovered locally so
/// that instrumentation can never crash the instrumented application.
#[derive(Debug, Error)]
pub enum InvalidInstrument {
    /// The instrument name did not pass validation.
    #[error("invalid instrument name `{0}`: expected an ASCII string of at most 63 characters, starting with a letter and containing only alphanumerics, '_', '.', '-' and '/'")]
    Name(String),

    /// The instrument unit did not pass validation.
    #[error("invalid instrument unit `{0}`: expected an ASCII string of at most 63 characters")]
    Unit(String),
}

/// Checks a candidate instrument name.
///
/// Names must be non-empty ASCII of at most 63 bytes, start with a letter,
/// and contain only alphanumerics, `_`, `.`, `-` and `/`.
fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN || !name.is_ascii() {
        return false;
    }

    let mut bytes = name.bytes();
    if !bytes.next().is_some_and(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'/'))
}

/// Checks a candidate instrument unit.
///
/// Units must be ASCII of at most 63 bytes, and may be empty.
fn is_valid_unit(unit: &str) -> bool {
    unit.len() <= MAX_IDENTIFIER_LEN && unit.is_ascii()
}

/// Identity of an instrument: name, unit, description, kind and owning scope.
///
/// A descriptor is validated and frozen when the instrument is constructed.
/// Every measurement the instrument produces afterwards carries a shared
/// reference to its descriptor, which is how consumers attribute data points
/// back to the handle that recorded them.
#[derive(Clone, Debug)]
pub struct Descriptor {
    name: SharedString,
    unit: SharedString,
    description: SharedString,
    kind: InstrumentKind,
    scope: Arc<InstrumentationScope>,
}

impl Descriptor {
    /// Creates a validated descriptor.
    ///
    /// Both the name and the unit are checked before any field is stored.
    /// On success the name is stored lower-cased; the unit and description
    /// are stored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInstrument`] carrying the offending string if the
    /// name or unit fails validation.
    pub fn new(
        name: impl Into<SharedString>,
        unit: impl Into<SharedString>,
        description: impl Into<SharedString>,
        kind: InstrumentKind,
        scope: Arc<InstrumentationScope>,
    ) -> Result<Self, InvalidInstrument> {
        let name = name.into();
        let unit = unit.into();

        let name_valid = is_valid_name(&name);
        let unit_valid = is_valid_unit(&unit);
        if !name_valid {
            return Err(InvalidInstrument::Name(name.into_owned()));
        }
        if !unit_valid {
            return Err(InvalidInstrument::Unit(unit.into_owned()));
        }

        let name = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            SharedString::from(name.to_lowercase())
        } else {
            name
        };

        Ok(Descriptor { name, unit, description: description.into(), kind, scope })
    }

    /// Name of the instrument, lower-cased.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Unit of the instrument.  May be empty.
    pub fn unit(&self) -> &str {
        self.unit.as_ref()
    }

    /// Free-text description of the instrument.  May be empty.
    pub fn description(&self) -> &str {
        self.description.as_ref()
    }

    /// Kind of the instrument.
    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// Scope of the meter that created the instrument.
    pub fn scope(&self) -> &InstrumentationScope {
        &self.scope
    }

    /// Sign policy applied to amounts recorded against this instrument.
    pub fn sign_policy(&self) -> SignPolicy {
        self.kind.sign_policy()
    }
}
