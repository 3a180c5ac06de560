use crate::SharedString;

/// Identity of the instrumentation library that owns an instrument.
///
/// Every instrument holds a shared reference to the scope of the meter that
/// created it.  The scope is opaque to the instrument layer: it is carried on
/// each instrument for downstream attribution and never consulted while
/// recording.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstrumentationScope {
    name: SharedString,
    version: Option<SharedString>,
    schema_url: Option<SharedString>,
}

impl InstrumentationScope {
    /// Constructs a new [`InstrumentationScope`].
    pub fn new(
        name: impl Into<SharedString>,
        version: Option<SharedString>,
        schema_url: Option<SharedString>,
    ) -> Self {
        Self { name: name.into(), version, schema_url }
    }

    /// Name of the owning instrumentation library.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Version of the owning instrumentation library, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Schema URL the scope conforms to, if any.
    pub fn schema_url(&self) -> Option<&str> {
        self.schema_url.as_deref()
    }
}
