use std::borrow::Cow;

/// An allocation-optimized string.
///
/// Instrument names, units and descriptions are almost always static string
/// literals, but owned strings show up whenever identity is computed at
/// runtime (for example, lower-casing a mixed-case name).  `SharedString`
/// lets both flow through the same fields without forcing an allocation for
/// the static case.
pub type SharedString = Cow<'static, str>;

/// The kind of an instrument.
///
/// Fixed when the instrument is constructed; it never changes afterwards.
/// The kind determines which recording style the instrument uses and which
/// sign policy applies to recorded amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    /// A monotonically increasing sum, recorded synchronously.
    Counter,
    /// A sum that can increase and decrease, recorded synchronously.
    UpDownCounter,
    /// A distribution sample, recorded synchronously.
    Histogram,
    /// A monotonically increasing sum, pulled once per collection cycle.
    ObservableCounter,
    /// A bidirectional sum, pulled once per collection cycle.
    ObservableUpDownCounter,
    /// A point-in-time value, pulled once per collection cycle.
    ObservableGauge,
}

/// Whether an instrument accepts negative amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignPolicy {
    /// Negative amounts are discarded with a warning instead of recorded.
    NonNegative,
    /// Any amount is recorded, positive, negative or zero.
    Any,
}

impl InstrumentKind {
    /// Gets the sign policy for amounts recorded against this kind.
    ///
    /// The policy is only enforced on the synchronous recording path; the
    /// observable kinds carry their nominal policy but the pull path
    /// forwards observed values untouched.
    pub fn sign_policy(self) -> SignPolicy {
        match self {
            InstrumentKind::Counter => SignPolicy::NonNegative,
            InstrumentKind::UpDownCounter => SignPolicy::Any,
            InstrumentKind::Histogram => SignPolicy::NonNegative,
            InstrumentKind::ObservableCounter => SignPolicy::NonNegative,
            InstrumentKind::ObservableUpDownCounter => SignPolicy::Any,
            InstrumentKind::ObservableGauge => SignPolicy::Any,
        }
    }

    /// Gets the string form of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentKind::Counter => "counter",
            InstrumentKind::UpDownCounter => "up_down_counter",
            InstrumentKind::Histogram => "histogram",
            InstrumentKind::ObservableCounter => "observable_counter",
            InstrumentKind::ObservableUpDownCounter => "observable_up_down_counter",
            InstrumentKind::ObservableGauge => "observable_gauge",
        }
    }

    /// Whether this kind is pulled by a collection cycle rather than being
    /// recorded directly by caller code.
    pub fn is_observable(self) -> bool {
        matches!(
            self,
            InstrumentKind::ObservableCounter
                | InstrumentKind::ObservableUpDownCounter
                | InstrumentKind::ObservableGauge
        )
    }
}
