use std::error::Error;
use std::iter::Fuse;
use std::slice::Iter;

use parking_lot::Mutex;

use crate::{Attribute, IntoAttributes};

/// Error type returned by a failing observation callback.
pub type CallbackError = Box<dyn Error + Send + Sync>;

/// A single observed value paired with its attributes.
///
/// Observations are what callbacks yield; the observable instrument turns
/// each one into a [`Measurement`](crate::Measurement) carrying its own
/// identity during collection.
#[derive(Clone, Debug)]
pub struct Observation {
    value: f64,
    attributes: Vec<Attribute>,
}

impl Observation {
    /// Creates an [`Observation`] from a value and attributes.
    pub fn new<A: IntoAttributes>(value: f64, attributes: A) -> Self {
        Observation { value, attributes: attributes.into_attributes() }
    }

    /// The observed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Attributes of this observation, in insertion order.
    pub fn attributes(&self) -> Iter<'_, Attribute> {
        self.attributes.iter()
    }

    pub(crate) fn into_parts(self) -> (f64, Vec<Attribute>) {
        (self.value, self.attributes)
    }
}

/// Result of one pull on a registered callback.
pub(crate) enum Pull {
    /// The callback produced a batch of observations.  The batch may be
    /// empty; an empty batch does not retire the callback.
    Batch(Vec<Observation>),
    /// A step-producer has permanently run out of observations.
    Exhausted,
}

/// The canonical zero-argument pull handle every registered callback is
/// normalized into at construction time.
pub(crate) trait ObservationSource: Send + Sync {
    fn pull(&self) -> Result<Pull, CallbackError>;
}

/// A user-supplied observation callback for an observable instrument.
///
/// Two shapes are accepted:
///
/// - a plain producer, invoked fresh on every collection cycle, built with
///   [`Callback::from_fn`], and
/// - a step-producer, advanced exactly one step per collection cycle, built
///   with [`Callback::from_producer`].
///
/// Callbacks registered on one instrument are invoked in registration order
/// during collection, and a failure in one never prevents its siblings from
/// running.
pub struct Callback {
    source: Box<dyn ObservationSource>,
}

impl Callback {
    /// Creates a callback from a plain producer.
    ///
    /// The producer is invoked once per collection cycle and returns the
    /// full batch of observations for that cycle.  Returning an error skips
    /// the callback for the current cycle only; it will be invoked again on
    /// the next one.
    pub fn from_fn<F>(producer: F) -> Self
    where
        F: Fn() -> Result<Vec<Observation>, CallbackError> + Send + Sync + 'static,
    {
        Callback { source: Box::new(FnSource(producer)) }
    }

    /// Creates a callback from a step-producer.
    ///
    /// Each collection cycle advances the producer exactly one step and
    /// records that step's observations; internal state persists between
    /// cycles.  Once the producer returns `None` it is permanently
    /// exhausted: it stays registered but contributes nothing to any later
    /// cycle, silently.
    pub fn from_producer<I>(producer: I) -> Self
    where
        I: Iterator<Item = Vec<Observation>> + Send + 'static,
    {
        Callback { source: Box::new(StepSource { steps: Mutex::new(producer.fuse()) }) }
    }

    pub(crate) fn into_source(self) -> Box<dyn ObservationSource> {
        self.source
    }
}

struct FnSource<F>(F);

impl<F> ObservationSource for FnSource<F>
where
    F: Fn() -> Result<Vec<Observation>, CallbackError> + Send + Sync,
{
    fn pull(&self) -> Result<Pull, CallbackError> {
        (self.0)().map(Pull::Batch)
    }
}

/// Wraps a single step-producer.
///
/// One instance is created per registered producer, binding the producer by
/// value, so producers registered in the same batch never alias each other's
/// state.  The iterator is fused: a producer that has stopped stays stopped,
/// even if the underlying iterator could technically resume.
struct StepSource<I> {
    steps: Mutex<Fuse<I>>,
}

impl<I> ObservationSource for StepSource<I>
where
    I: Iterator<Item = Vec<Observation>> + Send,
{
    fn pull(&self) -> Result<Pull, CallbackError> {
        Ok(match self.steps.lock().next() {
            Some(batch) => Pull::Batch(batch),
            None => Pull::Exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::{Callback, Observation, Pull};

    fn batch(values: &[f64]) -> Vec<Observation> {
        values.iter().map(|v| Observation::new(*v, vec![])).collect()
    }

    #[test]
    fn plain_producer_invoked_every_pull() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let counted = invocations.clone();
        let source = Callback::from_fn(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(batch(&[1.0]))
        })
        .into_source();

        for _ in 0..3 {
            match source.pull() {
                Ok(Pull::Batch(batch)) => assert_eq!(batch.len(), 1),
                _ => panic!("plain producer should always yield a batch"),
            }
        }
        assert_eq!(invocations.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn step_producer_advances_then_exhausts() {
        let source =
            Callback::from_producer(vec![batch(&[1.0]), batch(&[2.0, 3.0])].into_iter())
                .into_source();

        match source.pull() {
            Ok(Pull::Batch(batch)) => assert_eq!(batch.len(), 1),
            _ => panic!("first step should yield one observation"),
        }
        match source.pull() {
            Ok(Pull::Batch(batch)) => assert_eq!(batch.len(), 2),
            _ => panic!("second step should yield two observations"),
        }
        // Exhaustion is permanent.
        for _ in 0..2 {
            assert!(matches!(source.pull(), Ok(Pull::Exhausted)));
        }
    }

    #[test]
    fn empty_batch_is_not_exhaustion() {
        let source = Callback::from_fn(|| Ok(Vec::new())).into_source();

        for _ in 0..2 {
            match source.pull() {
                Ok(Pull::Batch(batch)) => assert!(batch.is_empty()),
                _ => panic!("an empty batch must not read as exhaustion"),
            }
        }
    }

    #[test]
    fn producers_registered_together_do_not_alias() {
        // Two step-producers normalized in the same batch advance
        // independently.
        let callbacks = vec![
            Callback::from_producer(vec![batch(&[1.0]), batch(&[2.0])].into_iter()),
            Callback::from_producer(vec![batch(&[10.0]), batch(&[20.0])].into_iter()),
        ];
        let sources: Vec<_> = callbacks.into_iter().map(Callback::into_source).collect();

        let first = match sources[0].pull() {
            Ok(Pull::Batch(batch)) => batch[0].value(),
            _ => panic!("expected a batch"),
        };
        let second = match sources[1].pull() {
            Ok(Pull::Batch(batch)) => batch[0].value(),
            _ => panic!("expected a batch"),
        };
        assert_eq!(first, 1.0);
        assert_eq!(second, 10.0);
    }
}
