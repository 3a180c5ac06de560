use crate::SharedString;

/// A key/value pair attached to a measurement.
///
/// Measurements are always defined by their instrument and value, but can
/// optionally carry "attributes", key/value pairs that describe the context
/// in which the measurement was taken.  Attributes are used downstream for
/// grouping: a counter tracking served requests might attach the HTTP method
/// and status code of each request so they can be aggregated separately.
#[derive(PartialEq, Clone, Debug)]
pub struct Attribute(pub(crate) SharedString, pub(crate) AttributeValue);

/// A primitive attribute value.
#[derive(PartialEq, Clone, Debug)]
pub enum AttributeValue {
    /// A string value.
    Str(SharedString),
    /// A boolean value.
    Bool(bool),
    /// A signed integer value.
    I64(i64),
    /// A floating-point value.
    F64(f64),
}

impl Attribute {
    /// Creates an [`Attribute`] from a key and value.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<SharedString>,
        V: Into<AttributeValue>,
    {
        Attribute(key.into(), value.into())
    }

    /// Key of this attribute.
    pub fn key(&self) -> &str {
        self.0.as_ref()
    }

    /// Value of this attribute.
    pub fn value(&self) -> &AttributeValue {
        &self.1
    }

    /// Consumes this [`Attribute`], returning the key and value.
    pub fn into_parts(self) -> (SharedString, AttributeValue) {
        (self.0, self.1)
    }
}

impl From<&'static str> for AttributeValue {
    fn from(value: &'static str) -> AttributeValue {
        AttributeValue::Str(value.into())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> AttributeValue {
        AttributeValue::Str(value.into())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> AttributeValue {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> AttributeValue {
        AttributeValue::I64(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> AttributeValue {
        AttributeValue::F64(value)
    }
}

impl<K, V> From<&(K, V)> for Attribute
where
    K: Into<SharedString> + Clone,
    V: Into<AttributeValue> + Clone,
{
    fn from(pair: &(K, V)) -> Attribute {
        Attribute::new(pair.0.clone(), pair.1.clone())
    }
}

/// A value that can be converted to [`Attribute`]s.
///
/// Insertion order is preserved, both through conversion and all the way to
/// the consumer.
pub trait IntoAttributes {
    /// Consumes this value, turning it into a vector of [`Attribute`]s.
    fn into_attributes(self) -> Vec<Attribute>;
}

impl IntoAttributes for Vec<Attribute> {
    fn into_attributes(self) -> Vec<Attribute> {
        self
    }
}

impl<T, A> IntoAttributes for &T
where
    Self: IntoIterator<Item = A>,
    A: Into<Attribute>,
{
    fn into_attributes(self) -> Vec<Attribute> {
        self.into_iter().map(|a| a.into()).collect()
    }
}
