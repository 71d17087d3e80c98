use std::borrow::Cow;
use std::collections::HashMap;

/// The value carried by an incoming request cookie.
///
/// Most cookies hold a plain string, but values can also arrive as nested
/// structures when the client used bracketed names (`cart[]=tea; cart[]=rusks`
/// becomes a list, `prefs[theme]=dark` a map). The jar stores whatever
/// structure the transport handed it and returns it unchanged: nothing is
/// flattened or re-encoded on the read path.
///
/// # Example
///
/// ```rust
/// use biscottiera::RequestValue;
///
/// let value = RequestValue::from("dark");
/// assert_eq!(value.as_str(), Some("dark"));
/// assert!(value.as_list().is_none());
/// assert!(value.as_map().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RequestValue<'c> {
    /// A plain string value.
    Scalar(Cow<'c, str>),
    /// An ordered sequence of values, built from `name[]=...` pairs.
    List(Vec<RequestValue<'c>>),
    /// A string-keyed mapping, built from `name[key]=...` pairs.
    Map(HashMap<Cow<'c, str>, RequestValue<'c>>),
}

impl<'c> RequestValue<'c> {
    /// Returns the underlying string if the value is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequestValue::Scalar(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    /// Returns the underlying sequence if the value is a list.
    pub fn as_list(&self) -> Option<&[RequestValue<'c>]> {
        match self {
            RequestValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the underlying mapping if the value is a map.
    pub fn as_map(&self) -> Option<&HashMap<Cow<'c, str>, RequestValue<'c>>> {
        match self {
            RequestValue::Map(values) => Some(values),
            _ => None,
        }
    }

    /// Converts the value into an owned one, cloning borrowed data where
    /// necessary.
    pub fn into_owned(self) -> RequestValue<'static> {
        match self {
            RequestValue::Scalar(value) => RequestValue::Scalar(Cow::Owned(value.into_owned())),
            RequestValue::List(values) => {
                RequestValue::List(values.into_iter().map(RequestValue::into_owned).collect())
            }
            RequestValue::Map(values) => RequestValue::Map(
                values
                    .into_iter()
                    .map(|(key, value)| (Cow::Owned(key.into_owned()), value.into_owned()))
                    .collect(),
            ),
        }
    }
}

impl<'c> From<&'c str> for RequestValue<'c> {
    fn from(value: &'c str) -> Self {
        RequestValue::Scalar(Cow::Borrowed(value))
    }
}

impl<'c> From<String> for RequestValue<'c> {
    fn from(value: String) -> Self {
        RequestValue::Scalar(Cow::Owned(value))
    }
}

impl<'c> From<Cow<'c, str>> for RequestValue<'c> {
    fn from(value: Cow<'c, str>) -> Self {
        RequestValue::Scalar(value)
    }
}

impl<'c> From<Vec<RequestValue<'c>>> for RequestValue<'c> {
    fn from(values: Vec<RequestValue<'c>>) -> Self {
        RequestValue::List(values)
    }
}

impl<'c> From<HashMap<Cow<'c, str>, RequestValue<'c>>> for RequestValue<'c> {
    fn from(values: HashMap<Cow<'c, str>, RequestValue<'c>>) -> Self {
        RequestValue::Map(values)
    }
}
