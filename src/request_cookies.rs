use std::borrow::Cow;
use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::RequestValue;

/// The cookies attached to an incoming request, keyed by name.
///
/// A `RequestCookies` collection is usually built in one of two ways:
///
/// - from data a transport layer already parsed, via [`RequestCookies::insert`]
///   or the `From`/`FromIterator` conversions;
/// - from a raw `Cookie` header, via [`RequestCookies::parse_header`].
///
/// Either way, hand it to [`CookieJar::set_request_cookies`] and the jar
/// serves reads out of it for the rest of the request.
///
/// # Example
///
/// ```rust
/// use biscottiera::RequestCookies;
///
/// let cookies = RequestCookies::parse_header("theme=dark; lang=en").unwrap();
/// assert_eq!(cookies.get("theme").and_then(|v| v.as_str()), Some("dark"));
/// assert_eq!(cookies.get("lang").and_then(|v| v.as_str()), Some("en"));
/// assert!(!cookies.contains("missing"));
/// ```
///
/// [`CookieJar::set_request_cookies`]: crate::CookieJar::set_request_cookies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies<'c> {
    cookies: HashMap<Cow<'c, str>, RequestValue<'c>>,
}

impl<'c> RequestCookies<'c> {
    /// Creates an empty [`RequestCookies`] collection.
    pub fn new() -> RequestCookies<'c> {
        Default::default()
    }

    /// Inserts a value for `name`, replacing any existing value.
    ///
    /// Returns `true` if a value for `name` was already present.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> bool
    where
        N: Into<Cow<'c, str>>,
        V: Into<RequestValue<'c>>,
    {
        self.cookies.insert(name.into(), value.into()).is_some()
    }

    /// Returns the value of the cookie named `name`, if any.
    pub fn get(&self, name: &str) -> Option<&RequestValue<'c>> {
        self.cookies.get(name)
    }

    /// Returns `true` if the collection holds a cookie named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Returns the number of cookies in the collection.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if the collection holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterates over the cookies as `(name, value)` pairs, in arbitrary
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequestValue<'c>)> {
        self.cookies.iter().map(|(name, value)| (name.as_ref(), value))
    }

    /// Parses the value of a `Cookie` header into a [`RequestCookies`]
    /// collection.
    ///
    /// Names and values are percent-decoded. Bracketed names are expanded
    /// into nested structures the way web form parsers treat them:
    /// `name[key]` builds a map entry, a bare `name[]` appends to a list,
    /// and segments nest (`prefs[tags][]`). A name whose bracket structure
    /// is malformed (`cart[0`, `[x]`) stays a flat name, matched verbatim.
    ///
    /// When the same shape is written twice the later pair wins; writing a
    /// flat value over a structured one (or vice versa) replaces it
    /// entirely.
    ///
    /// # Example
    ///
    /// ```rust
    /// use biscottiera::{RequestCookies, RequestValue};
    ///
    /// let cookies = RequestCookies::parse_header("cart[]=tea; cart[]=rusks").unwrap();
    /// assert_eq!(
    ///     cookies.get("cart"),
    ///     Some(&RequestValue::List(vec![
    ///         RequestValue::from("tea"),
    ///         RequestValue::from("rusks"),
    ///     ]))
    /// );
    /// ```
    pub fn parse_header(header: &'c str) -> Result<RequestCookies<'c>, ParseError> {
        let mut cookies = RequestCookies::new();
        cookies.extend_from_header(header)?;
        Ok(cookies)
    }

    /// Parses a `Cookie` header into the collection, on top of whatever it
    /// already holds.
    ///
    /// Pairs parsed before an error is encountered stay in place.
    pub fn extend_from_header(&mut self, header: &'c str) -> Result<(), ParseError> {
        for fragment in header.split(';') {
            // A stray `;` is not worth rejecting the whole header for.
            if fragment.chars().all(char::is_whitespace) {
                continue;
            }

            let (name, value) = match fragment.split_once('=') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => {
                    let e = MissingPairError {
                        fragment: fragment.to_string(),
                    };
                    return Err(ParseError::MissingPair(e));
                }
            };

            if name.is_empty() {
                let e = EmptyNameError {
                    value: value.to_string(),
                };
                return Err(ParseError::EmptyName(e));
            }

            // A name that fails to decode is kept verbatim rather than
            // rejected: the client will echo it back in the same form.
            let name = match percent_decode_str(name).decode_utf8() {
                Ok(decoded) => decoded,
                Err(_) => Cow::Borrowed(name),
            };
            let value = match percent_decode_str(value).decode_utf8() {
                Ok(decoded) => decoded,
                Err(_) => {
                    let e = DecodingError {
                        name: name.to_string(),
                        raw_value: value.to_string(),
                    };
                    return Err(ParseError::Decoding(e));
                }
            };

            match split_bracketed(&name) {
                None => {
                    self.cookies.insert(name, RequestValue::Scalar(value));
                }
                Some((base, segments)) => {
                    let slot = self
                        .cookies
                        .entry(Cow::Owned(base))
                        .or_insert_with(|| RequestValue::Scalar(Cow::Borrowed("")));
                    insert_segments(slot, &segments, value);
                }
            }
        }
        Ok(())
    }

    /// Converts the collection into an owned one, cloning borrowed data
    /// where necessary.
    ///
    /// # Example
    ///
    /// ```rust
    /// use biscottiera::RequestCookies;
    ///
    /// let cookies: RequestCookies<'static> = {
    ///     let header = String::from("theme=dark");
    ///     RequestCookies::parse_header(&header).unwrap().into_owned()
    /// };
    /// // The collection outlives the header it was parsed from.
    /// assert_eq!(cookies.get("theme").and_then(|v| v.as_str()), Some("dark"));
    /// ```
    pub fn into_owned(self) -> RequestCookies<'static> {
        RequestCookies {
            cookies: self
                .cookies
                .into_iter()
                .map(|(name, value)| (Cow::Owned(name.into_owned()), value.into_owned()))
                .collect(),
        }
    }
}

impl<'c> From<HashMap<Cow<'c, str>, RequestValue<'c>>> for RequestCookies<'c> {
    fn from(cookies: HashMap<Cow<'c, str>, RequestValue<'c>>) -> Self {
        RequestCookies { cookies }
    }
}

impl<'c, N, V> FromIterator<(N, V)> for RequestCookies<'c>
where
    N: Into<Cow<'c, str>>,
    V: Into<RequestValue<'c>>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut cookies = RequestCookies::new();
        for (name, value) in iter {
            cookies.insert(name, value);
        }
        cookies
    }
}

/// One step of a bracketed cookie name: a keyed map entry or a bare `[]`
/// list append.
enum Segment {
    Key(String),
    Append,
}

/// Splits `name` into a base key and its bracket segments: `cart[items][]`
/// becomes `cart` plus `[items]` and `[]`.
///
/// Returns `None` when the name has no brackets, starts with one, or its
/// bracket structure is malformed; such names stay flat.
fn split_bracketed(name: &str) -> Option<(String, Vec<Segment>)> {
    let open = name.find('[')?;
    if open == 0 {
        return None;
    }
    let base = name[..open].to_string();
    let mut segments = Vec::new();
    let mut rest = &name[open..];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        let key = &inner[..close];
        segments.push(if key.is_empty() {
            Segment::Append
        } else {
            Segment::Key(key.to_string())
        });
        rest = &inner[close + 1..];
    }
    Some((base, segments))
}

/// Writes `value` at the position described by `segments`, materialising
/// intermediate maps and lists on the way down. A slot already holding a
/// different shape is replaced: later pairs win.
fn insert_segments<'c>(slot: &mut RequestValue<'c>, segments: &[Segment], value: Cow<'c, str>) {
    match segments.split_first() {
        None => *slot = RequestValue::Scalar(value),
        Some((Segment::Key(key), rest)) => {
            if !matches!(slot, RequestValue::Map(_)) {
                *slot = RequestValue::Map(HashMap::new());
            }
            if let RequestValue::Map(entries) = slot {
                let child = entries
                    .entry(Cow::Owned(key.clone()))
                    .or_insert_with(|| RequestValue::Scalar(Cow::Borrowed("")));
                insert_segments(child, rest, value);
            }
        }
        Some((Segment::Append, rest)) => {
            if !matches!(slot, RequestValue::List(_)) {
                *slot = RequestValue::List(Vec::new());
            }
            if let RequestValue::List(items) = slot {
                let mut child = RequestValue::Scalar(Cow::Borrowed(""));
                insert_segments(&mut child, rest, value);
                items.push(child);
            }
        }
    }
}

/// The error returned by [`RequestCookies::parse_header`] when the header
/// value is malformed.
#[derive(Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// See [`MissingPairError`] for details.
    MissingPair(MissingPairError),
    /// See [`EmptyNameError`] for details.
    EmptyName(EmptyNameError),
    /// See [`DecodingError`] for details.
    Decoding(DecodingError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse cookies out of a header value")
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::MissingPair(e) => Some(e),
            ParseError::EmptyName(e) => Some(e),
            ParseError::Decoding(e) => Some(e),
        }
    }
}

/// A fragment of the `Cookie` header contained no `=` separator.
#[derive(Debug)]
pub struct MissingPairError {
    /// The fragment that could not be parsed.
    pub fragment: String,
}

impl std::fmt::Display for MissingPairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected a name-value pair, but no `=` was found in `{}`",
            self.fragment
        )
    }
}

impl std::error::Error for MissingPairError {}

/// A fragment of the `Cookie` header had a value but no name.
#[derive(Debug)]
pub struct EmptyNameError {
    /// The value attached to the empty name.
    pub value: String,
}

impl std::fmt::Display for EmptyNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The name of a cookie cannot be empty, but found an empty name with `{}` as value",
            self.value
        )
    }
}

impl std::error::Error for EmptyNameError {}

/// A cookie value could not be percent-decoded to valid UTF-8.
#[derive(Debug)]
pub struct DecodingError {
    /// The name of the cookie whose value could not be decoded.
    pub name: String,
    /// The raw, still-encoded value.
    pub raw_value: String,
}

impl std::fmt::Display for DecodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to percent-decode the value of the `{}` cookie: `{}`",
            self.name, self.raw_value
        )
    }
}

impl std::error::Error for DecodingError {}
