use crate::SameSite;
use std::borrow::Cow;
use std::fmt;
use time::format_description::FormatItem;
use time::macros::{datetime, format_description};
use time::OffsetDateTime;

// RFC 6265 requires expiry dates to stay within the year 9999; the lower
// bound keeps arbitrarily negative timestamps renderable.
static MAX_EXPIRES: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);
static MIN_EXPIRES: OffsetDateTime = datetime!(0000-01-01 0:00 UTC);

/// A cookie staged for the client, sent in the response via the `Set-Cookie`
/// header.
///
/// A `ResponseCookie` is a fully-resolved record: every attribute holds a
/// concrete value, with fallbacks from [`Defaults`] already applied by the
/// jar that staged it. Its [`Display`] implementation renders the header
/// value.
///
/// ## Constructing a `ResponseCookie`
///
/// ```rust
/// use biscottiera::ResponseCookie;
///
/// let cookie = ResponseCookie::new("name", "value");
/// assert_eq!(cookie.to_string(), "name=value; ");
/// ```
///
/// Attributes are attached with `set_*` methods:
///
/// ```rust
/// use biscottiera::{ResponseCookie, SameSite};
///
/// let cookie = ResponseCookie::new("name", "value")
///     .set_secure(true)
///     .set_path("/")
///     .set_same_site(SameSite::Lax);
/// assert_eq!(cookie.to_string(), "name=value; Secure; Path=/; SameSite=Lax; ");
/// ```
///
/// [`Defaults`]: crate::Defaults
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookie<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) value: Cow<'c, str>,
    /// Unix timestamp in seconds; `0` marks a session cookie.
    pub(crate) expires: i64,
    pub(crate) http_only: bool,
    pub(crate) secure: bool,
    pub(crate) domain: Option<Cow<'c, str>>,
    /// Empty when unset; an empty path emits no `Path` attribute.
    pub(crate) path: Cow<'c, str>,
    pub(crate) same_site: Option<SameSite>,
}

impl<'c> ResponseCookie<'c> {
    /// Creates a new [`ResponseCookie`] with the given name and value.
    ///
    /// All attributes start from their zero values: a session cookie with no
    /// `Domain`, `Path` or `SameSite` attribute and both flags cleared.
    pub fn new<N, V>(name: N, value: V) -> ResponseCookie<'c>
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        ResponseCookie {
            name: name.into(),
            value: value.into(),
            expires: 0,
            http_only: false,
            secure: false,
            domain: None,
            path: Cow::Borrowed(""),
            same_site: None,
        }
    }

    /// Returns the name of the cookie.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the cookie.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the expiry of the cookie, as a Unix timestamp in seconds.
    ///
    /// `0` marks a session cookie, one that expires when the client decides
    /// the session is over.
    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// Returns the expiry as a date and time, or `None` for a session
    /// cookie.
    ///
    /// The timestamp is stored as given, but it is clamped into the range
    /// allowed by RFC 6265 (up to the end of the year 9999) when converted
    /// here and when the `Expires` attribute is rendered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use biscottiera::ResponseCookie;
    /// use biscottiera::time::macros::datetime;
    ///
    /// let cookie = ResponseCookie::new("name", "value").set_expires(1445412480);
    /// assert_eq!(cookie.expires_datetime(), Some(datetime!(2015-10-21 07:28 UTC)));
    ///
    /// let session = ResponseCookie::new("name", "value");
    /// assert_eq!(session.expires_datetime(), None);
    /// ```
    pub fn expires_datetime(&self) -> Option<OffsetDateTime> {
        if self.expires == 0 {
            return None;
        }
        let clamped = self
            .expires
            .clamp(MIN_EXPIRES.unix_timestamp(), MAX_EXPIRES.unix_timestamp());
        OffsetDateTime::from_unix_timestamp(clamped).ok()
    }

    /// Returns `true` if the cookie carries the `HttpOnly` flag.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Returns `true` if the cookie carries the `Secure` flag.
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Returns the `Domain` attribute, if any.
    ///
    /// A leading dot is stripped, since clients ignore it anyway.
    ///
    /// # Example
    ///
    /// ```rust
    /// use biscottiera::ResponseCookie;
    ///
    /// let cookie = ResponseCookie::new("name", "value").set_domain(".example.org");
    /// assert_eq!(cookie.domain(), Some("example.org"));
    /// ```
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_ref().map(|domain| {
            let domain = domain.as_ref();
            domain.strip_prefix('.').unwrap_or(domain)
        })
    }

    /// Returns the `Path` attribute.
    ///
    /// An empty path means the attribute is unset and will not be rendered.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the `SameSite` attribute, if any.
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Sets the name of the cookie.
    pub fn set_name<N: Into<Cow<'c, str>>>(mut self, name: N) -> ResponseCookie<'c> {
        self.name = name.into();
        self
    }

    /// Sets the value of the cookie.
    pub fn set_value<V: Into<Cow<'c, str>>>(mut self, value: V) -> ResponseCookie<'c> {
        self.value = value.into();
        self
    }

    /// Sets the expiry of the cookie, as a Unix timestamp in seconds.
    ///
    /// Use `0` for a session cookie.
    pub fn set_expires(mut self, expires: i64) -> ResponseCookie<'c> {
        self.expires = expires;
        self
    }

    /// Sets the `HttpOnly` flag.
    pub fn set_http_only(mut self, http_only: bool) -> ResponseCookie<'c> {
        self.http_only = http_only;
        self
    }

    /// Sets the `Secure` flag.
    pub fn set_secure(mut self, secure: bool) -> ResponseCookie<'c> {
        self.secure = secure;
        self
    }

    /// Sets the `Domain` attribute.
    pub fn set_domain<D: Into<Cow<'c, str>>>(mut self, domain: D) -> ResponseCookie<'c> {
        self.domain = Some(domain.into());
        self
    }

    /// Removes the `Domain` attribute.
    pub fn unset_domain(mut self) -> ResponseCookie<'c> {
        self.domain = None;
        self
    }

    /// Sets the `Path` attribute.
    ///
    /// An empty path removes the attribute.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> ResponseCookie<'c> {
        self.path = path.into();
        self
    }

    /// Sets the `SameSite` attribute. Passing `None` removes it.
    pub fn set_same_site<S: Into<Option<SameSite>>>(mut self, same_site: S) -> ResponseCookie<'c> {
        self.same_site = same_site.into();
        self
    }

    /// Converts the cookie into an owned one, cloning borrowed data where
    /// necessary.
    ///
    /// # Example
    ///
    /// ```rust
    /// use biscottiera::ResponseCookie;
    ///
    /// let cookie: ResponseCookie<'static> = {
    ///     let name = String::from("theme");
    ///     ResponseCookie::new(name.as_str(), "dark").into_owned()
    /// };
    /// // The cookie outlives the string it borrowed from.
    /// assert_eq!(cookie.name(), "theme");
    /// ```
    pub fn into_owned(self) -> ResponseCookie<'static> {
        ResponseCookie {
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
            expires: self.expires,
            http_only: self.http_only,
            secure: self.secure,
            domain: self.domain.map(|domain| Cow::Owned(domain.into_owned())),
            path: Cow::Owned(self.path.into_owned()),
            same_site: self.same_site,
        }
    }

    fn fmt_attributes(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.http_only {
            write!(f, "HttpOnly; ")?;
        }
        if self.secure {
            write!(f, "Secure; ")?;
        }
        if let Some(domain) = self.domain() {
            if !domain.is_empty() {
                write!(f, "Domain={domain}; ")?;
            }
        }
        if !self.path.is_empty() {
            write!(f, "Path={}; ", self.path)?;
        }
        if let Some(time) = self.expires_datetime() {
            static EXPIRES_FMT: &[FormatItem<'_>] = format_description!(
                "[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT"
            );
            let formatted = time.format(&EXPIRES_FMT).map_err(|_| fmt::Error)?;
            write!(f, "Expires={formatted}; ")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "SameSite={same_site}; ")?;
        }
        Ok(())
    }
}

impl fmt::Display for ResponseCookie<'_> {
    /// Renders the cookie as a `Set-Cookie` header value.
    ///
    /// The name-value pair comes first, followed by the attributes that are
    /// set, always in the same order: `HttpOnly`, `Secure`, `Domain`,
    /// `Path`, `Expires`, `SameSite`. Every element, the last one included,
    /// is terminated by `"; "`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}; ", self.name, self.value)?;
        self.fmt_attributes(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format() {
        let cookie = ResponseCookie::new("test1", "value1");
        assert_eq!(&cookie.to_string(), "test1=value1; ");

        let cookie = ResponseCookie::new("test1", "value1").set_http_only(true);
        assert_eq!(&cookie.to_string(), "test1=value1; HttpOnly; ");

        let cookie = ResponseCookie::new("foo", "bar").set_secure(true);
        assert_eq!(&cookie.to_string(), "foo=bar; Secure; ");

        let cookie = ResponseCookie::new("foo", "bar").set_domain("www.rust-lang.org");
        assert_eq!(&cookie.to_string(), "foo=bar; Domain=www.rust-lang.org; ");

        let cookie = ResponseCookie::new("foo", "bar").set_domain(".rust-lang.org");
        assert_eq!(&cookie.to_string(), "foo=bar; Domain=rust-lang.org; ");

        let cookie = ResponseCookie::new("foo", "bar").set_path("/");
        assert_eq!(&cookie.to_string(), "foo=bar; Path=/; ");

        let cookie = ResponseCookie::new("foo", "bar").set_expires(1445412480);
        assert_eq!(
            &cookie.to_string(),
            "foo=bar; Expires=Wed, 21 Oct 2015 07:28:00 GMT; "
        );

        let cookie = ResponseCookie::new("foo", "bar").set_same_site(SameSite::Strict);
        assert_eq!(&cookie.to_string(), "foo=bar; SameSite=Strict; ");

        let cookie = ResponseCookie::new("foo", "bar").set_same_site(SameSite::Lax);
        assert_eq!(&cookie.to_string(), "foo=bar; SameSite=Lax; ");

        // `SameSite=None` does not force the `Secure` flag; scoping is the
        // caller's call.
        let cookie = ResponseCookie::new("foo", "bar").set_same_site(SameSite::None);
        assert_eq!(&cookie.to_string(), "foo=bar; SameSite=None; ");
    }

    #[test]
    fn attributes_render_in_a_fixed_order() {
        let cookie = ResponseCookie::new("test1", "value1")
            .set_same_site(SameSite::Lax)
            .set_expires(1445412480)
            .set_path("/app")
            .set_domain("example.org")
            .set_secure(true)
            .set_http_only(true);
        assert_eq!(
            &cookie.to_string(),
            "test1=value1; HttpOnly; Secure; Domain=example.org; Path=/app; \
             Expires=Wed, 21 Oct 2015 07:28:00 GMT; SameSite=Lax; "
        );
    }

    #[test]
    fn session_cookie_has_no_expires_attribute() {
        let cookie = ResponseCookie::new("test1", "value1").set_expires(0);
        assert_eq!(cookie.expires_datetime(), None);
        assert_eq!(&cookie.to_string(), "test1=value1; ");
    }

    #[test]
    fn expires_is_clamped_when_rendered() {
        let cookie = ResponseCookie::new("test1", "value1").set_expires(i64::MAX);
        // The stored timestamp is untouched; only the rendering is clamped.
        assert_eq!(cookie.expires(), i64::MAX);
        assert_eq!(
            &cookie.to_string(),
            "test1=value1; Expires=Fri, 31 Dec 9999 23:59:59 GMT; "
        );

        // A wildly negative timestamp is still an expiry, not a session
        // marker: it clamps to year 0 rather than disappearing.
        let cookie = ResponseCookie::new("test1", "value1").set_expires(i64::MIN);
        assert_eq!(cookie.expires(), i64::MIN);
        assert_eq!(
            &cookie.to_string(),
            "test1=value1; Expires=Sat, 01 Jan 0 00:00:00 GMT; "
        );
    }

    #[test]
    fn empty_domain_is_not_rendered() {
        let cookie = ResponseCookie::new("test1", "value1").set_domain("");
        assert_eq!(&cookie.to_string(), "test1=value1; ");

        let cookie = ResponseCookie::new("test1", "value1").set_domain(".");
        assert_eq!(&cookie.to_string(), "test1=value1; ");
    }
}
