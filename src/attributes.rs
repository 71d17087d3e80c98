use crate::SameSite;
use std::borrow::Cow;

/// Per-write attributes for [`CookieJar::set_cookie`].
///
/// Every field starts out unset. When the cookie is staged, an unset field
/// falls back to the jar's [`Defaults`] (or to the zero value, for
/// `http_only`), while a set field always wins, including explicitly
/// "falsy" values such as `false`, `0` or the empty string.
///
/// # Example
///
/// ```rust
/// use biscottiera::{Attributes, SameSite};
///
/// let attributes = Attributes::new()
///     .set_expires(1_700_000_000)
///     .set_http_only(true)
///     .set_path("/docs")
///     .set_same_site(SameSite::Lax);
///
/// assert_eq!(attributes.expires(), Some(1_700_000_000));
/// assert_eq!(attributes.http_only(), Some(true));
/// assert_eq!(attributes.path(), Some("/docs"));
/// assert_eq!(attributes.same_site(), Some(SameSite::Lax));
/// // Anything left untouched stays unset.
/// assert_eq!(attributes.secure(), None);
/// assert_eq!(attributes.domain(), None);
/// ```
///
/// [`CookieJar::set_cookie`]: crate::CookieJar::set_cookie
/// [`Defaults`]: crate::Defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes<'c> {
    pub(crate) expires: Option<i64>,
    pub(crate) http_only: Option<bool>,
    pub(crate) secure: Option<bool>,
    pub(crate) path: Option<Cow<'c, str>>,
    pub(crate) domain: Option<Cow<'c, str>>,
    pub(crate) same_site: Option<SameSite>,
}

impl<'c> Attributes<'c> {
    /// Creates a new [`Attributes`] value with every field unset.
    pub fn new() -> Attributes<'c> {
        Attributes::default()
    }

    /// Sets the expiry, as a Unix timestamp in seconds.
    ///
    /// `0` stages a session cookie. Passing `None` unsets the field again.
    pub fn set_expires<E: Into<Option<i64>>>(mut self, expires: E) -> Attributes<'c> {
        self.expires = expires.into();
        self
    }

    /// Sets the `HttpOnly` flag. Passing `None` unsets the field again.
    pub fn set_http_only<H: Into<Option<bool>>>(mut self, http_only: H) -> Attributes<'c> {
        self.http_only = http_only.into();
        self
    }

    /// Sets the `Secure` flag. Passing `None` unsets the field again.
    pub fn set_secure<S: Into<Option<bool>>>(mut self, secure: S) -> Attributes<'c> {
        self.secure = secure.into();
        self
    }

    /// Sets the `Path` attribute.
    ///
    /// An explicit empty string is a set field: it suppresses the attribute
    /// even when the jar has a default path. Use [`Attributes::unset_path`]
    /// to fall back to the default again.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> Attributes<'c> {
        self.path = Some(path.into());
        self
    }

    /// Unsets the `Path` attribute, restoring the fallback behaviour.
    pub fn unset_path(mut self) -> Attributes<'c> {
        self.path = None;
        self
    }

    /// Sets the `Domain` attribute.
    ///
    /// An explicit empty string is a set field: it suppresses the attribute
    /// even when the jar has a default domain. Use
    /// [`Attributes::unset_domain`] to fall back to the default again.
    pub fn set_domain<D: Into<Cow<'c, str>>>(mut self, domain: D) -> Attributes<'c> {
        self.domain = Some(domain.into());
        self
    }

    /// Unsets the `Domain` attribute, restoring the fallback behaviour.
    pub fn unset_domain(mut self) -> Attributes<'c> {
        self.domain = None;
        self
    }

    /// Sets the `SameSite` attribute. Passing `None` unsets the field again.
    pub fn set_same_site<S: Into<Option<SameSite>>>(mut self, same_site: S) -> Attributes<'c> {
        self.same_site = same_site.into();
        self
    }

    /// Returns the expiry field, if set.
    pub fn expires(&self) -> Option<i64> {
        self.expires
    }

    /// Returns the `HttpOnly` field, if set.
    pub fn http_only(&self) -> Option<bool> {
        self.http_only
    }

    /// Returns the `Secure` field, if set.
    pub fn secure(&self) -> Option<bool> {
        self.secure
    }

    /// Returns the `Path` field, if set.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `Domain` field, if set.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the `SameSite` field, if set.
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }
}
