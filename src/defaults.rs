use crate::SameSite;

/// Fallback attribute values for cookie writes that omit a field.
///
/// A new [`CookieJar`] starts from the zero values below;
/// [`CookieJar::set_defaults`] replaces the whole record at once.
/// Defaults are consulted at write time only: reconfiguring them never
/// touches cookies that are already staged.
///
/// There is deliberately no `http_only` default. A write that does not set
/// `http_only` explicitly always falls back to `false`.
///
/// # Example
///
/// ```rust
/// use biscottiera::{CookieJar, Defaults, SameSite};
///
/// let mut defaults = Defaults::default();
/// defaults.domain = Some("example.org".into());
/// defaults.path = "/".into();
/// defaults.secure = true;
/// defaults.same_site = Some(SameSite::Lax);
///
/// let mut jar = CookieJar::new();
/// jar.set_defaults(defaults);
/// jar.set("theme", "dark");
///
/// let cookie = &jar.response_cookies()[0];
/// assert_eq!(cookie.domain(), Some("example.org"));
/// assert_eq!(cookie.path(), "/");
/// assert!(cookie.secure());
/// assert_eq!(cookie.same_site(), Some(SameSite::Lax));
/// assert!(!cookie.http_only());
/// ```
///
/// [`CookieJar`]: crate::CookieJar
/// [`CookieJar::set_defaults`]: crate::CookieJar::set_defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Defaults {
    /// The `Domain` attribute for writes that do not set one.
    ///
    /// `None` omits the attribute.
    pub domain: Option<String>,
    /// The `Path` attribute for writes that do not set one.
    ///
    /// An empty string omits the attribute.
    pub path: String,
    /// The expiry for writes that do not set one, as a Unix timestamp in
    /// seconds.
    ///
    /// This is an absolute instant, fixed when the defaults are configured.
    /// It is not re-evaluated relative to the current time at write time.
    /// `0` stages a session cookie.
    pub expires: i64,
    /// The `Secure` flag for writes that do not set one.
    pub secure: bool,
    /// The `SameSite` attribute for writes that do not set one.
    ///
    /// `None` omits the attribute.
    pub same_site: Option<SameSite>,
}
