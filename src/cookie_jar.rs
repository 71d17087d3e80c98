use std::borrow::Cow;
use std::ops::Index;

use crate::clock::{Clock, SystemClock};
use crate::{Attributes, Defaults, RequestCookies, RequestValue, ResponseCookie};

/// How far in the past a removal cookie's expiry is placed. A full year
/// keeps the cookie expired even on clients with badly skewed clocks.
const REMOVAL_MARGIN_SECONDS: i64 = 365 * 24 * 60 * 60;

/// A request-scoped cookie jar.
///
/// The jar keeps two strictly separate tables:
///
/// - the **request side**, the cookies the client sent, loaded once via
///   [`CookieJar::set_request_cookies`] and read-only from then on;
/// - the **response side**, the cookies staged for the client, written via
///   [`CookieJar::set`], [`CookieJar::set_cookie`] and
///   [`CookieJar::remove`] and rendered via [`CookieJar::header_values`].
///
/// Writing never makes a cookie readable through [`CookieJar::get`], and
/// removing never hides one: reads reflect the request as it arrived, while
/// the response side only describes what the client should do next.
///
/// Staged cookies keep their insertion order. Re-staging a name replaces
/// the earlier record in place, so each name is rendered at most once.
///
/// # Example
///
/// ```rust
/// use biscottiera::{CookieJar, RequestCookies, RequestValue};
///
/// let request = RequestCookies::parse_header("theme=dark").unwrap();
/// let mut jar = CookieJar::new();
/// jar.set_request_cookies(request);
///
/// jar.set("lang", "en");
///
/// // The request side is untouched by the write.
/// assert_eq!(jar.get("theme"), Some(&RequestValue::from("dark")));
/// assert_eq!(jar.get("lang"), None);
///
/// // The write is staged on the response side.
/// let headers: Vec<String> = jar.header_values().collect();
/// assert_eq!(headers, vec!["lang=en; ".to_string()]);
/// ```
///
/// A jar is meant to live for a single request on a single thread; create
/// one per request rather than sharing one across requests.
#[derive(Debug)]
pub struct CookieJar<'c> {
    request: RequestCookies<'c>,
    response: Vec<ResponseCookie<'c>>,
    defaults: Defaults,
    clock: Box<dyn Clock>,
}

impl<'c> CookieJar<'c> {
    /// Creates an empty jar with zero-valued [`Defaults`], using the system
    /// clock.
    pub fn new() -> CookieJar<'c> {
        CookieJar::with_clock(SystemClock)
    }

    /// Creates an empty jar that consults `clock` instead of the system
    /// clock.
    ///
    /// The clock is only read by [`CookieJar::remove`], to anchor the
    /// expiry of removal cookies. Injecting a [`FixedClock`] makes removal
    /// output deterministic:
    ///
    /// ```rust
    /// use biscottiera::{CookieJar, FixedClock};
    /// use biscottiera::time::macros::datetime;
    ///
    /// let clock = FixedClock(datetime!(2024-03-01 12:00 UTC));
    /// let mut jar = CookieJar::with_clock(clock);
    /// jar.remove("sid");
    ///
    /// let header = jar.header_values().next().unwrap();
    /// assert_eq!(header, "sid=; Expires=Thu, 02 Mar 2023 12:00:00 GMT; ");
    /// ```
    ///
    /// [`FixedClock`]: crate::FixedClock
    pub fn with_clock(clock: impl Clock + 'static) -> CookieJar<'c> {
        CookieJar {
            request: RequestCookies::new(),
            response: Vec::new(),
            defaults: Defaults::default(),
            clock: Box::new(clock),
        }
    }

    /// Loads the cookies attached to the incoming request.
    ///
    /// This replaces the whole request side; the response side is
    /// untouched.
    pub fn set_request_cookies(&mut self, cookies: impl Into<RequestCookies<'c>>) {
        self.request = cookies.into();
    }

    /// Returns the cookies attached to the incoming request.
    pub fn request_cookies(&self) -> &RequestCookies<'c> {
        &self.request
    }

    /// Returns the value of the request cookie named `name`, if the client
    /// sent one.
    ///
    /// Reads are not affected by writes or removals staged on the response
    /// side. Use [`Option::unwrap_or`] and friends to supply a fallback:
    ///
    /// ```rust
    /// use biscottiera::{CookieJar, RequestCookies, RequestValue};
    ///
    /// let request = RequestCookies::parse_header("theme=dark").unwrap();
    /// let mut jar = CookieJar::new();
    /// jar.set_request_cookies(request);
    ///
    /// let fallback = RequestValue::from("light");
    /// assert_eq!(jar.get("theme"), Some(&RequestValue::from("dark")));
    /// assert_eq!(jar.get("contrast").unwrap_or(&fallback), &fallback);
    /// ```
    pub fn get(&self, name: &str) -> Option<&RequestValue<'c>> {
        self.request.get(name)
    }

    /// Returns `true` if the client sent a cookie named `name`.
    ///
    /// Like [`CookieJar::get`], this looks at the request side only.
    pub fn contains(&self, name: &str) -> bool {
        self.request.contains(name)
    }

    /// Replaces the jar's fallback attributes for subsequent writes.
    ///
    /// Cookies already staged keep the attributes they were staged with.
    pub fn set_defaults(&mut self, defaults: Defaults) {
        self.defaults = defaults;
    }

    /// Returns the jar's fallback attributes.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Stages a cookie on the response side, with every attribute falling
    /// back to the jar's [`Defaults`].
    ///
    /// Shorthand for [`CookieJar::set_cookie`] with empty [`Attributes`].
    pub fn set<N, V>(&mut self, name: N, value: V)
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        self.set_cookie(name, value, Attributes::new());
    }

    /// Stages a cookie on the response side.
    ///
    /// Each attribute that is set in `attributes` is used as given, even
    /// when it holds a "falsy" value such as `false`, `0` or an empty
    /// string. Each attribute left unset falls back to the jar's
    /// [`Defaults`]; `http_only` has no default and falls back to `false`.
    ///
    /// If a cookie with the same name is already staged, the new record
    /// replaces it in place, keeping its position in the response order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use biscottiera::{Attributes, CookieJar};
    ///
    /// let mut jar = CookieJar::new();
    /// jar.set_cookie(
    ///     "sid",
    ///     "opaque",
    ///     Attributes::new()
    ///         .set_http_only(true)
    ///         .set_secure(true)
    ///         .set_path("/"),
    /// );
    ///
    /// let header = jar.header_values().next().unwrap();
    /// assert_eq!(header, "sid=opaque; HttpOnly; Secure; Path=/; ");
    /// ```
    pub fn set_cookie<N, V>(&mut self, name: N, value: V, attributes: Attributes<'c>)
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        let Attributes {
            expires,
            http_only,
            secure,
            path,
            domain,
            same_site,
        } = attributes;
        let cookie = ResponseCookie {
            name: name.into(),
            value: value.into(),
            expires: expires.unwrap_or(self.defaults.expires),
            http_only: http_only.unwrap_or(false),
            secure: secure.unwrap_or(self.defaults.secure),
            domain: domain.or_else(|| self.defaults.domain.clone().map(Cow::Owned)),
            path: path.unwrap_or_else(|| Cow::Owned(self.defaults.path.clone())),
            same_site: same_site.or(self.defaults.same_site),
        };
        self.stage(cookie);
    }

    /// Stages a removal cookie for `name`: an empty value with an expiry
    /// placed well in the past, which instructs the client to delete its
    /// copy.
    ///
    /// Scoping attributes (`Domain`, `Path` and the rest) fall back to the
    /// jar's [`Defaults`], exactly like a write; the client only deletes a
    /// cookie when the scope matches.
    ///
    /// Removing is a response-side operation. It does not require the
    /// request to contain `name`, and it never affects what
    /// [`CookieJar::get`] returns.
    pub fn remove<N: Into<Cow<'c, str>>>(&mut self, name: N) {
        let expires = self.clock.now().unix_timestamp() - REMOVAL_MARGIN_SECONDS;
        self.set_cookie(name, "", Attributes::new().set_expires(expires));
    }

    /// Returns the staged cookie named `name`, if any.
    pub fn staged(&self, name: &str) -> Option<&ResponseCookie<'c>> {
        self.response.iter().find(|cookie| cookie.name() == name)
    }

    /// Returns the staged cookies, in insertion order.
    pub fn response_cookies(&self) -> &[ResponseCookie<'c>] {
        &self.response
    }

    /// Renders one `Set-Cookie` header value per staged cookie, in
    /// insertion order.
    ///
    /// The jar is not consumed: calling this twice without staging anything
    /// in between yields the same sequence again.
    pub fn header_values(&self) -> impl Iterator<Item = String> + '_ {
        self.response.iter().map(ToString::to_string)
    }

    fn stage(&mut self, cookie: ResponseCookie<'c>) {
        match self
            .response
            .iter()
            .position(|staged| staged.name() == cookie.name())
        {
            Some(index) => self.response[index] = cookie,
            None => self.response.push(cookie),
        }
    }
}

impl Default for CookieJar<'_> {
    fn default() -> Self {
        CookieJar::new()
    }
}

impl<'c, 'k> Index<&'k str> for CookieJar<'c> {
    type Output = RequestValue<'c>;

    /// Returns the value of the request cookie named `name`.
    ///
    /// Indexing is read-only sugar for [`CookieJar::get`]: it looks at the
    /// request side only, and there is deliberately no `IndexMut`
    /// counterpart. Writes go through the named methods, which keep the
    /// response side explicit.
    ///
    /// # Panics
    ///
    /// Panics if the client sent no cookie named `name`. Use
    /// [`CookieJar::get`] when absence is an expected case.
    fn index(&self, name: &'k str) -> &RequestValue<'c> {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no request cookie named `{name}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::collections::HashMap;

    use time::macros::datetime;

    use crate::{
        Attributes, CookieJar, Defaults, FixedClock, RequestCookies, RequestValue, SameSite,
    };

    fn configured_defaults() -> Defaults {
        Defaults {
            domain: Some("default.example".to_string()),
            path: "/test".to_string(),
            expires: 1_700_001_000,
            secure: true,
            same_site: Some(SameSite::Strict),
        }
    }

    #[test]
    fn set_applies_zero_values_without_defaults() {
        let mut jar = CookieJar::new();
        jar.set("test1", "value1");

        let cookies = jar.response_cookies();
        assert_eq!(cookies.len(), 1);
        let cookie = &cookies[0];
        assert_eq!(cookie.name(), "test1");
        assert_eq!(cookie.value(), "value1");
        assert_eq!(cookie.expires(), 0);
        assert!(!cookie.http_only());
        assert!(!cookie.secure());
        assert_eq!(cookie.domain(), None);
        assert_eq!(cookie.path(), "");
        assert_eq!(cookie.same_site(), None);
    }

    #[test]
    fn set_inherits_configured_defaults() {
        let mut jar = CookieJar::new();
        jar.set_defaults(configured_defaults());
        jar.set("test1", "value1");

        let cookie = jar.staged("test1").unwrap();
        assert_eq!(cookie.expires(), 1_700_001_000);
        assert_eq!(cookie.domain(), Some("default.example"));
        assert_eq!(cookie.path(), "/test");
        assert!(cookie.secure());
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        // No default exists for `HttpOnly`.
        assert!(!cookie.http_only());
    }

    #[test]
    fn explicit_attributes_override_defaults() {
        let mut jar = CookieJar::new();
        jar.set_defaults(configured_defaults());
        jar.set_cookie(
            "test1",
            "value1",
            Attributes::new()
                .set_expires(1_600_000_000)
                .set_secure(false)
                .set_path("/docs")
                .set_domain("test.default.example")
                .set_same_site(SameSite::None),
        );

        let cookie = jar.staged("test1").unwrap();
        assert_eq!(cookie.expires(), 1_600_000_000);
        // An explicitly falsy value beats a truthy default.
        assert!(!cookie.secure());
        assert_eq!(cookie.path(), "/docs");
        assert_eq!(cookie.domain(), Some("test.default.example"));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[test]
    fn explicit_empty_strings_suppress_default_attributes() {
        let mut jar = CookieJar::new();
        jar.set_defaults(configured_defaults());
        jar.set_cookie(
            "test1",
            "value1",
            Attributes::new().set_path("").set_domain(""),
        );

        let cookie = jar.staged("test1").unwrap();
        assert_eq!(cookie.path(), "");
        assert_eq!(
            &cookie.to_string(),
            "test1=value1; Secure; Expires=Tue, 14 Nov 2023 22:30:00 GMT; SameSite=Strict; "
        );
    }

    #[test]
    fn omitted_attributes_fall_back_per_field() {
        let mut jar = CookieJar::new();
        jar.set_defaults(configured_defaults());
        jar.set_cookie("test1", "value1", Attributes::new().set_http_only(true));

        let cookie = jar.staged("test1").unwrap();
        assert!(cookie.http_only());
        assert_eq!(cookie.expires(), 1_700_001_000);
        assert_eq!(cookie.domain(), Some("default.example"));
        assert_eq!(cookie.path(), "/test");
        assert!(cookie.secure());
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[test]
    fn restaging_a_name_replaces_in_place() {
        let mut jar = CookieJar::new();
        jar.set("a", "1");
        jar.set("b", "2");
        jar.set("a", "3");

        let staged: Vec<(&str, &str)> = jar
            .response_cookies()
            .iter()
            .map(|cookie| (cookie.name(), cookie.value()))
            .collect();
        assert_eq!(staged, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn header_values_render_in_insertion_order() {
        let mut jar = CookieJar::new();
        let mut defaults = Defaults::default();
        defaults.path = "/".to_string();
        jar.set_defaults(defaults);

        jar.set("theme", "dark");
        jar.set_cookie("sid", "opaque", Attributes::new().set_http_only(true));

        let headers: Vec<String> = jar.header_values().collect();
        assert_eq!(
            headers,
            vec![
                "theme=dark; Path=/; ".to_string(),
                "sid=opaque; HttpOnly; Path=/; ".to_string(),
            ]
        );

        // Rendering again without staging anything yields the same output.
        let again: Vec<String> = jar.header_values().collect();
        assert_eq!(headers, again);
    }

    #[test]
    fn remove_stages_an_expired_empty_record() {
        let now = datetime!(2024-03-01 12:00 UTC);
        let mut jar = CookieJar::with_clock(FixedClock(now));
        jar.set_defaults(configured_defaults());
        jar.set("session", "opaque");
        jar.remove("session");

        assert_eq!(jar.response_cookies().len(), 1);
        let cookie = jar.staged("session").unwrap();
        assert_eq!(cookie.value(), "");
        assert!(cookie.expires() < now.unix_timestamp() - 3600);
        // Scoping attributes still come from the defaults, so the client
        // matches the cookie it is meant to delete.
        assert_eq!(cookie.domain(), Some("default.example"));
        assert_eq!(cookie.path(), "/test");
    }

    #[test]
    fn remove_works_without_a_prior_write() {
        let now = datetime!(2024-03-01 12:00 UTC);
        let mut jar = CookieJar::with_clock(FixedClock(now));
        jar.remove("ghost");

        let cookie = jar.staged("ghost").unwrap();
        assert_eq!(cookie.value(), "");
        assert!(cookie.expires() < now.unix_timestamp() - 3600);
    }

    #[test]
    fn remove_leaves_the_request_side_alone() {
        let mut request = RequestCookies::new();
        request.insert("x", "1");
        let mut jar = CookieJar::new();
        jar.set_request_cookies(request);

        jar.remove("x");

        assert!(jar.contains("x"));
        assert_eq!(jar.get("x"), Some(&RequestValue::from("1")));
    }

    #[test]
    fn reconfigured_defaults_only_affect_later_writes() {
        let mut jar = CookieJar::new();
        jar.set("a", "1");

        let mut defaults = Defaults::default();
        defaults.path = "/v2".to_string();
        jar.set_defaults(defaults);
        jar.set("b", "2");

        assert_eq!(jar.staged("a").unwrap().path(), "");
        assert_eq!(jar.staged("b").unwrap().path(), "/v2");
    }

    #[test]
    fn request_and_response_sides_stay_distinct() {
        let now = datetime!(2024-03-01 12:00 UTC);
        let mut request = RequestCookies::new();
        request.insert("k", "v");
        let mut jar = CookieJar::with_clock(FixedClock(now));
        jar.set_request_cookies(request);

        jar.set("k2", "v2");

        // The write is visible on the response side only.
        assert!(!jar.contains("k2"));
        assert_eq!(jar.get("k2"), None);
        assert_eq!(jar.staged("k2").unwrap().value(), "v2");

        // The read side still serves the request as it arrived.
        assert_eq!(jar.get("k"), Some(&RequestValue::from("v")));
        assert!(jar.staged("k").is_none());

        // Removing turns the staged record into a deletion record, and the
        // request side still does not budge.
        jar.remove("k2");
        let removed = jar.staged("k2").unwrap();
        assert_eq!(removed.value(), "");
        assert!(removed.expires() < now.unix_timestamp() - 3600);
        assert_eq!(jar.get("k"), Some(&RequestValue::from("v")));
    }

    #[test]
    fn structured_values_come_back_unchanged() {
        let mut request = RequestCookies::new();
        request.insert("test1", "value1");
        request.insert(
            "test_array",
            RequestValue::Map(HashMap::from([
                (Cow::Borrowed("one"), RequestValue::from("1")),
                (
                    Cow::Borrowed("nested"),
                    RequestValue::List(vec![RequestValue::from("a"), RequestValue::from("b")]),
                ),
            ])),
        );
        let mut jar = CookieJar::new();
        jar.set_request_cookies(request);

        let expected = RequestValue::Map(HashMap::from([
            (Cow::Borrowed("one"), RequestValue::from("1")),
            (
                Cow::Borrowed("nested"),
                RequestValue::List(vec![RequestValue::from("a"), RequestValue::from("b")]),
            ),
        ]));
        assert_eq!(jar.get("test_array"), Some(&expected));
        assert_eq!(jar.get("test1"), Some(&RequestValue::from("value1")));
    }

    #[test]
    fn index_reads_request_cookies() {
        let mut request = RequestCookies::new();
        request.insert("theme", "dark");
        let mut jar = CookieJar::new();
        jar.set_request_cookies(request);

        assert_eq!(jar["theme"], RequestValue::from("dark"));
    }

    #[test]
    #[should_panic(expected = "no request cookie named `missing`")]
    fn index_panics_on_missing_names() {
        let jar = CookieJar::new();
        let _ = &jar["missing"];
    }
}
