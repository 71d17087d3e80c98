//! `biscottiera` is a cookie jar for server-side request handling: it keeps
//! the cookies a client sent and the cookies you want to send back in two
//! strictly separate tables, behind one request-scoped API.
//!
//! - The **request side** is loaded once, from data your transport already
//!   parsed or from a raw `Cookie` header, and is read-only afterwards.
//! - The **response side** collects writes and removals as fully-resolved
//!   [`ResponseCookie`] records and renders one `Set-Cookie` header value
//!   per staged cookie, in insertion order.
//!
//! Reads never observe writes: [`CookieJar::get`] reflects the request as
//! it arrived, no matter what has been staged since. That asymmetry is the
//! point of the two tables, not an accident of the implementation.
//!
//! # Reading request cookies
//!
//! ```rust
//! use biscottiera::{CookieJar, RequestCookies, RequestValue};
//!
//! let request = RequestCookies::parse_header("theme=dark; cart[]=tea; cart[]=rusks").unwrap();
//! let mut jar = CookieJar::new();
//! jar.set_request_cookies(request);
//!
//! assert!(jar.contains("theme"));
//! assert_eq!(jar.get("theme"), Some(&RequestValue::from("dark")));
//! // Or, when you know the cookie is there:
//! assert_eq!(jar["theme"], RequestValue::from("dark"));
//!
//! // Bracketed names arrive as structured values.
//! assert_eq!(
//!     jar.get("cart"),
//!     Some(&RequestValue::List(vec![
//!         RequestValue::from("tea"),
//!         RequestValue::from("rusks"),
//!     ]))
//! );
//! ```
//!
//! # Staging response cookies
//!
//! ```rust
//! use biscottiera::{Attributes, CookieJar, Defaults, SameSite};
//!
//! let mut defaults = Defaults::default();
//! defaults.path = "/".into();
//! defaults.secure = true;
//! defaults.same_site = Some(SameSite::Lax);
//!
//! let mut jar = CookieJar::new();
//! jar.set_defaults(defaults);
//!
//! // Attributes you do not set fall back to the defaults.
//! jar.set("theme", "dark");
//! // Attributes you do set always win, falsy values included.
//! jar.set_cookie(
//!     "sid",
//!     "opaque",
//!     Attributes::new().set_http_only(true).set_secure(false),
//! );
//!
//! let headers: Vec<String> = jar.header_values().collect();
//! assert_eq!(
//!     headers,
//!     vec![
//!         "theme=dark; Secure; Path=/; SameSite=Lax; ".to_string(),
//!         "sid=opaque; HttpOnly; Path=/; SameSite=Lax; ".to_string(),
//!     ]
//! );
//! ```
//!
//! # Removing cookies
//!
//! A removal is just another staged cookie: empty value, expiry far in the
//! past. The client deletes its copy when the scope matches.
//!
//! ```rust
//! use biscottiera::{CookieJar, FixedClock};
//! use biscottiera::time::macros::datetime;
//!
//! let mut jar = CookieJar::with_clock(FixedClock(datetime!(2024-03-01 12:00 UTC)));
//! jar.remove("sid");
//!
//! let header = jar.header_values().next().unwrap();
//! assert_eq!(header, "sid=; Expires=Thu, 02 Mar 2023 12:00:00 GMT; ");
//! ```
//!
//! # What the jar does not do
//!
//! The jar works on parsed names and values and renders header values as
//! plain strings. Percent-encoding of outgoing values, header transport,
//! signing and encryption are the caller's responsibility; incoming
//! percent-decoding is applied by [`RequestCookies::parse_header`] when you
//! start from a raw header.
//!
//! A [`CookieJar`] is request-scoped: build one per request and drop it
//! once the response is rendered. Mutation takes `&mut self` throughout, so
//! a jar shared across tasks needs external synchronisation, which a
//! request-scoped value never does.
//!
//! # Feature flags
//!
//! - `serde` (default): `Serialize`/`Deserialize` implementations for
//!   [`RequestValue`] and [`SameSite`], plus `Deserialize` for
//!   [`Defaults`], so fallback attributes can sit in configuration files.

mod attributes;
mod clock;
mod cookie_jar;
mod defaults;
mod request_cookies;
mod request_value;
mod response_cookie;
mod same_site;

pub use attributes::Attributes;
pub use clock::{Clock, FixedClock, SystemClock};
pub use cookie_jar::CookieJar;
pub use defaults::Defaults;
pub use request_cookies::RequestCookies;
pub use request_value::RequestValue;
pub use response_cookie::ResponseCookie;
pub use same_site::SameSite;
// Re-exported for the `datetime!` macro, handy when driving a `FixedClock`.
pub use time;

/// The errors that can be returned when working with `biscottiera`.
pub mod errors {
    pub use super::request_cookies::{DecodingError, EmptyNameError, MissingPairError, ParseError};
}
