use time::OffsetDateTime;

/// A source of "now".
///
/// The jar consults its clock in exactly one place: [`CookieJar::remove`],
/// where the expiry of the removal cookie must land safely in the past
/// relative to the current time. Production code uses [`SystemClock`];
/// tests can inject a [`FixedClock`] to make time-dependent assertions
/// deterministic.
///
/// [`CookieJar::remove`]: crate::CookieJar::remove
pub trait Clock: std::fmt::Debug + Send + Sync {
    /// Returns the current date and time.
    fn now(&self) -> OffsetDateTime;
}

/// The default [`Clock`], backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A [`Clock`] that always reports the same instant.
///
/// # Example
///
/// ```rust
/// use biscottiera::{Clock, FixedClock};
/// use biscottiera::time::macros::datetime;
///
/// let clock = FixedClock(datetime!(2024-03-01 12:00 UTC));
/// assert_eq!(clock.now(), datetime!(2024-03-01 12:00 UTC));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
