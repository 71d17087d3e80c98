use std::fmt;

/// The `SameSite` attribute of an outgoing cookie.
///
/// It controls when the client attaches the cookie to cross-site requests:
/// `Strict` never does, `Lax` only on top-level navigations, `None` always
/// (modern browsers expect `Secure` to be set alongside `None`).
///
/// A cookie without a `SameSite` attribute leaves the behaviour entirely to
/// the client. Both [`Attributes`](crate::Attributes) and
/// [`Defaults`](crate::Defaults) model that case as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SameSite {
    /// The "Strict" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "strict"))]
    Strict,
    /// The "Lax" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "lax"))]
    Lax,
    /// The "None" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "none"))]
    None,
}

impl SameSite {
    /// Returns the attribute value as it appears on the wire.
    ///
    /// # Example
    ///
    /// ```rust
    /// use biscottiera::SameSite;
    ///
    /// assert_eq!(SameSite::Strict.as_str(), "Strict");
    /// assert_eq!(SameSite::Lax.as_str(), "Lax");
    /// assert_eq!(SameSite::None.as_str(), "None");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match *self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
