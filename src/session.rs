//! Typed state kept between runs, stored through an injected
//! [`KeyValueStore`].

use chrono::{DateTime, Duration, Utc};

use crate::app::{Result, StorefrontError};
use crate::domain::{Cart, Language};
use crate::store::KeyValueStore;

const LANGUAGE_KEY: &str = "language";
const CART_KEY: &str = "cart";
const ADMIN_EXPIRY_KEY: &str = "admin_session_expires_at";

pub struct Preferences<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> Preferences<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Stored language, falling back to the default when unset or unreadable.
    pub fn language(&self) -> Result<Language> {
        match self.store.get(LANGUAGE_KEY)? {
            Some(code) => Ok(code.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring unknown stored language {:?}", code);
                Language::default()
            })),
            None => Ok(Language::default()),
        }
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.store.set(LANGUAGE_KEY, language.code())
    }
}

pub struct CartStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> CartStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Saved cart; a corrupt entry is dropped rather than failing the caller.
    pub fn load(&self) -> Result<Cart> {
        let Some(json) = self.store.get(CART_KEY)? else {
            return Ok(Cart::new());
        };

        match serde_json::from_str(&json) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                tracing::warn!("Discarding unreadable saved cart: {}", e);
                self.store.remove(CART_KEY)?;
                Ok(Cart::new())
            }
        }
    }

    pub fn save(&self, cart: &Cart) -> Result<()> {
        if cart.is_empty() {
            self.store.remove(CART_KEY)?;
            return Ok(());
        }
        let json = serde_json::to_string(cart)?;
        self.store.set(CART_KEY, &json)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(CART_KEY)?;
        Ok(())
    }
}

/// Admin login kept as an expiry timestamp. The password itself is never
/// stored.
pub struct AdminSession<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> AdminSession<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Records a login that stays valid for `ttl` from `now`.
    pub fn start_at(&self, now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>> {
        let expires_at = now + ttl;
        self.store.set(ADMIN_EXPIRY_KEY, &expires_at.to_rfc3339())?;
        Ok(expires_at)
    }

    pub fn start(&self, ttl: Duration) -> Result<DateTime<Utc>> {
        self.start_at(Utc::now(), ttl)
    }

    /// Expiry of a session that is still valid at `now`. Expired or
    /// unreadable entries are removed.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.store.get(ADMIN_EXPIRY_KEY)? else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(expires_at) if expires_at.with_timezone(&Utc) > now => {
                Ok(Some(expires_at.with_timezone(&Utc)))
            }
            Ok(_) => {
                tracing::info!("Admin session expired");
                self.end()?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable admin session: {}", e);
                self.end()?;
                Ok(None)
            }
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> Result<bool> {
        Ok(self.expires_at(now)?.is_some())
    }

    /// Fails with [`StorefrontError::AdminSessionRequired`] unless a session
    /// is active at `now`.
    pub fn require_at(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_active_at(now)? {
            Ok(())
        } else {
            Err(StorefrontError::AdminSessionRequired)
        }
    }

    pub fn require(&self) -> Result<()> {
        self.require_at(Utc::now())
    }

    /// Returns `true` if a session was stored.
    pub fn end(&self) -> Result<bool> {
        self.store.remove(ADMIN_EXPIRY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use crate::store::SqliteStore;

    #[test]
    fn test_language_defaults_to_english() {
        let store = SqliteStore::in_memory().unwrap();
        let prefs = Preferences::new(&store);
        assert_eq!(prefs.language().unwrap(), Language::English);
    }

    #[test]
    fn test_language_roundtrip() {
        let store = SqliteStore::in_memory().unwrap();
        let prefs = Preferences::new(&store);
        prefs.set_language(Language::Hindi).unwrap();
        assert_eq!(prefs.language().unwrap(), Language::Hindi);
        assert_eq!(store.get("language").unwrap(), Some("hi".into()));
    }

    #[test]
    fn test_unknown_stored_language_falls_back() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("language", "tlh").unwrap();
        assert_eq!(
            Preferences::new(&store).language().unwrap(),
            Language::English
        );
    }

    #[test]
    fn test_cart_save_and_load() {
        let store = SqliteStore::in_memory().unwrap();
        let carts = CartStore::new(&store);

        let mut cart = Cart::new();
        cart.add(&Product::new("p1", "Ebook", 99.0));
        carts.save(&cart).unwrap();

        assert_eq!(carts.load().unwrap(), cart);
    }

    #[test]
    fn test_saving_empty_cart_removes_entry() {
        let store = SqliteStore::in_memory().unwrap();
        let carts = CartStore::new(&store);

        let mut cart = Cart::new();
        cart.add(&Product::new("p1", "Ebook", 99.0));
        carts.save(&cart).unwrap();
        cart.clear();
        carts.save(&cart).unwrap();

        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_corrupt_cart_is_discarded() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("cart", "not json").unwrap();

        let cart = CartStore::new(&store).load().unwrap();
        assert!(cart.is_empty());
        assert_eq!(store.get("cart").unwrap(), None);
    }

    fn at(hour: u32) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("2024-03-01T{:02}:00:00Z", hour))
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_admin_session_is_active_until_expiry() {
        let store = SqliteStore::in_memory().unwrap();
        let session = AdminSession::new(&store);

        assert!(!session.is_active_at(at(9)).unwrap());
        let expires_at = session.start_at(at(9), Duration::hours(1)).unwrap();
        assert_eq!(expires_at, at(10));

        assert!(session.is_active_at(at(9)).unwrap());
        assert!(session.require_at(at(9)).is_ok());
        assert_eq!(session.expires_at(at(9)).unwrap(), Some(at(10)));
    }

    #[test]
    fn test_expired_admin_session_is_removed() {
        let store = SqliteStore::in_memory().unwrap();
        let session = AdminSession::new(&store);
        session.start_at(at(9), Duration::hours(1)).unwrap();

        assert!(matches!(
            session.require_at(at(10)),
            Err(StorefrontError::AdminSessionRequired)
        ));
        assert_eq!(store.get("admin_session_expires_at").unwrap(), None);
    }

    #[test]
    fn test_corrupt_admin_session_is_discarded() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("admin_session_expires_at", "tomorrow").unwrap();

        assert!(!AdminSession::new(&store).is_active_at(at(9)).unwrap());
        assert_eq!(store.get("admin_session_expires_at").unwrap(), None);
    }

    #[test]
    fn test_admin_logout() {
        let store = SqliteStore::in_memory().unwrap();
        let session = AdminSession::new(&store);
        session.start_at(at(9), Duration::hours(1)).unwrap();

        assert!(session.end().unwrap());
        assert!(!session.end().unwrap());
        assert!(!session.is_active_at(at(9)).unwrap());
    }
}
