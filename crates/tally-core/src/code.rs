//! Interned identifiers for currencies, products, tanks and tasks.
//!
//! Preview documents repeat the same handful of codes on every line
//! (`"TZS"` on each money value, a product id on every pump reading), so
//! codes are stored as a shared `Arc<str>` and compared by pointer first.
//!
//! # Example
//!
//! ```
//! use tally_core::code::CodeInterner;
//!
//! let mut interner = CodeInterner::new();
//!
//! let a = interner.intern("TZS");
//! let b = interner.intern("TZS");
//!
//! assert!(a.ptr_eq(&b));
//! assert_eq!(interner.len(), 1);
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A cheaply clonable identifier.
///
/// Equality, ordering and hashing go by text, so two codes with the same
/// text are equal whether or not they came from the same [`CodeInterner`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(Arc<str>);

/// Currency code such as `"TZS"` or `"USD"`.
pub type CurrencyCode = Code;

impl Code {
    /// Create a code without deduplication.
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    /// Get the code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both codes share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether the code is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Code {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<Code, _>` and the interner look up by `&str`.
impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Code {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for Code {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl PartialEq<str> for Code {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Code {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Deduplicates codes so repeated identifiers share storage.
#[derive(Debug, Default)]
pub struct CodeInterner {
    codes: HashSet<Code>,
}

impl CodeInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a code, returning the shared copy.
    pub fn intern(&mut self, s: &str) -> Code {
        match self.codes.get(s) {
            Some(code) => code.clone(),
            None => {
                let code = Code::from(s);
                self.codes.insert(code.clone());
                code
            }
        }
    }

    /// Re-intern an existing code so it shares storage with this interner.
    pub fn reintern(&mut self, code: &Code) -> Code {
        self.intern(code)
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
