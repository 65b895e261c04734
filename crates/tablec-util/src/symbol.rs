//! String interning.
//!
//! A [`Symbol`] is a 4-byte handle into a global string table. Identifier
//! text, decoded string literals, operator spellings, and the raw literal
//! text of every token are interned, so comparisons are integer
//! comparisons and the backing storage never moves: interned strings are
//! leaked once and stay valid for the life of the process, which is what
//! lets tokens and AST nodes share them freely.

use std::fmt;
use std::sync::{LazyLock, RwLock};

use rustc_hash::FxHashMap;

/// An interned string.
///
/// Two symbols are equal exactly when their source strings are equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Interns a string, returning its symbol. Re-interning the same text
    /// returns the same symbol.
    pub fn intern(text: &str) -> Symbol {
        {
            let interner = INTERNER.read().expect("interner poisoned");
            if let Some(&sym) = interner.map.get(text) {
                return sym;
            }
        }
        let mut interner = INTERNER.write().expect("interner poisoned");
        // Another thread may have interned it between the two locks.
        if let Some(&sym) = interner.map.get(text) {
            return sym;
        }
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let sym = Symbol(interner.strings.len() as u32);
        interner.strings.push(leaked);
        interner.map.insert(leaked, sym);
        sym
    }

    /// Returns the interned text.
    pub fn as_str(self) -> &'static str {
        let interner = INTERNER.read().expect("interner poisoned");
        interner.strings[self.0 as usize]
    }

    /// Returns true if the interned text is empty.
    pub fn is_empty(self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

struct Interner {
    map: FxHashMap<&'static str, Symbol>,
    strings: Vec<&'static str>,
}

static INTERNER: LazyLock<RwLock<Interner>> = LazyLock::new(|| {
    RwLock::new(Interner {
        map: FxHashMap::default(),
        strings: Vec::new(),
    })
});
