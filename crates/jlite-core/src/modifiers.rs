//! Declaration modifiers.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifiers of a class, field or method.
    ///
    /// Flag values are the JVM access flags, so the set can be handed to a
    /// class writer unchanged.
    ///
    /// ```rust
    /// use jlite_core::Modifiers;
    ///
    /// let mods = Modifiers::PUBLIC | Modifiers::STATIC;
    /// assert_eq!(mods.access_flags(), 0x0009);
    /// assert_eq!(mods.to_string(), "public static");
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const NATIVE = 0x0100;
        /// Class-level marker; has no source keyword.
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
    }
}

/// Source keywords in canonical declaration order.
const KEYWORDS: [(Modifiers, &str); 11] = [
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::STATIC, "static"),
    (Modifiers::FINAL, "final"),
    (Modifiers::TRANSIENT, "transient"),
    (Modifiers::VOLATILE, "volatile"),
    (Modifiers::SYNCHRONIZED, "synchronized"),
    (Modifiers::NATIVE, "native"),
    (Modifiers::STRICT, "strictfp"),
];

impl Modifiers {
    /// Parse a single modifier keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| *keyword == word)
            .map(|(flag, _)| *flag)
    }

    /// Parse a modifier list. Returns `None` if any word is not a modifier.
    pub fn from_keywords<'a>(words: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        words
            .into_iter()
            .try_fold(Modifiers::empty(), |acc, word| {
                Self::from_keyword(word).map(|flag| acc | flag)
            })
    }

    /// The JVM access flag word.
    pub fn access_flags(self) -> u16 {
        self.bits()
    }

    /// Keywords of the set flags in canonical order.
    pub fn keywords(self) -> Vec<&'static str> {
        KEYWORDS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, keyword)| *keyword)
            .collect()
    }

    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Modifiers::ABSTRACT)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords().join(" "))
    }
}
