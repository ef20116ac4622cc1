//! Access flags and their textual names.

use std::fmt;

bitflags::bitflags! {
    /// Access flags of a class, field or method. Several bits are shared
    /// between item kinds (e.g. `SYNCHRONIZED`/`SUPER`, `VOLATILE`/`BRIDGE`),
    /// so naming them requires the item kind; see [`AccessFlags::names`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const CONSTRUCTOR = 0x1_0000;
        const DECLARED_SYNCHRONIZED = 0x2_0000;
    }
}

impl Default for AccessFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// The kind of item a flag set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Class,
    Field,
    Method,
}

const CLASS: u8 = 0b001;
const FIELD: u8 = 0b010;
const METHOD: u8 = 0b100;

// Canonical output order.
const NAMES: &[(u32, &str, u8)] = &[
    (0x0001, "public", CLASS | FIELD | METHOD),
    (0x0002, "private", CLASS | FIELD | METHOD),
    (0x0004, "protected", CLASS | FIELD | METHOD),
    (0x0008, "static", CLASS | FIELD | METHOD),
    (0x0010, "final", CLASS | FIELD | METHOD),
    (0x0020, "synchronized", METHOD),
    (0x0040, "volatile", FIELD),
    (0x0040, "bridge", METHOD),
    (0x0080, "transient", FIELD),
    (0x0080, "varargs", METHOD),
    (0x0100, "native", METHOD),
    (0x0200, "interface", CLASS),
    (0x0400, "abstract", CLASS | METHOD),
    (0x0800, "strictfp", METHOD),
    (0x1000, "synthetic", CLASS | FIELD | METHOD),
    (0x2000, "annotation", CLASS),
    (0x4000, "enum", CLASS | FIELD),
    (0x1_0000, "constructor", METHOD),
    (0x2_0000, "declared-synchronized", METHOD),
];

impl AccessFlags {
    /// Names of the flags meaningful for `kind`, in canonical order. Bits
    /// that have no meaning for the kind are skipped.
    pub fn names(self, kind: AccessKind) -> impl Iterator<Item = &'static str> {
        let mask = match kind {
            AccessKind::Class => CLASS,
            AccessKind::Field => FIELD,
            AccessKind::Method => METHOD,
        };
        let bits = self.bits();
        NAMES
            .iter()
            .filter(move |(bit, _, kinds)| bits & bit != 0 && kinds & mask != 0)
            .map(|&(_, name, _)| name)
    }

    /// Space-separated flag names with a trailing space after each, ready
    /// to prefix a declaration.
    pub fn prefix(self, kind: AccessKind) -> Prefix {
        Prefix { flags: self, kind }
    }
}

/// Display adapter returned by [`AccessFlags::prefix`].
#[derive(Debug, Clone, Copy)]
pub struct Prefix {
    flags: AccessFlags,
    kind: AccessKind,
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.flags.names(self.kind) {
            write!(f, "{name} ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_bits_depend_on_kind() {
        let flags = AccessFlags::PUBLIC | AccessFlags::VOLATILE | AccessFlags::TRANSIENT;
        let field: Vec<_> = flags.names(AccessKind::Field).collect();
        let method: Vec<_> = flags.names(AccessKind::Method).collect();
        assert_eq!(field, ["public", "volatile", "transient"]);
        assert_eq!(method, ["public", "bridge", "varargs"]);
    }

    #[test]
    fn class_prefix() {
        let flags = AccessFlags::PUBLIC | AccessFlags::FINAL | AccessFlags::SYNCHRONIZED;
        assert_eq!(flags.prefix(AccessKind::Class).to_string(), "public final ");
        assert_eq!(AccessFlags::empty().prefix(AccessKind::Class).to_string(), "");
    }

    #[test]
    fn constructor_flags() {
        let flags = AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::CONSTRUCTOR;
        assert_eq!(
            flags.prefix(AccessKind::Method).to_string(),
            "public static constructor "
        );
    }
}
