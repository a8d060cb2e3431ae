//! Bidirectional enum translation tables.
//!
//! Every vendor speaks its own raw token vocabulary for access levels, trap
//! severities, versions and MIB families. Each vendor adapter owns its tables
//! as local constants; this module only provides the lookup mechanics, with
//! the reverse direction kept as an explicit function rather than an implicit
//! map inversion.

/// A constant canonical-to-raw token table.
///
/// `raw` is the forward lookup used by encoders; `decode`/`decode_or` are the
/// reverse lookups used by decoders. An unrecognized raw token never fails a
/// decode: `decode` yields `None` and `decode_or` substitutes the vendor's
/// documented default.
pub(crate) struct EnumTable<C: Copy + PartialEq + std::fmt::Debug + 'static> {
    pairs: &'static [(C, &'static str)],
}

impl<C: Copy + PartialEq + std::fmt::Debug + 'static> EnumTable<C> {
    pub(crate) const fn new(pairs: &'static [(C, &'static str)]) -> Self {
        Self { pairs }
    }

    /// Raw token for a canonical value, if the vendor supports it.
    pub(crate) fn raw(&self, canonical: C) -> Option<&'static str> {
        self.pairs
            .iter()
            .find(|(c, _)| *c == canonical)
            .map(|(_, r)| *r)
    }

    /// Canonical value for a raw token, `None` when unrecognized.
    pub(crate) fn decode(&self, raw: &str) -> Option<C> {
        let found = self.pairs.iter().find(|(_, r)| *r == raw).map(|(c, _)| *c);
        if found.is_none() {
            tracing::warn!(target: "upsconf::lookup", raw, "unrecognized raw token");
        }
        found
    }

    /// Canonical value for a raw token, substituting `default` when
    /// unrecognized.
    pub(crate) fn decode_or(&self, raw: &str, default: C) -> C {
        self.decode(raw).unwrap_or(default)
    }
}
