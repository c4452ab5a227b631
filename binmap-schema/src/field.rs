//! Field descriptors and roles.
//!
//! A [`FieldDescriptor`] is one entry of a schema: a name, a scalar type
//! tag and a [`Role`] deciding how the field behaves on access and on the
//! wire.

use crate::view::FieldView;
use binmap_core::{EnumValue, Error, Result, Value};
use std::fmt;
use std::sync::Arc;

/// Function computing a calculated field from the fields declared before it.
pub type CalculateFn = Arc<dyn Fn(&FieldView<'_>) -> Result<Value> + Send + Sync>;

/// Behavioral category of a field.
#[derive(Clone)]
pub enum Role {
    /// Ordinary read/write field.
    Plain,
    /// `length` zero bytes on the wire, no readable value.
    Padding(usize),
    /// Always encodes the given value.
    Constant(Value),
    /// Encodes the total encoded length plus the given offset.
    Autolength(i64),
    /// Integer field exposed as a member of an enum domain.
    EnumMapped {
        /// Domain the stored integer maps into.
        domain: Arc<EnumDomain>,
        /// Initial value, a member or a raw integer.
        default: Value,
    },
    /// Recomputed from other fields on every encode.
    Calculated(CalculateFn),
}

impl Role {
    /// Returns the role name, used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Padding(_) => "padding",
            Self::Constant(_) => "constant",
            Self::Autolength(_) => "autolength",
            Self::EnumMapped { .. } => "enum",
            Self::Calculated(_) => "calculated",
        }
    }

    /// Returns true if the field is padding.
    #[must_use]
    pub const fn is_padding(&self) -> bool {
        matches!(self, Self::Padding(_))
    }

    /// Returns true if `set()` may change the field.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(self, Self::Plain | Self::EnumMapped { .. })
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("Plain"),
            Self::Padding(len) => f.debug_tuple("Padding").field(len).finish(),
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Autolength(offset) => f.debug_tuple("Autolength").field(offset).finish(),
            Self::EnumMapped { domain, default } => f
                .debug_struct("EnumMapped")
                .field("domain", &domain.name())
                .field("default", default)
                .finish(),
            Self::Calculated(_) => f.write_str("Calculated(<fn>)"),
        }
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Plain, Self::Plain) => true,
            (Self::Padding(a), Self::Padding(b)) => a == b,
            (Self::Constant(a), Self::Constant(b)) => a == b,
            (Self::Autolength(a), Self::Autolength(b)) => a == b,
            (
                Self::EnumMapped {
                    domain: d1,
                    default: v1,
                },
                Self::EnumMapped {
                    domain: d2,
                    default: v2,
                },
            ) => d1 == d2 && v1 == v2,
            (Self::Calculated(a), Self::Calculated(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

/// How integers without a matching member are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumKind {
    /// Only declared member values are accepted.
    #[default]
    Strict,
    /// Members are bit flags; any bit pattern is accepted.
    Flags,
}

/// Named integer domain backing an enum-mapped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDomain {
    name: String,
    kind: EnumKind,
    members: Vec<(String, i64)>,
}

impl EnumDomain {
    /// Creates an empty domain.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EnumKind) -> Self {
        Self {
            name: name.into(),
            kind,
            members: Vec::new(),
        }
    }

    /// Creates an empty strict domain.
    #[must_use]
    pub fn strict(name: impl Into<String>) -> Self {
        Self::new(name, EnumKind::Strict)
    }

    /// Creates an empty flag domain.
    #[must_use]
    pub fn flags(name: impl Into<String>) -> Self {
        Self::new(name, EnumKind::Flags)
    }

    /// Adds a member.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push((name.into(), value));
        self
    }

    /// Returns the domain name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the domain kind.
    #[must_use]
    pub const fn kind(&self) -> EnumKind {
        self.kind
    }

    /// Returns the declared members in order.
    pub fn members(&self) -> impl Iterator<Item = EnumValue> + '_ {
        self.members
            .iter()
            .map(|(name, value)| EnumValue::new(name.as_str(), *value))
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<EnumValue> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(n, v)| EnumValue::new(n.as_str(), *v))
    }

    /// Returns true if `member` is a value of this domain.
    ///
    /// For flag domains any combination of bits is a value.
    #[must_use]
    pub fn contains(&self, member: &EnumValue) -> bool {
        match self.kind {
            EnumKind::Strict => self
                .members
                .iter()
                .any(|(n, v)| n == member.name() && *v == member.value()),
            EnumKind::Flags => true,
        }
    }

    /// Maps a stored integer to its member.
    ///
    /// Strict domains only map declared values. Flag domains map every
    /// value: an exact member wins, otherwise the name lists the contained
    /// single-bit members joined by `|`, followed by any leftover bits in hex.
    #[must_use]
    pub fn lookup(&self, value: i64) -> Option<EnumValue> {
        self.lookup_sized(value, 8)
    }

    /// As [`EnumDomain::lookup`], with flag bits limited to the low `width`
    /// bytes of `value`.
    #[must_use]
    pub fn lookup_sized(&self, value: i64, width: usize) -> Option<EnumValue> {
        if let Some((name, v)) = self.members.iter().find(|(_, v)| *v == value) {
            return Some(EnumValue::new(name.as_str(), *v));
        }
        if self.kind == EnumKind::Strict {
            return None;
        }

        let mut names = Vec::new();
        let mask = if width >= 8 {
            u64::MAX
        } else {
            (1u64 << (width * 8)) - 1
        };
        let mut rest = value as u64 & mask;
        for (name, bits) in &self.members {
            let bits = *bits as u64;
            if bits != 0 && bits.is_power_of_two() && rest & bits == bits {
                names.push(name.clone());
                rest &= !bits;
            }
        }
        if rest != 0 || names.is_empty() {
            names.push(format!("{rest:#x}"));
        }
        Some(EnumValue::new(names.join("|"), value))
    }
}

/// One schema entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name, may be empty for padding.
    pub name: String,
    /// Scalar type tag resolved against the registry at compile time.
    pub type_tag: String,
    /// Behavioral role.
    pub role: Role,
    /// Initial value for plain fields.
    pub default: Option<Value>,
}

impl FieldDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            role,
            default: None,
        }
    }

    /// Creates a plain read/write field.
    #[must_use]
    pub fn plain(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::new(name, type_tag, Role::Plain)
    }

    /// Creates an anonymous padding field of `length` bytes.
    #[must_use]
    pub fn padding(length: usize) -> Self {
        Self::new("", "x", Role::Padding(length))
    }

    /// Creates a constant field.
    #[must_use]
    pub fn constant(
        name: impl Into<String>,
        type_tag: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self::new(name, type_tag, Role::Constant(value.into()))
    }

    /// Creates an autolength field.
    #[must_use]
    pub fn autolength(name: impl Into<String>, type_tag: impl Into<String>, offset: i64) -> Self {
        Self::new(name, type_tag, Role::Autolength(offset))
    }

    /// Creates an enum-mapped field.
    #[must_use]
    pub fn enumerated(
        name: impl Into<String>,
        type_tag: impl Into<String>,
        domain: impl Into<Arc<EnumDomain>>,
        default: impl Into<Value>,
    ) -> Self {
        Self::new(
            name,
            type_tag,
            Role::EnumMapped {
                domain: domain.into(),
                default: default.into(),
            },
        )
    }

    /// Creates a calculated field.
    #[must_use]
    pub fn calculated<F>(name: impl Into<String>, type_tag: impl Into<String>, f: F) -> Self
    where
        F: Fn(&FieldView<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, type_tag, Role::Calculated(Arc::new(f)))
    }

    /// Sets the initial value of a plain field.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Parses a struct-style format entry such as `"B"`, `"xx"` or `"3x"`.
    ///
    /// Pad codes yield padding of the repeated or counted length; any other
    /// code yields a plain field. Counts on non-pad codes are rejected.
    ///
    /// # Errors
    /// Returns [`Error::Schema`] for a malformed entry.
    pub fn parse(name: impl Into<String>, format: &str) -> Result<Self> {
        let name = name.into();
        let digits = format.chars().take_while(char::is_ascii_digit).count();
        let (count, code) = format.split_at(digits);
        let count = if count.is_empty() {
            None
        } else {
            Some(count.parse::<usize>().map_err(|_| {
                Error::schema(format!("invalid repeat count in format '{format}'"))
            })?)
        };

        if !code.is_empty() && code.chars().all(|c| c == 'x') {
            let length = count.unwrap_or(1).checked_mul(code.len()).ok_or_else(|| {
                Error::schema(format!("padding length in format '{format}' overflows"))
            })?;
            return Ok(Self::new(name, "x", Role::Padding(length)));
        }
        if code.is_empty() || count.is_some_and(|c| c != 1) {
            return Err(Error::schema(format!(
                "format '{format}' for field '{name}' must be a single scalar code"
            )));
        }
        Ok(Self::plain(name, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> EnumDomain {
        EnumDomain::strict("Color")
            .member("Red", 1)
            .member("Green", 2)
            .member("Blue", 3)
    }

    fn perms() -> EnumDomain {
        EnumDomain::flags("Perm")
            .member("Read", 4)
            .member("Write", 2)
            .member("Exec", 1)
    }

    #[test]
    fn test_strict_lookup() {
        let domain = color();
        assert_eq!(domain.lookup(2), Some(EnumValue::new("Green", 2)));
        assert_eq!(domain.lookup(9), None);
        assert_eq!(domain.by_name("Blue"), Some(EnumValue::new("Blue", 3)));
        assert!(domain.contains(&EnumValue::new("Red", 1)));
        assert!(!domain.contains(&EnumValue::new("Red", 2)));
    }

    #[test]
    fn test_flag_lookup() {
        let domain = perms();
        assert_eq!(domain.lookup(4), Some(EnumValue::new("Read", 4)));
        assert_eq!(domain.lookup(6), Some(EnumValue::new("Read|Write", 6)));
        assert_eq!(domain.lookup(0x11), Some(EnumValue::new("Exec|0x10", 0x11)));
        assert_eq!(domain.lookup(0), Some(EnumValue::new("0x0", 0)));
    }

    #[test]
    fn test_flag_lookup_sized() {
        let domain = perms();
        assert_eq!(
            domain.lookup_sized(-1, 1),
            Some(EnumValue::new("Read|Write|Exec|0xf8", -1))
        );
        assert_eq!(
            domain.lookup_sized(-2, 2),
            Some(EnumValue::new("Read|Write|0xfff8", -2))
        );
    }

    #[test]
    fn test_members_in_order() {
        let names: Vec<String> = color().members().map(|m| m.name().to_string()).collect();
        assert_eq!(names, ["Red", "Green", "Blue"]);
    }

    #[test]
    fn test_parse_formats() {
        let f = FieldDescriptor::parse("temp", "B").expect("plain");
        assert_eq!(f.role, Role::Plain);
        assert_eq!(f.type_tag, "B");

        let f = FieldDescriptor::parse("_pad1", "xx").expect("padding");
        assert_eq!(f.role, Role::Padding(2));

        let f = FieldDescriptor::parse("_pad2", "3x").expect("counted padding");
        assert_eq!(f.role, Role::Padding(3));

        assert!(FieldDescriptor::parse("bad", "2B").is_err());
        assert!(FieldDescriptor::parse("bad", "").is_err());
        assert!(matches!(
            FieldDescriptor::parse("_pad", "18446744073709551615xx"),
            Err(Error::Schema { .. })
        ));
    }

    #[test]
    fn test_role_equality() {
        let f = FieldDescriptor::calculated("crc", "B", |_| Ok(Value::UInt(0)));
        assert_eq!(f.role, f.clone().role);

        let g = FieldDescriptor::calculated("crc", "B", |_| Ok(Value::UInt(0)));
        assert_ne!(f.role, g.role);
        assert_ne!(Role::Padding(1), Role::Padding(2));
    }

    #[test]
    fn test_role_flags() {
        assert!(Role::Plain.is_writable());
        assert!(!Role::Autolength(0).is_writable());
        assert!(Role::Padding(1).is_padding());
        assert_eq!(Role::Constant(Value::UInt(1)).name(), "constant");

        let f = FieldDescriptor::calculated("c", "B", |_| Ok(Value::UInt(0)));
        assert_eq!(format!("{:?}", f.role), "Calculated(<fn>)");
    }
}
