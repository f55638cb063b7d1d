//! Sum types for the roles, modes, and the per-property direction flag that
//! the store only ever represents as magic strings. Parsing happens once at
//! cache-read time; everything downstream matches on these instead of `&str`.

use std::fmt;

/// The two roles a capability can play in a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Provider,
    Consumer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Consumer => "consumer",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "provider" => Some(Role::Provider),
            "consumer" => Some(Role::Consumer),
            _ => None,
        }
    }

    /// The role that sits at the other end of a connection.
    pub fn opposite(self) -> Role {
        match self {
            Role::Provider => Role::Consumer,
            Role::Consumer => Role::Provider,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scope policy used by the matchmaker.
///
/// Per the REDESIGN FLAGS decision, only the general `allsystems`/`bysystem`
/// pair is accepted; the historical `nodes`/`contexts` aliases are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AllSystems,
    BySystem,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Mode> {
        match s {
            "allsystems" => Some(Mode::AllSystems),
            "bysystem" => Some(Mode::BySystem),
            _ => None,
        }
    }
}

/// Who owns a property per the profile's per-property `provider` flag:
/// `"yes"` means providers own it (value flows provider -> consumer),
/// anything else means consumers own it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    ProviderOwns,
    ConsumerOwns,
}

impl Dir {
    pub fn from_provider_flag(flag: &str) -> Dir {
        if flag == "yes" {
            Dir::ProviderOwns
        } else {
            Dir::ConsumerOwns
        }
    }
}

/// `oppositeRole(role, providerFlag)` from spec §8's laws: the role that is
/// allowed to write and whose write must propagate, or `None` if the write
/// did not originate from the owning side and must be ignored.
pub fn opposite_role(role: Role, dir: Dir) -> Option<Role> {
    match (role, dir) {
        (Role::Provider, Dir::ProviderOwns) => Some(Role::Consumer),
        (Role::Consumer, Dir::ConsumerOwns) => Some(Role::Provider),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_and_opposite() {
        assert_eq!(Role::parse("provider"), Some(Role::Provider));
        assert_eq!(Role::parse("consumer"), Some(Role::Consumer));
        assert_eq!(Role::parse("bogus"), None);
        assert_eq!(Role::Provider.opposite(), Role::Consumer);
        assert_eq!(Role::Consumer.opposite(), Role::Provider);
    }

    #[test]
    fn mode_parse_rejects_legacy_aliases() {
        assert_eq!(Mode::parse("allsystems"), Some(Mode::AllSystems));
        assert_eq!(Mode::parse("bysystem"), Some(Mode::BySystem));
        assert_eq!(Mode::parse("nodes"), None);
        assert_eq!(Mode::parse("contexts"), None);
    }

    #[test]
    fn opposite_role_law() {
        assert_eq!(
            opposite_role(Role::Provider, Dir::ProviderOwns),
            Some(Role::Consumer)
        );
        assert_eq!(
            opposite_role(Role::Consumer, Dir::ConsumerOwns),
            Some(Role::Provider)
        );
        assert_eq!(opposite_role(Role::Provider, Dir::ConsumerOwns), None);
        assert_eq!(opposite_role(Role::Consumer, Dir::ProviderOwns), None);
    }
}
