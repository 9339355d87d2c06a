//! Identifier scopes of generated code.
//!
//! Descriptor validation compares member names as written. Backends rename
//! members on the way out (keyword escaping, case conversion, accessor
//! prefixes) and add names of their own, so each backend also checks the
//! identifiers it is about to emit with a [`MemberScope`] per target
//! language scope.

use std::collections::HashMap;

use crate::error::DescriptorError;

/// Emitted identifiers of one scope, mapped to the member that produced them.
#[derive(Debug, Clone)]
pub struct MemberScope<'a> {
    type_name: &'a str,
    names: HashMap<String, Option<String>>,
}

impl<'a> MemberScope<'a> {
    /// Create an empty scope for members of `type_name`.
    pub fn new(type_name: &'a str) -> Self {
        Self {
            type_name,
            names: HashMap::new(),
        }
    }

    /// Reserve identifiers the backend emits itself.
    pub fn with_reserved<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        for name in names {
            self.names.insert(name.as_ref().to_string(), None);
        }
        self
    }

    /// Declare `identifier`, emitted for descriptor member `member`.
    ///
    /// Fails with [`DescriptorError::DuplicateMember`] naming `member` when
    /// the identifier is reserved or was emitted for another member. Several
    /// identifiers may be declared for the same member.
    pub fn declare(
        &mut self,
        identifier: impl Into<String>,
        member: &str,
    ) -> Result<(), DescriptorError> {
        let identifier = identifier.into();
        match self.names.get(&identifier) {
            Some(Some(owner)) if owner == member => Ok(()),
            Some(_) => Err(DescriptorError::DuplicateMember {
                type_name: self.type_name.to_string(),
                member: member.to_string(),
            }),
            None => {
                self.names.insert(identifier, Some(member.to_string()));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_identifiers() {
        let mut scope = MemberScope::new("pkg.Msg");
        assert!(scope.declare("a", "a").is_ok());
        assert!(scope.declare("is_a", "a").is_ok());
        assert!(scope.declare("b", "b").is_ok());
    }

    #[test]
    fn test_same_identifier_from_two_members() {
        let mut scope = MemberScope::new("pkg.Msg");
        scope.declare("class_", "class").unwrap();
        assert_eq!(
            scope.declare("class_", "class_"),
            Err(DescriptorError::DuplicateMember {
                type_name: "pkg.Msg".to_string(),
                member: "class_".to_string(),
            })
        );
    }

    #[test]
    fn test_reserved_identifier() {
        let mut scope = MemberScope::new("pkg.Msg").with_reserved(["MAX_INDEX"]);
        assert!(matches!(
            scope.declare("MAX_INDEX", "MAX_INDEX"),
            Err(DescriptorError::DuplicateMember { .. })
        ));
    }

    #[test]
    fn test_redeclaring_for_the_same_member() {
        let mut scope = MemberScope::new("pkg.Msg");
        scope.declare("get_a_if", "a").unwrap();
        assert!(scope.declare("get_a_if", "a").is_ok());
    }
}
