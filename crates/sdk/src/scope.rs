use bitflags::bitflags;

use crate::error::ApiError;

bitflags! {
    /// Permission scope encoded in an API key.
    ///
    /// Each flag covers one permission domain. The empty scope is the
    /// admin sentinel and satisfies every requirement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Scope: u32 {
        const READ_FILE        = 0b0000_0001;
        const UPLOAD_FILE      = 0b0000_0010;
        const DELETE_FILE      = 0b0000_0100;

        const READ_DIRECTORY   = 0b0001_0000;
        const CREATE_DIRECTORY = 0b0010_0000;
        const DELETE_DIRECTORY = 0b0100_0000;
    }
}

impl Scope {
    /// Admin sentinel: no bits set, every check passes.
    pub const ADMIN: Scope = Scope::empty();

    pub fn is_admin(self) -> bool {
        self.bits() == 0
    }

    /// Whether this scope permits an operation requiring `required`.
    ///
    /// Admin always passes. Otherwise every required bit must be
    /// present; partial overlap is insufficient.
    pub fn allows(self, required: Scope) -> bool {
        if self.is_admin() {
            return true;
        }
        self.bits() & required.bits() == required.bits()
    }

    /// Capability check run before any network I/O. A denied operation
    /// never reaches the transport layer.
    pub fn enforce(self, required: Scope, message: &str) -> Result<(), ApiError> {
        if self.allows(required) {
            Ok(())
        } else {
            Err(ApiError::NotAllowed(message.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FLAGS: [Scope; 6] = [
        Scope::READ_FILE,
        Scope::UPLOAD_FILE,
        Scope::DELETE_FILE,
        Scope::READ_DIRECTORY,
        Scope::CREATE_DIRECTORY,
        Scope::DELETE_DIRECTORY,
    ];

    #[test]
    fn admin_bypasses_every_requirement() {
        for flag in ALL_FLAGS {
            assert!(Scope::ADMIN.allows(flag));
        }
        assert!(Scope::ADMIN.allows(Scope::UPLOAD_FILE | Scope::DELETE_FILE));
        assert!(Scope::ADMIN.allows(Scope::all()));
    }

    #[test]
    fn exact_subset_rule() {
        let scope = Scope::READ_FILE | Scope::READ_DIRECTORY;
        assert!(scope.allows(Scope::READ_FILE));
        assert!(scope.allows(Scope::READ_DIRECTORY));
        assert!(scope.allows(Scope::READ_FILE | Scope::READ_DIRECTORY));
        assert!(!scope.allows(Scope::UPLOAD_FILE));
        // nonzero overlap is not enough, every required bit must be set
        assert!(!scope.allows(Scope::READ_FILE | Scope::DELETE_FILE));
    }

    #[test]
    fn rename_requires_both_upload_and_delete() {
        let required = Scope::UPLOAD_FILE | Scope::DELETE_FILE;
        assert!(!Scope::UPLOAD_FILE.allows(required));
        assert!(!Scope::DELETE_FILE.allows(required));
        assert!((Scope::UPLOAD_FILE | Scope::DELETE_FILE).allows(required));
    }

    #[test]
    fn read_and_upload_scope_cannot_delete() {
        let scope = Scope::from_bits_retain(0b0000_0011);
        assert!(!scope.allows(Scope::DELETE_FILE));
        assert!(scope.enforce(Scope::DELETE_FILE, "DELETE_FILE is not allowed.").is_err());
    }

    #[test]
    fn unknown_bits_do_not_grant_admin() {
        // a scope minted with only unassigned bits is still non-admin
        let scope = Scope::from_bits_retain(0b1000_0000);
        assert!(!scope.is_admin());
        assert!(!scope.allows(Scope::READ_FILE));
    }

    #[test]
    fn enforce_carries_the_message() {
        let err = Scope::READ_FILE
            .enforce(Scope::DELETE_FILE, "DELETE_FILE is not allowed.")
            .unwrap_err();
        assert_eq!(err.to_string(), "DELETE_FILE is not allowed.");
    }
}
