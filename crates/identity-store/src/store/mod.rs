//! Store capability surface consumed by identity frameworks.

mod role_store;
mod user_store;

pub use role_store::{DocumentRoleStore, RoleClaimStore, RoleStore};
pub use user_store::{
    DocumentUserStore, UserAuthenticatorKeyStore, UserClaimStore, UserEmailStore,
    UserLockoutStore, UserLoginStore, UserPasswordStore, UserPhoneNumberStore,
    UserRecoveryCodeStore, UserRoleStore, UserSecurityStampStore, UserStore, UserTokenStore,
    UserTwoFactorStore,
};
