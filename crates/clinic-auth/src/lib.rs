//! # clinic-auth
//!
//! Authentication and authorization building blocks.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token creation, validation, and revocation
//! - `password`: Argon2id hashing and strength policy
//! - `rbac`: role-to-permission matrix and enforcement

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Permission, RbacEnforcer, RbacPolicies};
