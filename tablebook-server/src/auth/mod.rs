//! 认证模块
//!
//! - [`JwtService`] - JWT 令牌校验
//! - [`CurrentUser`] - 当前用户上下文 (axum extractor)
//! - [`Identity`] - 工作流使用的显式身份上下文

pub mod extractor;
pub mod identity;
pub mod jwt;

pub use identity::{Identity, IdentityError};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
