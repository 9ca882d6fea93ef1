//! JWT 令牌服务
//!
//! Tokens are issued by the external identity provider and verified here
//! with the shared HS256 secret. `sub` carries the user id.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted secret length
pub const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 共享密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
    /// Lifetime of tokens minted by [`JwtService::generate_token`] (minutes)
    pub expiration_minutes: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "tablebook-auth".to_string(),
            audience: "tablebook".to_string(),
            expiration_minutes: 1440,
        }
    }

    /// 从环境变量加载
    ///
    /// `JWT_SECRET` is mandatory in release builds. Debug builds fall back to
    /// a random key so a fresh checkout starts without configuration.
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(JwtError::ConfigError(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Ok(secret) => secret,
            Err(_) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!(
                        "⚠️  JWT_SECRET not set! Generating temporary key for development."
                    );
                    generate_printable_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    return Err(JwtError::ConfigError(
                        "JWT_SECRET environment variable must be set in production!".to_string(),
                    ));
                }
            }
        };

        let mut config = Self::new(secret);
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.issuer = issuer;
        }
        if let Ok(audience) = std::env::var("JWT_AUDIENCE") {
            config.audience = audience;
        }
        if let Some(minutes) = std::env::var("JWT_EXPIRATION_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.expiration_minutes = minutes;
        }
        Ok(config)
    }
}

/// 生成可打印的随机密钥 (开发环境)
pub fn generate_printable_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// Display name, when the identity provider includes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Mint a token with this service's issuer and audience.
    ///
    /// Production tokens come from the identity provider; this is for local
    /// tooling and tests that share the secret.
    pub fn generate_token(&self, user_id: &str, name: Option<&str>) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.map(str::to_string),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: String,
    pub display_name: Option<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            display_name: claims.name,
        }
    }
}
