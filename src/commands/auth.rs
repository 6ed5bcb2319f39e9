// 认证命令模块
// 注册、登录、登出与当前身份查询

use crate::error::AuthError;
use crate::models::UserIdentity;
use crate::AppState;
use bcrypt::{hash, verify, DEFAULT_COST};

/// 注册新用户并登录；同时建立初始统计文档
pub async fn register_user(
    state: &AppState,
    email: String,
    password: String,
    display_name: String,
) -> Result<UserIdentity, String> {
    register_inner(state, &email, &password, &display_name).map_err(|e| {
        log::error!("registration failed for {}: {}", email, e);
        e.to_string()
    })
}

fn register_inner(
    state: &AppState,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<UserIdentity, AuthError> {
    if state.db.find_auth_user(email)?.is_some() {
        return Err(AuthError::EmailTaken(email.to_string()));
    }

    let password_hash = hash(password, DEFAULT_COST)?;
    let identity = state.db.create_user(email, display_name, &password_hash)?;
    state.auth.set_current(Some(identity.clone()));
    Ok(identity)
}

/// 邮箱密码登录
pub async fn sign_in(
    state: &AppState,
    email: String,
    password: String,
) -> Result<UserIdentity, String> {
    sign_in_inner(state, &email, &password).map_err(|e| {
        log::warn!("sign in failed for {}: {}", email, e);
        e.to_string()
    })
}

fn sign_in_inner(state: &AppState, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
    let user = state
        .db
        .find_auth_user(email)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    state.auth.set_current(Some(user.identity.clone()));
    Ok(user.identity)
}

/// 登出；后续命令回落到演示数据
pub async fn sign_out(state: &AppState) -> Result<(), String> {
    state.auth.set_current(None);
    Ok(())
}

/// 当前登录身份
pub async fn current_user(state: &AppState) -> Option<UserIdentity> {
    state.auth.current_user()
}
