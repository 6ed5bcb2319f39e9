// 认证服务模块
// 会话内的当前身份与变更订阅；身份经 watch 通道广播，不落全局可变状态

use crate::models::UserIdentity;
use tokio::sync::watch;

/// 认证门面：持有当前身份，按订阅推送变更
pub struct AuthService {
    tx: watch::Sender<Option<UserIdentity>>,
}

impl AuthService {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// 当前登录身份；未登录为 None
    pub fn current_user(&self) -> Option<UserIdentity> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// 订阅身份变更；丢弃接收端即退订
    pub fn subscribe(&self) -> watch::Receiver<Option<UserIdentity>> {
        self.tx.subscribe()
    }

    /// 替换当前身份并广播
    pub fn set_current(&self, identity: Option<UserIdentity>) {
        match &identity {
            Some(user) => log::info!("signed in: {}", user.email),
            None => log::info!("signed out"),
        }
        self.tx.send_replace(identity);
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}
