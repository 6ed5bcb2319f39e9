// 服务模块
// 提供核心业务逻辑服务

pub mod auth;
pub mod database;
pub mod demo;
pub mod filter;
pub mod stats;
pub mod store;

pub use auth::AuthService;

pub use database::{
    AuthUser,
    DatabaseService,
};

pub use demo::{
    demo_problems,
    demo_profile,
    demo_stats,
    DemoService,
};

pub use filter::{
    status_summary,
    ProblemFilter,
    StatusSummary,
};

pub use stats::{
    apply_solved,
    completion_percentage,
    today,
};

pub use store::{
    ProblemStore,
    ProfileStore,
    StatsPatch,
    StatsStore,
    TrackerStore,
};
