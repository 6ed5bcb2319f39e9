// 持久化契约模块
// 题目集合与用户统计的存储接口；SQLite 实现与内存演示实现共用同一契约

use crate::error::StorageError;
use crate::models::{DifficultyProgress, Problem, UserProfile, UserStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 统计记录的合并写载荷
///
/// `Some` 字段整体覆盖存储值，`None` 字段保持原值不动。
/// 领域内没有"清除 last_solved_date"的路径，Option 即代表字段缺席。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsPatch {
    pub easy: Option<DifficultyProgress>,
    pub medium: Option<DifficultyProgress>,
    pub hard: Option<DifficultyProgress>,
    pub total_solved: Option<u32>,
    pub total_problems: Option<u32>,
    pub streak: Option<u32>,
    pub last_solved_date: Option<NaiveDate>,
}

impl StatsPatch {
    /// 将载荷合并进现有统计记录
    pub fn apply(&self, stats: &mut UserStats) {
        if let Some(easy) = self.easy {
            stats.easy = easy;
        }
        if let Some(medium) = self.medium {
            stats.medium = medium;
        }
        if let Some(hard) = self.hard {
            stats.hard = hard;
        }
        if let Some(total_solved) = self.total_solved {
            stats.total_solved = total_solved;
        }
        if let Some(total_problems) = self.total_problems {
            stats.total_problems = total_problems;
        }
        if let Some(streak) = self.streak {
            stats.streak = streak;
        }
        if let Some(date) = self.last_solved_date {
            stats.last_solved_date = Some(date);
        }
    }
}

impl From<UserStats> for StatsPatch {
    fn from(stats: UserStats) -> Self {
        Self {
            easy: Some(stats.easy),
            medium: Some(stats.medium),
            hard: Some(stats.hard),
            total_solved: Some(stats.total_solved),
            total_problems: Some(stats.total_problems),
            streak: Some(stats.streak),
            last_solved_date: stats.last_solved_date,
        }
    }
}

/// 题目存储：按 (user_id, problem_id) 定位，整条替换写入
pub trait ProblemStore {
    /// 列出用户的全部题目；排序由存储自身决定，调用方自行筛选
    fn list_problems(&self, user_id: &str) -> Result<Vec<Problem>, StorageError>;

    /// 按 id 读取单条题目
    fn get_problem(&self, user_id: &str, problem_id: i64)
        -> Result<Option<Problem>, StorageError>;

    /// 整条替换写入（非字段合并）
    fn upsert_problem(&self, user_id: &str, problem: &Problem) -> Result<(), StorageError>;

    /// 删除题目；已计入的统计不回退
    fn delete_problem(&self, user_id: &str, problem_id: i64) -> Result<(), StorageError>;
}

/// 统计存储：每用户一条聚合记录，首次读取时惰性建立
pub trait StatsStore {
    /// 读取统计；记录不存在时写入初始记录后返回（get-or-create）
    fn read_stats(&self, user_id: &str) -> Result<UserStats, StorageError>;

    /// 合并写入，幂等
    fn write_stats(&self, user_id: &str, patch: &StatsPatch) -> Result<(), StorageError>;
}

/// 用户资料存储：合并写入
pub trait ProfileStore {
    fn read_profile(&self, user_id: &str) -> Result<UserProfile, StorageError>;

    /// `None` 字段保持原值（merge 语义）
    fn write_profile(&self, user_id: &str, patch: &UserProfile) -> Result<(), StorageError>;
}

/// 完整的追踪存储能力
pub trait TrackerStore: ProblemStore + StatsStore + ProfileStore {
    /// 记录一次解题事件：题目写入，然后统计写入。
    ///
    /// 默认实现是两步独立写，第一步成功后第二步失败会留下过期的统计
    /// （不支持事务的后端的已知缺口）。支持事务的实现应覆盖本方法，
    /// 把两次写放进同一事务。
    fn record_solve(
        &self,
        user_id: &str,
        problem: &Problem,
        patch: &StatsPatch,
    ) -> Result<(), StorageError> {
        self.upsert_problem(user_id, problem)?;
        self.write_stats(user_id, patch)
    }
}
