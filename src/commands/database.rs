// 数据命令模块
// 提供供界面调用的题目、统计与资料操作命令；
// 已登录走 SQLite 存储，未登录走内存演示存储

use crate::error::StorageError;
use crate::models::{Problem, ProblemStatus, UserProfile};
use crate::services::filter::{status_summary, ProblemFilter, StatusSummary};
use crate::services::stats;
use crate::services::store::{ProblemStore, ProfileStore, StatsPatch, StatsStore, TrackerStore};
use crate::AppState;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 演示访客的存储键
pub const GUEST_USER_ID: &str = "guest";

/// 题目传输对象（界面传入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemInput {
    pub id: i64,
    pub title: String,
    pub title_slug: Option<String>,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub status: String,
    pub solved_date: Option<String>,
    pub last_attempt_date: Option<String>,
    pub notes: Option<String>,
    pub time_spent: Option<i64>,
}

impl ProblemInput {
    fn into_problem(self) -> Result<Problem, String> {
        let title_slug = match self.title_slug {
            Some(slug) if !slug.is_empty() => slug,
            _ => Problem::slug_for(&self.title),
        };

        Ok(Problem {
            id: self.id,
            title: self.title,
            title_slug,
            difficulty: self.difficulty.parse()?,
            tags: self.tags,
            status: self.status.parse()?,
            solved_date: parse_date(self.solved_date)?,
            last_attempt_date: parse_date(self.last_attempt_date)?,
            notes: self.notes,
            time_spent: self.time_spent,
            updated_at: Utc::now(),
        })
    }
}

fn parse_date(value: Option<String>) -> Result<Option<chrono::NaiveDate>, String> {
    value
        .map(|s| s.parse().map_err(|_| format!("invalid date: {}", s)))
        .transpose()
}

/// 题目传输对象（返回给界面）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDto {
    pub id: i64,
    pub title: String,
    pub title_slug: String,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub status: String,
    pub solved_date: Option<String>,
    pub last_attempt_date: Option<String>,
    pub notes: Option<String>,
    pub time_spent: Option<i64>,
    pub updated_at: String,
}

impl From<Problem> for ProblemDto {
    fn from(p: Problem) -> Self {
        Self {
            id: p.id,
            title: p.title,
            title_slug: p.title_slug,
            difficulty: p.difficulty.to_string(),
            tags: p.tags,
            status: p.status.to_string(),
            solved_date: p.solved_date.map(|d| d.to_string()),
            last_attempt_date: p.last_attempt_date.map(|d| d.to_string()),
            notes: p.notes,
            time_spent: p.time_spent,
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// 难度进度传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyProgressDto {
    pub solved: u32,
    pub total: u32,
}

/// 统计传输对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsDto {
    pub easy: DifficultyProgressDto,
    pub medium: DifficultyProgressDto,
    pub hard: DifficultyProgressDto,
    pub total_solved: u32,
    pub total_problems: u32,
    pub streak: u32,
    pub last_solved_date: Option<String>,
    pub completion: f64,
}

impl From<crate::models::UserStats> for UserStatsDto {
    fn from(s: crate::models::UserStats) -> Self {
        let completion = stats::completion_percentage(s.total_solved, s.total_problems);
        Self {
            easy: DifficultyProgressDto { solved: s.easy.solved, total: s.easy.total },
            medium: DifficultyProgressDto { solved: s.medium.solved, total: s.medium.total },
            hard: DifficultyProgressDto { solved: s.hard.solved, total: s.hard.total },
            total_solved: s.total_solved,
            total_problems: s.total_problems,
            streak: s.streak,
            last_solved_date: s.last_solved_date.map(|d| d.to_string()),
            completion,
        }
    }
}

/// 按身份选择存储：已登录走数据库，否则走演示数据
fn resolve_store(state: &AppState) -> (&dyn TrackerStore, String) {
    match state.auth.current_user() {
        Some(user) => (&state.db, user.id),
        None => (&state.demo, GUEST_USER_ID.to_string()),
    }
}

/// 获取题目列表
pub async fn get_problems(state: &AppState) -> Result<Vec<ProblemDto>, String> {
    let (store, user_id) = resolve_store(state);

    let problems = store.list_problems(&user_id).map_err(|e| e.to_string())?;
    Ok(problems.into_iter().map(ProblemDto::from).collect())
}

/// 按条件筛选题目
pub async fn filter_problems(
    state: &AppState,
    filter: ProblemFilter,
) -> Result<Vec<ProblemDto>, String> {
    let (store, user_id) = resolve_store(state);

    let problems = store.list_problems(&user_id).map_err(|e| e.to_string())?;
    Ok(filter
        .apply(&problems)
        .into_iter()
        .map(ProblemDto::from)
        .collect())
}

/// 获取单道题目
pub async fn get_problem(state: &AppState, id: i64) -> Result<Option<ProblemDto>, String> {
    let (store, user_id) = resolve_store(state);

    let problem = store.get_problem(&user_id, id).map_err(|e| e.to_string())?;
    Ok(problem.map(ProblemDto::from))
}

/// 保存题目（整条替换）；状态为 Solved 时联动统计更新
pub async fn save_problem(state: &AppState, input: ProblemInput) -> Result<(), String> {
    let (store, user_id) = resolve_store(state);
    let problem = input.into_problem()?;

    if problem.status == ProblemStatus::Solved {
        let today = stats::today();
        let current = store.read_stats(&user_id).map_err(|e| e.to_string())?;
        let next = stats::apply_solved(&current, &problem, today);

        if next != current {
            store
                .record_solve(&user_id, &problem, &StatsPatch::from(next))
                .map_err(|e| {
                    log::error!("failed to record solve for problem {}: {}", problem.id, e);
                    e.to_string()
                })?;
            return Ok(());
        }
    }

    store.upsert_problem(&user_id, &problem).map_err(|e| {
        log::error!("failed to save problem {}: {}", problem.id, e);
        e.to_string()
    })
}

/// 标记题目已解决：更新状态与解题日期，联动统计
pub async fn mark_problem_solved(state: &AppState, id: i64) -> Result<(), String> {
    let (store, user_id) = resolve_store(state);

    let stored = store
        .get_problem(&user_id, id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| StorageError::NotFound(format!("problem {}", id)).to_string())?;

    // 守卫依据落盘前的 solved_date 判断是否当日已计数
    let today = stats::today();
    let current = store.read_stats(&user_id).map_err(|e| e.to_string())?;
    let next = stats::apply_solved(&current, &stored, today);

    let mut updated = stored;
    updated.status = ProblemStatus::Solved;
    updated.solved_date = Some(today);
    updated.updated_at = Utc::now();

    if next != current {
        store
            .record_solve(&user_id, &updated, &StatsPatch::from(next))
            .map_err(|e| {
                log::error!("failed to record solve for problem {}: {}", id, e);
                e.to_string()
            })
    } else {
        store.upsert_problem(&user_id, &updated).map_err(|e| {
            log::error!("failed to save problem {}: {}", id, e);
            e.to_string()
        })
    }
}

/// 删除题目；不回退已计入的统计
pub async fn delete_problem(state: &AppState, id: i64) -> Result<(), String> {
    let (store, user_id) = resolve_store(state);

    store.delete_problem(&user_id, id).map_err(|e| {
        log::error!("failed to delete problem {}: {}", id, e);
        e.to_string()
    })
}

/// 获取用户统计；新用户首读即建立初始记录
pub async fn get_user_stats(state: &AppState) -> Result<UserStatsDto, String> {
    let (store, user_id) = resolve_store(state);

    let stats = store.read_stats(&user_id).map_err(|e| e.to_string())?;
    Ok(UserStatsDto::from(stats))
}

/// 状态分布计数
pub async fn get_status_summary(state: &AppState) -> Result<StatusSummary, String> {
    let (store, user_id) = resolve_store(state);

    let problems = store.list_problems(&user_id).map_err(|e| e.to_string())?;
    Ok(status_summary(&problems))
}

/// 获取用户资料
pub async fn get_user_profile(state: &AppState) -> Result<UserProfile, String> {
    let (store, user_id) = resolve_store(state);
    store.read_profile(&user_id).map_err(|e| e.to_string())
}

/// 保存用户资料（合并写）
pub async fn save_user_profile(state: &AppState, patch: UserProfile) -> Result<(), String> {
    let (store, user_id) = resolve_store(state);

    store.write_profile(&user_id, &patch).map_err(|e| {
        log::error!("failed to save profile: {}", e);
        e.to_string()
    })
}
