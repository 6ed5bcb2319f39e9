// 演示数据模块
// 未登录时使用的内存存储，预置固定的演示题目与统计

use crate::error::StorageError;
use crate::models::{
    Difficulty, DifficultyProgress, Problem, ProblemStatus, UserProfile, UserStats,
};
use crate::services::store::{ProblemStore, ProfileStore, StatsPatch, StatsStore, TrackerStore};
use crate::services::stats;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Mutex;

fn demo_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 固定的六道演示题目
pub fn demo_problems() -> Vec<Problem> {
    let now = chrono::Utc::now();
    vec![
        Problem {
            id: 1,
            title: "Two Sum".to_string(),
            title_slug: "two-sum".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["Array".to_string(), "Hash Table".to_string()],
            status: ProblemStatus::Solved,
            solved_date: Some(demo_date(2024, 4, 5)),
            last_attempt_date: None,
            notes: Some("Used a hash map to store values and their indices.".to_string()),
            time_spent: Some(15),
            updated_at: now,
        },
        Problem {
            id: 3,
            title: "Longest Substring Without Repeating Characters".to_string(),
            title_slug: "longest-substring-without-repeating-characters".to_string(),
            difficulty: Difficulty::Medium,
            tags: vec!["String".to_string(), "Sliding Window".to_string()],
            status: ProblemStatus::Solved,
            solved_date: Some(demo_date(2024, 4, 3)),
            last_attempt_date: None,
            notes: Some("Used sliding window technique.".to_string()),
            time_spent: Some(25),
            updated_at: now,
        },
        Problem {
            id: 4,
            title: "Median of Two Sorted Arrays".to_string(),
            title_slug: "median-of-two-sorted-arrays".to_string(),
            difficulty: Difficulty::Hard,
            tags: vec!["Array".to_string(), "Binary Search".to_string()],
            status: ProblemStatus::Attempted,
            solved_date: None,
            last_attempt_date: Some(demo_date(2024, 4, 1)),
            notes: None,
            time_spent: None,
            updated_at: now,
        },
        Problem {
            id: 20,
            title: "Valid Parentheses".to_string(),
            title_slug: "valid-parentheses".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["Stack".to_string(), "String".to_string()],
            status: ProblemStatus::Todo,
            solved_date: None,
            last_attempt_date: None,
            notes: None,
            time_spent: None,
            updated_at: now,
        },
        Problem {
            id: 53,
            title: "Maximum Subarray".to_string(),
            title_slug: "maximum-subarray".to_string(),
            difficulty: Difficulty::Medium,
            tags: vec!["Array".to_string(), "Dynamic Programming".to_string()],
            status: ProblemStatus::Solved,
            solved_date: Some(demo_date(2024, 4, 7)),
            last_attempt_date: None,
            notes: Some("Used Kadane's algorithm for optimal solution.".to_string()),
            time_spent: Some(20),
            updated_at: now,
        },
        Problem {
            id: 146,
            title: "LRU Cache".to_string(),
            title_slug: "lru-cache".to_string(),
            difficulty: Difficulty::Medium,
            tags: vec![
                "Hash Table".to_string(),
                "Linked List".to_string(),
                "Design".to_string(),
            ],
            status: ProblemStatus::Todo,
            solved_date: None,
            last_attempt_date: None,
            notes: None,
            time_spent: None,
            updated_at: now,
        },
    ]
}

/// 固定的演示统计记录
pub fn demo_stats(today: NaiveDate) -> UserStats {
    UserStats {
        easy: DifficultyProgress { solved: 45, total: 650 },
        medium: DifficultyProgress { solved: 28, total: 1450 },
        hard: DifficultyProgress { solved: 12, total: 600 },
        total_solved: 85,
        total_problems: 2700,
        streak: 7,
        last_solved_date: Some(today),
    }
}

/// 演示资料
pub fn demo_profile() -> UserProfile {
    UserProfile {
        display_name: Some("John Smith".to_string()),
        email: Some("johnsmith@example.com".to_string()),
        bio: Some(
            "JavaScript developer passionate about algorithms and data structures. \
             Currently focusing on dynamic programming and graph algorithms."
                .to_string(),
        ),
    }
}

struct DemoState {
    problems: BTreeMap<i64, Problem>,
    stats: UserStats,
    profile: UserProfile,
}

/// 演示存储：会话期内存状态，进程结束即丢弃。
/// user_id 参数被忽略，演示访客只有一份数据。
pub struct DemoService {
    state: Mutex<DemoState>,
}

impl DemoService {
    pub fn new() -> Self {
        let problems = demo_problems()
            .into_iter()
            .map(|p| (p.id, p))
            .collect::<BTreeMap<_, _>>();
        Self {
            state: Mutex::new(DemoState {
                problems,
                stats: demo_stats(stats::today()),
                profile: demo_profile(),
            }),
        }
    }
}

impl Default for DemoService {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemStore for DemoService {
    fn list_problems(&self, _user_id: &str) -> Result<Vec<Problem>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.problems.values().cloned().collect())
    }

    fn get_problem(
        &self,
        _user_id: &str,
        problem_id: i64,
    ) -> Result<Option<Problem>, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.problems.get(&problem_id).cloned())
    }

    fn upsert_problem(&self, _user_id: &str, problem: &Problem) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.problems.insert(problem.id, problem.clone());
        Ok(())
    }

    fn delete_problem(&self, _user_id: &str, problem_id: i64) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.problems.remove(&problem_id);
        Ok(())
    }
}

impl StatsStore for DemoService {
    fn read_stats(&self, _user_id: &str) -> Result<UserStats, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.stats.clone())
    }

    fn write_stats(&self, _user_id: &str, patch: &StatsPatch) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        patch.apply(&mut state.stats);
        Ok(())
    }
}

impl ProfileStore for DemoService {
    fn read_profile(&self, _user_id: &str) -> Result<UserProfile, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state.profile.clone())
    }

    fn write_profile(&self, _user_id: &str, patch: &UserProfile) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        let mut merged = state.profile.clone();
        merged.merge_from(patch);
        state.profile = merged;
        Ok(())
    }
}

impl TrackerStore for DemoService {
    /// 两次写在同一把锁内完成
    fn record_solve(
        &self,
        _user_id: &str,
        problem: &Problem,
        patch: &StatsPatch,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.problems.insert(problem.id, problem.clone());
        patch.apply(&mut state.stats);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_problem_literals() {
        let problems = demo_problems();
        let ids: Vec<i64> = problems.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 4, 20, 53, 146]);

        let two_sum = &problems[0];
        assert_eq!(two_sum.title, "Two Sum");
        assert_eq!(two_sum.title_slug, "two-sum");
        assert_eq!(two_sum.difficulty, Difficulty::Easy);
        assert_eq!(two_sum.status, ProblemStatus::Solved);
        assert_eq!(two_sum.solved_date, Some(demo_date(2024, 4, 5)));
        assert_eq!(two_sum.time_spent, Some(15));

        // 三种难度与三种状态都覆盖到
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert!(problems.iter().any(|p| p.difficulty == d));
        }
        for s in [ProblemStatus::Solved, ProblemStatus::Attempted, ProblemStatus::Todo] {
            assert!(problems.iter().any(|p| p.status == s));
        }
    }

    #[test]
    fn test_demo_stats_literals() {
        let today = demo_date(2024, 4, 10);
        let stats = demo_stats(today);
        assert_eq!(stats.easy, DifficultyProgress { solved: 45, total: 650 });
        assert_eq!(stats.medium, DifficultyProgress { solved: 28, total: 1450 });
        assert_eq!(stats.hard, DifficultyProgress { solved: 12, total: 600 });
        assert_eq!(stats.total_solved, 85);
        assert_eq!(stats.total_problems, 2700);
        assert_eq!(stats.streak, 7);
        assert_eq!(stats.last_solved_date, Some(today));
    }

    #[test]
    fn test_demo_store_round_trip() {
        let demo = DemoService::new();

        assert_eq!(demo.list_problems("guest").unwrap().len(), 6);

        let mut p = demo.get_problem("guest", 20).unwrap().unwrap();
        p.status = ProblemStatus::Solved;
        demo.upsert_problem("guest", &p).unwrap();
        assert_eq!(
            demo.get_problem("guest", 20).unwrap().unwrap().status,
            ProblemStatus::Solved
        );

        demo.delete_problem("guest", 146).unwrap();
        assert!(demo.get_problem("guest", 146).unwrap().is_none());
    }

    #[test]
    fn test_demo_record_solve_updates_both() {
        let demo = DemoService::new();
        let today = demo_date(2024, 4, 11);

        let mut p = demo.get_problem("guest", 20).unwrap().unwrap();
        p.status = ProblemStatus::Solved;
        p.solved_date = Some(today);

        let before = demo.read_stats("guest").unwrap();
        let next = stats::apply_solved(&before, &demo.get_problem("guest", 20).unwrap().unwrap(), today);
        demo.record_solve("guest", &p, &StatsPatch::from(next.clone())).unwrap();

        assert_eq!(demo.read_stats("guest").unwrap(), next);
        assert_eq!(
            demo.get_problem("guest", 20).unwrap().unwrap().solved_date,
            Some(today)
        );
    }
}
