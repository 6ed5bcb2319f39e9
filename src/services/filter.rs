// 列表筛选模块
// 题目列表的调用方侧筛选：标题关键字、难度集合、状态集合

use crate::models::{Difficulty, Problem, ProblemStatus};
use serde::{Deserialize, Serialize};

/// 筛选条件；默认全难度、全状态、无关键字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemFilter {
    pub search: Option<String>,
    pub difficulties: Vec<Difficulty>,
    pub statuses: Vec<ProblemStatus>,
}

impl Default for ProblemFilter {
    fn default() -> Self {
        Self {
            search: None,
            difficulties: vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard],
            statuses: vec![
                ProblemStatus::Solved,
                ProblemStatus::Attempted,
                ProblemStatus::Todo,
            ],
        }
    }
}

impl ProblemFilter {
    /// 关键字对标题做大小写无关的包含匹配
    pub fn matches(&self, problem: &Problem) -> bool {
        let matches_search = match &self.search {
            Some(term) if !term.is_empty() => problem
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };

        matches_search
            && self.difficulties.contains(&problem.difficulty)
            && self.statuses.contains(&problem.status)
    }

    pub fn apply(&self, problems: &[Problem]) -> Vec<Problem> {
        problems
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

/// 状态分布计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub solved: usize,
    pub attempted: usize,
    pub todo: usize,
}

pub fn status_summary(problems: &[Problem]) -> StatusSummary {
    let mut summary = StatusSummary::default();
    for problem in problems {
        match problem.status {
            ProblemStatus::Solved => summary.solved += 1,
            ProblemStatus::Attempted => summary.attempted += 1,
            ProblemStatus::Todo => summary.todo += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(id: i64, title: &str, difficulty: Difficulty, status: ProblemStatus) -> Problem {
        Problem {
            id,
            title: title.to_string(),
            title_slug: Problem::slug_for(title),
            difficulty,
            tags: Vec::new(),
            status,
            solved_date: None,
            last_attempt_date: None,
            notes: None,
            time_spent: None,
            updated_at: chrono::Utc::now(),
        }
    }

    fn sample() -> Vec<Problem> {
        vec![
            problem(1, "Two Sum", Difficulty::Easy, ProblemStatus::Solved),
            problem(4, "Median of Two Sorted Arrays", Difficulty::Hard, ProblemStatus::Attempted),
            problem(20, "Valid Parentheses", Difficulty::Easy, ProblemStatus::Todo),
            problem(146, "LRU Cache", Difficulty::Medium, ProblemStatus::Todo),
        ]
    }

    #[test]
    fn test_default_filter_passes_everything() {
        let filter = ProblemFilter::default();
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = ProblemFilter {
            search: Some("two".to_string()),
            ..Default::default()
        };
        let matched = filter.apply(&sample());
        let ids: Vec<i64> = matched.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_difficulty_and_status_sets_narrow() {
        let filter = ProblemFilter {
            difficulties: vec![Difficulty::Easy],
            statuses: vec![ProblemStatus::Todo],
            ..Default::default()
        };
        let matched = filter.apply(&sample());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, 20);
    }

    #[test]
    fn test_empty_sets_match_nothing() {
        let filter = ProblemFilter {
            difficulties: Vec::new(),
            ..Default::default()
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn test_status_summary_counts() {
        let summary = status_summary(&sample());
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.todo, 2);
    }
}
