use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const EASY_TOTAL: u32 = 650;
pub const MEDIUM_TOTAL: u32 = 1450;
pub const HARD_TOTAL: u32 = 600;
pub const TOTAL_PROBLEMS: u32 = EASY_TOTAL + MEDIUM_TOTAL + HARD_TOTAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemStatus {
    Solved,
    Attempted,
    Todo,
}

impl ProblemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemStatus::Solved => "Solved",
            ProblemStatus::Attempted => "Attempted",
            ProblemStatus::Todo => "Todo",
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Solved" => Ok(ProblemStatus::Solved),
            "Attempted" => Ok(ProblemStatus::Attempted),
            "Todo" => Ok(ProblemStatus::Todo),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub title_slug: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub status: ProblemStatus,
    pub solved_date: Option<NaiveDate>,
    pub last_attempt_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub time_spent: Option<i64>, // 分钟
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Problem {
    /// 由标题生成 URL slug（小写，非字母数字折叠为连字符）
    pub fn slug_for(title: &str) -> String {
        static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
        let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap());
        re.replace_all(&title.to_lowercase(), "-")
            .trim_matches('-')
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProgress {
    pub solved: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub easy: DifficultyProgress,
    pub medium: DifficultyProgress,
    pub hard: DifficultyProgress,
    pub total_solved: u32,
    pub total_problems: u32,
    pub streak: u32,
    pub last_solved_date: Option<NaiveDate>,
}

impl UserStats {
    /// 新用户的初始统计：各难度零解题，零连续打卡
    pub fn initial() -> Self {
        Self {
            easy: DifficultyProgress { solved: 0, total: EASY_TOTAL },
            medium: DifficultyProgress { solved: 0, total: MEDIUM_TOTAL },
            hard: DifficultyProgress { solved: 0, total: HARD_TOTAL },
            total_solved: 0,
            total_problems: TOTAL_PROBLEMS,
            streak: 0,
            last_solved_date: None,
        }
    }

    pub fn bucket(&self, difficulty: Difficulty) -> &DifficultyProgress {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn bucket_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyProgress {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

impl UserProfile {
    /// 合并写：None 字段保持原值
    pub fn merge_from(&mut self, patch: &UserProfile) {
        if let Some(name) = &patch.display_name {
            self.display_name = Some(name.clone());
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(bio) = &patch.bio {
            self.bio = Some(bio.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}
