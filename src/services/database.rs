// 数据库服务模块
// 提供 SQLite 持久化：每用户的题目集合、统计文档与资料文档

use crate::error::StorageError;
use crate::models::{Problem, UserIdentity, UserProfile, UserStats};
use crate::services::store::{ProblemStore, ProfileStore, StatsPatch, StatsStore, TrackerStore};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, Row};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// 认证用的用户行
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: UserIdentity,
    pub password_hash: String,
}

/// 数据库服务
pub struct DatabaseService {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DatabaseService {
    /// 打开指定路径的数据库，必要时建立数据目录与表结构
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;

        // WAL 模式
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        let service = Self {
            conn: Mutex::new(conn),
            db_path: Some(path),
        };
        service.initialize()?;
        Ok(service)
    }

    /// 打开进程内内存数据库（测试用）
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let service = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
        };
        service.initialize()?;
        Ok(service)
    }

    /// 默认数据库路径：可执行文件旁的 data 目录
    pub fn default_db_path() -> Result<PathBuf, StorageError> {
        let exe_path = std::env::current_exe()?;
        let exe_dir = exe_path.parent().unwrap_or(Path::new("."));
        Ok(exe_dir.join("data").join("leetrack.db"))
    }

    /// 按默认路径打开
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(Self::default_db_path()?)
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// 初始化表结构
    fn initialize(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_stats (
                user_id TEXT PRIMARY KEY,
                doc TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                doc TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS problems (
                user_id TEXT NOT NULL,
                id INTEGER NOT NULL,
                title TEXT NOT NULL,
                title_slug TEXT NOT NULL,
                difficulty TEXT NOT NULL CHECK(difficulty IN ('Easy', 'Medium', 'Hard')),
                tags TEXT NOT NULL,
                status TEXT NOT NULL CHECK(status IN ('Solved', 'Attempted', 'Todo')),
                solved_date TEXT,
                last_attempt_date TEXT,
                notes TEXT,
                time_spent INTEGER,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, id)
            );

            CREATE INDEX IF NOT EXISTS idx_problems_status ON problems(user_id, status);
            CREATE INDEX IF NOT EXISTS idx_problems_difficulty ON problems(user_id, difficulty);
        ",
        )?;

        if let Some(path) = &self.db_path {
            log::info!("database initialized at {}", path.display());
        }
        Ok(())
    }

    // ==================== 用户账户 ====================

    /// 建立用户行并播种初始统计文档（单事务）
    pub fn create_user(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<UserIdentity, StorageError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO users (id, email, display_name, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, email, display_name, password_hash, now],
        )?;
        Self::put_stats(&tx, &id, &UserStats::initial())?;

        tx.commit()?;
        Ok(UserIdentity {
            id,
            email: email.to_string(),
            display_name: display_name.to_string(),
        })
    }

    /// 按邮箱查找用户行
    pub fn find_auth_user(&self, email: &str) -> Result<Option<AuthUser>, StorageError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, email, display_name, password_hash FROM users WHERE email = ?1",
        )?;
        let mut rows = stmt.query(rusqlite::params![email])?;

        if let Some(row) = rows.next()? {
            Ok(Some(AuthUser {
                identity: UserIdentity {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    display_name: row.get(2)?,
                },
                password_hash: row.get(3)?,
            }))
        } else {
            Ok(None)
        }
    }

    // ==================== 辅助方法 ====================

    fn row_to_problem(row: &Row) -> Result<Problem, StorageError> {
        let difficulty: String = row.get(4)?;
        let tags: String = row.get(5)?;
        let status: String = row.get(6)?;
        let solved_date: Option<String> = row.get(7)?;
        let last_attempt_date: Option<String> = row.get(8)?;
        let updated_at: String = row.get(11)?;

        Ok(Problem {
            id: row.get(1)?,
            title: row.get(2)?,
            title_slug: row.get(3)?,
            difficulty: difficulty
                .parse()
                .map_err(StorageError::Corrupted)?,
            tags: serde_json::from_str(&tags)?,
            status: status.parse().map_err(StorageError::Corrupted)?,
            solved_date: solved_date
                .map(|d| d.parse().map_err(|e: chrono::ParseError| StorageError::Corrupted(e.to_string())))
                .transpose()?,
            last_attempt_date: last_attempt_date
                .map(|d| d.parse().map_err(|e: chrono::ParseError| StorageError::Corrupted(e.to_string())))
                .transpose()?,
            notes: row.get(9)?,
            time_spent: row.get(10)?,
            updated_at: updated_at
                .parse::<DateTime<Utc>>()
                .map_err(|e| StorageError::Corrupted(e.to_string()))?,
        })
    }

    fn put_problem(conn: &Connection, user_id: &str, problem: &Problem) -> Result<(), StorageError> {
        conn.execute(
            "INSERT OR REPLACE INTO problems
             (user_id, id, title, title_slug, difficulty, tags, status,
              solved_date, last_attempt_date, notes, time_spent, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                user_id,
                problem.id,
                problem.title,
                problem.title_slug,
                problem.difficulty.as_str(),
                serde_json::to_string(&problem.tags)?,
                problem.status.as_str(),
                problem.solved_date.map(|d| d.to_string()),
                problem.last_attempt_date.map(|d| d.to_string()),
                problem.notes,
                problem.time_spent,
                problem.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn stats_doc(conn: &Connection, user_id: &str) -> Result<Option<UserStats>, StorageError> {
        let mut stmt = conn.prepare("SELECT doc FROM user_stats WHERE user_id = ?1")?;
        let mut rows = stmt.query(rusqlite::params![user_id])?;

        if let Some(row) = rows.next()? {
            let doc: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&doc)?))
        } else {
            Ok(None)
        }
    }

    fn put_stats(conn: &Connection, user_id: &str, stats: &UserStats) -> Result<(), StorageError> {
        conn.execute(
            "INSERT OR REPLACE INTO user_stats (user_id, doc) VALUES (?1, ?2)",
            rusqlite::params![user_id, serde_json::to_string(stats)?],
        )?;
        Ok(())
    }

    fn profile_doc(conn: &Connection, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        let mut stmt = conn.prepare("SELECT doc FROM user_profiles WHERE user_id = ?1")?;
        let mut rows = stmt.query(rusqlite::params![user_id])?;

        if let Some(row) = rows.next()? {
            let doc: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&doc)?))
        } else {
            Ok(None)
        }
    }
}

impl ProblemStore for DatabaseService {
    fn list_problems(&self, user_id: &str) -> Result<Vec<Problem>, StorageError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT user_id, id, title, title_slug, difficulty, tags, status,
                    solved_date, last_attempt_date, notes, time_spent, updated_at
             FROM problems WHERE user_id = ?1 ORDER BY updated_at DESC",
        )?;
        let mut rows = stmt.query(rusqlite::params![user_id])?;

        let mut problems = Vec::new();
        while let Some(row) = rows.next()? {
            problems.push(Self::row_to_problem(row)?);
        }
        Ok(problems)
    }

    fn get_problem(
        &self,
        user_id: &str,
        problem_id: i64,
    ) -> Result<Option<Problem>, StorageError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT user_id, id, title, title_slug, difficulty, tags, status,
                    solved_date, last_attempt_date, notes, time_spent, updated_at
             FROM problems WHERE user_id = ?1 AND id = ?2",
        )?;
        let mut rows = stmt.query(rusqlite::params![user_id, problem_id])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_problem(row)?))
        } else {
            Ok(None)
        }
    }

    fn upsert_problem(&self, user_id: &str, problem: &Problem) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        Self::put_problem(&conn, user_id, problem)
    }

    fn delete_problem(&self, user_id: &str, problem_id: i64) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM problems WHERE user_id = ?1 AND id = ?2",
            rusqlite::params![user_id, problem_id],
        )?;
        Ok(())
    }
}

impl StatsStore for DatabaseService {
    fn read_stats(&self, user_id: &str) -> Result<UserStats, StorageError> {
        // get-or-create 在同一把锁内完成，调用方不会观察到半初始化的记录
        let conn = self.conn.lock().unwrap();

        match Self::stats_doc(&conn, user_id)? {
            Some(stats) => Ok(stats),
            None => {
                let stats = UserStats::initial();
                Self::put_stats(&conn, user_id, &stats)?;
                Ok(stats)
            }
        }
    }

    fn write_stats(&self, user_id: &str, patch: &StatsPatch) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();

        let mut stats = Self::stats_doc(&conn, user_id)?.unwrap_or_else(UserStats::initial);
        patch.apply(&mut stats);
        Self::put_stats(&conn, user_id, &stats)
    }
}

impl ProfileStore for DatabaseService {
    fn read_profile(&self, user_id: &str) -> Result<UserProfile, StorageError> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::profile_doc(&conn, user_id)?.unwrap_or_default())
    }

    fn write_profile(&self, user_id: &str, patch: &UserProfile) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();

        let mut profile = Self::profile_doc(&conn, user_id)?.unwrap_or_default();
        profile.merge_from(patch);
        conn.execute(
            "INSERT OR REPLACE INTO user_profiles (user_id, doc) VALUES (?1, ?2)",
            rusqlite::params![user_id, serde_json::to_string(&profile)?],
        )?;
        Ok(())
    }
}

impl TrackerStore for DatabaseService {
    /// 题目写与统计写放进同一事务
    fn record_solve(
        &self,
        user_id: &str,
        problem: &Problem,
        patch: &StatsPatch,
    ) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        Self::put_problem(&tx, user_id, problem)?;
        let mut stats = Self::stats_doc(&tx, user_id)?.unwrap_or_else(UserStats::initial);
        patch.apply(&mut stats);
        Self::put_stats(&tx, user_id, &stats)?;

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ProblemStatus};
    use chrono::NaiveDate;

    fn problem(id: i64, title: &str, difficulty: Difficulty, status: ProblemStatus) -> Problem {
        Problem {
            id,
            title: title.to_string(),
            title_slug: Problem::slug_for(title),
            difficulty,
            tags: vec!["Array".to_string(), "Hash Table".to_string()],
            status,
            solved_date: None,
            last_attempt_date: None,
            notes: Some("Used a hash map.".to_string()),
            time_spent: Some(15),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stats_get_or_create_is_stable() {
        let db = DatabaseService::open_in_memory().unwrap();

        let first = db.read_stats("u1").unwrap();
        assert_eq!(first, UserStats::initial());

        let second = db.read_stats("u1").unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn test_stats_write_read_round_trip() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.read_stats("u1").unwrap();

        let mut stats = UserStats::initial();
        stats.easy.solved = 2;
        stats.total_solved = 2;
        stats.streak = 1;
        stats.last_solved_date = Some(NaiveDate::from_ymd_opt(2024, 4, 7).unwrap());

        db.write_stats("u1", &StatsPatch::from(stats.clone())).unwrap();
        assert_eq!(db.read_stats("u1").unwrap(), stats);

        // 幂等：重复写同一载荷不改变存储状态
        db.write_stats("u1", &StatsPatch::from(stats.clone())).unwrap();
        assert_eq!(db.read_stats("u1").unwrap(), stats);
    }

    #[test]
    fn test_stats_partial_write_merges() {
        let db = DatabaseService::open_in_memory().unwrap();
        let mut stats = UserStats::initial();
        stats.streak = 3;
        db.write_stats("u1", &StatsPatch::from(stats)).unwrap();

        let patch = StatsPatch {
            total_solved: Some(7),
            ..Default::default()
        };
        db.write_stats("u1", &patch).unwrap();

        let stored = db.read_stats("u1").unwrap();
        assert_eq!(stored.total_solved, 7);
        assert_eq!(stored.streak, 3);
    }

    #[test]
    fn test_problem_upsert_is_full_replace() {
        let db = DatabaseService::open_in_memory().unwrap();
        let p = problem(1, "Two Sum", Difficulty::Easy, ProblemStatus::Solved);
        db.upsert_problem("u1", &p).unwrap();

        let mut replaced = p.clone();
        replaced.notes = None;
        replaced.time_spent = None;
        db.upsert_problem("u1", &replaced).unwrap();

        let stored = db.get_problem("u1", 1).unwrap().unwrap();
        assert!(stored.notes.is_none());
        assert!(stored.time_spent.is_none());
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let db = DatabaseService::open_in_memory().unwrap();

        let mut older = problem(1, "Two Sum", Difficulty::Easy, ProblemStatus::Solved);
        older.updated_at = "2024-04-01T08:00:00Z".parse().unwrap();
        let mut newer = problem(53, "Maximum Subarray", Difficulty::Medium, ProblemStatus::Todo);
        newer.updated_at = "2024-04-07T08:00:00Z".parse().unwrap();

        db.upsert_problem("u1", &older).unwrap();
        db.upsert_problem("u1", &newer).unwrap();

        let listed = db.list_problems("u1").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 53);
        assert_eq!(listed[1].id, 1);
    }

    #[test]
    fn test_problems_are_scoped_by_user() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.upsert_problem("u1", &problem(1, "Two Sum", Difficulty::Easy, ProblemStatus::Todo))
            .unwrap();

        assert!(db.list_problems("u2").unwrap().is_empty());
        assert!(db.get_problem("u2", 1).unwrap().is_none());
    }

    #[test]
    fn test_delete_does_not_touch_stats() {
        let db = DatabaseService::open_in_memory().unwrap();
        let mut stats = UserStats::initial();
        stats.easy.solved = 1;
        stats.total_solved = 1;
        db.write_stats("u1", &StatsPatch::from(stats.clone())).unwrap();

        db.upsert_problem("u1", &problem(1, "Two Sum", Difficulty::Easy, ProblemStatus::Solved))
            .unwrap();
        db.delete_problem("u1", 1).unwrap();

        assert!(db.get_problem("u1", 1).unwrap().is_none());
        assert_eq!(db.read_stats("u1").unwrap(), stats);
    }

    #[test]
    fn test_record_solve_writes_both_records() {
        let db = DatabaseService::open_in_memory().unwrap();
        let mut p = problem(1, "Two Sum", Difficulty::Easy, ProblemStatus::Solved);
        let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        p.solved_date = Some(today);

        let mut stats = UserStats::initial();
        stats.easy.solved = 1;
        stats.total_solved = 1;
        stats.streak = 1;
        stats.last_solved_date = Some(today);

        db.record_solve("u1", &p, &StatsPatch::from(stats.clone())).unwrap();

        assert_eq!(db.get_problem("u1", 1).unwrap().unwrap().solved_date, Some(today));
        assert_eq!(db.read_stats("u1").unwrap(), stats);
    }

    #[test]
    fn test_profile_write_merges() {
        let db = DatabaseService::open_in_memory().unwrap();

        db.write_profile(
            "u1",
            &UserProfile {
                display_name: Some("John Smith".to_string()),
                email: Some("johnsmith@example.com".to_string()),
                bio: None,
            },
        )
        .unwrap();
        db.write_profile(
            "u1",
            &UserProfile {
                bio: Some("Focusing on dynamic programming.".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let profile = db.read_profile("u1").unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("John Smith"));
        assert_eq!(profile.bio.as_deref(), Some("Focusing on dynamic programming."));
    }

    #[test]
    fn test_create_user_seeds_initial_stats() {
        let db = DatabaseService::open_in_memory().unwrap();
        let identity = db.create_user("a@b.com", "Ann", "hash").unwrap();

        assert_eq!(db.read_stats(&identity.id).unwrap(), UserStats::initial());

        let found = db.find_auth_user("a@b.com").unwrap().unwrap();
        assert_eq!(found.identity, identity);
        assert_eq!(found.password_hash, "hash");
        assert!(db.find_auth_user("missing@b.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let db = DatabaseService::open_in_memory().unwrap();
        db.create_user("a@b.com", "Ann", "hash").unwrap();
        assert!(db.create_user("a@b.com", "Ann2", "hash2").is_err());
    }
}
