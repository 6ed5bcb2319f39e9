// 统计聚合模块
// 解题事件驱动的纯函数统计引擎：难度桶计数与连续打卡天数

use crate::models::{Problem, UserStats};
use chrono::{Local, NaiveDate};

/// 当前本地日历日
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 由一次解题事件推导下一份统计记录
///
/// `problem` 是正在置为 Solved 的题目，其 `solved_date` 为空或为更早的日期。
/// 同一日历日内的重复解题（`solved_date == today`）整体跳过，不重复计数；
/// 去重按日，不按题目。本函数不触碰持久层，由调用方落盘。
pub fn apply_solved(stats: &UserStats, problem: &Problem, today: NaiveDate) -> UserStats {
    if problem.solved_date == Some(today) {
        return stats.clone();
    }

    let mut next = stats.clone();
    next.bucket_mut(problem.difficulty).solved += 1;
    next.total_solved += 1;
    next.streak = next_streak(stats.streak, stats.last_solved_date, today);
    next.last_solved_date = Some(today);
    next
}

/// 连续打卡推进规则：无记录起步为 1，隔一天加一，断档归一
fn next_streak(streak: u32, last_solved: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last_solved {
        None => 1,
        Some(last) => {
            // 日历日差；NaiveDate 本身即天粒度，等价于零点截断后相减
            let days = (today - last).num_days();
            if days == 1 {
                streak + 1
            } else if days > 1 {
                1
            } else {
                // 同日（守卫之后不可达，防御性保留）
                streak
            }
        }
    }
}

/// 完成度百分比，total 为零时返回 0
pub fn completion_percentage(solved: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    solved as f64 / total as f64 * 100.0
}
