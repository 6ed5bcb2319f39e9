// 命令模块
// 提供供界面调用的命令接口

pub mod auth;
pub mod database;

pub use auth::{
    current_user,
    register_user,
    sign_in,
    sign_out,
};

pub use database::{
    delete_problem,
    filter_problems,
    get_problem,
    get_problems,
    get_status_summary,
    get_user_profile,
    get_user_stats,
    mark_problem_solved,
    save_problem,
    save_user_profile,
    DifficultyProgressDto,
    ProblemDto,
    ProblemInput,
    UserStatsDto,
    GUEST_USER_ID,
};

/// 应用版本号
pub fn app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 将题目笔记的 Markdown 渲染为 HTML
pub fn render_notes_html(notes: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(notes, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
