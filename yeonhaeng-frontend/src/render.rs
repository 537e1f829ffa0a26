//! Text screen for the prompt
//!
//! Everything here is a pure projection of `QueryState`; nothing reads the
//! network or touches the state.

use yeonhaeng_backend::module::archive::QueryState;
use yeonhaeng_common::PRESET_CATEGORIES;

pub const TITLE: &str = "김정중의 연행록";

const RULE: &str = "────────────────────────────────────────";

/// Render the full screen for one state snapshot
pub fn render_screen(state: &QueryState) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n{}\n", RULE, TITLE));
    out.push_str(&format!("검색어: {}\n", state.keyword));

    if state.loading {
        out.push_str("로딩 중...\n");
    }
    if let Some(error) = &state.error {
        out.push_str(&format!("[오류] {}\n", error));
    }

    let groups = state.grouped();
    if !groups.is_empty() {
        out.push_str("\n검색 결과\n");
        let mut number = 0usize;
        for group in &groups {
            out.push_str(&format!("\n■ {}\n", group.genre));
            for record in &group.records {
                number += 1;
                out.push_str(&format!("  [{}] 발행년도: {}\n", number, record.publication_year));
                out.push_str(&format!("      기사명: {}\n", record.article_title));
                out.push_str(&format!("      XML 저장: /export {}   DCI 링크: /link {}\n", number, number));
            }
        }
    }

    if state.show_pagination() {
        let prev = if state.can_go_prev() { "/prev 이전" } else { "(이전)" };
        let next = if state.can_go_next() { "/next 다음" } else { "(다음)" };
        out.push_str(&format!("\n{}   Page {} of {}   {}\n", prev, state.page, state.total_pages, next));
    }

    if let Some(updated) = state.updated_at {
        out.push_str(&format!("갱신: {}\n", updated.format("%H:%M:%S UTC")));
    }
    out.push_str(RULE);
    out
}

/// Render the recommended keyword catalogue with selection numbers
pub fn render_presets() -> String {
    let mut out = String::from("추천 키워드\n");
    for category in PRESET_CATEGORIES.iter() {
        let items: Vec<String> = category
            .keywords
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{}.{}", i + 1, k))
            .collect();
        out.push_str(&format!("\n{}\n  {}\n", category.name, items.join(" ")));
    }
    out.push_str("\n선택: /preset <분류> <번호>  (예: /preset 날씨 1)");
    out
}

pub fn render_help() -> String {
    [
        "<검색어>                 검색어 변경 후 검색",
        "/search [검색어]         새로 검색 (1페이지부터)",
        "/presets                 추천 키워드 목록",
        "/preset <분류> <번호>    추천 키워드로 검색",
        "/next, /prev             다음 / 이전 페이지",
        "/export <번호>           결과를 XML 파일로 저장",
        "/link <번호>             원문 DCI 링크 열기",
        "/cancel                  진행 중인 요청 취소",
        "/help, /quit",
    ]
    .join("\n")
}
