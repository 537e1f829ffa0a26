//! Prompt command dispatch

use anyhow::Result;

use yeonhaeng_backend::config::AppConfig;
use yeonhaeng_backend::module::archive::{QueryPipeline, SearchTask};
use yeonhaeng_backend::module::{export, xref};
use yeonhaeng_common::{find_category, preset_keyword};

use crate::command::{CommandType, ParsedCommand};
use crate::render;

/// What the prompt loop should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading; print the message if there is one
    Continue(Option<String>),
    Quit,
}

impl Outcome {
    fn say(message: impl Into<String>) -> Self {
        Outcome::Continue(Some(message.into()))
    }

    fn quiet() -> Self {
        Outcome::Continue(None)
    }
}

pub struct App {
    pipeline: QueryPipeline,
    config: AppConfig,
    /// Most recently issued request, target of `/cancel`
    last_task: Option<SearchTask>,
}

impl App {
    pub fn new(pipeline: QueryPipeline, config: AppConfig) -> Self {
        Self {
            pipeline,
            config,
            last_task: None,
        }
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.pipeline
    }

    /// Initial search on the default keyword
    pub async fn start(&mut self) {
        let task = self.pipeline.search().await;
        self.track(task);
    }

    /// Wait for the latest request to commit, if any
    pub async fn settle(&mut self) {
        if let Some(task) = self.last_task.take() {
            task.wait().await;
        }
    }

    fn track(&mut self, task: SearchTask) {
        self.last_task = Some(task);
    }

    /// Handle one input line
    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        let cmd = ParsedCommand::parse(line);
        if cmd.raw_text.is_empty() {
            return Outcome::quiet();
        }
        tracing::debug!("Command '{}': {}", cmd.command_type.as_str(), cmd.arguments);

        match self.dispatch(&cmd).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Command '{}' failed: {:#}", cmd.raw_text, e);
                Outcome::say(format!("오류: {:#}", e))
            }
        }
    }

    async fn dispatch(&mut self, cmd: &ParsedCommand) -> Result<Outcome> {
        match cmd.command_type {
            CommandType::Keyword => {
                let task = self.pipeline.set_keyword(cmd.arguments.clone()).await;
                self.track(task);
                Ok(Outcome::quiet())
            }
            CommandType::Search => {
                let task = if cmd.arguments.is_empty() {
                    self.pipeline.search().await
                } else {
                    self.pipeline.set_keyword(cmd.arguments.clone()).await
                };
                self.track(task);
                Ok(Outcome::quiet())
            }
            CommandType::Presets => Ok(Outcome::say(render::render_presets())),
            CommandType::Preset => self.select_preset(cmd).await,
            CommandType::Next => match self.pipeline.next_page().await {
                Some(task) => {
                    self.track(task);
                    Ok(Outcome::quiet())
                }
                None => Ok(Outcome::say("마지막 페이지입니다.")),
            },
            CommandType::Prev => match self.pipeline.prev_page().await {
                Some(task) => {
                    self.track(task);
                    Ok(Outcome::quiet())
                }
                None => Ok(Outcome::say("첫 페이지입니다.")),
            },
            CommandType::Export => self.export(cmd).await,
            CommandType::Link => self.link(cmd).await,
            CommandType::Cancel => self.cancel().await,
            CommandType::Help => Ok(Outcome::say(render::render_help())),
            CommandType::Quit => Ok(Outcome::Quit),
            CommandType::Unknown => Ok(Outcome::say(format!(
                "알 수 없는 명령: {} (/help)",
                cmd.raw_text
            ))),
        }
    }

    async fn select_preset(&mut self, cmd: &ParsedCommand) -> Result<Outcome> {
        let args = cmd.args();
        let (Some(category), Some(position)) = (args.first(), args.get(1)) else {
            return Ok(Outcome::say("사용법: /preset <분류> <번호>"));
        };
        if find_category(category).is_none() {
            return Ok(Outcome::say(format!("없는 분류: {}", category)));
        }
        let keyword = position
            .parse::<usize>()
            .ok()
            .and_then(|n| preset_keyword(category, n));
        let Some(keyword) = keyword else {
            return Ok(Outcome::say(format!("{} 분류에 {}번 키워드가 없습니다.", category, position)));
        };

        let task = self.pipeline.set_keyword(keyword).await;
        self.track(task);
        Ok(Outcome::quiet())
    }

    async fn export(&self, cmd: &ParsedCommand) -> Result<Outcome> {
        let Some(n) = cmd.record_number() else {
            return Ok(Outcome::say("사용법: /export <번호>"));
        };
        let state = self.pipeline.snapshot().await;
        let Some(record) = state.record(n) else {
            return Ok(Outcome::say(format!("{}번 결과가 없습니다.", n)));
        };

        let path = export::export_record(record, &self.config.export).await?;
        Ok(Outcome::say(format!("저장됨: {}", path.display())))
    }

    async fn link(&self, cmd: &ParsedCommand) -> Result<Outcome> {
        let Some(n) = cmd.record_number() else {
            return Ok(Outcome::say("사용법: /link <번호>"));
        };
        let state = self.pipeline.snapshot().await;
        let Some(record) = state.record(n) else {
            return Ok(Outcome::say(format!("{}번 결과가 없습니다.", n)));
        };

        let url = xref::open_viewer(&record.record_id, self.config.viewer.open_browser)?;
        Ok(Outcome::say(url))
    }

    async fn cancel(&mut self) -> Result<Outcome> {
        let cancelled = match self.last_task.take() {
            Some(task) => self.pipeline.cancel(task).await,
            None => false,
        };
        Ok(Outcome::say(if cancelled {
            "요청을 취소했습니다."
        } else {
            "진행 중인 요청이 없습니다."
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use yeonhaeng_backend::config::ArchiveConfig;
    use yeonhaeng_backend::module::archive::{SearchError, SearchQuery, SearchSource};

    /// Answers every query with one record whose title is the keyword
    #[derive(Default)]
    struct EchoSource {
        calls: Mutex<Vec<SearchQuery>>,
    }

    #[async_trait]
    impl SearchSource for EchoSource {
        async fn fetch(&self, query: &SearchQuery) -> Result<String, SearchError> {
            self.calls.lock().unwrap().push(query.clone());
            Ok(format!(
                r#"<r><doc><field name="간행년">1791</field><field name="기사명">{}-{}</field><field name="문체명">日記</field><field name="DCI_s">ITKC_GO_1422A_2004_00{}_XML</field></doc></r>"#,
                query.keyword, query.page, query.page
            ))
        }
    }

    fn app_with(source: Arc<EchoSource>, export_dir: &std::path::Path) -> App {
        let mut config = AppConfig::default();
        config.export.dir = export_dir.to_path_buf();
        config.viewer.open_browser = false;
        let pipeline = QueryPipeline::new(source, &ArchiveConfig::default());
        App::new(pipeline, config)
    }

    async fn titles(app: &App) -> Vec<String> {
        app.pipeline()
            .snapshot()
            .await
            .results
            .iter()
            .map(|r| r.article_title.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_start_searches_default_keyword() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(EchoSource::default());
        let mut app = app_with(source.clone(), dir.path());

        app.start().await;
        app.settle().await;
        assert_eq!(titles(&app).await, vec!["馬-1"]);
        assert_eq!(source.calls.lock().unwrap()[0], SearchQuery::new("馬", 1));
    }

    #[tokio::test]
    async fn test_paging_and_keyword_edit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(EchoSource::default()), dir.path());

        app.start().await;
        app.settle().await;
        assert_eq!(app.handle_line("/next").await, Outcome::quiet());
        app.settle().await;
        assert_eq!(titles(&app).await, vec!["馬-1", "馬-2"]);

        app.handle_line("山").await;
        app.settle().await;
        assert_eq!(titles(&app).await, vec!["山-1"]);

        assert_eq!(app.handle_line("/prev").await, Outcome::say("첫 페이지입니다."));
    }

    #[tokio::test]
    async fn test_preset_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(EchoSource::default()), dir.path());

        app.handle_line("/preset 날씨 4").await;
        app.settle().await;
        let state = app.pipeline().snapshot().await;
        assert_eq!(state.keyword, "風甚");
        assert_eq!(titles(&app).await, vec!["風甚-1"]);

        assert!(matches!(app.handle_line("/preset 날씨 99").await, Outcome::Continue(Some(_))));
        assert!(matches!(app.handle_line("/preset 없음 1").await, Outcome::Continue(Some(_))));
    }

    #[tokio::test]
    async fn test_export_and_link() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(EchoSource::default()), dir.path());
        app.start().await;
        app.settle().await;

        let Outcome::Continue(Some(msg)) = app.handle_line("/export 1").await else {
            panic!("expected message");
        };
        assert!(msg.contains("xml_data.xml"));
        let written = std::fs::read_to_string(dir.path().join("xml_data.xml")).unwrap();
        assert!(written.starts_with("<doc>") && written.ends_with("</doc>"));

        assert_eq!(
            app.handle_line("/link 1").await,
            Outcome::say("https://db.itkc.or.kr/dir/item?itemId=GO#dir/node?dataId=ITKC_GO_1422A&viewSync=TR")
        );
        assert_eq!(app.handle_line("/link 7").await, Outcome::say("7번 결과가 없습니다."));
    }

    #[tokio::test]
    async fn test_quit_unknown_and_blank() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(EchoSource::default()), dir.path());
        assert_eq!(app.handle_line("   ").await, Outcome::quiet());
        assert!(matches!(app.handle_line("/bogus").await, Outcome::Continue(Some(_))));
        assert_eq!(app.handle_line("/quit").await, Outcome::Quit);
    }

    #[tokio::test]
    async fn test_cancel_without_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Arc::new(EchoSource::default()), dir.path());
        assert_eq!(app.handle_line("/cancel").await, Outcome::say("진행 중인 요청이 없습니다."));
    }
}
