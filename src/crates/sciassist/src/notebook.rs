//! Analysis notebook scaffold
//!
//! A notebook runs four stages in a fixed order:
//! `print_versions → load_data → main_analysis → visualize_results`.
//! Implementors fill in the stages; [`AnalysisNotebook::run`] drives them.

use crate::dispatcher::Dispatcher;
use crate::{Result, SciassistError};
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything a notebook run produced
#[derive(Debug, Clone, Serialize)]
pub struct NotebookRun<R> {
    pub title: String,
    pub versions: Vec<String>,
    pub results: R,
    pub rendering: String,
}

#[async_trait]
pub trait AnalysisNotebook: Send + Sync {
    /// Output of `load_data`
    type Data: Send;
    /// Output of `main_analysis`
    type Results: Send;

    fn title(&self) -> &str;

    /// Version lines recorded for reproducibility
    fn print_versions(&self) -> Vec<String> {
        vec![
            crate::version::version_line(),
            format!("llm {}", llm::version()),
            format!("tooling {}", tooling::version()),
        ]
    }

    async fn load_data(&self) -> Result<Self::Data>;

    async fn main_analysis(&self, data: Self::Data) -> Result<Self::Results>;

    fn visualize_results(&self, results: &Self::Results) -> String;

    /// Run every stage in order, stopping at the first failure
    async fn run(&self) -> Result<NotebookRun<Self::Results>> {
        let versions = self.print_versions();
        for line in &versions {
            info!("{}", line);
        }

        let data = self.load_data().await?;
        let results = self.main_analysis(data).await?;
        let rendering = self.visualize_results(&results);

        Ok(NotebookRun {
            title: self.title().to_string(),
            versions,
            results,
            rendering,
        })
    }
}

/// One answered (or failed) query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRow {
    pub query: String,
    pub answer: Option<String>,
    pub error: Option<String>,
}

/// Looks up every query in a text file, one per line
///
/// Blank lines and lines starting with `#` are skipped.
pub struct LookupBatchNotebook {
    dispatcher: Arc<Dispatcher>,
    path: PathBuf,
}

impl LookupBatchNotebook {
    pub fn new(dispatcher: Arc<Dispatcher>, path: impl Into<PathBuf>) -> Self {
        Self {
            dispatcher,
            path: path.into(),
        }
    }
}

#[async_trait]
impl AnalysisNotebook for LookupBatchNotebook {
    type Data = Vec<String>;
    type Results = Vec<LookupRow>;

    fn title(&self) -> &str {
        "Lookup batch"
    }

    async fn load_data(&self) -> Result<Vec<String>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SciassistError::InvalidInput(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let queries: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();

        if queries.is_empty() {
            return Err(SciassistError::InvalidInput(format!(
                "{} contains no queries",
                self.path.display()
            )));
        }
        Ok(queries)
    }

    async fn main_analysis(&self, queries: Vec<String>) -> Result<Vec<LookupRow>> {
        let answers = self.dispatcher.lookup_many(&queries).await;

        Ok(queries
            .into_iter()
            .zip(answers)
            .map(|(query, answer)| match answer {
                Ok(text) => LookupRow {
                    query,
                    answer: Some(text),
                    error: None,
                },
                Err(e) => LookupRow {
                    query,
                    answer: None,
                    error: Some(e.to_string()),
                },
            })
            .collect())
    }

    fn visualize_results(&self, rows: &Vec<LookupRow>) -> String {
        let answered = rows.iter().filter(|r| r.answer.is_some()).count();
        let table = rows
            .iter()
            .map(|row| match (&row.answer, &row.error) {
                (Some(answer), _) => format!("{}\n  {}", row.query, answer.replace('\n', "\n  ")),
                (None, Some(error)) => format!("{}\n  ! {}", row.query, error),
                (None, None) => row.query.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n{}",
            self.dispatcher
                .visualize(&format!("{}/{} queries answered", answered, rows.len())),
            table
        )
    }
}
