// ABOUTME: The eight fixed-shape statistics buckets emitted by the quality analyzer (§3/§4.E).
// ABOUTME: Built read-only over the finalized map; never mutated by earlier passes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub file_path: String,
    pub function_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CountedIssues {
    pub count: usize,
    pub issues: Vec<Issue>,
}

impl CountedIssues {
    pub fn push(&mut self, issue: Issue) {
        self.count += 1;
        self.issues.push(issue);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeadCodeStats {
    pub count: usize,
    pub unused_controllers: usize,
    pub unused_methods: usize,
    pub commented_blocks: usize,
    pub backup_files: usize,
    pub issues: Vec<Issue>,
}

impl DeadCodeStats {
    pub fn push(&mut self, category: DeadCodeCategory, issue: Issue) {
        self.count += 1;
        match category {
            DeadCodeCategory::UnusedController => self.unused_controllers += 1,
            DeadCodeCategory::UnusedMethod => self.unused_methods += 1,
            DeadCodeCategory::CommentedBlock => self.commented_blocks += 1,
            DeadCodeCategory::BackupFile => self.backup_files += 1,
        }
        self.issues.push(issue);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DeadCodeCategory {
    UnusedController,
    UnusedMethod,
    CommentedBlock,
    BackupFile,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDebtStats {
    pub count: usize,
    pub todo: usize,
    pub fixme: usize,
    pub hacky: usize,
    pub temporary_removal: usize,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Copy)]
pub enum DebtCategory {
    Todo,
    Fixme,
    Hacky,
    TemporaryRemoval,
}

impl TechnicalDebtStats {
    pub fn push(&mut self, category: DebtCategory, issue: Issue) {
        self.count += 1;
        match category {
            DebtCategory::Todo => self.todo += 1,
            DebtCategory::Fixme => self.fixme += 1,
            DebtCategory::Hacky => self.hacky += 1,
            DebtCategory::TemporaryRemoval => self.temporary_removal += 1,
        }
        self.issues.push(issue);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub db_queries_in_loops: CountedIssues,
    pub n_plus_one_queries: CountedIssues,
    pub dead_code: DeadCodeStats,
    pub technical_debt: TechnicalDebtStats,
    pub code_smells: CountedIssues,
    pub repeated_code: CountedIssues,
    pub anomalies: CountedIssues,
    pub blocking_async: CountedIssues,
}
