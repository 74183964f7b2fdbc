use crate::config::Config;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

pub mod copy;
pub mod insert;
pub mod schema;

const PREVIEW_LENGTH: usize = 40;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Drop,
    Create,
    Copy,
    Insert,
}

impl Stage {
    pub const PROVISION: [Stage; 2] = [Stage::Drop, Stage::Create];
    pub const ETL: [Stage; 2] = [Stage::Copy, Stage::Insert];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Drop => "drop",
            Stage::Create => "create",
            Stage::Copy => "copy",
            Stage::Insert => "insert",
        };
        write!(f, "{name}")
    }
}

/// Every statement the warehouse runs, grouped by stage and kept in execution order.
#[derive(Debug, Clone)]
pub struct Catalog {
    drop: Vec<String>,
    create: Vec<String>,
    copy: Vec<String>,
    insert: Vec<String>,
}

impl Catalog {
    pub fn new(config: &Config) -> Self {
        Catalog {
            drop: schema::drop_table_requests(),
            create: schema::create_table_requests(),
            copy: copy::copy_table_requests(&config.s3, &config.iam_role, &config.cluster.region),
            insert: insert::insert_table_requests(),
        }
    }

    pub fn requests(&self, stage: Stage) -> &[String] {
        match stage {
            Stage::Drop => &self.drop,
            Stage::Create => &self.create,
            Stage::Copy => &self.copy,
            Stage::Insert => &self.insert,
        }
    }
}

#[cfg(test)]
impl Catalog {
    pub fn replace(&mut self, stage: Stage, position: usize, request: &str) {
        let requests = match stage {
            Stage::Drop => &mut self.drop,
            Stage::Create => &mut self.create,
            Stage::Copy => &mut self.copy,
            Stage::Insert => &mut self.insert,
        };
        requests[position] = request.to_string();
    }
}

/// Single-line head of a statement, used in progress and error messages.
pub fn preview(request: &str) -> String {
    let line = WHITESPACE.replace_all(request.trim(), " ");
    match line.char_indices().nth(PREVIEW_LENGTH) {
        Some((end, _)) => format!("{}...", &line[..end]),
        None => line.to_string(),
    }
}
