//! A single workspace document and its parse outcome.

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::parser::ParseError;
use crate::syntax::{LookmlFile, build_file};

/// Result of parsing a document: an AST, or the error that prevented one.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(Arc<LookmlFile>),
    Failed(ParseError),
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }

    pub fn ast(&self) -> Option<&Arc<LookmlFile>> {
        match self {
            ParseOutcome::Parsed(ast) => Some(ast),
            ParseOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            ParseOutcome::Parsed(_) => None,
            ParseOutcome::Failed(err) => Some(err),
        }
    }
}

/// A document known to the workspace.
///
/// Never updated in place: a content change produces a new document.
#[derive(Debug, Clone)]
pub struct WorkspaceDocument {
    uri: String,
    file_name: String,
    content: Arc<str>,
    parse: ParseOutcome,
    modified: SystemTime,
}

impl WorkspaceDocument {
    /// Parse `content` and build its AST.
    pub fn new(uri: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let uri = uri.into();
        let content = content.into();
        let file_name = display_name(&uri);
        let parse = match build_file(&content, &file_name) {
            Ok(ast) => ParseOutcome::Parsed(Arc::new(ast)),
            Err(err) => {
                debug!(uri = %uri, error = %err, "document failed to parse");
                ParseOutcome::Failed(err)
            }
        };
        Self {
            uri,
            file_name,
            content,
            parse,
            modified: SystemTime::now(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Last path segment of the URI.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn parse(&self) -> &ParseOutcome {
        &self.parse
    }

    pub fn ast(&self) -> Option<&Arc<LookmlFile>> {
        self.parse.ast()
    }

    pub fn is_parsed(&self) -> bool {
        self.parse.is_success()
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }
}

fn display_name(uri: &str) -> String {
    let path = uri.strip_prefix("file://").unwrap_or(uri);
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}
