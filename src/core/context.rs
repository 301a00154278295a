//! Context algebra.
//!
//! A context names one buildable unit of a solution:
//! `[project][.build-type][+target-type]`. Filters use the same syntax
//! where an omitted part, or a `*` inside a part, acts as a wildcard.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::core::errors::CbuildError;

const BUILD_SEP: char = '.';
const TARGET_SEP: char = '+';

/// The three named parts of a context string. Any part may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContextItem {
    pub project_name: String,
    pub build_type: String,
    pub target_type: String,
}

impl ContextItem {
    pub fn new(
        project_name: impl Into<String>,
        build_type: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Self {
        ContextItem {
            project_name: project_name.into(),
            build_type: build_type.into(),
            target_type: target_type.into(),
        }
    }

    /// Fully-qualified `project.build+target` form, separators always present.
    pub fn flatten(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.project_name, BUILD_SEP, self.build_type, TARGET_SEP, self.target_type
        )
    }

    /// Glob pattern matching this item, empty parts replaced by `*`.
    fn glob_pattern(&self) -> String {
        fn part(s: &str) -> &str {
            if s.is_empty() {
                "*"
            } else {
                s
            }
        }
        format!(
            "{}{}{}{}{}",
            part(&self.project_name),
            BUILD_SEP,
            part(&self.build_type),
            TARGET_SEP,
            part(&self.target_type)
        )
    }
}

impl fmt::Display for ContextItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&create_context(self))
    }
}

impl FromStr for ContextItem {
    type Err = CbuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_context(s)
    }
}

/// Split a context string into its parts.
///
/// Rejects the empty string, more than one `.` or `+`, and a `+` that
/// precedes the `.` (`Project+Target.Build`).
pub fn parse_context(context: &str) -> Result<ContextItem, CbuildError> {
    let invalid = || CbuildError::InvalidContextFormat {
        context: context.to_string(),
    };

    if context.is_empty()
        || context.matches(BUILD_SEP).count() > 1
        || context.matches(TARGET_SEP).count() > 1
    {
        return Err(invalid());
    }

    let build_pos = context.find(BUILD_SEP);
    let target_pos = context.find(TARGET_SEP);

    if let (Some(b), Some(t)) = (build_pos, target_pos) {
        if t < b {
            return Err(invalid());
        }
    }

    let project_end = build_pos.or(target_pos).unwrap_or(context.len());
    let project_name = &context[..project_end];

    let build_type = match build_pos {
        Some(b) => &context[b + 1..target_pos.unwrap_or(context.len())],
        None => "",
    };

    let target_type = match target_pos {
        Some(t) => &context[t + 1..],
        None => "",
    };

    Ok(ContextItem::new(project_name, build_type, target_type))
}

/// Serialize a context item as `project[.build][+target]`.
pub fn create_context(item: &ContextItem) -> String {
    let mut context = item.project_name.clone();
    if !item.build_type.is_empty() {
        context.push(BUILD_SEP);
        context.push_str(&item.build_type);
    }
    if !item.target_type.is_empty() {
        context.push(TARGET_SEP);
        context.push_str(&item.target_type);
    }
    context
}

/// Translate a shell glob into an anchored regular expression.
///
/// `*` matches any run of characters; everything else is literal.
pub fn glob_to_regex(pattern: &str) -> String {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{}$", body)
}

/// Select the contexts of `all` matched by `filters`.
///
/// Result order is first-match order over the filter list, each context
/// appearing once. A filter that matches nothing fails the whole call.
pub fn resolve_contexts(all: &[String], filters: &[String]) -> Result<Vec<String>, CbuildError> {
    let flattened = all
        .iter()
        .map(|context| parse_context(context).map(|item| item.flatten()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen_filters = HashSet::new();
    let mut selected: Vec<String> = Vec::new();
    let mut selected_set = HashSet::new();

    for filter in filters {
        if !seen_filters.insert(filter.as_str()) {
            continue;
        }

        let item = parse_context(filter)?;
        let re = Regex::new(&glob_to_regex(&item.glob_pattern())).map_err(|_| {
            CbuildError::InvalidContextFormat {
                context: filter.clone(),
            }
        })?;

        let mut matched = 0usize;
        for (context, flat) in all.iter().zip(&flattened) {
            if re.is_match(flat) {
                matched += 1;
                if selected_set.insert(context.as_str()) {
                    selected.push(context.clone());
                }
            }
        }

        if matched == 0 {
            return Err(CbuildError::NoFilteredContextFound {
                filter: filter.clone(),
            });
        }
        tracing::debug!("filter `{}` matched {} context(s)", filter, matched);
    }

    Ok(selected)
}
