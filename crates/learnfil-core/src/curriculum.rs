//! TOML curriculum parser.
//!
//! Loads modules and lessons from TOML documents, including the built-in
//! seed curriculum, and validates them for structural problems.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Check, Lesson, Module, ValidationTest};

/// The curriculum seeded into an empty store.
const BUILTIN_CURRICULUM: &str = include_str!("../data/curriculum.toml");

/// A set of modules and the lessons that belong to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curriculum {
    pub modules: Vec<Module>,
    pub lessons: Vec<Lesson>,
}

impl Curriculum {
    /// Parse the built-in seed curriculum.
    pub fn builtin() -> Result<Self> {
        parse_curriculum_str(BUILTIN_CURRICULUM, Path::new("<builtin>"))
    }

    /// Lessons of `module_id`, sorted by order index.
    pub fn lessons_for(&self, module_id: &str) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.module_id == module_id)
            .collect();
        lessons.sort_by_key(|l| l.order_index);
        lessons
    }
}

/// Intermediate TOML structure for curriculum files.
#[derive(Debug, Deserialize)]
struct TomlCurriculumFile {
    #[serde(default)]
    modules: Vec<TomlModule>,
    #[serde(default)]
    lessons: Vec<TomlLesson>,
}

#[derive(Debug, Deserialize)]
struct TomlModule {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    order_index: u32,
}

#[derive(Debug, Deserialize)]
struct TomlLesson {
    id: String,
    module_id: String,
    title: String,
    #[serde(default)]
    order_index: u32,
    #[serde(default)]
    content: String,
    #[serde(default)]
    starter_code: String,
    #[serde(default)]
    validation_tests: Vec<TomlValidationTest>,
}

#[derive(Debug, Deserialize)]
struct TomlValidationTest {
    description: String,
    #[serde(default)]
    expected: Option<serde_json::Value>,
    check: Check,
}

/// Parse a curriculum TOML file.
pub fn parse_curriculum(path: &Path) -> Result<Curriculum> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file: {}", path.display()))?;

    parse_curriculum_str(&content, path)
}

/// Parse a curriculum from a TOML string.
pub fn parse_curriculum_str(content: &str, source_path: &Path) -> Result<Curriculum> {
    let parsed: TomlCurriculumFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let modules = parsed
        .modules
        .into_iter()
        .map(|m| Module {
            id: m.id,
            title: m.title,
            description: m.description,
            order_index: m.order_index,
        })
        .collect();

    let lessons = parsed
        .lessons
        .into_iter()
        .map(|l| Lesson {
            id: l.id,
            module_id: l.module_id,
            title: l.title,
            content: l.content,
            starter_code: l.starter_code,
            validation_tests: l
                .validation_tests
                .into_iter()
                .map(|t| ValidationTest {
                    description: t.description,
                    expected: t.expected.unwrap_or(serde_json::Value::Bool(true)),
                    check: t.check,
                })
                .collect(),
            order_index: l.order_index,
        })
        .collect();

    Ok(Curriculum { modules, lessons })
}

/// A warning from curriculum validation.
#[derive(Debug, Clone)]
pub struct CurriculumWarning {
    /// The module or lesson ID (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a curriculum for common issues.
pub fn validate_curriculum(curriculum: &Curriculum) -> Vec<CurriculumWarning> {
    let mut warnings = Vec::new();
    let warn = |id: &str, message: String| CurriculumWarning {
        item_id: Some(id.to_string()),
        message,
    };

    let mut module_ids = HashSet::new();
    for module in &curriculum.modules {
        if !module_ids.insert(module.id.as_str()) {
            warnings.push(warn(&module.id, format!("duplicate module ID: {}", module.id)));
        }
    }

    let mut lesson_ids = HashSet::new();
    let mut order_slots: HashMap<(&str, u32), &str> = HashMap::new();
    for lesson in &curriculum.lessons {
        if !lesson_ids.insert(lesson.id.as_str()) {
            warnings.push(warn(&lesson.id, format!("duplicate lesson ID: {}", lesson.id)));
        }

        if !module_ids.contains(lesson.module_id.as_str()) {
            warnings.push(warn(
                &lesson.id,
                format!("references unknown module: {}", lesson.module_id),
            ));
        }

        if let Some(other) =
            order_slots.insert((lesson.module_id.as_str(), lesson.order_index), &lesson.id)
        {
            warnings.push(warn(
                &lesson.id,
                format!(
                    "order_index {} already used by lesson {other}",
                    lesson.order_index
                ),
            ));
        }

        if lesson.has_exercise() && lesson.validation_tests.is_empty() {
            warnings.push(warn(
                &lesson.id,
                "has starter code but no validation tests".into(),
            ));
        }

        for test in &lesson.validation_tests {
            if let Check::Contains { needle } = &test.check {
                if needle.is_empty() {
                    warnings.push(warn(
                        &lesson.id,
                        format!("test '{}' has an empty needle", test.description),
                    ));
                }
            }
        }
    }

    for module in &curriculum.modules {
        if curriculum.lessons_for(&module.id).is_empty() {
            warnings.push(warn(&module.id, "module has no lessons".into()));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[modules]]
id = "basics"
title = "Basics"
order_index = 1

[[lessons]]
id = "second"
module_id = "basics"
title = "Second"
order_index = 2
starter_code = """
function add(a, b) {}
"""

[[lessons.validation_tests]]
description = "adds"
expected = 5
check = { kind = "evaluate", harness = "add(2, 3)" }

[[lessons]]
id = "first"
module_id = "basics"
title = "First"
order_index = 1
"#;

    #[test]
    fn parse_valid_toml() {
        let c = parse_curriculum_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(c.modules.len(), 1);
        assert_eq!(c.lessons.len(), 2);
        assert_eq!(c.lessons[0].starter_code, "function add(a, b) {}\n");
        assert_eq!(c.lessons[0].validation_tests[0].expected, serde_json::json!(5));

        let ordered: Vec<&str> = c.lessons_for("basics").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ordered, vec!["first", "second"]);
        assert!(validate_curriculum(&c).is_empty());
    }

    #[test]
    fn builtin_curriculum_is_clean() {
        let c = Curriculum::builtin().unwrap();
        assert_eq!(c.modules.len(), 3);
        assert_eq!(c.lessons.len(), 9);
        let warnings = validate_curriculum(&c);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn validate_flags_structural_problems() {
        let toml = r#"
[[modules]]
id = "m"
title = "M"

[[modules]]
id = "m"
title = "M again"

[[lessons]]
id = "a"
module_id = "m"
title = "A"
order_index = 1
starter_code = "let x = 1;"

[[lessons]]
id = "a"
module_id = "ghost"
title = "A again"

[[lessons]]
id = "b"
module_id = "m"
title = "B"
order_index = 1

[[lessons.validation_tests]]
description = "empty"
check = { kind = "contains", needle = "" }
"#;
        let c = parse_curriculum_str(toml, &PathBuf::from("bad.toml")).unwrap();
        let messages: Vec<String> = validate_curriculum(&c)
            .into_iter()
            .map(|w| w.message)
            .collect();
        let has = |s: &str| messages.iter().any(|m| m.contains(s));
        assert!(has("duplicate module ID"));
        assert!(has("duplicate lesson ID"));
        assert!(has("unknown module: ghost"));
        assert!(has("order_index 1 already used"));
        assert!(has("no validation tests"));
        assert!(has("empty needle"));
    }

    #[test]
    fn parse_rejects_unknown_check_kind() {
        let toml = r#"
[[lessons]]
id = "x"
module_id = "m"
title = "X"

[[lessons.validation_tests]]
description = "bad"
check = { kind = "regex", pattern = ".*" }
"#;
        assert!(parse_curriculum_str(toml, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn parse_missing_file() {
        assert!(parse_curriculum(Path::new("definitely/not/here.toml")).is_err());
    }
}
