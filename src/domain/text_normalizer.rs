//! 文本规范化
//!
//! 把一行 Markdown/LaTeX 标注的文本改写成可朗读的文字。
//! 规则表有序，后面的规则作用于前面规则的输出。

use regex::{Captures, Regex};

/// 规则的替换方式
#[derive(Debug, Clone)]
enum Replacement {
    /// regex 替换模板，支持 `${1}` 引用
    Template(&'static str),
    /// 取第一个命中的捕获组（用于 `**x**|__x__` 这类成对标记）
    InnerText,
}

/// 单条规范化规则
#[derive(Debug, Clone)]
pub struct NormalizationRule {
    pattern: Regex,
    replacement: Replacement,
}

impl NormalizationRule {
    /// 模板替换规则
    pub fn template(pattern: &str, replacement: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: Replacement::Template(replacement),
        })
    }

    /// 成对标记规则：整段匹配替换为其内部文本
    pub fn inner_text(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: Replacement::InnerText,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn apply(&self, text: &str) -> String {
        match &self.replacement {
            Replacement::Template(template) => {
                self.pattern.replace_all(text, *template).into_owned()
            }
            Replacement::InnerText => self
                .pattern
                .replace_all(text, |caps: &Captures| {
                    caps.iter()
                        .skip(1)
                        .flatten()
                        .next()
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default()
                })
                .into_owned(),
        }
    }
}

/// Markdown 规则（标题、粗体、斜体、分隔线）
///
/// 粗体必须在斜体之前，否则 `*` 会先吃掉 `**` 的一半
const MARKDOWN_RULES: &[(&str, Option<&str>)] = &[
    (r"#+\s?", Some("")),
    (r"\*\*(.*?)\*\*|__(.*?)__", None),
    (r"\*(.*?)\*|_(.*?)_", None),
    (r"---", Some(" ")),
];

/// LaTeX 符号到口语短语的映射，按顺序逐条全局替换
const LATEX_RULES: &[(&str, &str)] = &[
    (r"\\rightarrow", " leads to "),
    (r"\\leftarrow", " comes from "),
    (r"\\sum", " summation of "),
    (r"\\frac\{(.+?)\}\{(.+?)\}", " ${1} divided by ${2} "),
    (r"\\sqrt\{(.+?)\}", " square root of ${1} "),
    (r"\^2", " squared "),
    (r"\\mu", " mew "),
    (r"\\sigma", " sigma "),
    (r"\\beta", " beta "),
    (r"\\epsilon", " epsilon "),
];

/// 数学定界符 `$x$` / `$$x$$`
const MATH_DELIMITER_RULE: (&str, &str) = (r"\$\$?(.+?)\$\$?", " ${1} ");

/// 默认规则表
pub fn default_rules() -> Result<Vec<NormalizationRule>, regex::Error> {
    let mut rules = Vec::with_capacity(MARKDOWN_RULES.len() + LATEX_RULES.len() + 1);

    for &(pattern, replacement) in MARKDOWN_RULES {
        let rule = match replacement {
            Some(template) => NormalizationRule::template(pattern, template)?,
            None => NormalizationRule::inner_text(pattern)?,
        };
        rules.push(rule);
    }

    for &(pattern, template) in LATEX_RULES {
        rules.push(NormalizationRule::template(pattern, template)?);
    }

    let (pattern, template) = MATH_DELIMITER_RULE;
    rules.push(NormalizationRule::template(pattern, template)?);

    Ok(rules)
}

/// 文本规范化器
///
/// 纯函数，无副作用
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    rules: Vec<NormalizationRule>,
}

impl TextNormalizer {
    /// 使用默认规则表创建
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self::with_rules(default_rules()?))
    }

    /// 使用自定义规则表创建
    pub fn with_rules(rules: Vec<NormalizationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[NormalizationRule] {
        &self.rules
    }

    /// 规范化一行文本
    pub fn normalize(&self, raw: &str) -> String {
        self.rules
            .iter()
            .fold(raw.to_string(), |text, rule| rule.apply(&text))
    }
}
