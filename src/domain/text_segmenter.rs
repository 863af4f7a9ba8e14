//! 文本分割器
//!
//! 按行切分输入文本，每个非空行是一个独立的合成单位

use super::narration::Segment;

/// 对文本进行分段
///
/// 分段策略：
/// 1. 按行分割（支持 \n 和 \r\n）
/// 2. 去除首尾空白
/// 3. 丢弃空行
///
/// 片段索引是过滤后序列中的位置，而不是原始行号
pub fn segment_text(text: &str) -> Vec<Segment> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| Segment::new(index, line))
        .collect()
}
