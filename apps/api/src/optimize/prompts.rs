// Prompt templates for résumé optimization.
// One template is active per deployment, selected through PROMPT_TEMPLATE.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which prompt shape the deployment sends upstream.
///
/// The two shapes optimize differently: `Consultative` asks for an
/// analysis report with suggestions, `Rewrite` asks for the rewritten
/// résumé only. Operators pick one deliberately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Long multi-step consulting prompt as the system message; the user
    /// message is the résumé text verbatim.
    Consultative,
    /// Short persona as the system message; the user message wraps the
    /// résumé text in a direct rewrite instruction.
    #[default]
    Rewrite,
}

impl PromptTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptTemplate::Consultative => "consultative",
            PromptTemplate::Rewrite => "rewrite",
        }
    }

    /// Output budget that fits the template's expected answer length.
    pub fn default_max_tokens(self) -> u32 {
        match self {
            PromptTemplate::Consultative => 4000,
            PromptTemplate::Rewrite => 2000,
        }
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown prompt template '{0}' (expected 'consultative' or 'rewrite')")]
pub struct UnknownTemplate(String);

impl FromStr for PromptTemplate {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consultative" => Ok(PromptTemplate::Consultative),
            "rewrite" => Ok(PromptTemplate::Rewrite),
            other => Err(UnknownTemplate(other.to_string())),
        }
    }
}

/// The two chat messages sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds the system and user messages for `resume_text`.
///
/// Pure: no validation, no I/O. Callers reject empty input first.
pub fn build_prompt(template: PromptTemplate, resume_text: &str) -> PromptPair {
    match template {
        PromptTemplate::Consultative => PromptPair {
            system: CONSULTATIVE_SYSTEM.to_string(),
            user: resume_text.to_string(),
        },
        PromptTemplate::Rewrite => PromptPair {
            system: REWRITE_SYSTEM.to_string(),
            user: REWRITE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text),
        },
    }
}

/// Persona for the rewrite template.
pub const REWRITE_SYSTEM: &str = "你是一位专业的简历优化顾问，擅长将普通的简历改写成更专业、更有吸引力的版本，突出申请人的技能和成就。";

/// Rewrite instruction. Replace `{resume_text}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"以下是一份简历内容，请对其进行优化，保持原有的信息和结构，但使其更加专业、更有吸引力。优化要点：

1. 使用更强的行动动词和成就导向的语言
2. 突出关键技能和成就
3. 确保语言简洁清晰
4. 保持格式一致
5. 移除冗余信息，保持核心内容
6. 确保使用专业术语，提升专业性
7. 纠正任何语法或拼写错误

原始简历内容：
{resume_text}

请直接返回优化后的完整简历内容，不要添加任何额外解释。"#;

/// Full consulting prompt: assessment, format, content, keywords,
/// quantified achievements, language, and a summary of suggestions.
pub const CONSULTATIVE_SYSTEM: &str = r#"你是一位专业的简历优化顾问，拥有丰富的人力资源和招聘经验，精通中国职场文化和各行业简历标准。你擅长分析简历内容、结构和表达方式，并能针对性地提供改进建议，使简历更具竞争力。

# 任务描述
帮助用户审查和优化简历，重点关注格式规范、内容精简、关键词匹配和成就量化，使简历能够吸引招聘者，并有效通过 ATS（简历筛选系统）的筛选。

# 任务步骤
1. 整体评估简历
   - 分析简历的整体布局和视觉呈现
   - 检查简历长度是否适当（一般不超过2页）
   - 评估信息组织是否清晰、有逻辑

2. 格式检查与优化
   - 检查字体、字号、行距是否统一规范
   - 确认段落对齐方式是否一致
   - 评估空白区域分配是否合理
   - 检查标点符号使用是否规范（中文简历使用中文标点）

3. 内容分析与精简
   - 检查个人信息完整性（姓名、联系方式、教育背景等）
   - 分析工作经历描述是否简洁有力
   - 识别冗余、重复或无关内容
   - 提出精简建议，确保表达清晰、直接

4. 关键词匹配分析
   - 根据目标职位识别行业关键词
   - 检查关键词的出现频率和位置
   - 建议添加或强化与目标职位匹配的专业术语和技能词汇
   - 确保关键词自然融入内容，避免堆砌

5. 成就量化改进
   - 识别可量化的成就和贡献
   - 将抽象描述转化为具体数据（如增长百分比、金额、时间节省等）
   - 使用 STAR 法则（情境-任务-行动-结果）重构成就描述
   - 确保量化数据真实可信

6. 语言表达优化
   - 检查语法、拼写和标点错误
   - 使用积极、专业的动词开头
   - 确保语言风格一致且专业

7. 最终建议汇总
   - 提出3-5项最重要的改进建议
   - 给出具体的修改示例
   - 说明预期改进效果

# 约束条件
1. 所有建议必须符合中国职场文化和简历规范
2. 不提供虚假信息或夸大成就的建议
3. 尊重用户原有简历风格，在此基础上提出改进
4. 保持专业、客观的咨询语气
5. 提供具体、可操作的建议，避免笼统模糊的表达
6. 不对用户的行业专业知识做出评判
7. 确保隐私保护，不鼓励在简历中包含过度个人信息

# 响应格式
先给出简短的整体评估，再按以下结构分析简历：

**整体评估**：简历的总体印象和主要优缺点

**格式分析**：
- 优点：
- 建议改进：

**内容分析**：
- 优点：
- 建议改进：

**关键词匹配**：
- 现有关键词：
- 建议添加/强化：

**成就量化**：
- 已量化成就：
- 可进一步量化的部分：

**语言表达**：
- 优点：
- 建议改进：

**最重要的改进建议**：
1.
2.
3.

**示例修改**：
原文：
修改后：

# 输出
- 输出纯文本格式，便于直接复制使用"#;

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "张三，5年销售经验";

    #[test]
    fn test_rewrite_wraps_resume_in_user_message() {
        let pair = build_prompt(PromptTemplate::Rewrite, RESUME);
        assert_eq!(pair.system, REWRITE_SYSTEM);
        assert!(pair.user.contains(RESUME));
        assert!(pair.user.starts_with("以下是一份简历内容"));
        assert!(!pair.user.contains("{resume_text}"));
    }

    #[test]
    fn test_consultative_sends_resume_verbatim() {
        let pair = build_prompt(PromptTemplate::Consultative, RESUME);
        assert_eq!(pair.system, CONSULTATIVE_SYSTEM);
        assert_eq!(pair.user, RESUME);
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        for template in [PromptTemplate::Rewrite, PromptTemplate::Consultative] {
            assert_eq!(build_prompt(template, RESUME), build_prompt(template, RESUME));
        }
    }

    #[test]
    fn test_system_message_does_not_depend_on_input() {
        let a = build_prompt(PromptTemplate::Rewrite, "one");
        let b = build_prompt(PromptTemplate::Rewrite, "two");
        assert_eq!(a.system, b.system);
        assert_ne!(a.user, b.user);
    }

    #[test]
    fn test_template_parsing() {
        assert_eq!("rewrite".parse::<PromptTemplate>().unwrap(), PromptTemplate::Rewrite);
        assert_eq!(
            " Consultative ".parse::<PromptTemplate>().unwrap(),
            PromptTemplate::Consultative
        );
        assert!("summary".parse::<PromptTemplate>().is_err());
    }
}
