//! 提示词

/// 只询问题目总数
pub const PROMPT_COUNT: &str = r#"
This is a scanned Zambian ECZ Grade 7 Integrated Science exam paper.

Read the entire document carefully and tell me ONLY the total number of multiple-choice questions.
Look for phrases like "There are 50 questions" or count the numbered questions (1, 2, 3...).

Output ONLY a single integer (e.g. 50, 40, 60). No other text.
"#;

/// 一次抽取全部题目
pub const PROMPT_ALL: &str = r#"
Extract ALL multiple-choice questions from this Zambian ECZ Grade 7 Integrated Science exam paper.

Rules – follow exactly:
- Ignore instructions, headers, footers, watermarks, page numbers, STOP, QR codes.
- Fix OCR typos (assimillation → assimilation, coartem → Coartem, tse-tsefly → tsetse fly, diarrhoea → diarrhoea, anaemia → anaemia).
- Question text complete and grammatical.
- Options MUST be array of objects: [{"letter":"A","text":"..."}, {"letter":"B","text":"..."}, {"letter":"C","text":"..."}, {"letter":"D","text":"..."}] – NEVER plain strings.
- Diagrams: short neutral "diagram_description" or null.
- Deduce correct answer ("A","B","C","D") using Grade 7 science facts.
- Every object MUST have: "number" (integer starting from 1), "question", "options", "correct", "diagram_description".
- Output ONLY valid JSON array. No text, no fences, no trailing commas.

Example:
[{"number":1,"question":"...","options":[{"letter":"A","text":"..."},...],"correct":"C","diagram_description":null}, ...]
"#;

/// 抽取 start..=end 范围内的题目
pub fn part_prompt(start: usize, end: usize) -> String {
    format!(
        r#"
Extract questions from {start} to {end} only.

Same rules as above:
- Fix typos, natural text.
- Options MUST be [{{"letter":"A","text":"..."}}, {{"letter":"B","text":"..."}}, ...] – never plain strings.
- Diagrams: short description.
- Deduce correct answer.
- "number" must be integer from {start} to {end} (do NOT restart from 1).
- Output ONLY valid JSON array.
"#
    )
}

/// 主题抽取使用的最大素材长度（字符）
pub const TOPIC_MATERIAL_CHARS: usize = 3000;

/// 从教学素材中抽取考试高频主题
pub fn topics_prompt(material: &str) -> String {
    let material: String = material.chars().take(TOPIC_MATERIAL_CHARS).collect();
    format!(
        r#"Analyze this educational material and extract the TOP 10 most important topics/concepts that are commonly tested in exams.
Be concise and specific. Return ONLY a JSON array of topic strings, no other text.

Example format: ["Topic 1", "Topic 2", "Topic 3"]

Material:
{material}"#
    )
}
