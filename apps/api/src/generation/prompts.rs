// All LLM prompt constants for the Generation module.

/// System prompt for skill synthesis — enforces bare comma-list output.
pub const SKILLS_SYSTEM: &str = "You are an expert resume writer. \
    You respond with ONLY a comma-separated list of skills. \
    Do NOT include explanations, numbering, or any text besides the list.";

/// Skill synthesis prompt template. Replace `{job_title}` and
/// `{job_description}` before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"List 8-10 concrete, resume-ready skills for a candidate applying to this job.

Rules:
- Skills only: no education, no certifications, no job titles.
- Prefer specific technologies and competencies named in the posting.
- Each skill at most a few words.
- Respond with ONLY the comma-separated list, nothing else.

JOB TITLE: {job_title}

JOB DESCRIPTION:
{job_description}"#;

/// System prompt for summary synthesis.
pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer crafting \
    concise professional summaries tailored to a specific job posting.";

/// Summary synthesis prompt template. Replace `{job_text}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a 2-3 sentence professional summary for a resume tailored to the job posting below.

Rules:
- Do not mention any company name.
- Third-person resume convention: no "I", no pronouns.
- Keep it under 80 words.
- Plain text only.

JOB POSTING TEXT:
{job_text}"#;
